//! Range Estimator: the first streaming pass
//!
//! Walks every batch once, tracking the finite minimum and maximum of each
//! feature. Infinite values count as missing. After the pass, degenerate
//! ranges are widened and features that never produced a finite value are
//! set aside as problematic.

use std::collections::HashMap;
use std::fmt;

use histdiff_core::{Error, Result, RowBatch};
use histdiff_histogram::BinRange;
use tracing::{debug, info, instrument, warn};

/// Why a feature was excluded from scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemReason {
    /// No finite value anywhere in the dataset
    NoValues,
}

impl ProblemReason {
    /// Tag written to the problematic-feature report
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NoValues => "noValues",
        }
    }
}

impl fmt::Display for ProblemReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A feature excluded by the range pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblematicFeature {
    pub name: String,
    pub reason: ProblemReason,
}

/// Frozen per-feature binning ranges, in input feature order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MinMaxTable {
    features: Vec<String>,
    ranges: Vec<BinRange>,
    index: HashMap<String, usize>,
}

impl MinMaxTable {
    /// Build a table from `(feature, range)` pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, BinRange)>,
    {
        let mut table = Self::default();
        for (name, range) in pairs {
            if table.index.contains_key(&name) {
                return Err(Error::Configuration(format!("duplicate feature {name}")));
            }
            table.index.insert(name.clone(), table.features.len());
            table.features.push(name);
            table.ranges.push(range);
        }
        Ok(table)
    }

    /// Range for a feature
    pub fn get(&self, feature: &str) -> Option<BinRange> {
        self.index.get(feature).map(|&i| self.ranges[i])
    }

    /// Position of a feature
    pub fn position(&self, feature: &str) -> Option<usize> {
        self.index.get(feature).copied()
    }

    /// Features with a usable range
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Ranges in `features` order
    pub fn ranges(&self) -> &[BinRange] {
        &self.ranges
    }

    /// Iterate `(feature, range)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, BinRange)> {
        self.features
            .iter()
            .map(String::as_str)
            .zip(self.ranges.iter().copied())
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if no feature survived
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Result of the range pass
#[derive(Debug, Clone, PartialEq)]
pub struct RangeEstimate {
    pub table: MinMaxTable,
    pub problematic: Vec<ProblematicFeature>,
}

impl RangeEstimate {
    /// Features that will be histogrammed
    pub fn good_features(&self) -> &[String] {
        self.table.features()
    }
}

/// Widen a constant feature's range so it has extent
///
/// The upper bound moves up by half the magnitude of `value`; when that
/// leaves no width (e.g. `value == 0`) it moves up by one. Only at the top
/// of the `f64` range, where neither fits, is the lower bound moved down.
pub fn widen_degenerate(value: f64) -> (f64, f64) {
    let widened = value + value.abs() * 0.5;
    if widened > value && widened.is_finite() {
        return (value, widened);
    }
    let stepped = value + 1.0;
    if stepped > value && stepped.is_finite() {
        return (value, stepped);
    }
    (value - value.abs() * 0.5, value)
}

/// Incremental min/max tracker fed one batch at a time
#[derive(Debug, Clone)]
pub struct RangeAccumulator {
    features: Vec<String>,
    bounds: Vec<Option<(f64, f64)>>,
    column_map: Option<(Vec<String>, Vec<usize>)>,
    batches: usize,
    rows: usize,
}

impl RangeAccumulator {
    /// Track the given features
    pub fn new<S: AsRef<str>>(features: &[S]) -> Result<Self> {
        let features: Vec<String> = features.iter().map(|f| f.as_ref().to_string()).collect();
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = features.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(Error::Configuration(format!("duplicate feature column {dup}")));
        }
        Ok(Self {
            bounds: vec![None; features.len()],
            features,
            column_map: None,
            batches: 0,
            rows: 0,
        })
    }

    /// Fold one batch into the running bounds
    pub fn observe(&mut self, batch: &RowBatch) -> Result<()> {
        let columns = self.columns_for(batch)?;
        for (f, &col) in columns.iter().enumerate() {
            let Some(values) = batch.column(col) else {
                return Err(Error::missing_column(&self.features[f]));
            };
            if let Some((lo, hi)) = finite_bounds(values) {
                self.bounds[f] = Some(match self.bounds[f] {
                    Some((l, h)) => (l.min(lo), h.max(hi)),
                    None => (lo, hi),
                });
            }
        }
        self.batches += 1;
        self.rows += batch.len();
        debug!(batch = self.batches, rows = batch.len(), "range pass batch");
        Ok(())
    }

    /// Freeze the table and report excluded features
    pub fn finish(self) -> Result<RangeEstimate> {
        let mut pairs = Vec::with_capacity(self.features.len());
        let mut problematic = Vec::new();

        for (name, bounds) in self.features.into_iter().zip(self.bounds) {
            match bounds {
                Some((low, high)) => {
                    let (low, high) = if low == high {
                        widen_degenerate(low)
                    } else {
                        (low, high)
                    };
                    pairs.push((name, BinRange::new(low, high)?));
                }
                None => problematic.push(ProblematicFeature {
                    name,
                    reason: ProblemReason::NoValues,
                }),
            }
        }

        if !problematic.is_empty() {
            let names: Vec<&str> = problematic.iter().map(|p| p.name.as_str()).collect();
            warn!(
                "no values found in the following features: {}",
                names.join(" | ")
            );
        }
        info!(
            batches = self.batches,
            rows = self.rows,
            good = pairs.len(),
            problematic = problematic.len(),
            "range estimation finished"
        );

        Ok(RangeEstimate {
            table: MinMaxTable::from_pairs(pairs)?,
            problematic,
        })
    }

    fn columns_for(&mut self, batch: &RowBatch) -> Result<Vec<usize>> {
        if let Some((names, map)) = &self.column_map {
            if names.as_slice() == batch.feature_names() {
                return Ok(map.clone());
            }
        }
        let map = map_columns(&self.features, batch.feature_names())?;
        self.column_map = Some((batch.feature_names().to_vec(), map.clone()));
        Ok(map)
    }
}

/// Position of each wanted feature within a batch's columns
pub(crate) fn map_columns(wanted: &[String], available: &[String]) -> Result<Vec<usize>> {
    wanted
        .iter()
        .map(|name| {
            available
                .iter()
                .position(|a| a == name)
                .ok_or_else(|| Error::missing_column(name))
        })
        .collect()
}

/// Finite min and max of a column, `None` if it has no finite value
fn finite_bounds(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            None => Some((v, v)),
        })
}

/// Run the range pass over a batch stream
#[instrument(skip_all, fields(features = features.len()))]
pub fn estimate_ranges<S, I>(features: &[S], batches: I) -> Result<RangeEstimate>
where
    S: AsRef<str>,
    I: IntoIterator<Item = Result<RowBatch>>,
{
    let mut acc = RangeAccumulator::new(features)?;
    for batch in batches {
        acc.observe(&batch?)?;
    }
    acc.finish()
}
