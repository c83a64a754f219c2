//! Core types for histogram representation

use std::fmt;

use histdiff_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Closed binning range `[low, high]` for one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinRange {
    pub low: f64,
    pub high: f64,
}

impl BinRange {
    /// Create a range; both ends must be finite and `high > low`
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "bin range [{low}, {high}] must be finite"
            )));
        }
        if high <= low {
            return Err(Error::InvalidParameter(format!(
                "bin range [{low}, {high}] has no extent"
            )));
        }
        Ok(Self { low, high })
    }

    /// Width of the whole range
    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

impl fmt::Display for BinRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.low, self.high)
    }
}

/// Equal-width histogram over a fixed range with integer counts
///
/// The range and bin count are frozen at construction; filling only ever
/// increases counts. Values equal to `high` land in the last bin, NaN and
/// out-of-range values are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    range: BinRange,
    bin_width: f64,
    counts: Vec<u64>,
}

impl Histogram {
    /// Create an empty histogram with `nbins` bins over `range`
    pub fn new(nbins: usize, range: BinRange) -> Result<Self> {
        if nbins == 0 {
            return Err(Error::non_positive("nbins", nbins));
        }
        Ok(Self {
            range,
            bin_width: range.width() / nbins as f64,
            counts: vec![0; nbins],
        })
    }

    /// Find which bin a value falls into
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        let BinRange { low, high } = self.range;
        if value.is_nan() || value < low || value > high {
            return None;
        }
        let last = self.counts.len() - 1;
        if value == high {
            return Some(last);
        }
        // Rounding can push values just below `high` onto `nbins`
        let idx = ((value - low) / self.bin_width) as usize;
        Some(idx.min(last))
    }

    /// Add one observation
    pub fn fill_one(&mut self, value: f64) {
        if let Some(idx) = self.find_bin(value) {
            self.counts[idx] += 1;
        }
    }

    /// Add a slice of observations
    pub fn fill(&mut self, values: &[f64]) {
        for &value in values {
            self.fill_one(value);
        }
    }

    /// Add another histogram's counts into this one
    ///
    /// Both histograms must share bin count and range.
    pub fn merge(&mut self, other: &Histogram) -> Result<()> {
        self.check_compatible(other)?;
        for (c1, c2) in self.counts.iter_mut().zip(&other.counts) {
            *c1 += c2;
        }
        Ok(())
    }

    /// Check that another histogram has the same shape
    pub fn check_compatible(&self, other: &Histogram) -> Result<()> {
        if self.counts.len() != other.counts.len() {
            return Err(Error::size_mismatch(
                self.counts.len(),
                other.counts.len(),
                "histogram bins",
            ));
        }
        if self.range != other.range {
            return Err(Error::InvalidInput(format!(
                "histogram ranges differ: {} vs {}",
                self.range, other.range
            )));
        }
        Ok(())
    }

    /// Get the raw counts
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Counts as `f64`, ready for smoothing
    pub fn counts_f64(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }

    /// Get the number of bins
    pub fn nbins(&self) -> usize {
        self.counts.len()
    }

    /// Get the binning range
    pub fn range(&self) -> BinRange {
        self.range
    }

    /// Get the width of one bin
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Total number of binned observations
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Check if no observation has been binned
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Histogram({} bins, n={}, range={})",
            self.nbins(),
            self.total(),
            self.range
        )
    }
}
