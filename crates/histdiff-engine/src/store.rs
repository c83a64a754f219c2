//! Histogram Store: per-well histogram sets in a flat arena
//!
//! Every well owns one slot of `features.len()` consecutive histograms.
//! Slots are allocated lazily the first time a well is seen, always from the
//! same template, so all wells share feature order, bin count and ranges.
//! Allocating a slot never moves or resets the counts of existing slots.

use std::collections::HashMap;
use std::sync::Arc;

use histdiff_core::{Error, Result};
use histdiff_histogram::Histogram;

use crate::range::MinMaxTable;

/// Mapping well id → full histogram set
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramStore {
    features: Arc<[String]>,
    nbins: usize,
    template: Vec<Histogram>,
    slots: HashMap<String, usize>,
    entities: Vec<String>,
    arena: Vec<Histogram>,
}

impl HistogramStore {
    /// An empty store shaped by the frozen ranges
    pub fn new(table: &MinMaxTable, nbins: usize) -> Result<Self> {
        if nbins == 0 {
            return Err(Error::non_positive("nbins", nbins));
        }
        let template = table
            .ranges()
            .iter()
            .map(|&range| Histogram::new(nbins, range))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            features: table.features().iter().cloned().collect(),
            nbins,
            template,
            slots: HashMap::new(),
            entities: Vec::new(),
            arena: Vec::new(),
        })
    }

    /// Slot of a well, allocating a zeroed histogram set on first sight
    pub fn insert_entity(&mut self, id: &str) -> usize {
        if let Some(&slot) = self.slots.get(id) {
            return slot;
        }
        let slot = self.entities.len();
        self.slots.insert(id.to_string(), slot);
        self.entities.push(id.to_string());
        self.arena.extend(self.template.iter().cloned());
        slot
    }

    /// Slot of a well, if it has been seen
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.slots.get(id).copied()
    }

    /// Check whether a well has histograms
    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Histogram set of a slot, in feature order
    pub fn slot_histograms(&self, slot: usize) -> &[Histogram] {
        let width = self.features.len();
        &self.arena[slot * width..(slot + 1) * width]
    }

    /// Histogram set of a well, in feature order
    pub fn histograms(&self, id: &str) -> Option<&[Histogram]> {
        self.slot(id).map(|slot| self.slot_histograms(slot))
    }

    /// One well's histogram for one feature
    pub fn histogram(&self, id: &str, feature: &str) -> Option<&Histogram> {
        let f = self.feature_index(feature)?;
        self.histograms(id).map(|set| &set[f])
    }

    pub(crate) fn histogram_mut(&mut self, slot: usize, feature: usize) -> &mut Histogram {
        &mut self.arena[slot * self.features.len() + feature]
    }

    /// Position of a feature
    pub fn feature_index(&self, feature: &str) -> Option<usize> {
        self.features.iter().position(|f| f == feature)
    }

    /// Histogrammed features
    pub fn feature_names(&self) -> &[String] {
        &self.features
    }

    /// Shared handle to the feature names
    pub fn shared_feature_names(&self) -> Arc<[String]> {
        Arc::clone(&self.features)
    }

    /// Bins per histogram
    pub fn nbins(&self) -> usize {
        self.nbins
    }

    /// Wells in discovery order
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Iterate `(well, histograms)` in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Histogram])> {
        self.entities
            .iter()
            .enumerate()
            .map(|(slot, id)| (id.as_str(), self.slot_histograms(slot)))
    }

    /// Number of wells
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if no well has been seen
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Add another store's counts into this one
    ///
    /// Both stores must come from the same frozen ranges. Wells unknown to
    /// this store are allocated on the fly.
    pub fn merge(&mut self, other: &HistogramStore) -> Result<()> {
        if self.features != other.features || self.nbins != other.nbins {
            return Err(Error::InvalidInput(
                "cannot merge histogram stores built from different ranges".to_string(),
            ));
        }
        for (ours, theirs) in self.template.iter().zip(&other.template) {
            ours.check_compatible(theirs)?;
        }
        for (id, set) in other.iter() {
            let slot = self.insert_entity(id);
            for (f, hist) in set.iter().enumerate() {
                self.histogram_mut(slot, f).merge(hist)?;
            }
        }
        Ok(())
    }
}
