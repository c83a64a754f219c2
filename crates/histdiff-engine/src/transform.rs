//! Histogram Transform: smoothing and normalisation after aggregation

use std::collections::HashMap;
use std::sync::Arc;

use histdiff_core::{Error, Result};
use histdiff_histogram::{exponential_smoothing, normalize, Histogram, DEFAULT_ALPHA};

use crate::store::HistogramStore;

/// Neighbour smoothing followed by normalisation to unit sum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    alpha: f64,
}

impl Transform {
    /// Create a transform with the given smoothing factor
    pub fn new(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "smoothing factor must be non-negative and finite, got {alpha}"
            )));
        }
        Ok(Self { alpha })
    }

    /// Get the smoothing factor
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Transform a vector of (possibly pooled) counts
    pub fn apply_counts(&self, counts: &[f64]) -> Vec<f64> {
        normalize(&exponential_smoothing(counts, self.alpha))
    }

    /// Transform one histogram
    pub fn apply(&self, hist: &Histogram) -> Vec<f64> {
        self.apply_counts(&hist.counts_f64())
    }

    /// Transform every histogram in a store
    pub fn transform_store(&self, store: &HistogramStore) -> NormalizedStore {
        let nbins = store.nbins();
        let mut values = Vec::with_capacity(store.len() * store.feature_names().len() * nbins);
        let mut index = HashMap::with_capacity(store.len());
        for (slot, (id, set)) in store.iter().enumerate() {
            index.insert(id.to_string(), slot);
            for hist in set {
                values.extend(self.apply(hist));
            }
        }
        NormalizedStore {
            features: store.shared_feature_names(),
            nbins,
            entities: store.entities().to_vec(),
            index,
            values,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Normalised distributions for every (well, feature)
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStore {
    features: Arc<[String]>,
    nbins: usize,
    entities: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<f64>,
}

impl NormalizedStore {
    /// Distribution of one well and feature
    pub fn get(&self, entity: &str, feature: &str) -> Option<&[f64]> {
        let slot = *self.index.get(entity)?;
        let f = self.features.iter().position(|name| name == feature)?;
        let start = (slot * self.features.len() + f) * self.nbins;
        Some(&self.values[start..start + self.nbins])
    }

    /// Every feature's distribution of one well, in feature order
    pub fn distributions(&self, entity: &str) -> Option<std::slice::ChunksExact<'_, f64>> {
        let slot = *self.index.get(entity)?;
        let stride = self.features.len() * self.nbins;
        let start = slot * stride;
        Some(self.values[start..start + stride].chunks_exact(self.nbins))
    }

    /// Wells in discovery order
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Features in store order
    pub fn feature_names(&self) -> &[String] {
        &self.features
    }
}
