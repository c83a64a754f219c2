//! Configuration for a HistDiff run

use std::collections::HashSet;
use std::path::PathBuf;

use histdiff_core::{canonical_well_label, BlockDefinition, Error, PlateDefinition, Result};
use histdiff_histogram::DEFAULT_ALPHA;
use serde::{Deserialize, Serialize};

/// Default number of bins per histogram
pub const DEFAULT_NBINS: usize = 20;

/// Default number of rows per batch
pub const DEFAULT_CHUNK_SIZE: usize = 50_000;

/// Everything a run needs besides the data itself
///
/// `chunk_size` only tunes memory and throughput of the sources built from
/// this configuration; it never changes the scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistDiffConfig {
    pub nbins: usize,
    pub chunk_size: usize,
    pub smoothing_alpha: f64,
    pub problematic_features_path: Option<PathBuf>,
    pub plate: PlateDefinition,
    pub blocks: BlockDefinition,
    pub controls: Vec<String>,
    /// Score individual control wells like any other well
    ///
    /// Only the pooled `VEHICLE_CONTROL` distribution is always kept out of
    /// the result. Control wells get rows by default, as the original
    /// HistDiff tool scores them too.
    pub include_control_wells: bool,
}

impl Default for HistDiffConfig {
    fn default() -> Self {
        Self {
            nbins: DEFAULT_NBINS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            smoothing_alpha: DEFAULT_ALPHA,
            problematic_features_path: None,
            plate: PlateDefinition::default(),
            blocks: BlockDefinition::default(),
            controls: Vec::new(),
            include_control_wells: true,
        }
    }
}

impl HistDiffConfig {
    /// Default configuration with the given vehicle-control wells
    pub fn new<I, S>(controls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::default().with_controls(controls)
    }

    /// Set the number of bins
    pub fn with_nbins(mut self, nbins: usize) -> Self {
        self.nbins = nbins;
        self
    }

    /// Set the rows per batch for sources built from this configuration
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the smoothing factor
    pub fn with_smoothing_alpha(mut self, alpha: f64) -> Self {
        self.smoothing_alpha = alpha;
        self
    }

    /// Persist the excluded-feature report to `path`
    pub fn with_problematic_features_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.problematic_features_path = Some(path.into());
        self
    }

    /// Set the accepted wells
    pub fn with_plate(mut self, plate: PlateDefinition) -> Self {
        self.plate = plate;
        self
    }

    /// Set the explicit blocks
    pub fn with_blocks(mut self, blocks: BlockDefinition) -> Self {
        self.blocks = blocks;
        self
    }

    /// Set the vehicle-control wells
    pub fn with_controls<I, S>(mut self, controls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.controls = controls
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        self
    }

    /// Choose whether individual control wells get their own score rows
    pub fn with_control_wells(mut self, include: bool) -> Self {
        self.include_control_wells = include;
        self
    }

    /// Canonical control well ids
    pub fn control_set(&self) -> HashSet<String> {
        self.controls
            .iter()
            .map(|c| canonical_well_label(c))
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.nbins == 0 {
            return Err(Error::non_positive("nbins", self.nbins));
        }
        if self.chunk_size == 0 {
            return Err(Error::non_positive("chunk_size", self.chunk_size));
        }
        if !self.smoothing_alpha.is_finite() || self.smoothing_alpha < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "smoothing_alpha must be a non-negative finite number, got {}",
                self.smoothing_alpha
            )));
        }
        if self.plate.is_empty() {
            return Err(Error::Configuration(
                "plate definition contains no wells".to_string(),
            ));
        }
        self.blocks.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HistDiffConfig::default();
        assert_eq!(config.nbins, 20);
        assert_eq!(config.chunk_size, 50_000);
        assert_eq!(config.smoothing_alpha, 0.25);
        assert_eq!(config.plate.len(), 384);
        assert!(config.blocks.is_empty());
        assert!(config.problematic_features_path.is_none());
        assert!(config.include_control_wells);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_and_control_set() {
        let config = HistDiffConfig::new(["A01", "p24", "K12"])
            .with_nbins(10)
            .with_chunk_size(100)
            .with_smoothing_alpha(0.1)
            .with_problematic_features_path("/tmp/run_problematicFeats.csv");

        assert_eq!(config.nbins, 10);
        assert_eq!(config.chunk_size, 100);
        let controls = config.control_set();
        assert!(controls.contains("A1"));
        assert!(controls.contains("P24"));
        assert!(controls.contains("K12"));
    }

    #[test]
    fn test_validation_failures() {
        assert!(HistDiffConfig::default().with_nbins(0).validate().is_err());
        assert!(HistDiffConfig::default().with_chunk_size(0).validate().is_err());
        assert!(HistDiffConfig::default()
            .with_smoothing_alpha(f64::NAN)
            .validate()
            .is_err());
        assert!(HistDiffConfig::default()
            .with_smoothing_alpha(-0.5)
            .validate()
            .is_err());
        assert!(HistDiffConfig::default()
            .with_plate(PlateDefinition::from_labels(Vec::<String>::new()))
            .validate()
            .is_err());

        let overlapping = BlockDefinition::from_groups([vec!["A1"], vec!["A1"]]);
        let err = HistDiffConfig::default()
            .with_blocks(overlapping)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_json_round_trip_with_partial_input() {
        let config: HistDiffConfig = serde_json::from_str(
            r#"{ "nbins": 8, "controls": ["A1"], "blocks": [{ "name": "edge", "wells": ["A1", "A2"] }] }"#,
        )
        .unwrap();
        assert_eq!(config.nbins, 8);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.blocks.groups()[0].name.as_deref(), Some("edge"));
        assert_eq!(config.plate.len(), 384);

        let text = serde_json::to_string(&config).unwrap();
        let back: HistDiffConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
