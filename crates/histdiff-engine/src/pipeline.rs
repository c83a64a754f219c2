//! Orchestrator: range pass, aggregation pass, transform and block scoring

use std::collections::HashSet;
use std::time::Instant;

use histdiff_core::{BatchSource, Block, Error, Result};
use tracing::{info, instrument};

use crate::aggregate::aggregate;
use crate::config::HistDiffConfig;
use crate::matrix::ScoreMatrix;
use crate::range::{estimate_ranges, RangeEstimate};
use crate::report::write_problematic_features;
use crate::scorer::BlockScorer;
use crate::store::HistogramStore;
use crate::transform::{NormalizedStore, Transform};

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct HistDiffRun {
    pub scores: ScoreMatrix,
    pub ranges: RangeEstimate,
    pub store: HistogramStore,
}

/// A validated HistDiff run configuration
#[derive(Debug, Clone)]
pub struct HistDiffPipeline {
    config: HistDiffConfig,
    blocks: Vec<Block>,
    controls: HashSet<String>,
    scorer: BlockScorer,
}

impl HistDiffPipeline {
    /// Validate the configuration and resolve its blocks
    pub fn new(config: HistDiffConfig) -> Result<Self> {
        config.validate()?;
        let blocks = config.blocks.resolve(&config.plate)?;
        let controls = config.control_set();
        let scorer = BlockScorer::new(Transform::new(config.smoothing_alpha)?)
            .with_control_wells(config.include_control_wells);
        Ok(Self {
            config,
            blocks,
            controls,
            scorer,
        })
    }

    /// The configuration in use
    pub fn config(&self) -> &HistDiffConfig {
        &self.config
    }

    /// Resolved blocks, remainder last
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Canonical control wells
    pub fn controls(&self) -> &HashSet<String> {
        &self.controls
    }

    /// First pass: freeze per-feature ranges
    ///
    /// Writes the problematic-feature report when a path is configured.
    pub fn estimate_ranges<S: BatchSource + ?Sized>(&self, source: &S) -> Result<RangeEstimate> {
        let features = source.feature_names();
        check_unique(features)?;
        let estimate = estimate_ranges(features, source.batches()?)?;
        if let Some(path) = &self.config.problematic_features_path {
            write_problematic_features(path, &estimate.problematic)?;
        }
        Ok(estimate)
    }

    /// Second pass: bin every row into its well's histograms
    pub fn aggregate<S: BatchSource + ?Sized>(
        &self,
        source: &S,
        ranges: &RangeEstimate,
    ) -> Result<HistogramStore> {
        aggregate(
            source.batches()?,
            &ranges.table,
            self.config.nbins,
            &self.config.plate,
        )
    }

    /// Smooth and normalise every histogram of the store
    pub fn transform(&self, store: &HistogramStore) -> NormalizedStore {
        self.scorer.transform().transform_store(store)
    }

    /// Score every block from a store and its normalised distributions
    pub fn score(
        &self,
        store: &HistogramStore,
        normalized: &NormalizedStore,
    ) -> Result<ScoreMatrix> {
        self.scorer.score(store, normalized, &self.blocks, &self.controls)
    }

    /// Run every stage over a re-traversable source
    #[instrument(skip_all, fields(nbins = self.config.nbins, blocks = self.blocks.len()))]
    pub fn run<S: BatchSource + ?Sized>(&self, source: &S) -> Result<HistDiffRun> {
        let start = Instant::now();
        let ranges = self.estimate_ranges(source)?;
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            good = ranges.table.len(),
            "range pass done"
        );

        let stage = Instant::now();
        let store = self.aggregate(source, &ranges)?;
        info!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            wells = store.len(),
            "aggregation pass done"
        );

        let stage = Instant::now();
        let normalized = self.transform(&store);
        info!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "transform done"
        );

        let stage = Instant::now();
        let scores = self.score(&store, &normalized)?;
        info!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            rows = scores.len(),
            features = scores.features().len(),
            "scoring done"
        );
        info!(
            total_ms = start.elapsed().as_millis() as u64,
            "histdiff run finished"
        );

        Ok(HistDiffRun {
            scores,
            ranges,
            store,
        })
    }
}

/// Compute the HistDiff score matrix for a source
pub fn calculate_scores<S: BatchSource + ?Sized>(
    source: &S,
    config: HistDiffConfig,
) -> Result<ScoreMatrix> {
    Ok(HistDiffPipeline::new(config)?.run(source)?.scores)
}

fn check_unique(features: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(features.len());
    for name in features {
        if !seen.insert(name.as_str()) {
            return Err(Error::Configuration(format!(
                "feature column {name} appears more than once"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use histdiff_core::{BlockDefinition, InMemorySource, REMAINDER_BLOCK};

    #[test]
    fn test_blocks_resolved_with_remainder() {
        let config = HistDiffConfig::new(["A1"])
            .with_blocks(BlockDefinition::from_groups([vec!["a01", "A2"]]));
        let pipeline = HistDiffPipeline::new(config).unwrap();
        assert_eq!(pipeline.blocks().len(), 2);
        assert_eq!(pipeline.blocks()[0].wells, vec!["A1", "A2"]);
        assert_eq!(pipeline.blocks()[1].name, REMAINDER_BLOCK);
        assert_eq!(pipeline.blocks()[1].wells.len(), 382);
        assert!(pipeline.controls().contains("A1"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(HistDiffPipeline::new(HistDiffConfig::default().with_nbins(0)).is_err());
    }

    #[test]
    fn test_duplicate_feature_columns_rejected() {
        let source = InMemorySource::new(
            &["f", "f"],
            vec![("A1".to_string(), vec![1.0, 2.0])],
            10,
        )
        .unwrap();
        let err = calculate_scores(&source, HistDiffConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
