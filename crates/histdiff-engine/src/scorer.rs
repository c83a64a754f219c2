//! Block Scorer: control-relative HistDiff scores per block of wells
//!
//! Each block pools the raw counts of its own control wells into one
//! vehicle-control histogram per feature. The pooled counts go through the
//! same smoothing and normalisation as every well before scoring. The pooled
//! control itself never becomes a row of the result, and wells are only ever
//! compared with the control of their own block.

use std::collections::HashSet;

use histdiff_core::{Block, Result};
use histdiff_histogram::{sum_counts, HistSquareDiff, HistogramDistance};
use tracing::{debug, instrument, warn};

use crate::matrix::ScoreMatrix;
use crate::store::HistogramStore;
use crate::transform::{NormalizedStore, Transform};

/// Label of the pooled control in log output
pub const VEHICLE_CONTROL: &str = "VEHICLE_CONTROL";

/// Scores every well of a block against the block's pooled control
#[derive(Debug, Clone)]
pub struct BlockScorer<M = HistSquareDiff> {
    transform: Transform,
    metric: M,
    include_control_wells: bool,
}

impl BlockScorer<HistSquareDiff> {
    /// Scorer using the HistDiff metric
    pub fn new(transform: Transform) -> Self {
        Self::with_metric(transform, HistSquareDiff::new())
    }
}

impl Default for BlockScorer<HistSquareDiff> {
    fn default() -> Self {
        Self::new(Transform::default())
    }
}

impl<M: HistogramDistance> BlockScorer<M> {
    /// Scorer using an arbitrary distance
    pub fn with_metric(transform: Transform, metric: M) -> Self {
        Self {
            transform,
            metric,
            include_control_wells: true,
        }
    }

    /// Choose whether individual control wells get their own rows
    pub fn with_control_wells(mut self, include: bool) -> Self {
        self.include_control_wells = include;
        self
    }

    /// Pooled, transformed control distribution per feature
    ///
    /// Controls missing from the store contribute nothing. With no control at
    /// all the distributions are all zero.
    pub fn pooled_control(&self, store: &HistogramStore, controls: &[&str]) -> Vec<Vec<f64>> {
        let sets: Vec<_> = controls
            .iter()
            .filter_map(|id| store.histograms(id))
            .collect();
        (0..store.feature_names().len())
            .map(|f| {
                let pooled = sum_counts(store.nbins(), sets.iter().map(|set| &set[f]));
                self.transform.apply_counts(&pooled)
            })
            .collect()
    }

    /// Transform applied to every well and to the pooled controls
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Score the wells of one block
    ///
    /// `normalized` must come from `store` through this scorer's transform.
    /// Rows follow the block's well order. Wells without data are skipped. A
    /// block without controls scores zero for every well and feature.
    pub fn score_block(
        &self,
        store: &HistogramStore,
        normalized: &NormalizedStore,
        block: &Block,
        controls: &HashSet<String>,
    ) -> Result<ScoreMatrix> {
        let mut matrix = ScoreMatrix::new(store.shared_feature_names());
        let members: Vec<&str> = block
            .wells
            .iter()
            .map(String::as_str)
            .filter(|w| store.contains(w))
            .collect();
        if members.is_empty() {
            debug!(block = %block.name, "block has no wells with data");
            return Ok(matrix);
        }

        let block_controls: Vec<&str> = members
            .iter()
            .copied()
            .filter(|w| controls.contains(*w))
            .collect();
        if block_controls.is_empty() {
            warn!(
                block = %block.name,
                wells = members.len(),
                "no {VEHICLE_CONTROL} wells in block, scores are zero"
            );
            let zeros = vec![0.0; store.feature_names().len()];
            for &well in &members {
                matrix.push_row(well, zeros.clone())?;
            }
            return Ok(matrix);
        }
        let control = self.pooled_control(store, &block_controls);

        for &well in &members {
            if !self.include_control_wells && controls.contains(well) {
                continue;
            }
            let Some(distributions) = normalized.distributions(well) else {
                continue;
            };
            let scores = distributions
                .zip(&control)
                .map(|(exp, ctrl)| self.metric.score(ctrl, exp))
                .collect::<Result<Vec<_>>>()?;
            matrix.push_row(well, scores)?;
        }

        debug!(
            block = %block.name,
            wells = members.len(),
            controls = block_controls.len(),
            scored = matrix.len(),
            metric = self.metric.name(),
            "scored block"
        );
        Ok(matrix)
    }

    /// Score every block and concatenate the results in block order
    #[instrument(skip_all, fields(blocks = blocks.len(), wells = store.len()))]
    pub fn score(
        &self,
        store: &HistogramStore,
        normalized: &NormalizedStore,
        blocks: &[Block],
        controls: &HashSet<String>,
    ) -> Result<ScoreMatrix> {
        let mut matrix = ScoreMatrix::new(store.shared_feature_names());
        for block in blocks {
            matrix.extend(self.score_block(store, normalized, block, controls)?)?;
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::MinMaxTable;
    use approx::assert_relative_eq;
    use histdiff_histogram::BinRange;

    fn store(wells: &[(&str, Vec<f64>)]) -> HistogramStore {
        let table =
            MinMaxTable::from_pairs([("F".to_string(), BinRange::new(0.0, 10.0).unwrap())])
                .unwrap();
        let mut store = HistogramStore::new(&table, 4).unwrap();
        for (id, values) in wells {
            let slot = store.insert_entity(id);
            store.histogram_mut(slot, 0).fill(values);
        }
        store
    }

    fn block(name: &str, wells: &[&str]) -> Block {
        Block {
            name: name.to_string(),
            wells: wells.iter().map(|w| w.to_string()).collect(),
        }
    }

    fn controls(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|c| c.to_string()).collect()
    }

    fn score_block(
        scorer: &BlockScorer,
        store: &HistogramStore,
        block: &Block,
        controls: &HashSet<String>,
    ) -> ScoreMatrix {
        let normalized = scorer.transform().transform_store(store);
        scorer.score_block(store, &normalized, block, controls).unwrap()
    }

    fn score_all(
        store: &HistogramStore,
        blocks: &[Block],
        controls: &HashSet<String>,
    ) -> ScoreMatrix {
        let scorer = BlockScorer::default();
        let normalized = scorer.transform().transform_store(store);
        scorer.score(store, &normalized, blocks, controls).unwrap()
    }

    #[test]
    fn test_reference_score() {
        let store = store(&[("V1", vec![1.0, 1.0, 9.0, 9.0]), ("A1", vec![1.0, 1.0, 1.0, 1.0])]);
        let scores = score_block(
            &BlockScorer::default(),
            &store,
            &block("b", &["V1", "A1"]),
            &controls(&["V1"]),
        );

        assert_relative_eq!(scores.get("A1", "F").unwrap(), -0.3125, epsilon = 1e-12);
        assert_eq!(scores.get("V1", "F"), Some(0.0));
        assert!(scores.row(VEHICLE_CONTROL).is_none());
    }

    #[test]
    fn test_controls_pool_raw_counts() {
        // two controls with very different cell counts are pooled by count
        let store = store(&[
            ("V1", vec![1.0, 1.0, 1.0]),
            ("V2", vec![9.0]),
            ("A1", vec![1.0, 1.0, 1.0, 9.0]),
        ]);
        let scores = score_block(
            &BlockScorer::default(),
            &store,
            &block("b", &["V1", "V2", "A1"]),
            &controls(&["V1", "V2"]),
        );
        assert_relative_eq!(scores.get("A1", "F").unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_control_wells_can_be_left_out() {
        let store = store(&[("V1", vec![1.0]), ("A1", vec![9.0])]);
        let scores = score_block(
            &BlockScorer::default().with_control_wells(false),
            &store,
            &block("b", &["V1", "A1"]),
            &controls(&["V1"]),
        );
        assert_eq!(scores.entities(), &["A1"]);
    }

    #[test]
    fn test_block_without_controls_scores_zero() {
        let store = store(&[
            ("V1", vec![1.0]),
            ("A1", vec![1.0, 1.0, 1.0, 1.0]),
            ("B1", vec![1.0, 1.0]),
        ]);
        let scores = score_all(
            &store,
            &[block("top", &["V1", "A1"]), block("nocontrol", &["B1"])],
            &controls(&["V1"]),
        );
        assert_eq!(scores.entities(), &["V1", "A1", "B1"]);
        assert_eq!(scores.get("B1", "F"), Some(0.0));
    }

    #[test]
    fn test_blocks_are_isolated() {
        let base = [("V1", vec![1.0, 9.0]), ("A1", vec![1.0, 1.0])];
        let mut extended = base.to_vec();
        extended.push(("V2", vec![5.0, 5.0, 5.0]));
        extended.push(("B1", vec![9.0]));

        let controls = controls(&["V1", "V2"]);
        let b1 = block("b1", &["V1", "A1"]);
        let b2 = block("b2", &["V2", "B1"]);

        let alone = score_all(&store(&base), &[b1.clone()], &controls);
        let together = score_all(&store(&extended), &[b1, b2], &controls);

        assert_eq!(alone.row("A1"), together.row("A1"));
        assert_eq!(together.entities(), &["V1", "A1", "V2", "B1"]);
    }

    #[test]
    fn test_wells_without_data_skipped() {
        let store = store(&[("A1", vec![1.0])]);
        let scores = score_all(
            &store,
            &[block("b", &["P24", "A1"]), block("empty", &["C3"])],
            &controls(&[]),
        );
        assert_eq!(scores.entities(), &["A1"]);
        assert_eq!(scores.get("A1", "F"), Some(0.0));
    }
}
