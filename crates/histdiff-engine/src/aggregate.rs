//! Streaming Aggregator: the second streaming pass
//!
//! Routes every row's feature values into the histogram set of its well.
//! Rows from wells outside the plate definition are dropped. Counts are
//! plain sums, so the final store does not depend on how the input was
//! split into batches or in which order wells were discovered.

use histdiff_core::{PlateDefinition, Result, RowBatch};
use tracing::{debug, info, instrument};

use crate::range::{map_columns, MinMaxTable};
use crate::store::HistogramStore;

/// What one batch contributed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub rows_kept: usize,
    pub new_entities: usize,
}

/// Single writer of a [`HistogramStore`]
#[derive(Debug)]
pub struct StreamingAggregator<'a> {
    store: HistogramStore,
    plate: &'a PlateDefinition,
    column_map: Option<(Vec<String>, Vec<usize>)>,
    batches: usize,
    rows: usize,
    rows_kept: usize,
}

impl<'a> StreamingAggregator<'a> {
    /// Start an aggregation over the good features of `table`
    pub fn new(table: &MinMaxTable, nbins: usize, plate: &'a PlateDefinition) -> Result<Self> {
        Ok(Self {
            store: HistogramStore::new(table, nbins)?,
            plate,
            column_map: None,
            batches: 0,
            rows: 0,
            rows_kept: 0,
        })
    }

    /// Bin one batch into the store
    ///
    /// Only the good features are read; any other column in the batch is
    /// ignored. A good feature missing from the batch is an error.
    pub fn consume(&mut self, batch: &RowBatch) -> Result<BatchSummary> {
        let columns = self.columns_for(batch)?;
        let known_before = self.store.len();

        let slots: Vec<Option<usize>> = batch
            .entity_ids()
            .iter()
            .map(|id| {
                self.plate
                    .contains(id)
                    .then(|| self.store.insert_entity(id))
            })
            .collect();

        for (f, &col) in columns.iter().enumerate() {
            let values = batch.columns()[col].as_slice();
            for (&slot, &value) in slots.iter().zip(values) {
                if let Some(slot) = slot {
                    self.store.histogram_mut(slot, f).fill_one(value);
                }
            }
        }

        let summary = BatchSummary {
            rows: batch.len(),
            rows_kept: slots.iter().filter(|s| s.is_some()).count(),
            new_entities: self.store.len() - known_before,
        };
        self.batches += 1;
        self.rows += summary.rows;
        self.rows_kept += summary.rows_kept;
        debug!(
            batch = self.batches,
            rows = summary.rows,
            kept = summary.rows_kept,
            new_wells = summary.new_entities,
            "aggregated batch"
        );
        Ok(summary)
    }

    /// The store as accumulated so far
    pub fn store(&self) -> &HistogramStore {
        &self.store
    }

    /// End the pass and hand over the store
    pub fn finish(self) -> HistogramStore {
        info!(
            batches = self.batches,
            rows = self.rows,
            kept = self.rows_kept,
            wells = self.store.len(),
            "aggregation finished"
        );
        self.store
    }

    fn columns_for(&mut self, batch: &RowBatch) -> Result<Vec<usize>> {
        if let Some((names, map)) = &self.column_map {
            if names.as_slice() == batch.feature_names() {
                return Ok(map.clone());
            }
        }
        let map = map_columns(self.store.feature_names(), batch.feature_names())?;
        self.column_map = Some((batch.feature_names().to_vec(), map.clone()));
        Ok(map)
    }
}

/// Run the aggregation pass over a batch stream
#[instrument(skip_all, fields(features = table.len(), nbins))]
pub fn aggregate<I>(
    batches: I,
    table: &MinMaxTable,
    nbins: usize,
    plate: &PlateDefinition,
) -> Result<HistogramStore>
where
    I: IntoIterator<Item = Result<RowBatch>>,
{
    let mut aggregator = StreamingAggregator::new(table, nbins, plate)?;
    for batch in batches {
        aggregator.consume(&batch?)?;
    }
    Ok(aggregator.finish())
}
