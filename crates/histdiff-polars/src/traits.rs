//! Extension traits tying HistDiff to Polars DataFrames

use histdiff_engine::{HistDiffConfig, HistDiffPipeline, HistDiffRun, ScoreMatrix};
use polars::prelude::*;

use crate::source::DataFrameSource;
use crate::Result;

/// Name of the well id column in score frames
pub const ID_COLUMN: &str = "id";

/// Conversion of a score matrix into a `DataFrame`
pub trait ScoreMatrixExt {
    /// One `id` column followed by one `f64` column per feature
    fn to_dataframe(&self) -> Result<DataFrame>;
}

impl ScoreMatrixExt for ScoreMatrix {
    fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.features().len() + 1);
        columns.push(Series::new(ID_COLUMN.into(), self.entities().to_vec()).into());
        for feature in self.features() {
            let values = self.column(feature).unwrap_or_default();
            columns.push(Series::new(feature.as_str().into(), values).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// HistDiff scoring on a cell-by-cell DataFrame
pub trait HistDiffFrameExt {
    /// Run the full pipeline and keep every intermediate result
    ///
    /// # Arguments
    /// * `id_columns` - Columns forming the well id; all others are features
    /// * `config` - Run configuration; `chunk_size` sets the slice height
    fn histdiff_run(&self, id_columns: &[&str], config: HistDiffConfig) -> Result<HistDiffRun>;

    /// Score every well against its block's pooled controls
    ///
    /// # Returns
    /// DataFrame with an `id` column and one score column per good feature
    fn histdiff_scores(&self, id_columns: &[&str], config: HistDiffConfig) -> Result<DataFrame>;
}

impl HistDiffFrameExt for DataFrame {
    fn histdiff_run(&self, id_columns: &[&str], config: HistDiffConfig) -> Result<HistDiffRun> {
        let source = DataFrameSource::new(self, id_columns, config.chunk_size)?;
        Ok(HistDiffPipeline::new(config)?.run(&source)?)
    }

    fn histdiff_scores(&self, id_columns: &[&str], config: HistDiffConfig) -> Result<DataFrame> {
        self.histdiff_run(id_columns, config)?.scores.to_dataframe()
    }
}
