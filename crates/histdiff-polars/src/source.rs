//! A `DataFrame` as a re-traversable batch source

use std::sync::Arc;

use histdiff_core::{canonical_well_label, BatchIter, BatchSource, RowBatch};
use polars::prelude::*;
use tracing::debug;

use crate::{Error, Result};

/// Borrowed frame handed out in row slices
///
/// Every column other than the id columns is a feature and must be numeric.
/// Nulls become missing values.
#[derive(Debug, Clone)]
pub struct DataFrameSource<'a> {
    df: &'a DataFrame,
    id_columns: Vec<String>,
    feature_names: Arc<[String]>,
    chunk_size: usize,
}

impl<'a> DataFrameSource<'a> {
    /// Wrap a frame; `id_columns` are joined with `_` to form well ids
    pub fn new(df: &'a DataFrame, id_columns: &[&str], chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidParameter(
                "chunk_size must be positive".to_string(),
            ));
        }
        if id_columns.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one id column is required".to_string(),
            ));
        }
        for name in id_columns {
            df.column(name)
                .map_err(|_| Error::InvalidColumn(name.to_string()))?;
        }

        let mut features = Vec::new();
        for column in df.get_columns() {
            let name = column.name().as_str();
            if id_columns.contains(&name) {
                continue;
            }
            if !is_numeric(column.dtype()) {
                return Err(Error::TypeMismatch {
                    column: name.to_string(),
                    expected: "numeric".to_string(),
                    got: format!("{:?}", column.dtype()),
                });
            }
            features.push(name.to_string());
        }

        Ok(Self {
            df,
            id_columns: id_columns.iter().map(|s| s.to_string()).collect(),
            feature_names: features.into(),
            chunk_size,
        })
    }

    /// Rows per batch
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn batch(&self, offset: usize) -> Result<RowBatch> {
        let frame = self.df.slice(offset as i64, self.chunk_size);
        let height = frame.height();

        let mut parts: Vec<Vec<String>> = Vec::with_capacity(self.id_columns.len());
        for name in &self.id_columns {
            let column = frame.column(name)?.cast(&DataType::String)?;
            let values = column
                .str()?
                .into_iter()
                .map(|v| v.unwrap_or("").to_string())
                .collect();
            parts.push(values);
        }
        let ids = (0..height)
            .map(|row| {
                let joined = parts
                    .iter()
                    .map(|p| p[row].as_str())
                    .collect::<Vec<_>>()
                    .join("_");
                canonical_well_label(&joined)
            })
            .collect();

        let mut columns = Vec::with_capacity(self.feature_names.len());
        for name in self.feature_names.iter() {
            let column = frame.column(name)?.cast(&DataType::Float64)?;
            let values: Vec<f64> = column
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            columns.push(values);
        }

        debug!(offset, rows = height, "sliced frame batch");
        Ok(RowBatch::new(ids, Arc::clone(&self.feature_names), columns)?)
    }
}

impl BatchSource for DataFrameSource<'_> {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn batches(&self) -> histdiff_core::Result<BatchIter<'_>> {
        let offsets = (0..self.df.height()).step_by(self.chunk_size);
        Ok(Box::new(
            offsets.map(move |offset| self.batch(offset).map_err(Into::into)),
        ))
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}
