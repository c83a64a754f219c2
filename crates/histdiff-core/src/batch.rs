//! Row batches and batch sources
//!
//! A [`RowBatch`] is a column-major slice of the cell-by-cell table: one
//! entity id per row plus one `f64` column per numeric feature. Sources hand
//! out batches lazily so that arbitrarily large inputs are processed in
//! bounded memory.

use std::sync::Arc;

use crate::{Error, Result};

/// One batch of rows, stored column-major
#[derive(Debug, Clone, PartialEq)]
pub struct RowBatch {
    entity_ids: Vec<String>,
    feature_names: Arc<[String]>,
    columns: Vec<Vec<f64>>,
}

impl RowBatch {
    /// Create a batch, checking that every column has one value per row
    pub fn new(
        entity_ids: Vec<String>,
        feature_names: Arc<[String]>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if columns.len() != feature_names.len() {
            return Err(Error::size_mismatch(
                feature_names.len(),
                columns.len(),
                "row batch columns",
            ));
        }
        let rows = entity_ids.len();
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(Error::size_mismatch(rows, bad.len(), "row batch column length"));
        }
        Ok(Self {
            entity_ids,
            feature_names,
            columns,
        })
    }

    /// Build a batch from row-major records
    pub fn from_rows<I>(feature_names: Arc<[String]>, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        let width = feature_names.len();
        let mut entity_ids = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); width];
        for (id, values) in rows {
            if values.len() != width {
                return Err(Error::size_mismatch(width, values.len(), "row batch record"));
            }
            entity_ids.push(id);
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }
        Self::new(entity_ids, feature_names, columns)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.entity_ids.len()
    }

    /// Check if the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.entity_ids.is_empty()
    }

    /// Entity id of every row
    pub fn entity_ids(&self) -> &[String] {
        &self.entity_ids
    }

    /// Names of the feature columns
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// All feature columns in `feature_names` order
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Column by position
    pub fn column(&self, idx: usize) -> Option<&[f64]> {
        self.columns.get(idx).map(Vec::as_slice)
    }

    /// Column by feature name
    pub fn column_by_name(&self, name: &str) -> Option<&[f64]> {
        self.feature_names
            .iter()
            .position(|f| f == name)
            .and_then(|idx| self.column(idx))
    }
}

/// Boxed lazy sequence of batches
pub type BatchIter<'a> = Box<dyn Iterator<Item = Result<RowBatch>> + 'a>;

/// A re-traversable producer of row batches
///
/// The pipeline walks the source twice (range estimation, then
/// aggregation), so `batches` must start a fresh traversal of the same data
/// on every call. Malformed rows are the source's responsibility to skip.
pub trait BatchSource {
    /// Names of the numeric feature columns every batch exposes
    fn feature_names(&self) -> &[String];

    /// Begin a new traversal
    fn batches(&self) -> Result<BatchIter<'_>>;
}

/// Rows held in memory, handed out in fixed-size chunks
///
/// Useful for tests and for callers that already have the table loaded.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    feature_names: Arc<[String]>,
    rows: Vec<(String, Vec<f64>)>,
    chunk_size: usize,
}

impl InMemorySource {
    /// Create a source; every row must have one value per feature
    pub fn new<S: AsRef<str>>(
        feature_names: &[S],
        rows: Vec<(String, Vec<f64>)>,
        chunk_size: usize,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::non_positive("chunk_size", chunk_size));
        }
        let feature_names: Arc<[String]> = feature_names
            .iter()
            .map(|f| f.as_ref().to_string())
            .collect();
        if let Some((id, values)) = rows.iter().find(|(_, v)| v.len() != feature_names.len()) {
            return Err(Error::InvalidInput(format!(
                "row for {id} has {} values, expected {}",
                values.len(),
                feature_names.len()
            )));
        }
        Ok(Self {
            feature_names,
            rows,
            chunk_size,
        })
    }

    /// Same rows, different chunking
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::non_positive("chunk_size", chunk_size));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the source holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl BatchSource for InMemorySource {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn batches(&self) -> Result<BatchIter<'_>> {
        let names = Arc::clone(&self.feature_names);
        Ok(Box::new(self.rows.chunks(self.chunk_size).map(move |chunk| {
            RowBatch::from_rows(Arc::clone(&names), chunk.iter().cloned())
        })))
    }
}
