//! Chunked reader for cell-by-cell delimited files
//!
//! The file is opened afresh for every traversal, so the two passes of the
//! pipeline each stream it from disk. Rows are filtered for integrity before
//! they reach a batch:
//!
//! - a row that is not valid UTF-8 is skipped
//! - a row whose field count differs from the header is skipped
//! - a row in which fewer than 65% of all fields parse as numbers is skipped
//!
//! Inside accepted rows, empty or unparsable feature fields become NaN.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use histdiff_core::{canonical_well_label, BatchIter, BatchSource, RowBatch};
use tracing::{debug, info};

use crate::error::{column_index, Error, Result};

/// Minimum share of numeric fields for a row to be kept
pub const NUMERIC_ROW_THRESHOLD: f64 = 0.65;

/// Separator used to join composite ids
pub const ID_SEPARATOR: &str = "_";

/// Builder for [`DelimitedSource`]
#[derive(Debug, Clone)]
pub struct DelimitedSourceBuilder {
    path: PathBuf,
    delimiter: u8,
    id_columns: Vec<String>,
    exclude_columns: Vec<String>,
    chunk_size: usize,
    canonicalize_ids: bool,
}

impl DelimitedSourceBuilder {
    /// Field delimiter, tab by default
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Columns forming the entity id, joined with `_` when several are given
    pub fn id_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Non-feature columns to ignore
    pub fn exclude_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Rows per batch
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Turn ids such as `A01` into `A1` while reading
    pub fn canonicalize_ids(mut self, canonicalize: bool) -> Self {
        self.canonicalize_ids = canonicalize;
        self
    }

    /// Read the header and resolve the column layout
    pub fn build(self) -> Result<DelimitedSource> {
        if self.chunk_size == 0 {
            return Err(histdiff_core::Error::non_positive("chunk_size", self.chunk_size).into());
        }
        if self.id_columns.is_empty() {
            return Err(Error::InvalidInput(
                "at least one id column is required".to_string(),
            ));
        }

        let mut reader = csv_reader(&self.path, self.delimiter)?;
        let headers = reader.headers()?.clone();

        let id_indices = self
            .id_columns
            .iter()
            .map(|name| column_index(&headers, name))
            .collect::<Result<Vec<_>>>()?;
        let excluded = self
            .exclude_columns
            .iter()
            .map(|name| column_index(&headers, name))
            .collect::<Result<Vec<_>>>()?;

        let feature_indices: Vec<usize> = (0..headers.len())
            .filter(|i| !id_indices.contains(i) && !excluded.contains(i))
            .collect();
        let feature_names: Arc<[String]> = feature_indices
            .iter()
            .map(|&i| headers[i].to_string())
            .collect();

        debug!(
            path = %self.path.display(),
            columns = headers.len(),
            features = feature_names.len(),
            "read header"
        );

        Ok(DelimitedSource {
            layout: Arc::new(Layout {
                header_len: headers.len(),
                id_indices,
                feature_indices,
                canonicalize_ids: self.canonicalize_ids,
            }),
            path: self.path,
            delimiter: self.delimiter,
            chunk_size: self.chunk_size,
            feature_names,
        })
    }
}

#[derive(Debug)]
struct Layout {
    header_len: usize,
    id_indices: Vec<usize>,
    feature_indices: Vec<usize>,
    canonicalize_ids: bool,
}

impl Layout {
    fn entity_id(&self, record: &csv::StringRecord) -> String {
        let id = self
            .id_indices
            .iter()
            .map(|&i| record.get(i).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(ID_SEPARATOR);
        if self.canonicalize_ids {
            canonical_well_label(&id)
        } else {
            id
        }
    }
}

/// A delimited file with a header row, read in chunks
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    path: PathBuf,
    delimiter: u8,
    chunk_size: usize,
    feature_names: Arc<[String]>,
    layout: Arc<Layout>,
}

impl DelimitedSource {
    /// Start configuring a source for `path`
    pub fn builder(path: impl Into<PathBuf>) -> DelimitedSourceBuilder {
        DelimitedSourceBuilder {
            path: path.into(),
            delimiter: b'\t',
            id_columns: Vec::new(),
            exclude_columns: Vec::new(),
            chunk_size: 50_000,
            canonicalize_ids: true,
        }
    }

    /// Tab-delimited source with a single id column
    pub fn open(path: impl Into<PathBuf>, id_column: &str) -> Result<Self> {
        Self::builder(path).id_columns([id_column]).build()
    }

    /// File being read
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows per batch
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn traverse(&self) -> Result<DelimitedBatches> {
        let reader = csv_reader(&self.path, self.delimiter)?;
        Ok(DelimitedBatches {
            records: reader.into_records(),
            layout: Arc::clone(&self.layout),
            feature_names: Arc::clone(&self.feature_names),
            chunk_size: self.chunk_size,
            stats: ReadStats::default(),
            done: false,
        })
    }
}

impl BatchSource for DelimitedSource {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn batches(&self) -> histdiff_core::Result<BatchIter<'_>> {
        Ok(Box::new(self.traverse()?))
    }
}

fn csv_reader(path: &Path, delimiter: u8) -> Result<csv::Reader<File>> {
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

/// Whether enough fields of a row are numeric
pub fn mostly_numeric(record: &csv::StringRecord, threshold: f64) -> bool {
    let required = (threshold * record.len() as f64) as usize;
    let numeric = record
        .iter()
        .filter(|field| field.trim().parse::<f64>().is_ok())
        .count();
    numeric >= required
}

/// Parse a feature field, NaN when empty or not a number
pub fn parse_value(field: &str) -> f64 {
    field.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[derive(Debug, Default, Clone, Copy)]
struct ReadStats {
    rows: usize,
    kept: usize,
    not_utf8: usize,
    bad_width: usize,
    not_numeric: usize,
}

struct DelimitedBatches {
    records: csv::StringRecordsIntoIter<File>,
    layout: Arc<Layout>,
    feature_names: Arc<[String]>,
    chunk_size: usize,
    stats: ReadStats,
    done: bool,
}

impl DelimitedBatches {
    fn finish(&mut self) {
        self.done = true;
        info!(
            rows = self.stats.rows,
            kept = self.stats.kept,
            not_utf8 = self.stats.not_utf8,
            wrong_width = self.stats.bad_width,
            not_numeric = self.stats.not_numeric,
            "finished reading delimited file"
        );
    }
}

impl Iterator for DelimitedBatches {
    type Item = histdiff_core::Result<RowBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let layout = Arc::clone(&self.layout);
        let mut ids = Vec::with_capacity(self.chunk_size);
        let mut columns: Vec<Vec<f64>> =
            vec![Vec::with_capacity(self.chunk_size); layout.feature_indices.len()];

        while ids.len() < self.chunk_size {
            let record = match self.records.next() {
                Some(Ok(record)) => record,
                Some(Err(e)) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                    self.stats.rows += 1;
                    self.stats.not_utf8 += 1;
                    debug!(error = %e, "skipping row with invalid UTF-8");
                    continue;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(Error::from(e).into()));
                }
                None => {
                    self.finish();
                    break;
                }
            };
            self.stats.rows += 1;

            if record.len() != layout.header_len {
                self.stats.bad_width += 1;
                continue;
            }
            if !mostly_numeric(&record, NUMERIC_ROW_THRESHOLD) {
                self.stats.not_numeric += 1;
                continue;
            }

            ids.push(layout.entity_id(&record));
            for (column, &i) in columns.iter_mut().zip(&layout.feature_indices) {
                column.push(parse_value(&record[i]));
            }
            self.stats.kept += 1;
        }

        if ids.is_empty() {
            return None;
        }
        debug!(rows = ids.len(), "read batch");
        Some(RowBatch::new(ids, Arc::clone(&self.feature_names), columns))
    }
}
