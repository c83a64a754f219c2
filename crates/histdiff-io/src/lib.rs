//! File input and output for HistDiff
//!
//! - [`DelimitedSource`]: a cell-by-cell TSV/CSV file as a re-traversable
//!   [`BatchSource`](histdiff_core::BatchSource)
//! - [`PlateMap`]: plate definition and control wells from a plate map
//! - [`write_scores`]: the score matrix as CSV
//!
//! # Example
//!
//! ```rust,no_run
//! use histdiff_engine::{calculate_scores, HistDiffConfig};
//! use histdiff_io::{write_scores, DelimitedSource, PlateMap};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let map = PlateMap::from_csv("platemap.csv", "384_Well", "sample_type")?;
//! let source = DelimitedSource::builder("cellbycell.tsv")
//!     .id_columns(["id"])
//!     .chunk_size(100_000)
//!     .build()?;
//!
//! let config = HistDiffConfig::new(&map.controls).with_plate(map.plate);
//! let scores = calculate_scores(&source, config)?;
//! write_scores(&scores, "histdiff_scores.csv")?;
//! # Ok(())
//! # }
//! ```

mod error;
mod platemap;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use platemap::{PlateMap, REFERENCE_LABEL};
pub use reader::{
    mostly_numeric, parse_value, DelimitedSource, DelimitedSourceBuilder, ID_SEPARATOR,
    NUMERIC_ROW_THRESHOLD,
};
pub use writer::{write_scores, write_scores_to, ID_HEADER};
