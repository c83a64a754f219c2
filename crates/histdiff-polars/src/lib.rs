//! Polars integration for HistDiff
//!
//! A cell-by-cell `DataFrame` can be scored directly, and score matrices
//! convert back into frames.
//!
//! # Example
//!
//! ```rust
//! use polars::prelude::*;
//! use histdiff_engine::HistDiffConfig;
//! use histdiff_polars::HistDiffFrameExt;
//!
//! let cells = df![
//!     "well" => ["A01", "A01", "B02", "B02"],
//!     "Cells_Area" => [1.0, 9.0, 1.0, 1.0],
//! ]
//! .unwrap();
//!
//! let scores = cells
//!     .histdiff_scores(&["well"], HistDiffConfig::new(["A1"]).with_nbins(4))
//!     .unwrap();
//! assert_eq!(scores.height(), 2);
//! ```

mod error;
mod source;
mod traits;

pub use error::{Error, Result};
pub use source::DataFrameSource;
pub use traits::{HistDiffFrameExt, ScoreMatrixExt, ID_COLUMN};
