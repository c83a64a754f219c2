//! HistDiff: streaming per-well histogram differential scoring
//!
//! Facade over the histdiff workspace crates.
//!
//! ```rust
//! use histdiff::prelude::*;
//!
//! let rows = vec![
//!     ("A1".to_string(), vec![1.0]),
//!     ("A1".to_string(), vec![9.0]),
//!     ("A2".to_string(), vec![9.0]),
//! ];
//! let source = InMemorySource::new(&["Cells_Area"], rows, 1024).unwrap();
//! let scores = calculate_scores(&source, HistDiffConfig::new(["A1"])).unwrap();
//! assert!(scores.get("A2", "Cells_Area").unwrap() > 0.0);
//! ```

pub use histdiff_core;
pub use histdiff_engine;
pub use histdiff_histogram;
pub use histdiff_io;
#[cfg(feature = "polars")]
pub use histdiff_polars;

pub use histdiff_core::{Error, Result};

/// Commonly used types
pub mod prelude {
    pub use histdiff_core::{
        canonical_well_label, BatchSource, BlockDefinition, BlockSpec, InMemorySource,
        PlateDefinition, RowBatch,
    };
    pub use histdiff_engine::{
        calculate_scores, HistDiffConfig, HistDiffPipeline, HistDiffRun, ScoreMatrix,
    };
    pub use histdiff_histogram::{hist_square_diff, BinRange, Histogram, HistogramDistance};
    pub use histdiff_io::{write_scores, DelimitedSource, PlateMap};
    #[cfg(feature = "polars")]
    pub use histdiff_polars::{HistDiffFrameExt, ScoreMatrixExt};
}
