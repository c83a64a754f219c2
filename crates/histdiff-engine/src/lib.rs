//! Streaming HistDiff engine
//!
//! Scores every well of a multiwell plate, per feature, against the pooled
//! vehicle-control wells of its block. The input is never held in memory:
//!
//! 1. [`estimate_ranges`] walks the data once to freeze a [`MinMaxTable`]
//! 2. [`aggregate`] walks it again, binning every cell into the
//!    [`HistogramStore`] slot of its well
//! 3. [`Transform`] smooths and normalises each histogram
//! 4. [`BlockScorer`] pools controls per block and computes the signed
//!    square difference
//!
//! [`HistDiffPipeline`] sequences the stages.
//!
//! # Example
//!
//! ```rust
//! use histdiff_core::InMemorySource;
//! use histdiff_engine::{calculate_scores, HistDiffConfig};
//!
//! let rows = vec![
//!     ("B2".to_string(), vec![1.0]),
//!     ("B2".to_string(), vec![9.0]),
//!     ("C3".to_string(), vec![1.0]),
//!     ("C3".to_string(), vec![1.0]),
//! ];
//! let source = InMemorySource::new(&["Cells_Area"], rows, 2).unwrap();
//! let config = HistDiffConfig::new(["B02"]).with_nbins(4);
//!
//! let scores = calculate_scores(&source, config).unwrap();
//! // C3 has lost its large cells compared with the control
//! assert!(scores.get("C3", "Cells_Area").unwrap() < 0.0);
//! ```

pub mod aggregate;
pub mod config;
pub mod matrix;
pub mod pipeline;
pub mod range;
pub mod report;
pub mod scorer;
pub mod store;
pub mod transform;

pub use aggregate::{aggregate, BatchSummary, StreamingAggregator};
pub use config::{HistDiffConfig, DEFAULT_CHUNK_SIZE, DEFAULT_NBINS};
pub use matrix::ScoreMatrix;
pub use pipeline::{calculate_scores, HistDiffPipeline, HistDiffRun};
pub use range::{
    estimate_ranges, widen_degenerate, MinMaxTable, ProblemReason, ProblematicFeature,
    RangeAccumulator, RangeEstimate,
};
pub use report::write_problematic_features;
pub use scorer::{BlockScorer, VEHICLE_CONTROL};
pub use store::HistogramStore;
pub use transform::{NormalizedStore, Transform};

pub use histdiff_core::{Error, Result};
