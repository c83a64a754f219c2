//! Fixed-range histograms and the HistDiff score
//!
//! This crate provides the per-(well, feature) histogram used by the HistDiff
//! pipeline and the operations applied to it after aggregation.
//!
//! # Key Features
//!
//! - **Frozen shape**: bin count and range are fixed at construction, so
//!   histograms for the same feature can always be merged
//! - **Integer counts**: filling only ever increases counts
//! - **Smoothing and normalisation**: neighbour smoothing followed by a
//!   zero-safe division by the sum
//! - **HistDiff score**: signed squared difference against a control
//!
//! # Examples
//!
//! ```rust
//! use histdiff_histogram::{BinRange, Histogram, HistogramOps, hist_square_diff};
//!
//! let range = BinRange::new(0.0, 10.0).unwrap();
//! let mut control = Histogram::new(4, range).unwrap();
//! let mut treated = Histogram::new(4, range).unwrap();
//! control.fill(&[1.0, 1.0, 9.0, 9.0]);
//! treated.fill(&[1.0, 1.0, 1.0, 1.0]);
//!
//! let score = hist_square_diff(
//!     &control.smoothed_distribution(0.25),
//!     &treated.smoothed_distribution(0.25),
//! )
//! .unwrap();
//!
//! // treated cells sit lower than the control
//! assert!(score < 0.0);
//! ```

pub mod diff;
pub mod ops;
pub mod traits;
pub mod types;

// Re-export main types and traits
pub use diff::{hist_square_diff, weighted_position, HistSquareDiff};
pub use ops::{exponential_smoothing, normalize, sum_counts, HistogramOps, DEFAULT_ALPHA};
pub use traits::HistogramDistance;
pub use types::{BinRange, Histogram};

pub use histdiff_core::Result;
