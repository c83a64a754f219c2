//! Core types for the HistDiff pipeline
//!
//! This crate holds the pieces every other histdiff crate agrees on:
//!
//! - [`Error`] and [`Result`]: the shared error type
//! - [`PlateDefinition`] and [`canonical_well_label`]: which wells are valid
//! - [`BlockDefinition`]: how wells are grouped for control correction
//! - [`RowBatch`] and [`BatchSource`]: how cell-level measurements arrive
//!
//! # Example
//!
//! ```rust
//! use histdiff_core::{BatchSource, BlockDefinition, InMemorySource, PlateDefinition};
//!
//! let plate = PlateDefinition::well_384();
//! let blocks = BlockDefinition::from_groups([vec!["A1", "A2"]]).resolve(&plate).unwrap();
//! assert_eq!(blocks.len(), 2);
//!
//! let source = InMemorySource::new(
//!     &["Nuclei_Area"],
//!     vec![("A1".to_string(), vec![12.5]), ("A2".to_string(), vec![9.0])],
//!     50_000,
//! )
//! .unwrap();
//! assert_eq!(source.batches().unwrap().count(), 1);
//! ```

pub mod batch;
pub mod blocks;
pub mod error;
pub mod plate;

pub use batch::{BatchIter, BatchSource, InMemorySource, RowBatch};
pub use blocks::{Block, BlockDefinition, BlockSpec, REMAINDER_BLOCK};
pub use error::{Error, Result};
pub use plate::{canonical_well_label, PlateDefinition};
