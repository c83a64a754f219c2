//! Error types for HistDiff
//!
//! Provides a unified error type for all histdiff crates.

use thiserror::Error;

/// Core error type for HistDiff operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A column the caller asked for is not present
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Two structures that must share a shape do not
    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Fatal configuration or structural error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::ShapeMismatch {
            context: context.to_string(),
            expected,
            actual,
        }
    }

    /// Create an error for a column that could not be found
    pub fn missing_column(name: &str) -> Self {
        Self::MissingColumn(name.to_string())
    }

    /// Create an error for a parameter that must be strictly positive
    pub fn non_positive(name: &str, value: impl std::fmt::Display) -> Self {
        Self::InvalidParameter(format!("{name} must be positive, got {value}"))
    }
}
