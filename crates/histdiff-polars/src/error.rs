//! Error types for histdiff-polars

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("HistDiff error: {0}")]
    Core(#[from] histdiff_core::Error),

    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("Type mismatch in column {column}: expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for histdiff_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Core(e) => e,
            Error::InvalidColumn(name) => histdiff_core::Error::MissingColumn(name),
            Error::InvalidParameter(msg) => histdiff_core::Error::InvalidParameter(msg),
            other => histdiff_core::Error::Other(other.into()),
        }
    }
}
