//! Error types for histdiff-io

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HistDiff error: {0}")]
    Core(#[from] histdiff_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for histdiff_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Core(e) => e,
            Error::Io(e) => histdiff_core::Error::Io(e),
            Error::MissingColumn(name) => histdiff_core::Error::MissingColumn(name),
            Error::InvalidInput(msg) => histdiff_core::Error::InvalidInput(msg),
            Error::Csv(e) => histdiff_core::Error::Other(e.into()),
        }
    }
}

/// Position of `name` in a header row
pub(crate) fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingColumn(name.to_string()))
}
