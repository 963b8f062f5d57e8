//! Error types for Spendwise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// The transaction store could not be queried
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// A stored value (amount or date) is not in a readable format
    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// True when the store could not be reached or queried.
    ///
    /// Callers assembling a page use this to drop the affected section
    /// instead of failing the whole request.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Error::DataUnavailable(_))
    }

    /// Amounts too large (or too finely divided) for decimal arithmetic
    pub(crate) fn overflow(computing: &str) -> Self {
        Error::DataFormat(format!("Amounts out of range while computing {}", computing))
    }

    /// Re-classify an infrastructure failure as `DataUnavailable`.
    ///
    /// `DataFormat` passes through untouched: corrupt rows are not an
    /// availability problem.
    pub(crate) fn into_unavailable(self) -> Self {
        match self {
            Error::DataFormat(_) | Error::DataUnavailable(_) => self,
            other => Error::DataUnavailable(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
