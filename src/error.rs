use thiserror::Error;

/// Errors raised while opening or querying an MBTiles store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Dataset file is missing, unreadable, or not an MBTiles store
    #[error("Store unavailable for {dataset}: {reason}")]
    Unavailable { dataset: String, reason: String },

    /// I/O or SQL failure during an otherwise valid lookup
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl StoreError {
    /// Create an `Unavailable` error for the given dataset.
    pub fn unavailable(dataset: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            dataset: dataset.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the store could not be opened at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Errors that can occur while resolving a tile request
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// A path segment is not a valid coordinate (should map to HTTP 400)
    #[error("Invalid {segment} segment: {value:?}")]
    BadRequest { segment: &'static str, value: String },

    /// Store failure during the lookup (should map to HTTP 500)
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Failure while reading dataset metadata. Always a server error.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MetadataError(#[from] pub StoreError);
