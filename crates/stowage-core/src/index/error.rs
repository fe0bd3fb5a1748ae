//! Error type for index store operations.

use crate::storage::BoxedError;

/// Error type for document index operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum IndexError {
    /// The referenced index entry does not exist.
    #[error("Index entry not found")]
    NotFound,

    /// An entry for the same (bucket, key) pair already exists.
    #[error("Index entry already exists for {bucket}/{key}")]
    Conflict {
        /// Bucket of the conflicting entry.
        bucket: String,
        /// Key of the conflicting entry.
        key: String,
    },

    /// The underlying index store failed (connection, query, timeout).
    #[error("Index store error: {message}")]
    Store {
        /// Human-readable description of the failure.
        message: String,
        /// The underlying store error, if available.
        #[source]
        source: Option<BoxedError>,
    },
}

impl IndexError {
    /// Creates a store error wrapping an underlying failure.
    pub fn store(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns whether this error indicates a missing entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound)
    }
}

/// Specialized [`Result`] type for index operations.
pub type IndexResult<T, E = IndexError> = std::result::Result<T, E>;
