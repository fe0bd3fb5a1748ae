//! Error type for storage provider operations.

use crate::crypto::CryptoError;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for object storage operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum StorageError {
    /// Invalid request or malformed data.
    ///
    /// This occurs when request parameters are invalid or malformed before
    /// the backend is ever reached.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Referenced bucket or object does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Payload failed its authenticated-decryption check.
    ///
    /// Surfaced as a download failure; partial or unauthenticated plaintext
    /// is never returned.
    #[error("Integrity check failed: {0}")]
    Integrity(#[from] CryptoError),

    /// The storage backend call failed (network, permission, outage).
    ///
    /// The original failure detail is preserved as the error source for
    /// diagnostics.
    #[error("Storage backend error: {message}")]
    Backend {
        /// Human-readable description of the failure.
        message: String,
        /// The underlying backend error, if available.
        #[source]
        source: Option<BoxedError>,
    },
}

impl StorageError {
    /// Creates a backend error wrapping an underlying failure.
    pub fn backend(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a backend error with a message only.
    pub fn backend_message(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Returns whether this error indicates a missing bucket or object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    /// Returns whether this error indicates a failed integrity check.
    pub fn is_integrity(&self) -> bool {
        matches!(self, StorageError::Integrity(_))
    }
}

/// Specialized [`Result`] type for storage operations.
pub type StorageResult<T, E = StorageError> = std::result::Result<T, E>;
