#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![allow(clippy::result_large_err, clippy::large_enum_variant)]

// Tracing target constants for consistent logging
pub const TRACING_TARGET_CLIENT: &str = "stowage_minio::client";
pub const TRACING_TARGET_OPERATIONS: &str = "stowage_minio::operations";
pub const TRACING_TARGET_BUCKETS: &str = "stowage_minio::buckets";
pub const TRACING_TARGET_OBJECTS: &str = "stowage_minio::objects";

pub mod client;
pub mod operations;
mod provider;
pub mod types;

// Re-export for convenience
pub use crate::client::{MinioClient, MinioConfig, MinioCredentials};
pub use crate::operations::{BucketOperations, ObjectOperations, UploadResult};
pub use crate::provider::MinioStorage;
pub use crate::types::ObjectStat;

/// Error type for MinIO object storage operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Configuration error.
    ///
    /// This includes invalid configuration parameters, missing required
    /// settings, or malformed endpoint URLs.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request or malformed data.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    ///
    /// This occurs when trying to access a bucket or object that doesn't
    /// exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// I/O operation failed.
    ///
    /// This includes stream reading/writing failures during uploads and
    /// downloads.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying MinIO client error.
    ///
    /// This wraps errors from the underlying minio crate that don't fit into
    /// the other categories.
    #[error("MinIO client error: {0}")]
    Client(#[from] minio::s3::error::Error),
}

impl Error {
    /// Returns whether this error indicates a missing bucket or object.
    ///
    /// Inspects S3 error codes so callers can distinguish absence from
    /// genuine backend failures (used to implement `exists` via stat).
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Client(minio::s3::error::Error::S3Error(response)) => {
                use minio::s3::error::ErrorCode;
                matches!(
                    response.code,
                    ErrorCode::NoSuchKey | ErrorCode::NoSuchBucket
                ) || matches!(
                    &response.code,
                    ErrorCode::OtherError(code) if code == "nosuchobject"
                )
            }
            _ => false,
        }
    }
}

/// Specialized [`Result`] type for MinIO operations.
///
/// This is a convenience alias that uses [`Error`] as the error type, making
/// MinIO operation signatures cleaner and more consistent.
pub type Result<T, E = Error> = std::result::Result<T, E>;
