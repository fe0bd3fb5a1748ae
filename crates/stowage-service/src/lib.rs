#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging

/// Tracing target for document storage operations.
pub const TRACING_TARGET_STORAGE: &str = "stowage_service::storage";

/// Tracing target for document index operations.
pub const TRACING_TARGET_INDEX: &str = "stowage_service::index";

pub mod config;
mod document_index;
mod document_storage;
mod error;
mod result;
pub mod types;

// Re-export for convenience
pub use crate::config::{ConfigError, EncryptionConfig, GatewayConfig, IndexingConfig, StorageConfig};
pub use crate::document_index::DocumentIndexService;
pub use crate::document_storage::DocumentStorageService;
pub use crate::error::ErrorCode;
pub use crate::result::ServiceResult;
pub use crate::types::{
    DocumentIndexDto, DownloadPayload, PagedResult, PresignedUrlRequest, SearchRequest,
    StorageObjectDto, UploadRequest,
};
