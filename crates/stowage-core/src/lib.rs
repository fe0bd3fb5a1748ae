#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging

/// Tracing target for encryption codec operations.
pub const TRACING_TARGET_CRYPTO: &str = "stowage_core::crypto";

/// Tracing target for storage contract operations.
pub const TRACING_TARGET_STORAGE: &str = "stowage_core::storage";

/// Tracing target for index contract operations.
pub const TRACING_TARGET_INDEX: &str = "stowage_core::index";

pub mod crypto;
pub mod index;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
pub mod storage;

// Re-export for convenience
pub use crate::crypto::{CryptoError, CryptoResult, EncryptionKey};
pub use crate::index::{
    DocumentIndexEntry, DocumentIndexQuery, DocumentIndexStore, IndexError, IndexResult, SortField,
};
pub use crate::storage::{
    ENCRYPTED_METADATA_KEY, ENCRYPTED_METADATA_VALUE, EncryptedStorage, ObjectInfo, StorageError,
    StorageProvider, StorageResult,
};
