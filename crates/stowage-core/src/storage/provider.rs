//! The storage provider contract.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;

use super::error::StorageResult;
use super::object_info::ObjectInfo;

/// The capability set any object-storage backend must implement.
///
/// Implementations are stateless per-call and safe to share behind an `Arc`;
/// the trait is object-safe so backends can be swapped by construction choice
/// alone, and wrapped uniformly by decorators such as
/// [`EncryptedStorage`](super::EncryptedStorage).
///
/// Cancellation is modeled the async-Rust way: dropping the returned future
/// aborts the in-flight backend call.
#[async_trait::async_trait]
pub trait StorageProvider: Send + Sync {
    /// Uploads an object, overwriting any existing object at the same key.
    ///
    /// Returns the backend's report of the stored object. The reported size
    /// is what the backend persisted, which may differ from the caller's
    /// payload when a decorator transformed it.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        content: Bytes,
        content_type: &str,
        metadata: Option<HashMap<String, String>>,
    ) -> StorageResult<ObjectInfo>;

    /// Downloads the full object payload.
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Bytes>;

    /// Deletes an object.
    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Fetches object metadata without downloading the payload.
    async fn get_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectInfo>;

    /// Returns whether an object exists.
    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool>;

    /// Lists objects in a bucket, optionally filtered by key prefix.
    async fn list(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<Vec<ObjectInfo>>;

    /// Generates a time-limited, credential-free URL granting temporary
    /// read access to one object.
    async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        expiry: Duration,
    ) -> StorageResult<String>;

    /// Creates the bucket if it does not already exist.
    async fn ensure_bucket(&self, bucket: &str) -> StorageResult<()>;
}
