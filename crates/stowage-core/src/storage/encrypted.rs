//! Encrypting decorator over any storage provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info};

use crate::TRACING_TARGET_STORAGE;
use crate::crypto::{self, EncryptionKey};

use super::error::StorageResult;
use super::object_info::ObjectInfo;
use super::provider::StorageProvider;

/// Metadata key marking an object as encrypted at rest.
pub const ENCRYPTED_METADATA_KEY: &str = "x-encrypted";

/// Metadata value set for encrypted objects.
pub const ENCRYPTED_METADATA_VALUE: &str = "true";

/// A decorator that wraps any [`StorageProvider`] with authenticated
/// encryption.
///
/// On upload the full plaintext is encrypted and the object is tagged with
/// `x-encrypted=true` in its metadata; on download the marker decides whether
/// the payload is decrypted or returned as-is, so plaintext and encrypted
/// objects can coexist under the same backend. All other operations pass
/// through unchanged — only payload bytes are transformed, never object
/// identity or existence.
///
/// Decryption requires an extra metadata round-trip, so callers needing only
/// existence or listings should not go through the download path.
///
/// The whole payload is buffered in memory to compute a single
/// authentication tag, which bounds practical object size to available
/// memory.
pub struct EncryptedStorage {
    inner: Arc<dyn StorageProvider>,
    key: EncryptionKey,
}

impl EncryptedStorage {
    /// Wraps `inner` with the given process-wide key.
    pub fn new(inner: Arc<dyn StorageProvider>, key: EncryptionKey) -> Self {
        Self { inner, key }
    }

    /// Returns whether the object's metadata carries the encryption marker.
    pub fn is_marked_encrypted(info: &ObjectInfo) -> bool {
        info.metadata
            .get(ENCRYPTED_METADATA_KEY)
            .is_some_and(|v| v.eq_ignore_ascii_case(ENCRYPTED_METADATA_VALUE))
    }
}

#[async_trait::async_trait]
impl StorageProvider for EncryptedStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        content: Bytes,
        content_type: &str,
        metadata: Option<HashMap<String, String>>,
    ) -> StorageResult<ObjectInfo> {
        let ciphertext = crypto::encrypt(&self.key, &content)?;

        // Tag metadata so downloads know this object needs decryption
        let mut metadata = metadata.unwrap_or_default();
        metadata.insert(
            ENCRYPTED_METADATA_KEY.to_string(),
            ENCRYPTED_METADATA_VALUE.to_string(),
        );

        info!(
            target: TRACING_TARGET_STORAGE,
            bucket = %bucket,
            key = %key,
            plaintext_size = content.len(),
            stored_size = ciphertext.len(),
            "Encrypting object before upload"
        );

        // The returned size reflects the inner provider's report, i.e. the
        // ciphertext length (plaintext + 28 bytes of nonce and tag)
        self.inner
            .upload(
                bucket,
                key,
                Bytes::from(ciphertext),
                content_type,
                Some(metadata),
            )
            .await
    }

    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        // Read the marker first; unencrypted (legacy) objects are returned
        // unchanged
        let info = self.inner.get_metadata(bucket, key).await?;

        if !Self::is_marked_encrypted(&info) {
            debug!(
                target: TRACING_TARGET_STORAGE,
                bucket = %bucket,
                key = %key,
                "Object is not encrypted, returning as-is"
            );
            return self.inner.download(bucket, key).await;
        }

        let ciphertext = self.inner.download(bucket, key).await?;

        info!(
            target: TRACING_TARGET_STORAGE,
            bucket = %bucket,
            key = %key,
            "Decrypting object after download"
        );

        let plaintext = crypto::decrypt(&self.key, &ciphertext)?;
        Ok(Bytes::from(plaintext))
    }

    // All other operations pass through to the inner provider unchanged

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.inner.delete(bucket, key).await
    }

    async fn get_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectInfo> {
        self.inner.get_metadata(bucket, key).await
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        self.inner.exists(bucket, key).await
    }

    async fn list(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<Vec<ObjectInfo>> {
        self.inner.list(bucket, prefix).await
    }

    async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        expiry: Duration,
    ) -> StorageResult<String> {
        self.inner.presigned_url(bucket, key, expiry).await
    }

    async fn ensure_bucket(&self, bucket: &str) -> StorageResult<()> {
        self.inner.ensure_bucket(bucket).await
    }
}

#[cfg(test)]
mod tests {
    use crate::crypto::MIN_CIPHERTEXT_SIZE;
    use crate::mock::MemoryStorage;

    use super::*;

    fn encrypted_storage() -> (Arc<MemoryStorage>, EncryptedStorage) {
        let inner = Arc::new(MemoryStorage::new());
        let storage = EncryptedStorage::new(inner.clone(), EncryptionKey::generate());
        (inner, storage)
    }

    #[tokio::test]
    async fn test_upload_stores_ciphertext_with_marker() {
        let (inner, storage) = encrypted_storage();
        let plaintext = Bytes::from("hello");

        let info = storage
            .upload("docs", "a.txt", plaintext.clone(), "text/plain", None)
            .await
            .unwrap();

        // The reported size is the inner provider's report: ciphertext length
        assert_eq!(info.size as usize, plaintext.len() + MIN_CIPHERTEXT_SIZE);
        assert_eq!(
            info.metadata.get(ENCRYPTED_METADATA_KEY).map(String::as_str),
            Some(ENCRYPTED_METADATA_VALUE)
        );

        // The raw stored bytes must not contain the plaintext
        let raw = inner.download("docs", "a.txt").await.unwrap();
        assert_ne!(raw, plaintext);
        assert_eq!(raw.len(), plaintext.len() + MIN_CIPHERTEXT_SIZE);
    }

    #[tokio::test]
    async fn test_download_decrypts_marked_objects() {
        let (_, storage) = encrypted_storage();
        let plaintext = Bytes::from("hello");

        storage
            .upload("docs", "a.txt", plaintext.clone(), "text/plain", None)
            .await
            .unwrap();

        let downloaded = storage.download("docs", "a.txt").await.unwrap();
        assert_eq!(downloaded, plaintext);
    }

    #[tokio::test]
    async fn test_download_passes_through_unmarked_objects() {
        let (inner, storage) = encrypted_storage();
        let plaintext = Bytes::from("legacy plaintext object");

        // Object written directly to the backend, without the decorator
        inner
            .upload("docs", "legacy.txt", plaintext.clone(), "text/plain", None)
            .await
            .unwrap();

        let downloaded = storage.download("docs", "legacy.txt").await.unwrap();
        assert_eq!(downloaded, plaintext);
    }

    #[tokio::test]
    async fn test_download_detects_tampering() {
        let (inner, storage) = encrypted_storage();

        storage
            .upload("docs", "a.txt", Bytes::from("hello"), "text/plain", None)
            .await
            .unwrap();

        // Corrupt one ciphertext byte behind the decorator's back
        let raw = inner.download("docs", "a.txt").await.unwrap();
        let mut corrupted = raw.to_vec();
        let index = corrupted.len() - 1;
        corrupted[index] ^= 0x01;
        let info = inner.get_metadata("docs", "a.txt").await.unwrap();
        inner
            .upload(
                "docs",
                "a.txt",
                Bytes::from(corrupted),
                "text/plain",
                Some(info.metadata),
            )
            .await
            .unwrap();

        let err = storage.download("docs", "a.txt").await.unwrap_err();
        assert!(err.is_integrity());
    }

    #[tokio::test]
    async fn test_metadata_and_existence_pass_through() {
        let (_, storage) = encrypted_storage();

        storage
            .upload("docs", "a.txt", Bytes::from("hello"), "text/plain", None)
            .await
            .unwrap();

        assert!(storage.exists("docs", "a.txt").await.unwrap());

        let info = storage.get_metadata("docs", "a.txt").await.unwrap();
        assert!(EncryptedStorage::is_marked_encrypted(&info));

        storage.delete("docs", "a.txt").await.unwrap();
        assert!(!storage.exists("docs", "a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_caller_metadata_is_preserved_alongside_marker() {
        let (_, storage) = encrypted_storage();
        let metadata = HashMap::from([("department".to_string(), "finance".to_string())]);

        let info = storage
            .upload(
                "docs",
                "a.txt",
                Bytes::from("hello"),
                "text/plain",
                Some(metadata),
            )
            .await
            .unwrap();

        assert_eq!(
            info.metadata.get("department").map(String::as_str),
            Some("finance")
        );
        assert_eq!(
            info.metadata.get(ENCRYPTED_METADATA_KEY).map(String::as_str),
            Some(ENCRYPTED_METADATA_VALUE)
        );
    }
}
