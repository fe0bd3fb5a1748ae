//! Document storage orchestration.

use std::sync::Arc;
use std::time::Duration;

use stowage_core::index::{DocumentIndexEntry, DocumentIndexStore};
use stowage_core::storage::{EncryptedStorage, ObjectInfo, StorageProvider};
use tracing::{error, info, warn};

use crate::TRACING_TARGET_STORAGE;
use crate::document_index::run_search;
use crate::error::ErrorCode;
use crate::result::ServiceResult;
use crate::types::{
    DocumentIndexDto, DownloadPayload, PagedResult, PresignedUrlRequest, SearchRequest,
    StorageObjectDto, UploadRequest,
};

/// The application-level storage service.
///
/// Sequences the storage provider and the optional document index and owns
/// the consistency policy between them: validation happens before any backend
/// call, storage is authoritative, and index failures accompanying an upload
/// or delete are logged and swallowed so the primary operation's outcome
/// stands.
///
/// The index is an explicit optional collaborator — the gateway runs
/// correctly with indexing disabled, and logs distinguish "no index
/// configured" from "index failed".
pub struct DocumentStorageService {
    provider: Arc<dyn StorageProvider>,
    index: Option<Arc<dyn DocumentIndexStore>>,
}

impl DocumentStorageService {
    /// Creates a service without indexing.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            provider,
            index: None,
        }
    }

    /// Enables indexing with the given store.
    pub fn with_index(mut self, index: Arc<dyn DocumentIndexStore>) -> Self {
        self.index = Some(index);
        self
    }

    /// Uploads a document and synchronizes the index best-effort.
    pub async fn upload(&self, request: UploadRequest) -> ServiceResult<StorageObjectDto> {
        if request.bucket.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidBucket);
        }
        if request.key.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidKey);
        }
        if request.content.is_empty() {
            return ServiceResult::fail(ErrorCode::ContentEmpty);
        }
        if request.content_type.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::ContentTypeMissing);
        }

        let info = match self
            .provider
            .upload(
                &request.bucket,
                &request.key,
                request.content.clone(),
                &request.content_type,
                request.metadata.clone(),
            )
            .await
        {
            Ok(info) => info,
            Err(e) => {
                error!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %request.bucket,
                    key = %request.key,
                    error = %e,
                    "Failed to upload document"
                );
                return ServiceResult::fail(ErrorCode::UploadFailed);
            }
        };

        match &self.index {
            Some(index) => self.index_document(index.as_ref(), &info, &request).await,
            None => info!(
                target: TRACING_TARGET_STORAGE,
                bucket = %request.bucket,
                key = %request.key,
                "Indexing disabled, skipping index entry"
            ),
        }

        ServiceResult::ok_with_message(info.into(), "Document uploaded successfully.")
    }

    /// Downloads a document, decrypting transparently when applicable.
    pub async fn download(&self, bucket: &str, key: &str) -> ServiceResult<DownloadPayload> {
        if bucket.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidBucket);
        }
        if key.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidKey);
        }

        match self.exists_inner(bucket, key).await {
            Ok(true) => {}
            Ok(false) => return ServiceResult::fail(ErrorCode::ObjectNotFound),
            Err(code) => return ServiceResult::fail(code),
        }

        let info = match self.provider.get_metadata(bucket, key).await {
            Ok(info) => info,
            Err(e) => {
                error!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to fetch metadata for download"
                );
                return ServiceResult::fail(ErrorCode::DownloadFailed);
            }
        };

        let content = match self.provider.download(bucket, key).await {
            Ok(content) => content,
            Err(e) if e.is_integrity() => {
                error!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Document failed its integrity check"
                );
                return ServiceResult::fail(ErrorCode::IntegrityCheckFailed);
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to download document"
                );
                return ServiceResult::fail(ErrorCode::DownloadFailed);
            }
        };

        ServiceResult::ok(DownloadPayload {
            content,
            content_type: info.content_type,
            file_name: stowage_core::index::file_name_of(key).to_string(),
        })
    }

    /// Deletes a document, then best-effort removes its index entry.
    pub async fn delete(&self, bucket: &str, key: &str) -> ServiceResult<bool> {
        if bucket.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidBucket);
        }
        if key.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidKey);
        }

        match self.exists_inner(bucket, key).await {
            Ok(true) => {}
            Ok(false) => return ServiceResult::fail(ErrorCode::ObjectNotFound),
            Err(code) => return ServiceResult::fail(code),
        }

        if let Err(e) = self.provider.delete(bucket, key).await {
            error!(
                target: TRACING_TARGET_STORAGE,
                bucket = %bucket,
                key = %key,
                error = %e,
                "Failed to delete document"
            );
            return ServiceResult::fail(ErrorCode::DeleteFailed);
        }

        // Storage deletion already succeeded, so an index failure here is
        // logged and swallowed
        if let Some(index) = &self.index {
            match index.delete_by_bucket_and_key(bucket, key).await {
                Ok(removed) => info!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %bucket,
                    key = %key,
                    removed = removed,
                    "Removed index entry"
                ),
                Err(e) => warn!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to remove index entry. Storage deletion succeeded."
                ),
            }
        }

        ServiceResult::ok_with_message(true, "Document deleted successfully.")
    }

    /// Fetches backend metadata for a document.
    pub async fn get_metadata(&self, bucket: &str, key: &str) -> ServiceResult<StorageObjectDto> {
        if bucket.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidBucket);
        }
        if key.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidKey);
        }

        match self.exists_inner(bucket, key).await {
            Ok(true) => {}
            Ok(false) => return ServiceResult::fail(ErrorCode::ObjectNotFound),
            Err(code) => return ServiceResult::fail(code),
        }

        match self.provider.get_metadata(bucket, key).await {
            Ok(info) => ServiceResult::ok(info.into()),
            Err(e) => {
                error!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to get metadata"
                );
                ServiceResult::fail(ErrorCode::MetadataRetrievalFailed)
            }
        }
    }

    /// Returns whether a document exists.
    pub async fn exists(&self, bucket: &str, key: &str) -> ServiceResult<bool> {
        if bucket.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidBucket);
        }
        if key.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidKey);
        }

        match self.provider.exists(bucket, key).await {
            Ok(exists) => ServiceResult::ok(exists),
            Err(e) => {
                error!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to check existence"
                );
                ServiceResult::fail(ErrorCode::GenericUnexpected)
            }
        }
    }

    /// Lists documents in a bucket, optionally filtered by key prefix.
    pub async fn list(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> ServiceResult<Vec<StorageObjectDto>> {
        if bucket.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidBucket);
        }

        match self.provider.list(bucket, prefix).await {
            Ok(objects) => {
                ServiceResult::ok(objects.into_iter().map(StorageObjectDto::from).collect())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %bucket,
                    prefix = ?prefix,
                    error = %e,
                    "Failed to list objects"
                );
                ServiceResult::fail(ErrorCode::ListObjectsFailed)
            }
        }
    }

    /// Generates a presigned URL for temporary credential-free access.
    pub async fn presigned_url(&self, request: PresignedUrlRequest) -> ServiceResult<String> {
        if request.bucket.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidBucket);
        }
        if request.key.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidKey);
        }

        let expiry = Duration::from_secs(request.expiry_minutes * 60);

        match self
            .provider
            .presigned_url(&request.bucket, &request.key, expiry)
            .await
        {
            Ok(url) => ServiceResult::ok(url),
            Err(e) => {
                error!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %request.bucket,
                    key = %request.key,
                    error = %e,
                    "Failed to generate presigned URL"
                );
                ServiceResult::fail(ErrorCode::PresignedUrlFailed)
            }
        }
    }

    /// Creates the bucket if it does not already exist.
    pub async fn ensure_bucket(&self, bucket: &str) -> ServiceResult<bool> {
        if bucket.trim().is_empty() {
            return ServiceResult::fail(ErrorCode::InvalidBucket);
        }

        match self.provider.ensure_bucket(bucket).await {
            Ok(()) => {
                ServiceResult::ok_with_message(true, format!("Bucket '{bucket}' is ready."))
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_STORAGE,
                    bucket = %bucket,
                    error = %e,
                    "Failed to ensure bucket exists"
                );
                ServiceResult::fail(ErrorCode::BucketCreationFailed)
            }
        }
    }

    /// Searches the document index.
    ///
    /// Fails with [`ErrorCode::ProviderNotConfigured`] when indexing is
    /// disabled.
    pub async fn search_index(
        &self,
        request: SearchRequest,
    ) -> ServiceResult<PagedResult<DocumentIndexDto>> {
        match &self.index {
            Some(index) => run_search(index.as_ref(), request).await,
            None => ServiceResult::fail(ErrorCode::ProviderNotConfigured),
        }
    }

    async fn exists_inner(&self, bucket: &str, key: &str) -> Result<bool, ErrorCode> {
        self.provider.exists(bucket, key).await.map_err(|e| {
            error!(
                target: TRACING_TARGET_STORAGE,
                bucket = %bucket,
                key = %key,
                error = %e,
                "Failed to check existence"
            );
            ErrorCode::GenericUnexpected
        })
    }

    /// Creates or refreshes the index entry for a freshly uploaded object.
    ///
    /// Any failure here is logged and discarded — the object store already
    /// accepted the document, and the index is a best-effort secondary view.
    async fn index_document(
        &self,
        index: &dyn DocumentIndexStore,
        info: &ObjectInfo,
        request: &UploadRequest,
    ) {
        let entry = DocumentIndexEntry::new(&info.bucket, &info.key)
            .with_content_type(
                info.content_type
                    .clone()
                    .unwrap_or_else(|| request.content_type.clone()),
            )
            .with_size(info.size as i64)
            .with_etag(info.etag.clone())
            .with_encrypted(EncryptedStorage::is_marked_encrypted(info))
            .with_uploaded_by(request.uploaded_by.clone())
            .with_custom_metadata(request.metadata.clone().unwrap_or_default());

        // Single atomic insert-or-update keyed on the unique (bucket, key)
        // constraint; concurrent uploads of the same key cannot both insert
        match index.upsert(entry).await {
            Ok(stored) => info!(
                target: TRACING_TARGET_STORAGE,
                bucket = %info.bucket,
                key = %info.key,
                entry_id = %stored.id,
                "Upserted index entry"
            ),
            Err(e) => warn!(
                target: TRACING_TARGET_STORAGE,
                bucket = %info.bucket,
                key = %info.key,
                error = %e,
                "Failed to index document. Upload succeeded."
            ),
        }
    }
}
