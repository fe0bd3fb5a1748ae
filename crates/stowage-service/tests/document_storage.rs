//! End-to-end orchestration tests over the in-memory provider and index.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use stowage_core::crypto::EncryptionKey;
use stowage_core::index::{
    DocumentIndexEntry, DocumentIndexQuery, DocumentIndexStore, IndexError, IndexResult,
};
use stowage_core::mock::{MemoryIndexStore, MemoryStorage};
use stowage_core::storage::EncryptedStorage;
use stowage_core::StorageProvider;
use stowage_service::{
    DocumentStorageService, ErrorCode, PresignedUrlRequest, SearchRequest, UploadRequest,
};
use uuid::Uuid;

/// Index store whose every operation fails, for exercising the
/// swallowed-failure policy.
struct FailingIndexStore;

fn failure() -> IndexError {
    IndexError::Store {
        message: "index store is down".to_string(),
        source: None,
    }
}

#[async_trait::async_trait]
impl DocumentIndexStore for FailingIndexStore {
    async fn get_by_id(&self, _id: Uuid) -> IndexResult<Option<DocumentIndexEntry>> {
        Err(failure())
    }

    async fn get_by_bucket_and_key(
        &self,
        _bucket: &str,
        _key: &str,
    ) -> IndexResult<Option<DocumentIndexEntry>> {
        Err(failure())
    }

    async fn search(&self, _query: &DocumentIndexQuery) -> IndexResult<Vec<DocumentIndexEntry>> {
        Err(failure())
    }

    async fn count(&self, _query: &DocumentIndexQuery) -> IndexResult<u64> {
        Err(failure())
    }

    async fn insert(&self, _entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry> {
        Err(failure())
    }

    async fn upsert(&self, _entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry> {
        Err(failure())
    }

    async fn update(&self, _entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry> {
        Err(failure())
    }

    async fn delete_by_id(&self, _id: Uuid) -> IndexResult<bool> {
        Err(failure())
    }

    async fn delete_by_bucket_and_key(&self, _bucket: &str, _key: &str) -> IndexResult<bool> {
        Err(failure())
    }
}

/// Encrypting service over in-memory storage and index, plus handles to both.
fn encrypted_service() -> (
    DocumentStorageService,
    Arc<MemoryStorage>,
    Arc<MemoryIndexStore>,
) {
    let backend = Arc::new(MemoryStorage::new());
    let provider = Arc::new(EncryptedStorage::new(
        backend.clone(),
        EncryptionKey::generate(),
    ));
    let index = Arc::new(MemoryIndexStore::new());
    let service = DocumentStorageService::new(provider).with_index(index.clone());
    (service, backend, index)
}

fn plain_service() -> (DocumentStorageService, Arc<MemoryIndexStore>) {
    let backend = Arc::new(MemoryStorage::new());
    let index = Arc::new(MemoryIndexStore::new());
    let service = DocumentStorageService::new(backend).with_index(index.clone());
    (service, index)
}

#[tokio::test]
async fn upload_then_download_roundtrips_with_encryption() {
    let (service, _, _) = encrypted_service();

    let uploaded = service
        .upload(UploadRequest::new("docs", "a.txt", "hello", "text/plain"))
        .await;
    assert!(uploaded.is_success());

    // The backend stores ciphertext: 12-byte nonce + payload + 16-byte tag
    let stored = uploaded.data.unwrap();
    assert_eq!(stored.size, "hello".len() as u64 + 28);
    assert!(stored.metadata.contains_key("x-encrypted"));

    let downloaded = service.download("docs", "a.txt").await;
    assert!(downloaded.is_success());

    let payload = downloaded.data.unwrap();
    assert_eq!(payload.content, Bytes::from("hello"));
    assert_eq!(payload.file_name, "a.txt");
    assert_eq!(payload.content_type.as_deref(), Some("text/plain"));
}

#[tokio::test]
async fn delete_removes_object_and_index_entry() {
    let (service, _, index) = encrypted_service();

    service
        .upload(UploadRequest::new("docs", "a.txt", "hello", "text/plain"))
        .await;
    assert_eq!(index.len(), 1);

    let deleted = service.delete("docs", "a.txt").await;
    assert!(deleted.is_success());

    let exists = service.exists("docs", "a.txt").await;
    assert_eq!(exists.data, Some(false));

    let search = service
        .search_index(SearchRequest {
            bucket: Some("docs".to_string()),
            ..Default::default()
        })
        .await;
    let page = search.data.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn reupload_upserts_a_single_index_entry() {
    let (service, index) = plain_service();

    service
        .upload(UploadRequest::new("docs", "a.txt", "first", "text/plain"))
        .await;
    let first = index
        .get_by_bucket_and_key("docs", "a.txt")
        .await
        .unwrap()
        .unwrap();

    service
        .upload(UploadRequest::new(
            "docs",
            "a.txt",
            "second, longer content",
            "text/plain",
        ))
        .await;

    assert_eq!(index.len(), 1);
    let second = index
        .get_by_bucket_and_key("docs", "a.txt")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.uploaded_at, first.uploaded_at);
    assert_eq!(second.size, "second, longer content".len() as i64);
    assert_ne!(second.etag, first.etag);
    assert!(second.last_modified.is_some());
}

#[tokio::test]
async fn validation_failures_never_reach_the_backend() {
    let backend = Arc::new(MemoryStorage::new());
    let service = DocumentStorageService::new(backend.clone());

    let cases = [
        (
            UploadRequest::new("", "a.txt", "x", "text/plain"),
            ErrorCode::InvalidBucket,
        ),
        (
            UploadRequest::new("docs", "  ", "x", "text/plain"),
            ErrorCode::InvalidKey,
        ),
        (
            UploadRequest::new("docs", "a.txt", "", "text/plain"),
            ErrorCode::ContentEmpty,
        ),
        (
            UploadRequest::new("docs", "a.txt", "x", ""),
            ErrorCode::ContentTypeMissing,
        ),
    ];

    for (request, expected) in cases {
        let result = service.upload(request).await;
        assert!(result.failed_with(expected));
    }

    assert_eq!(backend.object_count("docs"), 0);

    let download = service.download("", "a.txt").await;
    assert!(download.failed_with(ErrorCode::InvalidBucket));

    let delete = service.delete("docs", "").await;
    assert!(delete.failed_with(ErrorCode::InvalidKey));
}

#[tokio::test]
async fn missing_objects_are_reported_as_not_found() {
    let (service, _, _) = encrypted_service();

    let download = service.download("docs", "missing.txt").await;
    assert!(download.failed_with(ErrorCode::ObjectNotFound));

    let delete = service.delete("docs", "missing.txt").await;
    assert!(delete.failed_with(ErrorCode::ObjectNotFound));

    let metadata = service.get_metadata("docs", "missing.txt").await;
    assert!(metadata.failed_with(ErrorCode::ObjectNotFound));
}

#[tokio::test]
async fn index_failure_does_not_fail_upload_or_delete() {
    let backend = Arc::new(MemoryStorage::new());
    let service =
        DocumentStorageService::new(backend.clone()).with_index(Arc::new(FailingIndexStore));

    let uploaded = service
        .upload(UploadRequest::new("docs", "a.txt", "hello", "text/plain"))
        .await;
    assert!(uploaded.is_success());
    assert_eq!(backend.object_count("docs"), 1);

    let deleted = service.delete("docs", "a.txt").await;
    assert!(deleted.is_success());
    assert_eq!(backend.object_count("docs"), 0);
}

#[tokio::test]
async fn indexing_disabled_still_stores_documents() {
    let backend = Arc::new(MemoryStorage::new());
    let service = DocumentStorageService::new(backend.clone());

    let uploaded = service
        .upload(UploadRequest::new("docs", "a.txt", "hello", "text/plain"))
        .await;
    assert!(uploaded.is_success());

    let search = service.search_index(SearchRequest::default()).await;
    assert!(search.failed_with(ErrorCode::ProviderNotConfigured));
}

#[tokio::test]
async fn tampered_ciphertext_fails_download_with_integrity_code() {
    let (service, backend, _) = encrypted_service();

    service
        .upload(UploadRequest::new("docs", "a.txt", "hello", "text/plain"))
        .await;

    // Corrupt the stored ciphertext behind the decorator's back
    let raw = backend.download("docs", "a.txt").await.unwrap();
    let mut corrupted = raw.to_vec();
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0x01;
    let info = backend.get_metadata("docs", "a.txt").await.unwrap();
    backend
        .upload(
            "docs",
            "a.txt",
            Bytes::from(corrupted),
            "text/plain",
            Some(info.metadata),
        )
        .await
        .unwrap();

    let download = service.download("docs", "a.txt").await;
    assert!(download.failed_with(ErrorCode::IntegrityCheckFailed));
}

#[tokio::test]
async fn plaintext_objects_coexist_with_encrypted_ones() {
    let (service, backend, _) = encrypted_service();

    // Legacy object written directly to the backend without encryption
    backend
        .upload(
            "docs",
            "legacy.txt",
            Bytes::from("plain bytes"),
            "text/plain",
            None,
        )
        .await
        .unwrap();

    let download = service.download("docs", "legacy.txt").await;
    assert_eq!(download.data.unwrap().content, Bytes::from("plain bytes"));
}

#[tokio::test]
async fn list_and_presign_and_ensure_bucket_pass_through() {
    let (service, _, _) = encrypted_service();

    let ensured = service.ensure_bucket("docs").await;
    assert!(ensured.is_success());

    service
        .upload(UploadRequest::new(
            "docs",
            "reports/q1.pdf",
            "q1",
            "application/pdf",
        ))
        .await;
    service
        .upload(UploadRequest::new(
            "docs",
            "invoices/march.pdf",
            "march",
            "application/pdf",
        ))
        .await;

    let listed = service.list("docs", Some("reports/")).await;
    let objects = listed.data.unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].key, "reports/q1.pdf");

    let url = service
        .presigned_url(PresignedUrlRequest {
            bucket: "docs".to_string(),
            key: "reports/q1.pdf".to_string(),
            expiry_minutes: 15,
        })
        .await;
    assert!(url.data.unwrap().contains("reports/q1.pdf"));

    let empty = service.list("", None).await;
    assert!(empty.failed_with(ErrorCode::InvalidBucket));
}

#[tokio::test]
async fn upload_records_uploader_and_custom_metadata_in_index() {
    let (service, index) = plain_service();

    service
        .upload(
            UploadRequest::new("docs", "a.txt", "hello", "text/plain")
                .with_uploaded_by("alice")
                .with_metadata(HashMap::from([(
                    "department".to_string(),
                    "finance".to_string(),
                )])),
        )
        .await;

    let entry = index
        .get_by_bucket_and_key("docs", "a.txt")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(entry.uploaded_by.as_deref(), Some("alice"));
    assert_eq!(
        entry.custom_metadata.get("department").map(String::as_str),
        Some("finance")
    );
    assert!(entry.tags.is_empty());
    assert!(!entry.is_encrypted);
}

#[tokio::test]
async fn encrypted_upload_marks_index_entry() {
    let (service, _, index) = encrypted_service();

    service
        .upload(UploadRequest::new("docs", "a.txt", "hello", "text/plain"))
        .await;

    let entry = index
        .get_by_bucket_and_key("docs", "a.txt")
        .await
        .unwrap()
        .unwrap();
    assert!(entry.is_encrypted);
    assert_eq!(entry.size, "hello".len() as i64 + 28);
}
