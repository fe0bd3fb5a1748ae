//! Request and response types for the public service surface.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use stowage_core::index::{DocumentIndexEntry, DocumentIndexQuery, SortField};
use stowage_core::storage::ObjectInfo;
use time::OffsetDateTime;
use uuid::Uuid;

/// An upload request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target bucket.
    pub bucket: String,
    /// Target object key.
    pub key: String,
    /// Document payload.
    pub content: Bytes,
    /// MIME type of the payload.
    pub content_type: String,
    /// Free-form metadata stored with the object and mirrored into the index
    /// entry's custom metadata.
    pub metadata: Option<HashMap<String, String>>,
    /// Principal performing the upload, recorded in the index entry.
    pub uploaded_by: Option<String>,
}

impl UploadRequest {
    /// Creates an upload request with the required fields.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        content: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            content: content.into(),
            content_type: content_type.into(),
            metadata: None,
            uploaded_by: None,
        }
    }

    /// Attaches free-form metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Records the uploading principal.
    pub fn with_uploaded_by(mut self, uploaded_by: impl Into<String>) -> Self {
        self.uploaded_by = Some(uploaded_by.into());
        self
    }
}

/// A presigned URL request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlRequest {
    /// Bucket of the target object.
    pub bucket: String,
    /// Key of the target object.
    pub key: String,
    /// URL validity in minutes.
    pub expiry_minutes: u64,
}

/// Backend-reported object information as surfaced to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageObjectDto {
    /// Bucket the object lives in.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Stored size in bytes.
    pub size: u64,
    /// Content type, when the backend reports one.
    pub content_type: Option<String>,
    /// Backend-assigned ETag.
    pub etag: Option<String>,
    /// Last modified timestamp.
    pub last_modified: OffsetDateTime,
    /// Object metadata.
    pub metadata: HashMap<String, String>,
}

impl From<ObjectInfo> for StorageObjectDto {
    fn from(info: ObjectInfo) -> Self {
        Self {
            bucket: info.bucket,
            key: info.key,
            size: info.size,
            content_type: info.content_type,
            etag: info.etag,
            last_modified: info.last_modified,
            metadata: info.metadata,
        }
    }
}

/// A downloaded document.
#[derive(Debug, Clone)]
pub struct DownloadPayload {
    /// Document content, decrypted when applicable.
    pub content: Bytes,
    /// Content type reported by the backend.
    pub content_type: Option<String>,
    /// File name derived from the last path segment of the key.
    pub file_name: String,
}

/// One document index entry as surfaced to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIndexDto {
    /// Entry identifier.
    pub id: Uuid,
    /// Bucket of the mirrored object.
    pub bucket: String,
    /// Key of the mirrored object.
    pub key: String,
    /// Derived file name.
    pub file_name: String,
    /// Content type.
    pub content_type: String,
    /// Stored size in bytes.
    pub size: i64,
    /// Backend-assigned ETag.
    pub etag: Option<String>,
    /// Whether the payload is encrypted at rest.
    pub is_encrypted: bool,
    /// Uploading principal.
    pub uploaded_by: Option<String>,
    /// First-indexed timestamp.
    pub uploaded_at: OffsetDateTime,
    /// Latest mutation timestamp.
    pub last_modified: Option<OffsetDateTime>,
    /// User tags.
    pub tags: HashMap<String, String>,
    /// Free-form custom metadata.
    pub custom_metadata: HashMap<String, String>,
}

impl From<DocumentIndexEntry> for DocumentIndexDto {
    fn from(entry: DocumentIndexEntry) -> Self {
        Self {
            id: entry.id,
            bucket: entry.bucket,
            key: entry.key,
            file_name: entry.file_name,
            content_type: entry.content_type,
            size: entry.size,
            etag: entry.etag,
            is_encrypted: entry.is_encrypted,
            uploaded_by: entry.uploaded_by,
            uploaded_at: entry.uploaded_at,
            last_modified: entry.last_modified,
            tags: entry.tags,
            custom_metadata: entry.custom_metadata,
        }
    }
}

/// An index search request.
///
/// All filter fields are optional; the sort field is free-text with
/// unrecognized values falling back to `uploadedat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    /// Exact bucket match.
    pub bucket: Option<String>,
    /// Prefix match on the object key.
    pub key_prefix: Option<String>,
    /// Case-sensitive substring match on the file name.
    pub file_name: Option<String>,
    /// Exact content-type match.
    pub content_type: Option<String>,
    /// Exact uploader match.
    pub uploaded_by: Option<String>,
    /// Inclusive lower bound on the upload timestamp.
    pub uploaded_from: Option<OffsetDateTime>,
    /// Inclusive upper bound on the upload timestamp.
    pub uploaded_to: Option<OffsetDateTime>,
    /// Conjunctive tag constraints.
    pub tags: HashMap<String, String>,
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub page_size: i64,
    /// Sort field name.
    pub sort_by: String,
    /// Whether to sort in descending order.
    pub sort_descending: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            bucket: None,
            key_prefix: None,
            file_name: None,
            content_type: None,
            uploaded_by: None,
            uploaded_from: None,
            uploaded_to: None,
            tags: HashMap::new(),
            page: 1,
            page_size: 50,
            sort_by: SortField::UploadedAt.to_string(),
            sort_descending: true,
        }
    }
}

impl SearchRequest {
    /// Converts the request into the index query type.
    pub fn into_query(self) -> DocumentIndexQuery {
        DocumentIndexQuery {
            bucket: self.bucket,
            key_prefix: self.key_prefix,
            file_name: self.file_name,
            content_type: self.content_type,
            uploaded_by: self.uploaded_by,
            uploaded_from: self.uploaded_from,
            uploaded_to: self.uploaded_to,
            tags: self.tags,
            page: self.page,
            page_size: self.page_size,
            sort_by: SortField::parse_or_default(&self.sort_by),
            sort_descending: self.sort_descending,
        }
    }
}

/// One page of search results with derived paging totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// Entries of the current page, in sort order.
    pub results: Vec<T>,
    /// 1-based page number.
    pub current_page: i64,
    /// Page size used for the search.
    pub page_size: i64,
    /// Total matching entries across all pages.
    pub total: u64,
    /// Total page count, 0 when nothing matched.
    pub total_pages: u64,
}

impl<T> PagedResult<T> {
    /// Assembles a page, deriving the total page count.
    pub fn new(results: Vec<T>, current_page: i64, page_size: i64, total: u64) -> Self {
        let total_pages = if page_size > 0 {
            total.div_ceil(page_size as u64)
        } else {
            0
        };

        Self {
            results,
            current_page,
            page_size,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_result_total_pages() {
        assert_eq!(PagedResult::<u8>::new(vec![], 1, 10, 0).total_pages, 0);
        assert_eq!(PagedResult::<u8>::new(vec![], 1, 10, 10).total_pages, 1);
        assert_eq!(PagedResult::<u8>::new(vec![], 1, 10, 11).total_pages, 2);
    }

    #[test]
    fn test_search_request_sort_fallback() {
        let request = SearchRequest {
            sort_by: "no-such-field".to_string(),
            ..Default::default()
        };
        assert_eq!(request.into_query().sort_by, SortField::UploadedAt);
    }

    #[test]
    fn test_search_request_defaults() {
        let request = SearchRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 50);
        assert!(request.sort_descending);
    }
}
