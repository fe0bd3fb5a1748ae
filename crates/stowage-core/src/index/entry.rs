//! Document index entry type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Returns the file name portion of an object key (its last path segment).
pub fn file_name_of(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// A denormalized, independently-persisted record mirroring one storage
/// object, annotated with user-managed tags and metadata.
///
/// The `(bucket, key)` pair is unique across all entries. Entries are created
/// or upserted after a successful upload, mutated by tag/metadata updates and
/// re-uploads, and deleted best-effort after an object delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentIndexEntry {
    /// Globally unique identifier, generated at first indexing.
    pub id: Uuid,
    /// Bucket of the mirrored object.
    pub bucket: String,
    /// Key of the mirrored object.
    pub key: String,
    /// File name derived from the key's last path segment.
    pub file_name: String,
    /// Content type of the stored object.
    pub content_type: String,
    /// Stored size in bytes, as reported by the backend.
    pub size: i64,
    /// ETag reported by the backend.
    pub etag: Option<String>,
    /// Whether the stored payload is encrypted at rest.
    pub is_encrypted: bool,
    /// Principal that uploaded the object, if known.
    pub uploaded_by: Option<String>,
    /// Set once at entry creation.
    pub uploaded_at: OffsetDateTime,
    /// Updated on every index mutation.
    pub last_modified: Option<OffsetDateTime>,
    /// Key-value tags for categorization and filtering.
    pub tags: HashMap<String, String>,
    /// Free-form custom metadata, not used in filter predicates.
    pub custom_metadata: HashMap<String, String>,
}

impl DocumentIndexEntry {
    /// Creates a new entry for a freshly uploaded object.
    ///
    /// Generates a fresh id, derives the file name from the key, stamps
    /// `uploaded_at` with the current time, and starts with empty tags.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            id: Uuid::new_v4(),
            bucket: bucket.into(),
            file_name: file_name_of(&key).to_string(),
            key,
            content_type: String::new(),
            size: 0,
            etag: None,
            is_encrypted: false,
            uploaded_by: None,
            uploaded_at: OffsetDateTime::now_utc(),
            last_modified: None,
            tags: HashMap::new(),
            custom_metadata: HashMap::new(),
        }
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the stored size.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    /// Sets the ETag.
    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }

    /// Sets the encrypted-at-rest flag.
    pub fn with_encrypted(mut self, is_encrypted: bool) -> Self {
        self.is_encrypted = is_encrypted;
        self
    }

    /// Sets the uploading principal.
    pub fn with_uploaded_by(mut self, uploaded_by: Option<String>) -> Self {
        self.uploaded_by = uploaded_by;
        self
    }

    /// Sets the custom metadata map.
    pub fn with_custom_metadata(mut self, custom_metadata: HashMap<String, String>) -> Self {
        self.custom_metadata = custom_metadata;
        self
    }
}
