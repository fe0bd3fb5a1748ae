//! Object information reported by the MinIO backend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Information about one MinIO object as reported by stat or list calls.
///
/// User metadata keys are the bare names with the `x-amz-meta-` prefix
/// stripped and lowercased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStat {
    /// Object key/path.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modified timestamp.
    pub last_modified: OffsetDateTime,
    /// ETag of the object.
    pub etag: Option<String>,
    /// Content type/MIME type.
    pub content_type: Option<String>,
    /// User metadata.
    pub metadata: HashMap<String, String>,
}

impl ObjectStat {
    /// Creates a new ObjectStat.
    pub fn new(key: impl Into<String>, size: u64, last_modified: OffsetDateTime) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
            etag: None,
            content_type: None,
            metadata: HashMap::new(),
        }
    }

    /// Sets the ETag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets user metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}
