//! Object information reported by storage backends.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Backend-reported truth about one stored object.
///
/// Not owned by the gateway; always fetched fresh from the backend. Metadata
/// keys are normalized to lowercase by providers so lookups behave
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Bucket the object lives in.
    pub bucket: String,
    /// Object key/path.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Content type/MIME type.
    pub content_type: Option<String>,
    /// ETag of the object (backend-assigned opaque integrity token).
    pub etag: Option<String>,
    /// Last modified timestamp.
    pub last_modified: OffsetDateTime,
    /// Backend-specific object metadata.
    pub metadata: HashMap<String, String>,
}

impl ObjectInfo {
    /// Creates a new ObjectInfo.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        size: u64,
        last_modified: OffsetDateTime,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size,
            content_type: None,
            etag: None,
            last_modified,
            metadata: HashMap::new(),
        }
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the ETag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Sets metadata, normalizing keys to lowercase.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_keys_normalized() {
        let mut metadata = HashMap::new();
        metadata.insert("X-Encrypted".to_string(), "true".to_string());

        let info = ObjectInfo::new("docs", "a.txt", 5, OffsetDateTime::now_utc())
            .with_metadata(metadata);

        assert_eq!(info.metadata.get("x-encrypted").map(String::as_str), Some("true"));
    }
}
