//! Document index row models for PostgreSQL database operations.

use std::collections::HashMap;

use diesel::prelude::*;
use stowage_core::index::DocumentIndexEntry;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::schema::document_index;

/// One persisted row of the document index.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = document_index)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentIndexRow {
    /// Unique entry identifier
    pub id: Uuid,
    /// Bucket of the mirrored object
    pub bucket: String,
    /// Key of the mirrored object
    pub key: String,
    /// File name derived from the key
    pub file_name: String,
    /// Content type of the stored object
    pub content_type: String,
    /// Stored size in bytes
    pub size: i64,
    /// ETag reported by the backend
    pub etag: Option<String>,
    /// Whether the payload is encrypted at rest
    pub is_encrypted: bool,
    /// Principal that uploaded the object
    pub uploaded_by: Option<String>,
    /// Timestamp of first indexing
    pub uploaded_at: OffsetDateTime,
    /// Timestamp of the latest index mutation
    pub last_modified: Option<OffsetDateTime>,
    /// User tags (JSON object of string pairs)
    pub tags: serde_json::Value,
    /// Free-form custom metadata (JSON object of string pairs)
    pub custom_metadata: serde_json::Value,
}

/// Data for inserting a new document index row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = document_index)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentIndexRow {
    /// Unique entry identifier
    pub id: Uuid,
    /// Bucket of the mirrored object
    pub bucket: String,
    /// Key of the mirrored object
    pub key: String,
    /// File name derived from the key
    pub file_name: String,
    /// Content type of the stored object
    pub content_type: String,
    /// Stored size in bytes
    pub size: i64,
    /// ETag reported by the backend
    pub etag: Option<String>,
    /// Whether the payload is encrypted at rest
    pub is_encrypted: bool,
    /// Principal that uploaded the object
    pub uploaded_by: Option<String>,
    /// Timestamp of first indexing
    pub uploaded_at: OffsetDateTime,
    /// Timestamp of the latest index mutation
    pub last_modified: Option<OffsetDateTime>,
    /// User tags
    pub tags: serde_json::Value,
    /// Free-form custom metadata
    pub custom_metadata: serde_json::Value,
}

/// Wholesale changes applied to an existing row, looked up by id.
///
/// `None` values for nullable columns are written as NULL so updates replace
/// the row rather than merge into it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = document_index, treat_none_as_null = true)]
pub struct UpdateDocumentIndexRow {
    /// Bucket of the mirrored object
    pub bucket: String,
    /// Key of the mirrored object
    pub key: String,
    /// File name derived from the key
    pub file_name: String,
    /// Content type of the stored object
    pub content_type: String,
    /// Stored size in bytes
    pub size: i64,
    /// ETag reported by the backend
    pub etag: Option<String>,
    /// Whether the payload is encrypted at rest
    pub is_encrypted: bool,
    /// Principal that uploaded the object
    pub uploaded_by: Option<String>,
    /// Timestamp of the latest index mutation
    pub last_modified: Option<OffsetDateTime>,
    /// User tags
    pub tags: serde_json::Value,
    /// Free-form custom metadata
    pub custom_metadata: serde_json::Value,
}

/// Converts a string map to its jsonb representation.
pub(crate) fn map_to_json(map: &HashMap<String, String>) -> serde_json::Value {
    serde_json::to_value(map).unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
}

/// Converts a jsonb object back to a string map.
///
/// Non-object values and non-string members are dropped rather than failing
/// the whole read; the index is a cache and a malformed document must not
/// poison lookups.
pub(crate) fn json_to_map(value: serde_json::Value) -> HashMap<String, String> {
    match value {
        serde_json::Value::Object(object) => object
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect(),
        _ => HashMap::new(),
    }
}

impl From<DocumentIndexRow> for DocumentIndexEntry {
    fn from(row: DocumentIndexRow) -> Self {
        Self {
            id: row.id,
            bucket: row.bucket,
            key: row.key,
            file_name: row.file_name,
            content_type: row.content_type,
            size: row.size,
            etag: row.etag,
            is_encrypted: row.is_encrypted,
            uploaded_by: row.uploaded_by,
            uploaded_at: row.uploaded_at,
            last_modified: row.last_modified,
            tags: json_to_map(row.tags),
            custom_metadata: json_to_map(row.custom_metadata),
        }
    }
}

impl From<&DocumentIndexEntry> for NewDocumentIndexRow {
    fn from(entry: &DocumentIndexEntry) -> Self {
        Self {
            id: entry.id,
            bucket: entry.bucket.clone(),
            key: entry.key.clone(),
            file_name: entry.file_name.clone(),
            content_type: entry.content_type.clone(),
            size: entry.size,
            etag: entry.etag.clone(),
            is_encrypted: entry.is_encrypted,
            uploaded_by: entry.uploaded_by.clone(),
            uploaded_at: entry.uploaded_at,
            last_modified: entry.last_modified,
            tags: map_to_json(&entry.tags),
            custom_metadata: map_to_json(&entry.custom_metadata),
        }
    }
}

impl From<&DocumentIndexEntry> for UpdateDocumentIndexRow {
    fn from(entry: &DocumentIndexEntry) -> Self {
        Self {
            bucket: entry.bucket.clone(),
            key: entry.key.clone(),
            file_name: entry.file_name.clone(),
            content_type: entry.content_type.clone(),
            size: entry.size,
            etag: entry.etag.clone(),
            is_encrypted: entry.is_encrypted,
            uploaded_by: entry.uploaded_by.clone(),
            last_modified: entry.last_modified,
            tags: map_to_json(&entry.tags),
            custom_metadata: map_to_json(&entry.custom_metadata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_json_roundtrip() {
        let map = HashMap::from([
            ("env".to_string(), "prod".to_string()),
            ("team".to_string(), "x".to_string()),
        ]);

        let value = map_to_json(&map);
        assert_eq!(json_to_map(value), map);
    }

    #[test]
    fn test_json_to_map_drops_non_string_members() {
        let value = serde_json::json!({"env": "prod", "count": 3, "nested": {"a": 1}});
        let map = json_to_map(value);
        assert_eq!(map, HashMap::from([("env".to_string(), "prod".to_string())]));
    }

    #[test]
    fn test_json_to_map_ignores_non_objects() {
        assert!(json_to_map(serde_json::json!([1, 2, 3])).is_empty());
        assert!(json_to_map(serde_json::Value::Null).is_empty());
    }

    #[test]
    fn test_entry_row_conversions() {
        let mut entry = DocumentIndexEntry::new("docs", "reports/q3.pdf")
            .with_content_type("application/pdf")
            .with_size(1024)
            .with_etag(Some("etag-1".to_string()))
            .with_encrypted(true);
        entry.tags.insert("env".into(), "prod".into());

        let row = NewDocumentIndexRow::from(&entry);
        assert_eq!(row.file_name, "q3.pdf");
        assert_eq!(row.tags, serde_json::json!({"env": "prod"}));
        assert!(row.is_encrypted);
    }
}
