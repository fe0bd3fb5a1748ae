//! Vec-backed document index store.

use std::sync::Mutex;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::index::{
    DocumentIndexEntry, DocumentIndexQuery, DocumentIndexStore, IndexError, IndexResult,
};

/// In-memory [`DocumentIndexStore`] for tests.
///
/// Entries are kept in insertion order, which doubles as the sort tie-break.
/// All mutations happen under one lock, so the upsert is atomic with respect
/// to the `(bucket, key)` uniqueness constraint just like the persistent
/// implementation.
#[derive(Default)]
pub struct MemoryIndexStore {
    entries: Mutex<Vec<DocumentIndexEntry>>,
}

impl MemoryIndexStore {
    /// Creates an empty in-memory index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("memory index lock poisoned").len()
    }

    /// Returns whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl DocumentIndexStore for MemoryIndexStore {
    async fn get_by_id(&self, id: Uuid) -> IndexResult<Option<DocumentIndexEntry>> {
        let entries = self.entries.lock().expect("memory index lock poisoned");
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn get_by_bucket_and_key(
        &self,
        bucket: &str,
        key: &str,
    ) -> IndexResult<Option<DocumentIndexEntry>> {
        let entries = self.entries.lock().expect("memory index lock poisoned");
        Ok(entries
            .iter()
            .find(|e| e.bucket == bucket && e.key == key)
            .cloned())
    }

    async fn search(&self, query: &DocumentIndexQuery) -> IndexResult<Vec<DocumentIndexEntry>> {
        let entries = self.entries.lock().expect("memory index lock poisoned");

        let mut matching: Vec<DocumentIndexEntry> =
            entries.iter().filter(|e| query.matches(e)).cloned().collect();

        // Stable sort keeps insertion order among ties
        matching.sort_by(|a, b| query.compare(a, b));

        Ok(matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect())
    }

    async fn count(&self, query: &DocumentIndexQuery) -> IndexResult<u64> {
        let entries = self.entries.lock().expect("memory index lock poisoned");
        Ok(entries.iter().filter(|e| query.matches(e)).count() as u64)
    }

    async fn insert(&self, entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry> {
        let mut entries = self.entries.lock().expect("memory index lock poisoned");

        if entries
            .iter()
            .any(|e| e.bucket == entry.bucket && e.key == entry.key)
        {
            return Err(IndexError::Conflict {
                bucket: entry.bucket,
                key: entry.key,
            });
        }

        entries.push(entry.clone());
        Ok(entry)
    }

    async fn upsert(&self, entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry> {
        let mut entries = self.entries.lock().expect("memory index lock poisoned");

        if let Some(existing) = entries
            .iter_mut()
            .find(|e| e.bucket == entry.bucket && e.key == entry.key)
        {
            // Refresh backend-reported fields; id, uploaded_at, tags, and
            // custom metadata survive the re-upload
            existing.size = entry.size;
            existing.content_type = entry.content_type;
            existing.etag = entry.etag;
            existing.is_encrypted = entry.is_encrypted;
            existing.last_modified = Some(OffsetDateTime::now_utc());
            Ok(existing.clone())
        } else {
            entries.push(entry.clone());
            Ok(entry)
        }
    }

    async fn update(&self, entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry> {
        let mut entries = self.entries.lock().expect("memory index lock poisoned");

        let position = entries
            .iter()
            .position(|e| e.id == entry.id)
            .ok_or(IndexError::NotFound)?;

        let mut updated = entry;
        updated.last_modified = Some(OffsetDateTime::now_utc());
        entries[position] = updated.clone();
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Uuid) -> IndexResult<bool> {
        let mut entries = self.entries.lock().expect("memory index lock poisoned");
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() != before)
    }

    async fn delete_by_bucket_and_key(&self, bucket: &str, key: &str) -> IndexResult<bool> {
        let mut entries = self.entries.lock().expect("memory index lock poisoned");
        let before = entries.len();
        entries.retain(|e| !(e.bucket == bucket && e.key == key));
        Ok(entries.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::index::SortField;

    use super::*;

    fn entry(bucket: &str, key: &str, size: i64) -> DocumentIndexEntry {
        DocumentIndexEntry::new(bucket, key)
            .with_content_type("text/plain")
            .with_size(size)
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryIndexStore::new();
        let inserted = store.insert(entry("docs", "a.txt", 5)).await.unwrap();

        let by_id = store.get_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(by_id.key, "a.txt");

        let by_key = store
            .get_by_bucket_and_key("docs", "a.txt")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_key.id, inserted.id);
    }

    #[tokio::test]
    async fn test_insert_duplicate_conflicts() {
        let store = MemoryIndexStore::new();
        store.insert(entry("docs", "a.txt", 5)).await.unwrap();

        let err = store.insert(entry("docs", "a.txt", 7)).await.unwrap_err();
        assert!(matches!(err, IndexError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_per_key() {
        let store = MemoryIndexStore::new();
        let first = store.upsert(entry("docs", "a.txt", 5)).await.unwrap();
        let second = store.upsert(entry("docs", "a.txt", 9)).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(second.id, first.id);
        assert_eq!(second.size, 9);
        assert!(second.last_modified.is_some());
        assert_eq!(second.uploaded_at, first.uploaded_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryIndexStore::new();
        let err = store.update(entry("docs", "a.txt", 5)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_refreshes_last_modified() {
        let store = MemoryIndexStore::new();
        let mut stored = store.insert(entry("docs", "a.txt", 5)).await.unwrap();

        stored.tags = HashMap::from([("env".to_string(), "prod".to_string())]);
        let updated = store.update(stored).await.unwrap();

        assert!(updated.last_modified.is_some());
        assert_eq!(updated.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_search_sorts_and_paginates() {
        let store = MemoryIndexStore::new();
        for (key, size) in [("a.txt", 30), ("b.txt", 10), ("c.txt", 20)] {
            store.insert(entry("docs", key, size)).await.unwrap();
        }

        let query = DocumentIndexQuery {
            sort_by: SortField::Size,
            sort_descending: false,
            page: 1,
            page_size: 2,
            ..Default::default()
        };

        let page1 = store.search(&query).await.unwrap();
        assert_eq!(
            page1.iter().map(|e| e.size).collect::<Vec<_>>(),
            vec![10, 20]
        );

        let page2 = store
            .search(&DocumentIndexQuery { page: 2, ..query.clone() })
            .await
            .unwrap();
        assert_eq!(page2.iter().map(|e| e.size).collect::<Vec<_>>(), vec![30]);

        assert_eq!(store.count(&query).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_by_bucket_and_key() {
        let store = MemoryIndexStore::new();
        store.insert(entry("docs", "a.txt", 5)).await.unwrap();

        assert!(store.delete_by_bucket_and_key("docs", "a.txt").await.unwrap());
        assert!(!store.delete_by_bucket_and_key("docs", "a.txt").await.unwrap());
        assert!(store.is_empty());
    }
}
