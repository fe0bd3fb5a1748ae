//! The document index store contract.

use uuid::Uuid;

use super::entry::DocumentIndexEntry;
use super::error::IndexResult;
use super::query::DocumentIndexQuery;

/// Persistent catalogue of object metadata with filterable, paginated,
/// sortable search.
///
/// The `(bucket, key)` uniqueness invariant is enforced by implementations at
/// the storage layer. All write operations are atomic with respect to that
/// constraint; [`upsert`](Self::upsert) in particular must be a single
/// insert-or-update so two concurrent uploads of the same key cannot both
/// insert.
#[async_trait::async_trait]
pub trait DocumentIndexStore: Send + Sync {
    /// Fetches an entry by its generated id.
    async fn get_by_id(&self, id: Uuid) -> IndexResult<Option<DocumentIndexEntry>>;

    /// Fetches an entry by its natural `(bucket, key)` key.
    async fn get_by_bucket_and_key(
        &self,
        bucket: &str,
        key: &str,
    ) -> IndexResult<Option<DocumentIndexEntry>>;

    /// Returns the requested page of entries matching the query, ordered by
    /// its sort specification.
    async fn search(&self, query: &DocumentIndexQuery) -> IndexResult<Vec<DocumentIndexEntry>>;

    /// Returns the total number of entries matching the query's filters,
    /// ignoring pagination.
    async fn count(&self, query: &DocumentIndexQuery) -> IndexResult<u64>;

    /// Inserts a new entry.
    ///
    /// Fails with [`IndexError::Conflict`](super::IndexError::Conflict) if an
    /// entry for the same `(bucket, key)` already exists.
    async fn insert(&self, entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry>;

    /// Atomically inserts the entry, or — when `(bucket, key)` already
    /// exists — refreshes the existing row's size, content type, etag,
    /// encrypted flag, and last-modified timestamp in place.
    ///
    /// Existing id, `uploaded_at`, tags, and custom metadata are preserved on
    /// the update path. Returns the stored entry.
    async fn upsert(&self, entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry>;

    /// Replaces the stored entry with the given one, looked up by id, and
    /// refreshes its last-modified timestamp.
    ///
    /// Fails with [`IndexError::NotFound`](super::IndexError::NotFound) if
    /// the id is unknown.
    async fn update(&self, entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry>;

    /// Deletes an entry by id. Returns whether an entry existed.
    async fn delete_by_id(&self, id: Uuid) -> IndexResult<bool>;

    /// Deletes an entry by its natural key. Returns whether an entry existed.
    async fn delete_by_bucket_and_key(&self, bucket: &str, key: &str) -> IndexResult<bool>;
}
