//! [`DocumentIndexStore`] implementation for [`PgClient`].

use stowage_core::index::{
    DocumentIndexEntry, DocumentIndexQuery, DocumentIndexStore, IndexError, IndexResult,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::model::{NewDocumentIndexRow, UpdateDocumentIndexRow};
use crate::query::DocumentIndexRepository;
use crate::{PgClient, PgError};

fn conflict_or_store(error: PgError, bucket: &str, key: &str) -> IndexError {
    if error.is_unique_violation() {
        IndexError::Conflict {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    } else {
        store_error(error)
    }
}

fn store_error(error: PgError) -> IndexError {
    IndexError::store("document index query failed", error)
}

#[async_trait::async_trait]
impl DocumentIndexStore for PgClient {
    async fn get_by_id(&self, id: Uuid) -> IndexResult<Option<DocumentIndexEntry>> {
        let row = self.find_entry_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn get_by_bucket_and_key(
        &self,
        bucket: &str,
        key: &str,
    ) -> IndexResult<Option<DocumentIndexEntry>> {
        let row = self
            .find_entry_by_bucket_and_key(bucket, key)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn search(&self, query: &DocumentIndexQuery) -> IndexResult<Vec<DocumentIndexEntry>> {
        let rows = self.search_entries(query).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, query: &DocumentIndexQuery) -> IndexResult<u64> {
        let total = self.count_entries(query).await.map_err(store_error)?;
        Ok(total.max(0) as u64)
    }

    async fn insert(&self, entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry> {
        let row = self
            .create_entry(NewDocumentIndexRow::from(&entry))
            .await
            .map_err(|e| conflict_or_store(e, &entry.bucket, &entry.key))?;
        Ok(row.into())
    }

    async fn upsert(&self, entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry> {
        let row = self
            .upsert_entry(NewDocumentIndexRow::from(&entry))
            .await
            .map_err(store_error)?;
        Ok(row.into())
    }

    async fn update(&self, entry: DocumentIndexEntry) -> IndexResult<DocumentIndexEntry> {
        let mut changes = UpdateDocumentIndexRow::from(&entry);
        changes.last_modified = Some(OffsetDateTime::now_utc());

        let row = self
            .update_entry(entry.id, changes)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    IndexError::NotFound
                } else {
                    conflict_or_store(e, &entry.bucket, &entry.key)
                }
            })?;
        Ok(row.into())
    }

    async fn delete_by_id(&self, id: Uuid) -> IndexResult<bool> {
        let affected = self.delete_entry_by_id(id).await.map_err(store_error)?;
        Ok(affected > 0)
    }

    async fn delete_by_bucket_and_key(&self, bucket: &str, key: &str) -> IndexResult<bool> {
        let affected = self
            .delete_entry_by_bucket_and_key(bucket, key)
            .await
            .map_err(store_error)?;
        Ok(affected > 0)
    }
}
