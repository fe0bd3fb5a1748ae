//! Document index repository.

use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable};
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use stowage_core::index::{DocumentIndexQuery, SortField};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::model::{DocumentIndexRow, NewDocumentIndexRow, UpdateDocumentIndexRow, map_to_json};
use crate::schema::document_index;
use crate::{PgClient, PgError, PgResult};

/// A dynamically composed filter over the document index table.
type DynPredicate = Box<dyn BoxableExpression<document_index::table, Pg, SqlType = Nullable<Bool>>>;

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(pattern: &str) -> String {
    pattern
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Builds the conjunctive filter predicate from every populated field of the
/// query.
///
/// Tag constraints use jsonb containment (`@>`), which requires every
/// supplied key to be present with an exactly matching value.
fn build_predicate(query: &DocumentIndexQuery) -> DynPredicate {
    use crate::schema::document_index::dsl;

    // Seed with an always-true condition so filters chain uniformly
    let mut predicate: DynPredicate = Box::new(dsl::id.is_not_null().nullable());

    if let Some(bucket) = &query.bucket {
        predicate = Box::new(predicate.and(dsl::bucket.eq(bucket.clone())));
    }

    if let Some(prefix) = &query.key_prefix {
        let pattern = format!("{}%", escape_like(prefix));
        predicate = Box::new(predicate.and(dsl::key.like(pattern)));
    }

    if let Some(file_name) = &query.file_name {
        let pattern = format!("%{}%", escape_like(file_name));
        predicate = Box::new(predicate.and(dsl::file_name.like(pattern)));
    }

    if let Some(content_type) = &query.content_type {
        predicate = Box::new(predicate.and(dsl::content_type.eq(content_type.clone())));
    }

    if let Some(uploaded_by) = &query.uploaded_by {
        predicate = Box::new(predicate.and(dsl::uploaded_by.eq(uploaded_by.clone())));
    }

    if let Some(from) = query.uploaded_from {
        predicate = Box::new(predicate.and(dsl::uploaded_at.ge(from)));
    }

    if let Some(to) = query.uploaded_to {
        predicate = Box::new(predicate.and(dsl::uploaded_at.le(to)));
    }

    if !query.tags.is_empty() {
        predicate = Box::new(predicate.and(dsl::tags.contains(map_to_json(&query.tags))));
    }

    predicate
}

/// Repository for document index database operations.
///
/// Handles entry lifecycle management: creation, the atomic upsert used by
/// the upload path, wholesale updates, filtered search with pagination, and
/// deletion by id or natural key.
pub trait DocumentIndexRepository {
    /// Creates a new index entry.
    fn create_entry(
        &self,
        entry: NewDocumentIndexRow,
    ) -> impl Future<Output = PgResult<DocumentIndexRow>> + Send;

    /// Atomically inserts the entry or refreshes the existing row with the
    /// same `(bucket, key)`.
    ///
    /// On conflict the row's size, content type, etag, and encrypted flag are
    /// taken from the new values and `last_modified` is stamped; id,
    /// `uploaded_at`, tags, and custom metadata are left untouched.
    fn upsert_entry(
        &self,
        entry: NewDocumentIndexRow,
    ) -> impl Future<Output = PgResult<DocumentIndexRow>> + Send;

    /// Finds an entry by its unique identifier.
    fn find_entry_by_id(
        &self,
        entry_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<DocumentIndexRow>>> + Send;

    /// Finds an entry by its natural `(bucket, key)` key.
    fn find_entry_by_bucket_and_key(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = PgResult<Option<DocumentIndexRow>>> + Send;

    /// Returns the requested page of entries matching the query.
    fn search_entries(
        &self,
        query: &DocumentIndexQuery,
    ) -> impl Future<Output = PgResult<Vec<DocumentIndexRow>>> + Send;

    /// Returns the total number of entries matching the query's filters,
    /// ignoring pagination.
    fn count_entries(&self, query: &DocumentIndexQuery)
    -> impl Future<Output = PgResult<i64>> + Send;

    /// Applies wholesale changes to the entry with the given id.
    fn update_entry(
        &self,
        entry_id: Uuid,
        changes: UpdateDocumentIndexRow,
    ) -> impl Future<Output = PgResult<DocumentIndexRow>> + Send;

    /// Deletes an entry by id. Returns the number of affected rows.
    fn delete_entry_by_id(&self, entry_id: Uuid) -> impl Future<Output = PgResult<usize>> + Send;

    /// Deletes an entry by its natural key. Returns the number of affected
    /// rows.
    fn delete_entry_by_bucket_and_key(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl DocumentIndexRepository for PgClient {
    async fn create_entry(&self, entry: NewDocumentIndexRow) -> PgResult<DocumentIndexRow> {
        let mut conn = self.get_connection().await?;

        let row = diesel::insert_into(document_index::table)
            .values(&entry)
            .returning(DocumentIndexRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn upsert_entry(&self, entry: NewDocumentIndexRow) -> PgResult<DocumentIndexRow> {
        let mut conn = self.get_connection().await?;

        use crate::schema::document_index::dsl;

        let row = diesel::insert_into(document_index::table)
            .values(&entry)
            .on_conflict((dsl::bucket, dsl::key))
            .do_update()
            .set((
                dsl::size.eq(excluded(dsl::size)),
                dsl::content_type.eq(excluded(dsl::content_type)),
                dsl::etag.eq(excluded(dsl::etag)),
                dsl::is_encrypted.eq(excluded(dsl::is_encrypted)),
                dsl::last_modified.eq(Some(OffsetDateTime::now_utc())),
            ))
            .returning(DocumentIndexRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn find_entry_by_id(&self, entry_id: Uuid) -> PgResult<Option<DocumentIndexRow>> {
        let mut conn = self.get_connection().await?;

        use crate::schema::document_index::dsl;

        let row = document_index::table
            .filter(dsl::id.eq(entry_id))
            .select(DocumentIndexRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn find_entry_by_bucket_and_key(
        &self,
        bucket: &str,
        key: &str,
    ) -> PgResult<Option<DocumentIndexRow>> {
        let mut conn = self.get_connection().await?;

        use crate::schema::document_index::dsl;

        let row = document_index::table
            .filter(dsl::bucket.eq(bucket))
            .filter(dsl::key.eq(key))
            .select(DocumentIndexRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn search_entries(&self, query: &DocumentIndexQuery) -> PgResult<Vec<DocumentIndexRow>> {
        let mut conn = self.get_connection().await?;

        use crate::schema::document_index::dsl;

        let mut stmt = document_index::table
            .filter(build_predicate(query))
            .select(DocumentIndexRow::as_select())
            .into_boxed();

        stmt = match (query.sort_by, query.sort_descending) {
            (SortField::FileName, false) => stmt.order(dsl::file_name.asc()),
            (SortField::FileName, true) => stmt.order(dsl::file_name.desc()),
            (SortField::Size, false) => stmt.order(dsl::size.asc()),
            (SortField::Size, true) => stmt.order(dsl::size.desc()),
            (SortField::ContentType, false) => stmt.order(dsl::content_type.asc()),
            (SortField::ContentType, true) => stmt.order(dsl::content_type.desc()),
            (SortField::UploadedAt, false) => stmt.order(dsl::uploaded_at.asc()),
            (SortField::UploadedAt, true) => stmt.order(dsl::uploaded_at.desc()),
        };

        let rows = stmt
            // Deterministic tie-break so pagination never skips or repeats
            .then_order_by(dsl::id.asc())
            .limit(query.limit())
            .offset(query.offset())
            .load(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn count_entries(&self, query: &DocumentIndexQuery) -> PgResult<i64> {
        let mut conn = self.get_connection().await?;

        let total = document_index::table
            .filter(build_predicate(query))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(total)
    }

    async fn update_entry(
        &self,
        entry_id: Uuid,
        changes: UpdateDocumentIndexRow,
    ) -> PgResult<DocumentIndexRow> {
        let mut conn = self.get_connection().await?;

        use crate::schema::document_index::dsl;

        let row = diesel::update(document_index::table.filter(dsl::id.eq(entry_id)))
            .set(&changes)
            .returning(DocumentIndexRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn delete_entry_by_id(&self, entry_id: Uuid) -> PgResult<usize> {
        let mut conn = self.get_connection().await?;

        use crate::schema::document_index::dsl;

        let affected = diesel::delete(document_index::table.filter(dsl::id.eq(entry_id)))
            .execute(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(affected)
    }

    async fn delete_entry_by_bucket_and_key(&self, bucket: &str, key: &str) -> PgResult<usize> {
        let mut conn = self.get_connection().await?;

        use crate::schema::document_index::dsl;

        let affected = diesel::delete(
            document_index::table
                .filter(dsl::bucket.eq(bucket))
                .filter(dsl::key.eq(key)),
        )
        .execute(&mut conn)
        .await
        .map_err(PgError::from)?;

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("50%_done\\"), "50\\%\\_done\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
