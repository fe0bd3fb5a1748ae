//! Index-only document operations.

use std::collections::HashMap;
use std::sync::Arc;

use stowage_core::index::DocumentIndexStore;
use tracing::{error, info};
use uuid::Uuid;

use crate::TRACING_TARGET_INDEX;
use crate::error::ErrorCode;
use crate::result::ServiceResult;
use crate::types::{DocumentIndexDto, PagedResult, SearchRequest};

/// Runs a search against the index store and assembles the paged result.
///
/// Shared between [`DocumentIndexService::search`] and the orchestrator's
/// `search_index` operation.
pub(crate) async fn run_search(
    index: &dyn DocumentIndexStore,
    request: SearchRequest,
) -> ServiceResult<PagedResult<DocumentIndexDto>> {
    if request.page < 1 || request.page_size < 1 {
        return ServiceResult::fail(ErrorCode::InvalidPagination);
    }

    let query = request.into_query();

    let results = match index.search(&query).await {
        Ok(results) => results,
        Err(e) => {
            error!(target: TRACING_TARGET_INDEX, error = %e, "Failed to search document index");
            return ServiceResult::fail(ErrorCode::IndexQueryFailed);
        }
    };

    let total = match index.count(&query).await {
        Ok(total) => total,
        Err(e) => {
            error!(target: TRACING_TARGET_INDEX, error = %e, "Failed to count document index");
            return ServiceResult::fail(ErrorCode::IndexQueryFailed);
        }
    };

    let dtos = results.into_iter().map(DocumentIndexDto::from).collect();
    ServiceResult::ok(PagedResult::new(dtos, query.page, query.page_size, total))
}

/// Index-only operations: lookups, search, and user-managed tag/metadata
/// mutations.
///
/// Unlike the best-effort indexing inside upload and delete, these
/// operations have no storage-side counterpart to fall back to, so index
/// failures are returned to the caller.
pub struct DocumentIndexService {
    index: Arc<dyn DocumentIndexStore>,
}

impl DocumentIndexService {
    /// Creates a service over the given index store.
    pub fn new(index: Arc<dyn DocumentIndexStore>) -> Self {
        Self { index }
    }

    /// Fetches an entry by its generated id.
    pub async fn get_by_id(&self, id: Uuid) -> ServiceResult<DocumentIndexDto> {
        match self.index.get_by_id(id).await {
            Ok(Some(entry)) => ServiceResult::ok(entry.into()),
            Ok(None) => ServiceResult::fail(ErrorCode::IndexEntryNotFound),
            Err(e) => {
                error!(
                    target: TRACING_TARGET_INDEX,
                    entry_id = %id,
                    error = %e,
                    "Failed to get index entry by id"
                );
                ServiceResult::fail(ErrorCode::IndexQueryFailed)
            }
        }
    }

    /// Fetches an entry by its natural `(bucket, key)` key.
    pub async fn get_by_bucket_and_key(
        &self,
        bucket: &str,
        key: &str,
    ) -> ServiceResult<DocumentIndexDto> {
        match self.index.get_by_bucket_and_key(bucket, key).await {
            Ok(Some(entry)) => ServiceResult::ok(entry.into()),
            Ok(None) => ServiceResult::fail(ErrorCode::IndexEntryNotFound),
            Err(e) => {
                error!(
                    target: TRACING_TARGET_INDEX,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to get index entry"
                );
                ServiceResult::fail(ErrorCode::IndexQueryFailed)
            }
        }
    }

    /// Searches the index with filters, sorting, and pagination.
    pub async fn search(
        &self,
        request: SearchRequest,
    ) -> ServiceResult<PagedResult<DocumentIndexDto>> {
        run_search(self.index.as_ref(), request).await
    }

    /// Replaces an entry's tags wholesale and refreshes its last-modified
    /// timestamp.
    pub async fn update_tags(
        &self,
        id: Uuid,
        tags: HashMap<String, String>,
    ) -> ServiceResult<DocumentIndexDto> {
        let mut entry = match self.index.get_by_id(id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return ServiceResult::fail(ErrorCode::IndexEntryNotFound),
            Err(e) => {
                error!(
                    target: TRACING_TARGET_INDEX,
                    entry_id = %id,
                    error = %e,
                    "Failed to load index entry for tag update"
                );
                return ServiceResult::fail(ErrorCode::IndexQueryFailed);
            }
        };

        entry.tags = tags;

        match self.index.update(entry).await {
            Ok(updated) => {
                info!(
                    target: TRACING_TARGET_INDEX,
                    entry_id = %id,
                    "Updated tags for index entry"
                );
                ServiceResult::ok_with_message(updated.into(), "Tags updated successfully.")
            }
            Err(e) if e.is_not_found() => ServiceResult::fail(ErrorCode::IndexEntryNotFound),
            Err(e) => {
                error!(
                    target: TRACING_TARGET_INDEX,
                    entry_id = %id,
                    error = %e,
                    "Failed to update tags for index entry"
                );
                ServiceResult::fail(ErrorCode::IndexUpdateFailed)
            }
        }
    }

    /// Replaces an entry's custom metadata wholesale and refreshes its
    /// last-modified timestamp.
    pub async fn update_metadata(
        &self,
        id: Uuid,
        metadata: HashMap<String, String>,
    ) -> ServiceResult<DocumentIndexDto> {
        let mut entry = match self.index.get_by_id(id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return ServiceResult::fail(ErrorCode::IndexEntryNotFound),
            Err(e) => {
                error!(
                    target: TRACING_TARGET_INDEX,
                    entry_id = %id,
                    error = %e,
                    "Failed to load index entry for metadata update"
                );
                return ServiceResult::fail(ErrorCode::IndexQueryFailed);
            }
        };

        entry.custom_metadata = metadata;

        match self.index.update(entry).await {
            Ok(updated) => {
                info!(
                    target: TRACING_TARGET_INDEX,
                    entry_id = %id,
                    "Updated custom metadata for index entry"
                );
                ServiceResult::ok_with_message(updated.into(), "Metadata updated successfully.")
            }
            Err(e) if e.is_not_found() => ServiceResult::fail(ErrorCode::IndexEntryNotFound),
            Err(e) => {
                error!(
                    target: TRACING_TARGET_INDEX,
                    entry_id = %id,
                    error = %e,
                    "Failed to update metadata for index entry"
                );
                ServiceResult::fail(ErrorCode::IndexUpdateFailed)
            }
        }
    }
}
