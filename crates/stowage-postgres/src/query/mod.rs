//! Database query repositories.
//!
//! Repository traits provide high-level, type-safe database operations and
//! are implemented directly for [`PgClient`](crate::PgClient). Pagination
//! follows the query's 1-based page and page size via `LIMIT`/`OFFSET`.

mod document_index;

pub use document_index::DocumentIndexRepository;
