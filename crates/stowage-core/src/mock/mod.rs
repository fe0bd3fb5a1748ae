//! In-memory implementations of the storage and index contracts for testing.
//!
//! These mocks implement the full contract semantics — including the
//! conjunctive tag predicate, sorting with insertion-order tie-break, and the
//! atomic upsert — so downstream crates can exercise the orchestration layer
//! without a live MinIO or PostgreSQL instance.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! stowage-core = { version = "...", features = ["test-utils"] }
//! ```

mod index;
mod storage;

pub use index::MemoryIndexStore;
pub use storage::MemoryStorage;
