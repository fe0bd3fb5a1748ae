#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Embeds all migrations into the final binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

// Tracing target constants for consistent logging.

/// Tracing target for client and connection operations.
pub const TRACING_TARGET_CLIENT: &str = "stowage_postgres::client";

/// Tracing target for database query operations.
pub const TRACING_TARGET_QUERY: &str = "stowage_postgres::query";

/// Tracing target for database migration operations.
pub const TRACING_TARGET_MIGRATION: &str = "stowage_postgres::migrations";

mod client;
mod error;
pub mod model;
pub mod query;
mod schema;
mod store;

pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{ConnectionPool, PgClient, PgConfig, PooledConnection};
pub use crate::error::{PgError, PgResult};
pub use crate::query::DocumentIndexRepository;
