//! High-level database client with connection pooling.

use std::fmt;
use std::sync::Arc;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use tracing::{debug, info};

use crate::{PgConfig, PgError, PgResult, TRACING_TARGET_CLIENT, TRACING_TARGET_MIGRATION};

/// Connection pool over async PostgreSQL connections.
pub type ConnectionPool = Pool<AsyncPgConnection>;

/// A connection checked out from the pool.
pub type PooledConnection = Object<AsyncPgConnection>;

/// High-level database client that manages connections and migrations.
///
/// Cheap to clone; the pool is shared and read-only after construction.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// This establishes a connection pool but does not eagerly connect.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool configuration is invalid.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CLIENT,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        info!(target: TRACING_TARGET_CLIENT, "Initializing database client");

        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.postgres_url);

        let mut builder = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .runtime(deadpool::Runtime::Tokio1);

        if let Some(timeout) = config.connection_timeout() {
            builder = builder.wait_timeout(Some(timeout)).create_timeout(Some(timeout));
        }

        let pool = builder
            .build()
            .map_err(|e| PgError::Config(format!("Failed to create connection pool: {e}")))?;

        info!(
            target: TRACING_TARGET_CLIENT,
            max_connections = config.postgres_max_connections,
            "Database client initialized successfully"
        );

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Creates a new client and runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if pool creation or a migration fails.
    pub async fn new_with_migrations(config: PgConfig) -> PgResult<Self> {
        let client = Self::new(config)?;
        client.run_migrations().await?;
        Ok(client)
    }

    /// Checks a connection out of the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool is exhausted or the connection cannot be
    /// established.
    pub async fn get_connection(&self) -> PgResult<PooledConnection> {
        self.inner.pool.get().await.map_err(PgError::from)
    }

    /// Applies all pending embedded migrations.
    ///
    /// Runs on a blocking thread because the diesel migration harness drives
    /// a synchronous connection.
    ///
    /// # Errors
    ///
    /// Returns an error if connecting or applying a migration fails.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_MIGRATION)]
    pub async fn run_migrations(&self) -> PgResult<()> {
        let database_url = self.inner.config.postgres_url.clone();

        debug!(target: TRACING_TARGET_MIGRATION, "Running pending migrations");

        let applied = tokio::task::spawn_blocking(move || -> PgResult<usize> {
            use diesel::Connection;
            use diesel_migrations::MigrationHarness;

            let mut connection =
                diesel::PgConnection::establish(&database_url).map_err(PgError::Connection)?;

            let versions = connection
                .run_pending_migrations(crate::MIGRATIONS)
                .map_err(PgError::Migration)?;

            Ok(versions.len())
        })
        .await
        .map_err(|e| PgError::Unexpected(e.to_string().into()))??;

        info!(
            target: TRACING_TARGET_MIGRATION,
            applied = applied,
            "Migrations applied successfully"
        );

        Ok(())
    }

    /// Returns the configured maximum pool size.
    pub fn max_connections(&self) -> u32 {
        self.inner.config.postgres_max_connections
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field("max_connections", &self.inner.config.postgres_max_connections)
            .finish()
    }
}
