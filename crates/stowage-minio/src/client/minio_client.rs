//! High-level MinIO client.

use std::sync::Arc;

use minio::s3::Client;
use minio::s3::creds::StaticProvider;
use minio::s3::types::S3Api;
use tracing::{debug, error, info, instrument};

use crate::operations::{BucketOperations, ObjectOperations};
use crate::{Error, MinioConfig, Result, TRACING_TARGET_CLIENT, TRACING_TARGET_OPERATIONS};

/// High-level MinIO client that manages connections and operations.
///
/// Cheap to clone; the underlying SDK client pools connections and is
/// read-only after construction.
#[derive(Clone)]
pub struct MinioClient {
    inner: Client,
    config: Arc<MinioConfig>,
}

impl MinioClient {
    /// Creates a new MinIO client with the provided configuration.
    ///
    /// This creates a client instance but does not test connectivity.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation or client initialization
    /// fails.
    #[instrument(skip(config), target = TRACING_TARGET_CLIENT, fields(endpoint = %config.endpoint_masked()))]
    pub fn new(config: MinioConfig) -> Result<Self> {
        info!(target: TRACING_TARGET_CLIENT, "Initializing MinIO client");

        config.validate().map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Configuration validation failed");
            e
        })?;

        let provider = StaticProvider::new(
            config.credentials().access_key(),
            config.credentials().secret_key(),
            None,
        );

        let endpoint = config.endpoint().to_string().parse().map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Invalid endpoint URL");
            Error::Config(format!("Invalid endpoint URL: {}", e))
        })?;

        let inner = Client::new(endpoint, Some(Box::new(provider)), None, None).map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Failed to create MinIO client");
            Error::Config(format!("Failed to build MinIO client: {}", e))
        })?;

        info!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %config.endpoint_masked(),
            secure = config.is_secure(),
            path_style = config.path_style,
            "MinIO client initialized successfully"
        );

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Creates a new MinIO client and verifies connectivity by listing
    /// buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization or the connectivity test fails.
    #[instrument(skip(config), target = TRACING_TARGET_CLIENT, fields(endpoint = %config.endpoint_masked()))]
    pub async fn new_with_test(config: MinioConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.test_connection().await?;
        Ok(client)
    }

    /// Tests the connection to the MinIO server by listing buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or rejects the
    /// credentials.
    #[instrument(skip(self), target = TRACING_TARGET_OPERATIONS)]
    pub async fn test_connection(&self) -> Result<()> {
        debug!(target: TRACING_TARGET_OPERATIONS, "Testing MinIO connection");

        let start = std::time::Instant::now();
        let result = self.inner.list_buckets().send().await;
        let elapsed = start.elapsed();

        match result {
            Ok(_) => {
                debug!(
                    target: TRACING_TARGET_OPERATIONS,
                    elapsed = ?elapsed,
                    "Connection test successful"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OPERATIONS,
                    error = %e,
                    elapsed = ?elapsed,
                    "Connection test failed"
                );
                Err(Error::Client(e))
            }
        }
    }

    /// Creates a new BucketOperations instance.
    pub fn bucket_operations(&self) -> BucketOperations {
        BucketOperations::new(self.clone())
    }

    /// Creates a new ObjectOperations instance.
    pub fn object_operations(&self) -> ObjectOperations {
        ObjectOperations::new(self.clone())
    }

    /// Returns a reference to the inner client.
    #[inline]
    pub(crate) fn as_inner(&self) -> &Client {
        &self.inner
    }
}

impl std::fmt::Debug for MinioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinioClient")
            .field("endpoint", &self.config.endpoint_masked())
            .field("secure", &self.config.is_secure())
            .field("path_style", &self.config.path_style)
            .field("access_key", &self.config.credentials().access_key_masked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::MinioCredentials;

    fn create_test_config() -> MinioConfig {
        let endpoint = Url::parse("http://localhost:9000").unwrap();
        let credentials = MinioCredentials::new("minioadmin", "minioadmin");
        MinioConfig::new(endpoint, credentials).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let config = create_test_config();
        let client = MinioClient::new(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_invalid_config() {
        let endpoint = Url::parse("http://localhost:9000").unwrap();
        let credentials = MinioCredentials::new("", "");
        let config = MinioConfig::new(endpoint, credentials).unwrap();

        let client = MinioClient::new(config);
        assert!(client.is_err());
    }

    #[test]
    fn test_client_debug_masks_credentials() {
        let config = create_test_config();
        let client = MinioClient::new(config).unwrap();
        let debug_str = format!("{:?}", client);

        assert!(debug_str.contains("MinioClient"));
        assert!(debug_str.contains("localhost:9000"));
        assert!(!debug_str.contains("minioadmin"));
    }
}
