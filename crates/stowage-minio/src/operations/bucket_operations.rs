//! Bucket operations for MinIO storage.

use minio::s3::types::S3Api;
use tracing::{debug, error, info, instrument};

use crate::{Error, MinioClient, Result, TRACING_TARGET_BUCKETS};

/// Bucket operations with a required MinIO client.
#[derive(Debug, Clone)]
pub struct BucketOperations {
    client: MinioClient,
}

impl BucketOperations {
    /// Creates new BucketOperations with a MinIO client.
    pub fn new(client: MinioClient) -> Self {
        Self { client }
    }

    /// Creates a new bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket creation fails.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket_name))]
    pub async fn create_bucket(&self, bucket_name: &str) -> Result<()> {
        debug!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket_name,
            "Creating bucket"
        );

        self.client
            .as_inner()
            .create_bucket(bucket_name)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    error = %e,
                    "Failed to create bucket"
                );
                Error::Client(e)
            })?;

        info!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket_name,
            "Bucket created successfully"
        );

        Ok(())
    }

    /// Checks if a bucket exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the existence check fails.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket_name))]
    pub async fn bucket_exists(&self, bucket_name: &str) -> Result<bool> {
        let response = self
            .client
            .as_inner()
            .bucket_exists(bucket_name)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket = %bucket_name,
                    error = %e,
                    "Failed to check bucket existence"
                );
                Error::Client(e)
            })?;

        debug!(
            target: TRACING_TARGET_BUCKETS,
            bucket = %bucket_name,
            exists = %response.exists,
            "Bucket existence check completed"
        );

        Ok(response.exists)
    }

    /// Creates the bucket if it does not already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the existence check or creation fails.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket_name))]
    pub async fn ensure_bucket(&self, bucket_name: &str) -> Result<()> {
        if self.bucket_exists(bucket_name).await? {
            return Ok(());
        }

        self.create_bucket(bucket_name).await
    }
}
