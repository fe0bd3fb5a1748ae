//! [`StorageProvider`] implementation backed by MinIO.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use stowage_core::storage::{ObjectInfo, StorageError, StorageProvider, StorageResult};

use crate::types::ObjectStat;
use crate::{BucketOperations, Error, MinioClient, ObjectOperations};

/// MinIO-backed implementation of the storage contract.
///
/// Any S3-compatible service reachable through the `minio` SDK works
/// unchanged. Uploads ensure the target bucket exists first, and `exists` is
/// answered by a stat call with not-found errors mapped to `false`.
#[derive(Debug, Clone)]
pub struct MinioStorage {
    buckets: BucketOperations,
    objects: ObjectOperations,
}

impl MinioStorage {
    /// Creates a provider from a connected client.
    pub fn new(client: MinioClient) -> Self {
        Self {
            buckets: client.bucket_operations(),
            objects: client.object_operations(),
        }
    }
}

fn object_info(bucket: &str, stat: ObjectStat) -> ObjectInfo {
    let mut info = ObjectInfo::new(bucket, stat.key, stat.size, stat.last_modified)
        .with_metadata(stat.metadata);
    if let Some(content_type) = stat.content_type {
        info = info.with_content_type(content_type);
    }
    if let Some(etag) = stat.etag {
        info = info.with_etag(etag);
    }
    info
}

fn map_error(context: &str, error: Error) -> StorageError {
    if error.is_not_found() {
        StorageError::NotFound(context.to_string())
    } else {
        StorageError::backend(format!("MinIO operation failed for {context}"), error)
    }
}

#[async_trait::async_trait]
impl StorageProvider for MinioStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        content: Bytes,
        content_type: &str,
        metadata: Option<HashMap<String, String>>,
    ) -> StorageResult<ObjectInfo> {
        self.buckets
            .ensure_bucket(bucket)
            .await
            .map_err(|e| map_error(bucket, e))?;

        let result = self
            .objects
            .upload_object(bucket, key, content, content_type, metadata.as_ref())
            .await
            .map_err(|e| map_error(&format!("{bucket}/{key}"), e))?;

        let metadata = metadata
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();

        Ok(
            ObjectInfo::new(bucket, key, result.size, time::OffsetDateTime::now_utc())
                .with_content_type(content_type)
                .with_etag(result.etag)
                .with_metadata(metadata),
        )
    }

    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let result = self
            .objects
            .download_object(bucket, key)
            .await
            .map_err(|e| map_error(&format!("{bucket}/{key}"), e))?;
        Ok(result.data)
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.objects
            .delete_object(bucket, key)
            .await
            .map_err(|e| map_error(&format!("{bucket}/{key}"), e))
    }

    async fn get_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectInfo> {
        let stat = self
            .objects
            .stat_object(bucket, key)
            .await
            .map_err(|e| map_error(&format!("{bucket}/{key}"), e))?;
        Ok(object_info(bucket, stat))
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        match self.objects.stat_object(bucket, key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(map_error(&format!("{bucket}/{key}"), e)),
        }
    }

    async fn list(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<Vec<ObjectInfo>> {
        let stats = self
            .objects
            .list_objects(bucket, prefix)
            .await
            .map_err(|e| map_error(bucket, e))?;

        Ok(stats
            .into_iter()
            .map(|stat| object_info(bucket, stat))
            .collect())
    }

    async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        expiry: Duration,
    ) -> StorageResult<String> {
        self.objects
            .presigned_get_url(bucket, key, expiry)
            .await
            .map_err(|e| map_error(&format!("{bucket}/{key}"), e))
    }

    async fn ensure_bucket(&self, bucket: &str) -> StorageResult<()> {
        self.buckets
            .ensure_bucket(bucket)
            .await
            .map_err(|e| map_error(bucket, e))
    }
}
