//! Object operations for MinIO storage.
//!
//! Upload, download, stat, deletion, listing, and presigned URL generation,
//! with user metadata carried as `x-amz-meta-*` headers.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use http::Method;
use minio::s3::multimap::Multimap;
use minio::s3::types::{S3Api, ToStream};
use time::OffsetDateTime;
use tracing::{debug, error, info, instrument};

use crate::types::ObjectStat;
use crate::{Error, MinioClient, Result, TRACING_TARGET_OBJECTS};

/// Prefix under which S3-compatible backends expose user metadata headers.
const USER_METADATA_PREFIX: &str = "x-amz-meta-";

/// Result of an upload operation.
#[derive(Debug, Clone)]
pub struct UploadResult {
    /// Object key/path that was uploaded.
    pub key: String,
    /// Size of the uploaded object in bytes.
    pub size: u64,
    /// ETag of the uploaded object.
    pub etag: String,
}

/// Result of a download operation.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// Raw object payload.
    pub data: Bytes,
    /// Content type of the downloaded object.
    pub content_type: Option<String>,
    /// User metadata of the downloaded object.
    pub metadata: HashMap<String, String>,
}

/// Object operations with a required MinIO client.
#[derive(Debug, Clone)]
pub struct ObjectOperations {
    client: MinioClient,
}

impl ObjectOperations {
    /// Creates new ObjectOperations with a MinIO client.
    pub fn new(client: MinioClient) -> Self {
        Self { client }
    }

    /// Uploads an object to MinIO storage.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Name of the bucket
    /// * `key` - Object key/path
    /// * `data` - Object payload
    /// * `content_type` - MIME type to store with the object
    /// * `metadata` - User metadata, sent as `x-amz-meta-*` headers
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, data, metadata), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
        metadata: Option<&HashMap<String, String>>,
    ) -> Result<UploadResult> {
        let size = data.len() as u64;

        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = %size,
            "Uploading object"
        );

        let user_metadata = metadata.filter(|m| !m.is_empty()).map(|m| {
            let mut multimap = Multimap::new();
            for (meta_key, value) in m {
                multimap.insert(meta_key.to_ascii_lowercase(), value.clone());
            }
            multimap
        });

        let start = std::time::Instant::now();

        let result = self
            .client
            .as_inner()
            .put_object_content(bucket, key, data)
            .content_type(content_type.to_string())
            .user_metadata(user_metadata)
            .send()
            .await
            .map_err(Error::Client);

        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                let etag = response.etag;

                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    size = %size,
                    etag = %etag,
                    elapsed = ?elapsed,
                    "Object uploaded successfully"
                );

                Ok(UploadResult {
                    key: key.to_string(),
                    size,
                    etag,
                })
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to upload object"
                );
                Err(e)
            }
        }
    }

    /// Downloads an object from MinIO storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails or the object doesn't exist.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn download_object(&self, bucket: &str, key: &str) -> Result<DownloadResult> {
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            "Downloading object"
        );

        let start = std::time::Instant::now();

        let response = self
            .client
            .as_inner()
            .get_object(bucket, key)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to download object"
                );
                Error::Client(e)
            })?;

        // Extract headers before consuming the response body
        let content_type = response
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let metadata = user_metadata_from_headers(&response.headers);

        let segmented = response
            .content
            .to_segmented_bytes()
            .await
            .map_err(Error::Io)?;
        let data = segmented.to_bytes();

        info!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            size = data.len(),
            elapsed = ?start.elapsed(),
            "Object downloaded successfully"
        );

        Ok(DownloadResult {
            data,
            content_type,
            metadata,
        })
    }

    /// Gets metadata about an object without downloading it.
    ///
    /// # Errors
    ///
    /// Returns an error if the object doesn't exist or the stat fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn stat_object(&self, bucket: &str, key: &str) -> Result<ObjectStat> {
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            "Getting object info"
        );

        let response = self
            .client
            .as_inner()
            .stat_object(bucket, key)
            .send()
            .await
            .map_err(Error::Client)?;

        let size = response.size as u64;

        let last_modified = response
            .last_modified
            .and_then(|dt| OffsetDateTime::from_unix_timestamp(dt.timestamp()).ok())
            .unwrap_or_else(OffsetDateTime::now_utc);

        let mut stat = ObjectStat::new(key, size, last_modified).with_etag(response.etag);

        if let Some(content_type) = response
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
        {
            stat = stat.with_content_type(content_type);
        }

        stat = stat.with_metadata(user_metadata_from_headers(&response.headers));

        Ok(stat)
    }

    /// Deletes an object from MinIO storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            "Deleting object"
        );

        self.client
            .as_inner()
            .delete_object(bucket, key)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    key = %key,
                    error = %e,
                    "Failed to delete object"
                );
                Error::Client(e)
            })?;

        info!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            "Object deleted successfully"
        );

        Ok(())
    }

    /// Lists objects in a bucket with optional prefix filtering.
    ///
    /// Drains every listing page so the returned vector is the complete
    /// result, not just the first batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket))]
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectStat>> {
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            prefix = ?prefix,
            "Listing objects"
        );

        let mut list_request = self.client.as_inner().list_objects(bucket);

        if let Some(p) = prefix {
            list_request = list_request.prefix(Some(p.to_string()));
        }

        let mut stream = list_request.to_stream().await;
        let mut objects = Vec::new();

        while let Some(result) = stream.next().await {
            let response = result.map_err(|e| {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket = %bucket,
                    error = %e,
                    "Failed to list objects"
                );
                Error::Client(e)
            })?;

            for item in response.contents {
                let size = item.size.unwrap_or(0) as u64;

                let last_modified = item
                    .last_modified
                    .and_then(|dt| OffsetDateTime::from_unix_timestamp(dt.timestamp()).ok())
                    .unwrap_or_else(OffsetDateTime::now_utc);

                let mut stat = ObjectStat::new(item.name, size, last_modified);
                if let Some(etag) = item.etag {
                    stat = stat.with_etag(etag);
                }

                objects.push(stat);
            }
        }

        info!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            count = objects.len(),
            "Objects listed successfully"
        );

        Ok(objects)
    }

    /// Generates a presigned GET URL for temporary credential-free access.
    ///
    /// # Errors
    ///
    /// Returns an error if URL generation fails.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expiry: Duration,
    ) -> Result<String> {
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket = %bucket,
            key = %key,
            expiry_secs = expiry.as_secs(),
            "Generating presigned URL"
        );

        let response = self
            .client
            .as_inner()
            .get_presigned_object_url(bucket, key, Method::GET)
            .expiry_seconds(expiry.as_secs() as u32)
            .send()
            .await
            .map_err(Error::Client)?;

        Ok(response.url)
    }
}

/// Extracts user metadata from `x-amz-meta-*` response headers.
///
/// Keys are returned bare (prefix stripped) and lowercased.
fn user_metadata_from_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(header_key, value)| {
            let meta_key = header_key
                .as_str()
                .to_ascii_lowercase()
                .strip_prefix(USER_METADATA_PREFIX)?
                .to_string();
            let value = value.to_str().ok()?.to_string();
            Some((meta_key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_metadata_extraction() {
        let mut headers = http::HeaderMap::new();
        headers.insert("content-type", "text/plain".parse().unwrap());
        headers.insert("x-amz-meta-department", "finance".parse().unwrap());
        headers.insert("x-amz-meta-x-encrypted", "true".parse().unwrap());

        let metadata = user_metadata_from_headers(&headers);

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("department").map(String::as_str), Some("finance"));
        assert_eq!(metadata.get("x-encrypted").map(String::as_str), Some("true"));
        assert!(!metadata.contains_key("content-type"));
    }
}
