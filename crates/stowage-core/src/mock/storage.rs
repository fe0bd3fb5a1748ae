//! HashMap-backed storage provider.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::storage::{ObjectInfo, StorageError, StorageProvider, StorageResult};

#[derive(Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
    metadata: HashMap<String, String>,
    etag: String,
    last_modified: OffsetDateTime,
}

impl StoredObject {
    fn info(&self, bucket: &str, key: &str) -> ObjectInfo {
        ObjectInfo::new(bucket, key, self.data.len() as u64, self.last_modified)
            .with_content_type(self.content_type.clone())
            .with_etag(self.etag.clone())
            .with_metadata(self.metadata.clone())
    }
}

/// In-memory [`StorageProvider`] for tests.
///
/// Buckets are created on demand by `upload`/`ensure_bucket`; every upload
/// gets a fresh synthetic etag so re-uploads are distinguishable. Presigned
/// URLs use a synthetic `memory://` scheme.
#[derive(Default)]
pub struct MemoryStorage {
    buckets: Mutex<HashMap<String, HashMap<String, StoredObject>>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of objects currently stored in `bucket`.
    pub fn object_count(&self, bucket: &str) -> usize {
        self.buckets
            .lock()
            .expect("memory storage lock poisoned")
            .get(bucket)
            .map_or(0, HashMap::len)
    }
}

#[async_trait::async_trait]
impl StorageProvider for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        content: Bytes,
        content_type: &str,
        metadata: Option<HashMap<String, String>>,
    ) -> StorageResult<ObjectInfo> {
        let metadata: HashMap<String, String> = metadata
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();

        let object = StoredObject {
            data: content,
            content_type: content_type.to_string(),
            metadata,
            etag: Uuid::new_v4().simple().to_string(),
            last_modified: OffsetDateTime::now_utc(),
        };

        let mut buckets = self.buckets.lock().expect("memory storage lock poisoned");
        let info = object.info(bucket, key);
        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), object);

        Ok(info)
    }

    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let buckets = self.buckets.lock().expect("memory storage lock poisoned");
        buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound(format!("{bucket}/{key}")))
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let mut buckets = self.buckets.lock().expect("memory storage lock poisoned");
        if let Some(objects) = buckets.get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }

    async fn get_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectInfo> {
        let buckets = self.buckets.lock().expect("memory storage lock poisoned");
        buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|object| object.info(bucket, key))
            .ok_or_else(|| StorageError::NotFound(format!("{bucket}/{key}")))
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        let buckets = self.buckets.lock().expect("memory storage lock poisoned");
        Ok(buckets
            .get(bucket)
            .is_some_and(|objects| objects.contains_key(key)))
    }

    async fn list(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<Vec<ObjectInfo>> {
        let buckets = self.buckets.lock().expect("memory storage lock poisoned");
        let mut objects: Vec<ObjectInfo> = buckets
            .get(bucket)
            .map(|objects| {
                objects
                    .iter()
                    .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
                    .map(|(key, object)| object.info(bucket, key))
                    .collect()
            })
            .unwrap_or_default();

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        expiry: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "memory://{bucket}/{key}?expires={}",
            expiry.as_secs()
        ))
    }

    async fn ensure_bucket(&self, bucket: &str) -> StorageResult<()> {
        let mut buckets = self.buckets.lock().expect("memory storage lock poisoned");
        buckets.entry(bucket.to_string()).or_default();
        Ok(())
    }
}
