//! Bucket and object operations for MinIO storage.

mod bucket_operations;
mod object_operations;

pub use bucket_operations::BucketOperations;
pub use object_operations::{DownloadResult, ObjectOperations, UploadResult};
