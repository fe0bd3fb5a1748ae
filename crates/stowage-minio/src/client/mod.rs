//! MinIO client, configuration, and credentials.

mod minio_client;
mod minio_config;
mod minio_credentials;

pub use minio_client::MinioClient;
pub use minio_config::MinioConfig;
pub use minio_credentials::MinioCredentials;
