//! MinIO client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use super::minio_credentials::MinioCredentials;
use crate::{Error, Result};

/// MinIO client configuration.
///
/// Contains the parameters needed to establish a connection to a MinIO
/// server: endpoint, credentials, and addressing style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinioConfig {
    /// MinIO server endpoint URL, including the scheme and optional port.
    ///
    /// Examples: "https://play.min.io", "http://localhost:9000"
    pub endpoint: Url,

    /// Authentication credentials.
    pub credentials: MinioCredentials,

    /// Whether to use path-style requests.
    ///
    /// When true, uses URLs like "endpoint/bucket/object".
    /// When false, uses virtual-hosted style like "bucket.endpoint/object".
    /// MinIO typically uses path-style requests.
    pub path_style: bool,
}

impl MinioConfig {
    /// Creates a new MinIO configuration with the specified endpoint and
    /// credentials.
    ///
    /// Plain-http endpoints are accepted for local and in-cluster
    /// deployments.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL has no hostname or an unsupported
    /// scheme.
    pub fn new(endpoint: Url, credentials: MinioCredentials) -> Result<Self> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Invalid endpoint scheme '{}', expected 'http' or 'https'",
                endpoint.scheme()
            )));
        }

        if endpoint.host().is_none() {
            return Err(Error::Config(
                "Endpoint must include a valid hostname".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            credentials,
            path_style: true,
        })
    }

    /// Sets whether to use path-style requests.
    pub fn with_path_style(mut self, path_style: bool) -> Self {
        self.path_style = path_style;
        self
    }

    /// Returns whether the endpoint uses TLS.
    pub fn is_secure(&self) -> bool {
        self.endpoint.scheme() == "https"
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the configured credentials.
    pub fn credentials(&self) -> &MinioCredentials {
        &self.credentials
    }

    /// Returns the endpoint without userinfo for safe logging.
    pub fn endpoint_masked(&self) -> String {
        let mut endpoint = self.endpoint.clone();
        let _ = endpoint.set_username("");
        let _ = endpoint.set_password(None);
        endpoint.to_string()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are incomplete.
    pub fn validate(&self) -> Result<()> {
        if !self.credentials.is_complete() {
            return Err(Error::Config(
                "Access key and secret key must both be set".to_string(),
            ));
        }
        Ok(())
    }
}
