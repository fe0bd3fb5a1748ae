//! MinIO authentication credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MinIO authentication credentials.
///
/// Encapsulates the access key and secret key required to connect to a MinIO
/// server. The secret is skipped during serialization and masked in debug
/// output.
#[derive(Clone, Serialize, Deserialize)]
pub struct MinioCredentials {
    /// Access key for MinIO authentication.
    pub access_key: String,

    /// Secret key for MinIO authentication.
    #[serde(skip_serializing)]
    pub secret_key: String,
}

impl MinioCredentials {
    /// Creates new MinIO credentials with access key and secret key.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Returns the access key.
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Returns the secret key.
    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Returns the access key with all but the first two characters masked.
    pub fn access_key_masked(&self) -> String {
        mask(&self.access_key)
    }

    /// Returns whether both keys are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.access_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }
}

fn mask(value: &str) -> String {
    if value.len() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", &value[..2])
    }
}

impl fmt::Debug for MinioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinioCredentials")
            .field("access_key", &self.access_key_masked())
            .field("secret_key", &"****")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_masks_secrets() {
        let credentials = MinioCredentials::new("minioadmin", "supersecret");
        let debug = format!("{:?}", credentials);

        assert!(!debug.contains("supersecret"));
        assert!(!debug.contains("minioadmin"));
        assert!(debug.contains("mi****"));
    }

    #[test]
    fn test_is_complete() {
        assert!(MinioCredentials::new("a", "b").is_complete());
        assert!(!MinioCredentials::new("", "b").is_complete());
        assert!(!MinioCredentials::new("a", " ").is_complete());
    }
}
