//! Gateway configuration.
//!
//! Settings are bound from flat environment variables (or CLI flags with the
//! `config` feature) and validated once at startup; the values they produce —
//! the encryption key in particular — are then threaded through constructors
//! as immutable values.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use stowage_core::crypto::{CryptoError, EncryptionKey};
use url::Url;

/// Configuration errors detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Encryption was enabled without a master key.
    #[error("Encryption is enabled but ENCRYPTION_MASTER_KEY is not configured")]
    MissingMasterKey,

    /// The master key failed to decode or has the wrong length.
    #[error("Invalid encryption master key: {0}")]
    InvalidMasterKey(#[from] CryptoError),

    /// Indexing was enabled without a database URL.
    #[error("Indexing is enabled but INDEXING_DATABASE_URL is not configured")]
    MissingDatabaseUrl,

    /// The storage endpoint is not a valid URL.
    #[error("Invalid storage endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Storage backend connection settings.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct StorageConfig {
    /// Storage endpoint URL
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-endpoint", env = "STORAGE_ENDPOINT")
    )]
    pub endpoint: String,

    /// Storage access key
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-access-key", env = "STORAGE_ACCESS_KEY")
    )]
    pub access_key: String,

    /// Storage secret key
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-secret-key", env = "STORAGE_SECRET_KEY")
    )]
    pub secret_key: String,

    /// Whether to use path-style addressing
    #[cfg_attr(
        feature = "config",
        arg(
            long = "storage-path-style",
            env = "STORAGE_PATH_STYLE",
            default_value = "true"
        )
    )]
    pub path_style: bool,
}

impl StorageConfig {
    /// Parses and validates the endpoint URL.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint(e.to_string()))
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &"****")
            .field("secret_key", &"****")
            .field("path_style", &self.path_style)
            .finish()
    }
}

/// At-rest encryption settings.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct EncryptionConfig {
    /// Enable or disable at-rest encryption globally
    #[cfg_attr(
        feature = "config",
        arg(
            long = "encryption-enabled",
            env = "ENCRYPTION_ENABLED",
            default_value = "false"
        )
    )]
    pub enabled: bool,

    /// Base64-encoded 256-bit master key, required when encryption is enabled
    #[cfg_attr(
        feature = "config",
        arg(long = "encryption-master-key", env = "ENCRYPTION_MASTER_KEY")
    )]
    pub master_key_base64: Option<String>,
}

impl EncryptionConfig {
    /// Returns a disabled encryption configuration.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            master_key_base64: None,
        }
    }

    /// Validates the settings and produces the process-wide key.
    ///
    /// Returns `None` when encryption is disabled.
    ///
    /// # Errors
    ///
    /// Fails when encryption is enabled without a key, or when the key is not
    /// valid base64 of exactly 32 bytes.
    pub fn master_key(&self) -> Result<Option<EncryptionKey>, ConfigError> {
        if !self.enabled {
            return Ok(None);
        }

        let encoded = self
            .master_key_base64
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingMasterKey)?;

        Ok(Some(EncryptionKey::from_base64(encoded)?))
    }
}

impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("enabled", &self.enabled)
            .field(
                "master_key_base64",
                &self.master_key_base64.as_ref().map(|_| "****"),
            )
            .finish()
    }
}

/// Document index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct IndexingConfig {
    /// Enable or disable document indexing globally
    #[cfg_attr(
        feature = "config",
        arg(
            long = "indexing-enabled",
            env = "INDEXING_ENABLED",
            default_value = "false"
        )
    )]
    pub enabled: bool,

    /// Index database connection URL, required when indexing is enabled
    #[cfg_attr(
        feature = "config",
        arg(long = "indexing-database-url", env = "INDEXING_DATABASE_URL")
    )]
    pub database_url: Option<String>,
}

impl IndexingConfig {
    /// Returns a disabled indexing configuration.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            database_url: None,
        }
    }

    /// Validates the settings and returns the database URL when indexing is
    /// enabled.
    pub fn require_database_url(&self) -> Result<Option<&str>, ConfigError> {
        if !self.enabled {
            return Ok(None);
        }

        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(Some)
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct GatewayConfig {
    /// Storage backend settings
    #[cfg_attr(feature = "config", command(flatten))]
    pub storage: StorageConfig,

    /// At-rest encryption settings
    #[cfg_attr(feature = "config", command(flatten))]
    pub encryption: EncryptionConfig,

    /// Document index settings
    #[cfg_attr(feature = "config", command(flatten))]
    pub indexing: IndexingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_encryption_has_no_key() {
        let config = EncryptionConfig::disabled();
        assert!(config.master_key().unwrap().is_none());
    }

    #[test]
    fn test_enabled_encryption_requires_key() {
        let config = EncryptionConfig {
            enabled: true,
            master_key_base64: None,
        };
        assert!(matches!(
            config.master_key(),
            Err(ConfigError::MissingMasterKey)
        ));
    }

    #[test]
    fn test_enabled_encryption_rejects_short_key() {
        use base64::Engine;
        let config = EncryptionConfig {
            enabled: true,
            master_key_base64: Some(
                base64::engine::general_purpose::STANDARD.encode([0u8; 16]),
            ),
        };
        assert!(matches!(
            config.master_key(),
            Err(ConfigError::InvalidMasterKey(_))
        ));
    }

    #[test]
    fn test_enabled_encryption_roundtrips_key() {
        let key = EncryptionKey::generate();
        let config = EncryptionConfig {
            enabled: true,
            master_key_base64: Some(key.to_base64()),
        };
        assert_eq!(config.master_key().unwrap(), Some(key));
    }

    #[test]
    fn test_indexing_requires_database_url() {
        let config = IndexingConfig {
            enabled: true,
            database_url: None,
        };
        assert!(matches!(
            config.require_database_url(),
            Err(ConfigError::MissingDatabaseUrl)
        ));

        assert!(
            IndexingConfig::disabled()
                .require_database_url()
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_storage_config_debug_masks_secrets() {
        let config = StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "supersecret".to_string(),
            path_style: true,
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("minioadmin"));
        assert!(!debug.contains("supersecret"));
    }
}
