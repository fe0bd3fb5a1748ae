//! Process-wide symmetric encryption key.

use std::fmt;

use aes_gcm::Aes256Gcm;
use aes_gcm::aead::{KeyInit, OsRng};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::{CryptoError, CryptoResult};

/// Size of the encryption key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// A 256-bit symmetric key for AES-256-GCM.
///
/// The key is loaded once at process start and held immutable for the process
/// lifetime; it is never derived per-object. Key material is zeroed from
/// memory on drop and masked in debug output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    /// Generates a new random key from the operating system RNG.
    pub fn generate() -> Self {
        Self(Aes256Gcm::generate_key(OsRng).into())
    }

    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if `bytes` is not exactly
    /// 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(Self(bytes))
    }

    /// Creates a key from a base64-encoded string.
    ///
    /// This is the representation used in configuration
    /// (`ENCRYPTION_MASTER_KEY`).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyEncoding`] if the string is not valid
    /// base64, or [`CryptoError::InvalidKeyLength`] if the decoded key is not
    /// 32 bytes.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|_| CryptoError::InvalidKeyEncoding)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the base64 encoding of the key.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Returns the raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncryptionKey").field(&"********").finish()
    }
}
