//! AES-256-GCM encryption and decryption.
//!
//! This module provides authenticated encryption using AES-256-GCM, which
//! combines the AES-256 block cipher in Galois/Counter Mode with a built-in
//! authentication tag (AEAD).
//!
//! # Wire Format
//!
//! The ciphertext format is: `nonce (12 bytes) || ciphertext || tag (16 bytes)`
//!
//! - **Nonce**: 12-byte random value, freshly generated for every encrypt call
//!   and never reused with the same key
//! - **Ciphertext**: Same length as plaintext (stream cipher, no padding)
//! - **Tag**: 16-byte authentication tag appended by the cipher

use aes_gcm::Aes256Gcm;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};

use super::error::{CryptoError, CryptoResult};
use super::key::EncryptionKey;

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Minimum size of valid ciphertext (nonce + tag, no plaintext).
pub const MIN_CIPHERTEXT_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Encrypts plaintext using AES-256-GCM.
///
/// Returns the ciphertext with the nonce prepended. The format is:
/// `nonce (12 bytes) || ciphertext || tag (16 bytes)`
///
/// # Arguments
///
/// * `key` - The 256-bit encryption key
/// * `plaintext` - The data to encrypt
///
/// # Returns
///
/// The encrypted ciphertext with nonce prepended, 28 bytes longer than the
/// plaintext.
pub fn encrypt(key: &EncryptionKey, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    // A fresh random nonce per call; reuse with the same key would break
    // confidentiality under GCM
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    // Prepend nonce to ciphertext
    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypts ciphertext encrypted with [`encrypt`].
///
/// Expects the ciphertext format: `nonce (12 bytes) || ciphertext || tag (16 bytes)`
///
/// # Arguments
///
/// * `key` - The 256-bit encryption key (must match the key used for encryption)
/// * `ciphertext` - The encrypted data with prepended nonce
///
/// # Returns
///
/// The decrypted plaintext.
///
/// # Errors
///
/// - [`CryptoError::CiphertextTooShort`] if the ciphertext is shorter than
///   nonce + tag; rejected before any parsing is attempted
/// - [`CryptoError::DecryptionFailed`] if the authentication check fails
///   (wrong key, corrupted data, or tampering)
pub fn decrypt(key: &EncryptionKey, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    if ciphertext.len() < MIN_CIPHERTEXT_SIZE {
        return Err(CryptoError::CiphertextTooShort);
    }

    let cipher = Aes256Gcm::new(key.as_bytes().into());

    // Split nonce and ciphertext
    let (nonce_bytes, encrypted) = ciphertext.split_at(NONCE_SIZE);
    let nonce = nonce_bytes.into();

    cipher
        .decrypt(nonce, encrypted)
        .map_err(|_| CryptoError::DecryptionFailed)
}
