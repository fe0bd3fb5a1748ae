//! At-rest encryption codec for stored payloads.
//!
//! This module provides authenticated encryption using AES-256-GCM, suitable
//! for transparently encrypting object payloads before they reach a storage
//! backend. It is the single correctness-critical primitive in the gateway:
//! everything else composes it through the [`EncryptedStorage`] decorator and
//! never re-implements any part of it.
//!
//! # Example
//!
//! ```rust,ignore
//! use stowage_core::crypto::{EncryptionKey, encrypt, decrypt};
//!
//! // Generate a new random key
//! let key = EncryptionKey::generate();
//!
//! // Encrypt some data
//! let plaintext = b"document body";
//! let ciphertext = encrypt(&key, plaintext)?;
//!
//! // Decrypt the data
//! let decrypted = decrypt(&key, &ciphertext)?;
//! assert_eq!(plaintext, decrypted.as_slice());
//! ```
//!
//! [`EncryptedStorage`]: crate::storage::EncryptedStorage

mod cipher;
mod error;
mod key;

pub use cipher::{MIN_CIPHERTEXT_SIZE, NONCE_SIZE, TAG_SIZE, decrypt, encrypt};
pub use error::{CryptoError, CryptoResult};
pub use key::{KEY_SIZE, EncryptionKey};
