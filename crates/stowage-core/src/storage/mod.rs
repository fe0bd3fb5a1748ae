//! Object-storage contract and the encrypting decorator.
//!
//! [`StorageProvider`] is the capability set any backend must implement
//! (bucket/key CRUD, listing, presigned URLs). Concrete backends live in
//! their own crates; [`EncryptedStorage`] wraps any of them with transparent
//! at-rest encryption.

mod encrypted;
mod error;
mod object_info;
mod provider;

pub use encrypted::{ENCRYPTED_METADATA_KEY, ENCRYPTED_METADATA_VALUE, EncryptedStorage};
pub use error::{BoxedError, StorageError, StorageResult};
pub use object_info::ObjectInfo;
pub use provider::StorageProvider;
