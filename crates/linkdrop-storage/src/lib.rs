//! Linkdrop Storage Library
//!
//! This crate provides the Content Store abstraction and its implementations.
//! It includes the Storage trait and implementations for S3 and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are flat: `{uuid}.{extension}`, e.g. `5f0c...e1.png`. The same key is the
//! share-link identity and the metadata record key. Keys must not contain `..`,
//! a `/` or a `\`. Key generation lives in the `keys` module so every backend
//! stays consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_key, validate_key};
pub use linkdrop_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
