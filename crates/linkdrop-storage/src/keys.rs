//! Shared key generation for storage backends.
//!
//! Key format: `{uuid_v4}.{extension}`, the extension as the client sent it.

use crate::{StorageError, StorageResult};
use uuid::Uuid;

/// Generate a fresh storage key keeping the original file's extension.
///
/// `extension` is taken without the leading dot and its case is kept. An empty
/// extension yields a bare UUID.
pub fn generate_key(extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", Uuid::new_v4(), extension)
    }
}

/// Reject keys that are empty or could address anything outside a flat namespace.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }

    if storage_key.contains("..")
        || storage_key.contains('/')
        || storage_key.contains('\\')
        || storage_key.chars().any(char::is_control)
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    Ok(())
}
