//! Upload record model: one per share key, written once after the content is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata persisted for every successful upload.
///
/// `key` is both the share-link identity and the Content Store object key.
/// Records are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub key: String,
    pub original_name: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
}

impl UploadRecord {
    /// Share path served by the download route.
    pub fn share_path(&self) -> String {
        format!("/download/{}", self.key)
    }
}

/// A file received from a multipart form, before validation.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl IncomingFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
