use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only audit entry written for each authorized download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEvent {
    pub key: String,
    pub downloaded_at: DateTime<Utc>,
    pub downloaded_by: String,
}

impl DownloadEvent {
    pub fn new(key: impl Into<String>, downloaded_by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            downloaded_at: at,
            downloaded_by: downloaded_by.into(),
        }
    }
}
