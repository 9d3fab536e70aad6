use std::collections::HashMap;

use linkdrop_core::{AppError, DownloadEvent, MetadataBackend, UploadRecord};
use tokio::sync::RwLock;

use super::{newest_first, MetadataTracker};

/// Process-local tracker. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryMetadataTracker {
    uploads: RwLock<HashMap<String, UploadRecord>>,
    downloads: RwLock<Vec<DownloadEvent>>,
}

impl InMemoryMetadataTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every download event appended so far, oldest first.
    pub async fn download_events(&self) -> Vec<DownloadEvent> {
        self.downloads.read().await.clone()
    }

    pub async fn upload_count(&self) -> usize {
        self.uploads.read().await.len()
    }
}

#[async_trait::async_trait]
impl MetadataTracker for InMemoryMetadataTracker {
    async fn track_upload(&self, record: &UploadRecord) -> Result<(), AppError> {
        self.uploads
            .write()
            .await
            .insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn track_download(&self, event: &DownloadEvent) -> Result<(), AppError> {
        self.downloads.write().await.push(event.clone());
        Ok(())
    }

    async fn get_metadata(&self, key: &str) -> Result<Option<UploadRecord>, AppError> {
        Ok(self.uploads.read().await.get(key).cloned())
    }

    async fn remove_metadata(&self, key: &str) -> Result<(), AppError> {
        self.uploads.write().await.remove(key);
        Ok(())
    }

    async fn recent_uploads(&self, limit: usize) -> Result<Vec<UploadRecord>, AppError> {
        let records = self.uploads.read().await.values().cloned().collect();
        Ok(newest_first(records, limit))
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::Memory
    }
}
