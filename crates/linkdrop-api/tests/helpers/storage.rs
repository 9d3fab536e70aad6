//! Content store test double that counts calls before delegating.

use async_trait::async_trait;
use linkdrop_storage::{ByteStream, LocalStorage, Storage, StorageBackend, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct RecordingStorage {
    inner: LocalStorage,
    uploads: AtomicUsize,
    downloads: AtomicUsize,
    deletes: AtomicUsize,
}

impl RecordingStorage {
    pub fn new(inner: LocalStorage) -> Self {
        Self {
            inner,
            uploads: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.uploads() + self.downloads() + self.deletes()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.inner
            .upload_with_key(storage_key, data, content_type)
            .await
    }

    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.inner.download_stream(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
