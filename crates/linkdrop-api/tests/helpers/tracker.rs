//! Metadata tracker test double with switchable failures.

use async_trait::async_trait;
use linkdrop_core::{AppError, DownloadEvent, MetadataBackend, UploadRecord};
use linkdrop_db::{InMemoryMetadataTracker, MetadataTracker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Internal text carried by every injected failure. Must never reach a client.
pub const INJECTED_FAILURE: &str = "ProvisionedThroughputExceeded: table Uploads throttled";

/// Delegates to an in-memory tracker unless the matching operation is set to fail.
pub struct FaultyTracker {
    inner: Arc<InMemoryMetadataTracker>,
    fail_track_upload: AtomicBool,
    fail_track_download: AtomicBool,
    fail_get_metadata: AtomicBool,
    fail_remove_metadata: AtomicBool,
}

impl FaultyTracker {
    pub fn new(inner: Arc<InMemoryMetadataTracker>) -> Self {
        Self {
            inner,
            fail_track_upload: AtomicBool::new(false),
            fail_track_download: AtomicBool::new(false),
            fail_get_metadata: AtomicBool::new(false),
            fail_remove_metadata: AtomicBool::new(false),
        }
    }

    pub fn fail_track_upload(&self, fail: bool) {
        self.fail_track_upload.store(fail, Ordering::SeqCst);
    }

    pub fn fail_track_download(&self, fail: bool) {
        self.fail_track_download.store(fail, Ordering::SeqCst);
    }

    pub fn fail_get_metadata(&self, fail: bool) {
        self.fail_get_metadata.store(fail, Ordering::SeqCst);
    }

    pub fn fail_remove_metadata(&self, fail: bool) {
        self.fail_remove_metadata.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> Result<(), AppError> {
        if flag.load(Ordering::SeqCst) {
            Err(AppError::MetadataStore(INJECTED_FAILURE.to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MetadataTracker for FaultyTracker {
    async fn track_upload(&self, record: &UploadRecord) -> Result<(), AppError> {
        Self::check(&self.fail_track_upload)?;
        self.inner.track_upload(record).await
    }

    async fn track_download(&self, event: &DownloadEvent) -> Result<(), AppError> {
        Self::check(&self.fail_track_download)?;
        self.inner.track_download(event).await
    }

    async fn get_metadata(&self, key: &str) -> Result<Option<UploadRecord>, AppError> {
        Self::check(&self.fail_get_metadata)?;
        self.inner.get_metadata(key).await
    }

    async fn remove_metadata(&self, key: &str) -> Result<(), AppError> {
        Self::check(&self.fail_remove_metadata)?;
        self.inner.remove_metadata(key).await
    }

    async fn recent_uploads(&self, limit: usize) -> Result<Vec<UploadRecord>, AppError> {
        self.inner.recent_uploads(limit).await
    }

    fn backend_type(&self) -> MetadataBackend {
        self.inner.backend_type()
    }
}
