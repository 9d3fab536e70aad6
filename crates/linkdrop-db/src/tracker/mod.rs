//! Metadata tracker trait and implementations

#[cfg(feature = "metadata-dynamodb")]
mod dynamodb;
mod memory;
#[cfg(feature = "metadata-postgres")]
mod postgres;

#[cfg(feature = "metadata-dynamodb")]
pub use dynamodb::DynamoMetadataTracker;
pub use memory::InMemoryMetadataTracker;
#[cfg(feature = "metadata-postgres")]
pub use postgres::PgMetadataTracker;

use linkdrop_core::{AppError, DownloadEvent, MetadataBackend, UploadRecord};

/// Record store for upload metadata and download audit events.
///
/// There is no transactional link with the Content Store. Callers sequence
/// the two and log when the second of a dependent pair fails.
#[async_trait::async_trait]
pub trait MetadataTracker: Send + Sync {
    /// Insert or replace the record for `record.key`.
    async fn track_upload(&self, record: &UploadRecord) -> Result<(), AppError>;

    /// Append an audit event. The key does not have to exist.
    async fn track_download(&self, event: &DownloadEvent) -> Result<(), AppError>;

    async fn get_metadata(&self, key: &str) -> Result<Option<UploadRecord>, AppError>;

    /// Remove the record for `key`. Removing a missing key is not an error.
    async fn remove_metadata(&self, key: &str) -> Result<(), AppError>;

    /// Newest records first, at most `limit` of them.
    async fn recent_uploads(&self, limit: usize) -> Result<Vec<UploadRecord>, AppError>;

    fn backend_type(&self) -> MetadataBackend;
}

/// Sort newest first and cut to `limit`. Shared by backends that scan.
pub(crate) fn newest_first(mut records: Vec<UploadRecord>, limit: usize) -> Vec<UploadRecord> {
    records.sort_by(|a, b| {
        b.uploaded_at
            .cmp(&a.uploaded_at)
            .then_with(|| a.key.cmp(&b.key))
    });
    records.truncate(limit);
    records
}
