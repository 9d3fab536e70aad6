//! Expiring share-link workflow
//!
//! Orchestrates the validator, the Content Store and the Metadata Tracker:
//!
//! - upload: validate, store bytes under a fresh key, then record metadata
//! - download: look up metadata, gate on liveness, audit, then stream bytes
//! - delete: same gate, then remove the object and its record in that order
//!
//! The two stores are not transactional. When the second of two dependent
//! calls fails the first is left in place and an inconsistency warning is logged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use linkdrop_core::constants::ANONYMOUS_USER;
use linkdrop_core::validation::{file_extension, resolve_content_type};
use linkdrop_core::{
    AppError, Clock, DownloadEvent, FileValidator, IncomingFile, LinkState, ShareLinkPolicy,
    UploadRecord, ValidationError,
};
use linkdrop_db::MetadataTracker;
use linkdrop_storage::{generate_key, ByteStream, Storage};

use crate::utils::upload::sanitize_filename;

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub record: UploadRecord,
    pub expires_at: DateTime<Utc>,
}

impl UploadOutcome {
    pub fn share_path(&self) -> String {
        self.record.share_path()
    }
}

/// An entry of the recent uploads listing.
#[derive(Debug, Clone)]
pub struct RecentUpload {
    pub record: UploadRecord,
    pub state: LinkState,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ShareLinkService {
    validator: FileValidator,
    policy: ShareLinkPolicy,
    storage: Arc<dyn Storage>,
    tracker: Arc<dyn MetadataTracker>,
    clock: Arc<dyn Clock>,
}

impl ShareLinkService {
    pub fn new(
        validator: FileValidator,
        policy: ShareLinkPolicy,
        storage: Arc<dyn Storage>,
        tracker: Arc<dyn MetadataTracker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            validator,
            policy,
            storage,
            tracker,
            clock,
        }
    }

    pub fn validator(&self) -> &FileValidator {
        &self.validator
    }

    #[tracing::instrument(skip(self, file), fields(
        file_name = file.as_ref().map(|f| f.file_name.as_str()).unwrap_or(""),
        size_bytes = file.as_ref().map(|f| f.size()).unwrap_or(0)
    ))]
    pub async fn upload(&self, file: Option<IncomingFile>) -> Result<UploadOutcome, AppError> {
        let extension = self.validator.validate(file.as_ref()).map_err(|e| {
            tracing::info!(reason = e.reason(), error = %e, "Upload rejected");
            AppError::from(e)
        })?;
        let Some(file) = file else {
            return Err(ValidationError::Missing.into());
        };

        let key = generate_key(file_extension(&file.file_name).unwrap_or(&extension));
        let size_bytes = file.size();
        let content_type = resolve_content_type(file.content_type.as_deref(), &extension);
        let original_name = sanitize_filename(&file.file_name);

        self.storage
            .upload_with_key(&key, file.data, &content_type)
            .await?;
        tracing::debug!(key = %key, "Content stored");

        let record = UploadRecord {
            key: key.clone(),
            original_name,
            size_bytes,
            content_type,
            uploaded_at: self.clock.now(),
            uploaded_by: ANONYMOUS_USER.to_string(),
        };

        if let Err(e) = self.tracker.track_upload(&record).await {
            tracing::warn!(
                key = %key,
                error = %e,
                "Inconsistent state: content stored but upload metadata was not tracked"
            );
            return Err(e);
        }

        let expires_at = self.policy.expires_at(&record);
        tracing::info!(
            key = %key,
            size_bytes,
            expires_at = %expires_at,
            "Upload accepted"
        );

        Ok(UploadOutcome { record, expires_at })
    }

    /// Fetch the record for `key` and require it to be live.
    async fn live_record(&self, key: &str) -> Result<UploadRecord, AppError> {
        let record = self
            .tracker
            .get_metadata(key)
            .await?
            .ok_or_else(|| AppError::NotFound("Share link not found".to_string()))?;

        self.policy.ensure_live(&record, self.clock.now())?;
        Ok(record)
    }

    #[tracing::instrument(skip(self))]
    pub async fn download(&self, key: &str) -> Result<(UploadRecord, ByteStream), AppError> {
        let record = self.live_record(key).await.inspect_err(|e| {
            if matches!(e, AppError::Expired { .. }) {
                tracing::info!(key = %key, "Download refused: link expired");
            }
        })?;

        let event = DownloadEvent::new(key, ANONYMOUS_USER, self.clock.now());
        if let Err(e) = self.tracker.track_download(&event).await {
            tracing::warn!(key = %key, error = %e, "Failed to record download event");
        }

        let stream = self.storage.download_stream(key).await.map_err(|e| {
            let err = AppError::from(e);
            if matches!(err, AppError::NotFound(_)) {
                tracing::warn!(
                    key = %key,
                    "Inconsistent state: metadata present but content is missing"
                );
                AppError::NotFound("Shared file not found".to_string())
            } else {
                err
            }
        })?;

        tracing::info!(key = %key, size_bytes = record.size_bytes, "Download served");
        Ok((record, stream))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.live_record(key).await?;

        self.storage.delete(key).await?;

        if let Err(e) = self.tracker.remove_metadata(key).await {
            tracing::warn!(
                key = %key,
                error = %e,
                "Inconsistent state: content deleted but upload metadata remains"
            );
            return Err(e);
        }

        tracing::info!(key = %key, "Share link deleted");
        Ok(())
    }

    /// Newest uploads with their current link state. Failures yield an empty list.
    pub async fn recent_uploads(&self, limit: usize) -> Vec<RecentUpload> {
        if limit == 0 {
            return Vec::new();
        }

        let records = match self.tracker.recent_uploads(limit).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Recent uploads listing unavailable");
                return Vec::new();
            }
        };

        let now = self.clock.now();
        records
            .into_iter()
            .map(|record| RecentUpload {
                state: self.policy.state(&record, now),
                expires_at: self.policy.expires_at(&record),
                record,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use futures::StreamExt;
    use linkdrop_core::FixedClock;
    use linkdrop_db::InMemoryMetadataTracker;
    use linkdrop_storage::LocalStorage;
    use tempfile::TempDir;

    struct Fixture {
        service: ShareLinkService,
        clock: Arc<FixedClock>,
        tracker: Arc<InMemoryMetadataTracker>,
        dir: TempDir,
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap()
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let tracker = Arc::new(InMemoryMetadataTracker::new());
        let clock = Arc::new(FixedClock::new(t0()));
        let service = ShareLinkService::new(
            FileValidator::default(),
            ShareLinkPolicy::default(),
            storage,
            tracker.clone(),
            clock.clone(),
        );
        Fixture {
            service,
            clock,
            tracker,
            dir,
        }
    }

    fn png(bytes: &[u8]) -> Option<IncomingFile> {
        Some(IncomingFile::new(
            "My Photo.PNG",
            Some("image/png".to_string()),
            bytes.to_vec(),
        ))
    }

    async fn collect(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_upload_records_metadata() {
        let fx = fixture().await;
        let outcome = fx.service.upload(png(b"\x89PNGdata")).await.unwrap();

        assert!(outcome.record.key.ends_with(".PNG"));
        assert_eq!(outcome.record.original_name, "My_Photo.PNG");
        assert_eq!(outcome.record.content_type, "image/png");
        assert_eq!(outcome.record.size_bytes, 8);
        assert_eq!(outcome.record.uploaded_at, t0());
        assert_eq!(outcome.record.uploaded_by, "anonymous");
        assert_eq!(outcome.expires_at, t0() + Duration::minutes(10));
        assert_eq!(
            outcome.share_path(),
            format!("/download/{}", outcome.record.key)
        );

        let stored = fx
            .tracker
            .get_metadata(&outcome.record.key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, outcome.record);
        assert!(fx.dir.path().join(&outcome.record.key).exists());
    }

    #[tokio::test]
    async fn test_rejected_upload_touches_nothing() {
        let fx = fixture().await;
        let err = fx
            .service
            .upload(Some(IncomingFile::new("setup.exe", None, vec![1, 2, 3])))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::UnsupportedType { .. })
        ));

        let err = fx.service.upload(None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::Missing)));

        assert_eq!(fx.tracker.upload_count().await, 0);
        assert_eq!(std::fs::read_dir(fx.dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_within_ttl_returns_bytes_and_audits() {
        let fx = fixture().await;
        let outcome = fx.service.upload(png(b"same bytes")).await.unwrap();

        fx.clock.advance(Duration::minutes(10));
        let (record, stream) = fx.service.download(&outcome.record.key).await.unwrap();
        assert_eq!(record.content_type, "image/png");
        assert_eq!(collect(stream).await, b"same bytes");

        let events = fx.tracker.download_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, outcome.record.key);
        assert_eq!(events[0].downloaded_at, t0() + Duration::minutes(10));
    }

    #[tokio::test]
    async fn test_expired_link_is_refused_without_audit() {
        let fx = fixture().await;
        let outcome = fx.service.upload(png(b"bytes")).await.unwrap();

        fx.clock
            .advance(Duration::minutes(10) + Duration::milliseconds(1));
        let err = fx.service.download(&outcome.record.key).await.err().unwrap();
        assert!(matches!(err, AppError::Expired { .. }));
        assert!(fx.tracker.download_events().await.is_empty());

        let err = fx.service.delete(&outcome.record.key).await.unwrap_err();
        assert!(matches!(err, AppError::Expired { .. }));
        assert!(fx.dir.path().join(&outcome.record.key).exists());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let fx = fixture().await;
        let outcome = fx.service.upload(png(b"bytes")).await.unwrap();
        let key = outcome.record.key;

        fx.service.delete(&key).await.unwrap();
        assert!(!fx.dir.path().join(&key).exists());
        assert!(fx.tracker.get_metadata(&key).await.unwrap().is_none());

        let err = fx.service.delete(&key).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_content_is_not_found() {
        let fx = fixture().await;
        let outcome = fx.service.upload(png(b"bytes")).await.unwrap();
        std::fs::remove_file(fx.dir.path().join(&outcome.record.key)).unwrap();

        let err = fx.service.download(&outcome.record.key).await.err().unwrap();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recent_uploads_report_state() {
        let fx = fixture().await;
        let first = fx.service.upload(png(b"one")).await.unwrap();
        fx.clock.advance(Duration::minutes(8));
        let second = fx.service.upload(png(b"two")).await.unwrap();
        fx.clock.advance(Duration::minutes(3));

        let recent = fx.service.recent_uploads(10).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].record.key, second.record.key);
        assert_eq!(recent[0].state, LinkState::Active);
        assert_eq!(recent[1].record.key, first.record.key);
        assert_eq!(recent[1].state, LinkState::Expired);

        assert!(fx.service.recent_uploads(0).await.is_empty());
    }
}
