//! Share-link expiration
//!
//! A key is live while `now <= uploaded_at + ttl`. The boundary instant is
//! still live. Download and delete both gate on [`ShareLinkPolicy::ensure_live`].

use chrono::{DateTime, Duration, Utc};

use crate::constants::DEFAULT_SHARE_LINK_TTL_SECS;
use crate::error::AppError;
use crate::models::UploadRecord;

/// Access state of a key that still has metadata.
///
/// A deleted key has no record at all and is reported as not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Active,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareLinkPolicy {
    ttl: Duration,
}

impl Default for ShareLinkPolicy {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_SHARE_LINK_TTL_SECS))
    }
}

impl ShareLinkPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn expires_at(&self, record: &UploadRecord) -> DateTime<Utc> {
        record.uploaded_at + self.ttl
    }

    pub fn is_live(&self, record: &UploadRecord, now: DateTime<Utc>) -> bool {
        now <= self.expires_at(record)
    }

    pub fn state(&self, record: &UploadRecord, now: DateTime<Utc>) -> LinkState {
        if self.is_live(record, now) {
            LinkState::Active
        } else {
            LinkState::Expired
        }
    }

    /// `Err(AppError::Expired)` once the TTL window has passed.
    pub fn ensure_live(&self, record: &UploadRecord, now: DateTime<Utc>) -> Result<(), AppError> {
        match self.state(record, now) {
            LinkState::Active => Ok(()),
            LinkState::Expired => Err(AppError::Expired {
                key: record.key.clone(),
                expired_at: self.expires_at(record),
            }),
        }
    }
}
