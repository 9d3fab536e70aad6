//! Application services

pub mod share_link;

pub use share_link::{RecentUpload, ShareLinkService, UploadOutcome};
