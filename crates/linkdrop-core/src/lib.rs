//! Linkdrop Core Library
//!
//! This crate provides the domain models, error types, configuration, upload
//! validation and share-link expiration rules shared by all Linkdrop crates.

pub mod backend_types;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod share_link;
pub mod validation;

// Re-export commonly used types
pub use backend_types::{MetadataBackend, StorageBackend};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BaseConfig, Config, LinkdropConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{DownloadEvent, IncomingFile, UploadRecord};
pub use share_link::{LinkState, ShareLinkPolicy};
pub use validation::{FileValidator, ValidationError};
