//! Domain models

pub mod download;
pub mod upload;

pub use download::DownloadEvent;
pub use upload::{IncomingFile, UploadRecord};
