//! Linkdrop API Library
//!
//! This crate provides the HTTP handlers, the share-link workflow service,
//! middleware, and application setup.

// Module declarations
mod handlers;
mod middleware;
mod telemetry;
mod utils;
mod views;

// Public modules
pub mod constants;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{RecentUpload, ShareLinkService, UploadOutcome};
pub use state::AppState;
