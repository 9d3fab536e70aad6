//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod storage;
pub mod tracker;

use crate::services::ShareLinkService;
use crate::state::AppState;
use anyhow::{Context, Result};
use linkdrop_core::{Clock, Config, SystemClock};
use linkdrop_db::MetadataTracker;
use linkdrop_storage::Storage;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        metadata_backend = %config.metadata_backend(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;
    let tracker = tracker::setup_tracker(&config).await?;

    let state = build_state(config.clone(), storage, tracker, Arc::new(SystemClock));
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}

/// Wire injected collaborators into the shared state.
pub fn build_state(
    config: Config,
    storage: Arc<dyn Storage>,
    tracker: Arc<dyn MetadataTracker>,
    clock: Arc<dyn Clock>,
) -> Arc<AppState> {
    let share_links = ShareLinkService::new(
        config.file_validator(),
        config.share_link_policy(),
        storage,
        tracker,
        clock,
    );

    Arc::new(AppState::new(config, share_links))
}
