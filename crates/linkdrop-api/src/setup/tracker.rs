//! Metadata tracker setup

use anyhow::{Context, Result};
use linkdrop_core::Config;
use linkdrop_db::{create_metadata_tracker, MetadataTracker};
use std::sync::Arc;

pub async fn setup_tracker(config: &Config) -> Result<Arc<dyn MetadataTracker>> {
    let tracker = create_metadata_tracker(config)
        .await
        .context("Failed to initialize metadata tracker")?;

    tracing::info!(backend = %tracker.backend_type(), "Metadata tracker initialized");

    Ok(tracker)
}
