//! Content store setup

use anyhow::{Context, Result};
use linkdrop_core::Config;
use linkdrop_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize content storage")?;

    tracing::info!(backend = %storage.backend_type(), "Content storage initialized");

    Ok(storage)
}
