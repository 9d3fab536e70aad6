//! Application state shared by all handlers.

use linkdrop_core::{AppError, Config};

use crate::error::HttpAppError;
use crate::services::ShareLinkService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub share_links: ShareLinkService,
}

impl AppState {
    pub fn new(config: Config, share_links: ShareLinkService) -> Self {
        Self {
            config,
            share_links,
        }
    }

    /// Wrap a workflow error for rendering under this app's environment.
    pub fn http_error(&self, error: AppError) -> HttpAppError {
        HttpAppError::new(error, self.config.is_production())
    }
}
