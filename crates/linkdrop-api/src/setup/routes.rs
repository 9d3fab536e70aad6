//! Route configuration and setup.

use crate::constants::{request_body_limit, UPLOAD_PATH};
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use linkdrop_core::Config;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let body_limit = request_body_limit(config.max_file_size_bytes());
    tracing::debug!(body_limit, "Request body limit configured");

    Router::new()
        .route("/", get(handlers::home::home))
        .route("/ping", get(handlers::ping::ping))
        .route(UPLOAD_PATH, post(handlers::upload::upload))
        .route("/download/{key}", get(handlers::download::download))
        .route("/delete/{key}", post(handlers::delete::delete))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
