//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Handler pattern:** return `Result<impl IntoResponse, HttpAppError>` and map
//! failures through `AppState::http_error` so every failure renders with the
//! same status, body, logging and configured detail posture.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use linkdrop_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    /// Build the caller-facing body. Details are only attached when `expose_details` is set.
    pub fn from_app_error(error: &AppError, expose_details: bool) -> Self {
        let (details, error_type) = if expose_details {
            (
                Some(error.detailed_message()),
                Some(error.error_type().to_string()),
            )
        } else {
            (None, None)
        };

        Self {
            error: error.client_message(),
            details,
            error_type,
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from linkdrop-core)
///
/// Carries the deployment posture so the body is rendered the way the
/// running app was configured.
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub is_production: bool,
}

impl HttpAppError {
    pub fn new(error: AppError, is_production: bool) -> Self {
        Self {
            error,
            is_production,
        }
    }
}

/// Log at the level the error declares. Sensitive errors carry their full chain.
pub(crate) fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                chain = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

/// Whether details may be shown: never in production, never for sensitive errors.
pub(crate) fn expose_details(error: &AppError, is_production: bool) -> bool {
    !is_production && !error.is_sensitive()
}

pub(crate) fn status_of(error: &AppError) -> StatusCode {
    StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;
        let status = status_of(app_error);

        log_error(app_error);

        let body = ErrorResponse::from_app_error(
            app_error,
            expose_details(app_error, self.is_production),
        );

        (status, Json(body)).into_response()
    }
}
