use crate::error::{expose_details, log_error, status_of};
use crate::services::UploadOutcome;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use crate::views::{self, FormContext};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use linkdrop_core::{AppError, ErrorMetadata};
use std::sync::Arc;

/// Form post target. Always answers with an HTML page: the share link on
/// success, the error message and the form again on failure.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match accept_upload(&state, multipart).await {
        Ok(outcome) => (StatusCode::OK, Html(views::upload_success_page(&outcome))).into_response(),
        Err(err) => {
            log_error(&err);

            let details = expose_details(&err, state.config.is_production())
                .then(|| err.detailed_message());
            let validator = state.share_links.validator();
            let ctx = FormContext {
                max_file_size_bytes: validator.max_file_size(),
                allowed_extensions: validator.allowed_extensions(),
            };
            let page = views::upload_error_page(&ctx, &err.client_message(), details.as_deref());

            (status_of(&err), Html(page)).into_response()
        }
    }
}

async fn accept_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadOutcome, AppError> {
    let multipart = multipart.map_err(|rejection| {
        AppError::InvalidInput(format!("Expected a multipart form: {}", rejection.body_text()))
    })?;
    let max_file_size = state.share_links.validator().max_file_size();
    let file = extract_multipart_file(multipart, max_file_size).await?;
    state.share_links.upload(file).await
}
