use crate::state::AppState;
use crate::views::{self, FormContext};
use axum::{extract::State, response::Html};
use std::sync::Arc;

/// Upload form plus a best-effort listing of recent uploads.
pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let recent = state
        .share_links
        .recent_uploads(state.config.recent_uploads_limit())
        .await;

    let validator = state.share_links.validator();
    let ctx = FormContext {
        max_file_size_bytes: validator.max_file_size(),
        allowed_extensions: validator.allowed_extensions(),
    };

    Html(views::home_page(&ctx, &recent))
}
