//! Common utilities for the upload handler

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use linkdrop_core::{AppError, IncomingFile, ValidationError};

use crate::constants::UPLOAD_FIELD_NAME;

const MAX_FILENAME_LENGTH: usize = 255;

/// Extract the file from a multipart form.
///
/// Returns `Ok(None)` when no field named "file" is present. A browser form
/// submitted without choosing a file sends an empty part, which is returned
/// as-is and later rejected by the validator as missing. Only one file field
/// is accepted.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    max_file_size: u64,
) -> Result<Option<IncomingFile>, AppError> {
    let mut file: Option<IncomingFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let file_name = field.file_name().map(String::from).unwrap_or_default();
        let content_type = field.content_type().map(String::from);

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_file_size))?;

        file = Some(IncomingFile::new(file_name, content_type, data.to_vec()));
    }

    Ok(file)
}

/// Body-limit failures surface as `TooLarge`; anything else is malformed input.
fn multipart_error(err: MultipartError, max_file_size: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(ValidationError::TooLarge {
            size: crate::constants::request_body_limit(max_file_size) as u64,
            max: max_file_size,
        })
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Sanitize a client-supplied filename for storage in metadata and headers.
///
/// Directory components are dropped and anything outside `[A-Za-z0-9._-]`
/// becomes `_`. Names left with nothing readable become `file`.
pub fn sanitize_filename(filename: &str) -> String {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_start_matches('.');
    if !sanitized.chars().any(|c| c.is_ascii_alphanumeric()) {
        return "file".to_string();
    }

    sanitized.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cat.jpg"), "cat.jpg");
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
    }

    #[test]
    fn sanitize_filename_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename("quote\"name.webp"), "quote_name.webp");
        assert_eq!(sanitize_filename("café.jpg"), "caf_.jpg");
    }

    #[test]
    fn sanitize_filename_falls_back_when_nothing_is_left() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename(".."), "file");
        assert_eq!(sanitize_filename("???"), "file");
    }

    #[test]
    fn sanitize_filename_accepts_valid_names() {
        assert_eq!(sanitize_filename("image.png"), "image.png");
        assert_eq!(sanitize_filename("my-file_1.jpg"), "my-file_1.jpg");
    }
}
