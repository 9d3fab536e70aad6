//! Test fixtures: upload payloads and response parsing.

use axum_test::multipart::{MultipartForm, Part};

pub const MIB: usize = 1024 * 1024;

/// Deterministic payload of `len` bytes starting with a PNG signature.
pub fn png_bytes(len: usize) -> Vec<u8> {
    const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    let mut data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    let n = SIGNATURE.len().min(len);
    data[..n].copy_from_slice(&SIGNATURE[..n]);
    data
}

/// Multipart form with a single `file` part.
pub fn file_form(file_name: &str, mime_type: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(file_name).mime_type(mime_type),
    )
}

/// Pull the share path out of the upload success page.
pub fn share_path(html: &str) -> String {
    let marker = "id=\"share-link\" href=\"";
    let start = html
        .find(marker)
        .map(|i| i + marker.len())
        .expect("upload page has no share link");
    let end = html[start..]
        .find('"')
        .map(|i| start + i)
        .expect("unterminated share link");
    html[start..end].to_string()
}

/// Key component of a `/download/{key}` path.
pub fn key_of(path: &str) -> String {
    path.trim_start_matches("/download/").to_string()
}
