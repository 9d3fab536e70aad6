//! API-level constants

/// Body of the `/ping` liveness response.
pub const PING_RESPONSE: &str = "pong";

/// Multipart framing allowance added on top of the file size ceiling.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Form field carrying the uploaded file.
pub const UPLOAD_FIELD_NAME: &str = "file";

pub const UPLOAD_PATH: &str = "/Home/Upload";

/// Transport limit for request bodies.
///
/// Twice the file ceiling so that moderately oversized files still reach the
/// validator and get a precise rejection.
pub fn request_body_limit(max_file_size_bytes: u64) -> usize {
    max_file_size_bytes
        .saturating_mul(2)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
        .try_into()
        .unwrap_or(usize::MAX)
}
