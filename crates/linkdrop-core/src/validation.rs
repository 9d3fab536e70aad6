//! Upload validation
//!
//! Checks an inbound file against the size ceiling and the extension allowlist.
//! Validation has no side effects and runs before any backend is contacted.

use crate::constants::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_BYTES};
use crate::models::IncomingFile;

/// Reasons an upload is rejected. Messages are shown to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please choose a file to upload")]
    Missing,

    #[error("File is too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Unsupported file type '{extension}' (allowed: {allowed})")]
    UnsupportedType { extension: String, allowed: String },
}

impl ValidationError {
    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::Missing => "MISSING",
            ValidationError::TooLarge { .. } => "TOO_LARGE",
            ValidationError::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
        }
    }
}

/// Upload policy: size ceiling (inclusive) and lowercase extension allowlist.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_FILE_SIZE_BYTES,
            DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        )
    }
}

impl FileValidator {
    /// Extensions may be given with or without the leading dot, in any case.
    pub fn new(max_file_size: u64, allowed_extensions: Vec<String>) -> Self {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            max_file_size,
            allowed_extensions,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Validate file size: empty files count as missing.
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::Missing);
        }

        if size > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension and return it lowercased, without the dot.
    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let extension = file_extension(filename)
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::UnsupportedType {
                extension: if extension.is_empty() {
                    String::new()
                } else {
                    format!(".{}", extension)
                },
                allowed: self
                    .allowed_extensions
                    .iter()
                    .map(|e| format!(".{}", e))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        Ok(extension)
    }

    /// Validate presence, size, then extension. Returns the normalized extension.
    pub fn validate(&self, file: Option<&IncomingFile>) -> Result<String, ValidationError> {
        let file = file.ok_or(ValidationError::Missing)?;
        self.validate_file_size(file.size())?;
        self.validate_extension(&file.file_name)
    }
}

/// Extension of `filename` as sent, without the leading dot.
///
/// Only the last path component is considered. A name made only of an
/// extension (`.png`) has that extension; a trailing dot yields none.
pub fn file_extension(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Content type recorded when the client did not send a usable one.
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Pick the content type to persist: the client's, unless it is absent or generic.
pub fn resolve_content_type(declared: Option<&str>, extension: &str) -> String {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && !ct.eq_ignore_ascii_case("application/octet-stream") => {
            ct.to_string()
        }
        _ => content_type_for_extension(extension).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn file(name: &str, size: usize) -> IncomingFile {
        IncomingFile::new(name, Some("image/png".to_string()), vec![0u8; size])
    }

    #[test]
    fn size_boundaries() {
        let v = FileValidator::default();
        assert_eq!(v.validate_file_size(0), Err(ValidationError::Missing));
        assert!(v.validate_file_size(1).is_ok());
        assert!(v.validate_file_size(10 * MIB).is_ok());
        assert_eq!(
            v.validate_file_size(10 * MIB + 1),
            Err(ValidationError::TooLarge {
                size: 10 * MIB + 1,
                max: 10 * MIB
            })
        );
    }

    #[test]
    fn rejects_iff_empty_or_over_limit() {
        let v = FileValidator::default();
        for size in [0u64, 1, 512, MIB, 10 * MIB - 1, 10 * MIB, 10 * MIB + 1, 11 * MIB] {
            let rejected = v.validate_file_size(size).is_err();
            assert_eq!(rejected, size == 0 || size > 10_485_760, "size {}", size);
        }
    }

    #[test]
    fn extensions_are_case_insensitive() {
        let v = FileValidator::default();
        for name in ["a.jpg", "a.JPEG", "photo.PNG", "x.y.webp", "IMG.Jpg"] {
            assert!(v.validate_extension(name).is_ok(), "{} should pass", name);
        }
        assert_eq!(v.validate_extension("photo.PNG").unwrap(), "png");
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        let v = FileValidator::default();
        for name in ["setup.exe", "anim.gif", "noext", "archive.png.zip", "trailing.", "dir.png/file"] {
            assert!(
                matches!(
                    v.validate_extension(name),
                    Err(ValidationError::UnsupportedType { .. })
                ),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn bare_extension_names_are_accepted() {
        let v = FileValidator::default();
        assert_eq!(v.validate_extension(".png").unwrap(), "png");
        assert_eq!(v.validate_extension("uploads/.WEBP").unwrap(), "webp");
    }

    #[test]
    fn file_extension_keeps_case() {
        assert_eq!(file_extension("My Photo.PNG"), Some("PNG"));
        assert_eq!(file_extension("C:\\dir.d\\shot.Jpeg"), Some("Jpeg"));
        assert_eq!(file_extension("a.tar.gz"), Some("gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("name."), None);
    }

    #[test]
    fn missing_file_is_reported_first() {
        let v = FileValidator::default();
        assert_eq!(v.validate(None), Err(ValidationError::Missing));
        assert_eq!(v.validate(Some(&file("a.exe", 0))), Err(ValidationError::Missing));
    }

    #[test]
    fn too_large_is_reported_before_type() {
        let v = FileValidator::new(16, vec!["png".to_string()]);
        let err = v.validate(Some(&file("a.exe", 17))).unwrap_err();
        assert_eq!(err.reason(), "TOO_LARGE");
    }

    #[test]
    fn configured_extensions_are_normalized() {
        let v = FileValidator::new(MIB, vec![".PNG".to_string(), " webp ".to_string()]);
        assert_eq!(v.allowed_extensions(), &["png".to_string(), "webp".to_string()]);
        assert_eq!(v.validate(Some(&file("a.webp", 8))).unwrap(), "webp");
    }

    #[test]
    fn unsupported_type_message_lists_allowed() {
        let v = FileValidator::default();
        let msg = v.validate_extension("virus.exe").unwrap_err().to_string();
        assert!(msg.contains(".exe"));
        assert!(msg.contains(".jpg"));
        assert!(msg.contains(".webp"));
    }

    #[test]
    fn content_type_falls_back_to_extension() {
        assert_eq!(resolve_content_type(None, "png"), "image/png");
        assert_eq!(
            resolve_content_type(Some("application/octet-stream"), "jpg"),
            "image/jpeg"
        );
        assert_eq!(resolve_content_type(Some("image/webp"), "webp"), "image/webp");
    }
}
