//! Policy constants for uploads and share links.

/// Identity recorded for every upload and download. Callers are never authenticated.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Default upload size ceiling: 10 MiB, inclusive.
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Default accepted extensions, lowercase and without the leading dot.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Default share-link lifetime in seconds (10 minutes).
pub const DEFAULT_SHARE_LINK_TTL_SECS: i64 = 600;

/// Default number of entries in the recent uploads listing.
pub const DEFAULT_RECENT_UPLOADS_LIMIT: usize = 10;
