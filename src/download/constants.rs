//! Constants for the download module.

/// Default whole-request timeout for a PDF GET (3 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Media type a response must advertise to be saved.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Permissions for a freshly created output directory (`rwxr-xr-x`).
pub const OUTPUT_DIR_MODE: u32 = 0o755;
