//! MIME type detection based on file extensions.

use std::path::Path;

/// Fallback for files with an unknown or missing extension
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Returns the content type for a file path based on its extension,
/// e.g. "index.html" maps to "text/html".
pub fn content_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| mime_guess::from_ext(ext).first_raw())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
