//! Content-based MIME type detection.

/// MIME type reported when the content matches no known signature.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Detect a MIME type from magic numbers in `data`.
///
/// Client-supplied filenames and content types are never consulted.
pub fn detect_mime_type(data: &[u8]) -> String {
    infer::get(data)
        .map(|kind| kind.mime_type())
        .unwrap_or(UNKNOWN_MIME_TYPE)
        .to_string()
}
