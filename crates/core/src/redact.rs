//! Connection-string redaction for operator-facing output.

/// Number of leading characters of the connection string shown in the banner.
pub const DATABASE_URL_PREVIEW_CHARS: usize = 50;

/// Truncate a connection string to its first [`DATABASE_URL_PREVIEW_CHARS`]
/// characters and append `...`.
///
/// Truncation counts chars, not bytes, so multi-byte input never splits.
pub fn redact_database_url(url: &str) -> String {
    let preview: String = url.chars().take(DATABASE_URL_PREVIEW_CHARS).collect();
    format!("{preview}...")
}
