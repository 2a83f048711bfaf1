//! Whitespace normalization for raw text fields.
//!
//! Runs before length validation so bounds are measured on meaningful
//! content rather than incidental padding.

use std::sync::LazyLock;

use regex::Regex;

/// Any run of whitespace, including newlines and tabs.
static WHITESPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Trim the ends and collapse every internal whitespace run to one space.
pub fn sanitize(text: &str) -> String {
    WHITESPACE_RUN_RE.replace_all(text.trim(), " ").into_owned()
}

/// Like [`sanitize`], but a missing value becomes the empty string.
pub fn sanitize_optional(text: Option<&str>) -> String {
    text.map(sanitize).unwrap_or_default()
}
