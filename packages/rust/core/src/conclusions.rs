//! Conclusions list parsing.
//!
//! Users type conclusions as one string, separating items with line
//! breaks or semicolons. Both separators are equivalent.

/// Split raw conclusions text into ordered, non-empty, trimmed items.
///
/// Empty or whitespace-only input yields an empty list, which validation
/// rejects.
pub fn parse_conclusions(raw: &str) -> Vec<String> {
    raw.replace(';', "\n")
        .lines()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
