//! Validation bounds and fixed display text.

/// Minimum title length in characters, after sanitizing.
pub const MIN_TITLE_LENGTH: usize = 5;
/// Maximum title length in characters, after sanitizing.
pub const MAX_TITLE_LENGTH: usize = 100;
/// Minimum description length in characters, after sanitizing.
pub const MIN_DESCRIPTION_LENGTH: usize = 10;
/// Maximum description length in characters, after sanitizing.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Placeholder used when a repository has no description.
pub const NO_DESCRIPTION: &str = "No description available";
/// Shown in place of a missing creation/update date.
pub const UNKNOWN_DATE: &str = "Unknown";
/// Shown in place of a missing primary language.
pub const LANGUAGE_NOT_SPECIFIED: &str = "Not specified";
/// Shown in place of a missing repository web URL.
pub const URL_NOT_AVAILABLE: &str = "Not available";
