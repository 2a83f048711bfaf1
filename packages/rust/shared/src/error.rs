//! Error types for the proposal generator.
//!
//! Library crates use [`ProposalGenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Validation and API failures are tagged enums so callers branch on the
//! kind instead of matching on message text.

use std::path::PathBuf;

use crate::limits::{
    MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, MIN_DESCRIPTION_LENGTH, MIN_TITLE_LENGTH,
};

/// A violated input rule. Only the first failing rule is ever reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Title length outside `[min, max]` characters.
    #[error("Title must be a string between {min} and {max} characters.")]
    TitleLength { min: usize, max: usize, actual: usize },

    /// Description length outside `[min, max]` characters.
    #[error("Description must be a string between {min} and {max} characters.")]
    DescriptionLength { min: usize, max: usize, actual: usize },

    /// Conclusions list empty or containing a blank entry.
    #[error("Conclusions must be a non-empty list of non-empty strings.")]
    Conclusions,

    /// Repository identifier is not `owner/repo`.
    #[error("Repository name must be in format 'owner/repo' (e.g., 'facebook/react'), got '{value}'")]
    RepoId { value: String },
}

impl ValidationError {
    pub fn title_length(actual: usize) -> Self {
        Self::TitleLength {
            min: MIN_TITLE_LENGTH,
            max: MAX_TITLE_LENGTH,
            actual,
        }
    }

    pub fn description_length(actual: usize) -> Self {
        Self::DescriptionLength {
            min: MIN_DESCRIPTION_LENGTH,
            max: MAX_DESCRIPTION_LENGTH,
            actual,
        }
    }

    /// Stable name of the violated rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::TitleLength { .. } => "title",
            Self::DescriptionLength { .. } => "description",
            Self::Conclusions => "conclusions",
            Self::RepoId { .. } => "repository",
        }
    }
}

/// Failure reported by the repository-hosting API collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The repository does not exist (HTTP 404).
    #[error("Repository '{repo}' not found")]
    NotFound { repo: String },

    /// Rate limit exceeded or access forbidden (HTTP 403/429).
    #[error("API rate limit exceeded or access forbidden")]
    RateLimited,

    /// Any other non-success status.
    #[error("GitHub API request failed with status {status}: {body}")]
    Other { status: u16, body: String },

    /// Transport failure before a response was received.
    #[error("Network error while fetching project data: {0}")]
    Network(String),
}

/// Top-level error type for all proposal generator operations.
#[derive(Debug, thiserror::Error)]
pub enum ProposalGenError {
    /// Malformed or out-of-bounds user input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Repository host API failure, propagated unchanged.
    #[error("GitHub API error: {0}")]
    Api(#[from] ApiError),

    /// Every keyword candidate was filtered out of the search query.
    #[error("no valid search terms found in proposal")]
    NoSearchTerms,

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Payload decoding error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ProposalGenError>;

impl ProposalGenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ProposalGenError::config("missing token");
        assert_eq!(err.to_string(), "config error: missing token");

        let err = ProposalGenError::from(ValidationError::title_length(3));
        assert_eq!(
            err.to_string(),
            "validation error: Title must be a string between 5 and 100 characters."
        );
    }

    #[test]
    fn validation_rule_names() {
        assert_eq!(ValidationError::title_length(0).rule(), "title");
        assert_eq!(ValidationError::description_length(2000).rule(), "description");
        assert_eq!(ValidationError::Conclusions.rule(), "conclusions");
        let err = ValidationError::RepoId {
            value: "facebook".into(),
        };
        assert_eq!(err.rule(), "repository");
        assert!(err.to_string().contains("'facebook'"));
    }

    #[test]
    fn validation_error_carries_bounds() {
        match ValidationError::description_length(9) {
            ValidationError::DescriptionLength { min, max, actual } => {
                assert_eq!((min, max, actual), (10, 1000, 9));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn api_error_messages() {
        let err = ApiError::NotFound {
            repo: "user/missing".into(),
        };
        assert!(err.to_string().contains("not found"));
        assert!(ApiError::RateLimited.to_string().contains("rate limit"));
        let err = ApiError::Other {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "GitHub API request failed with status 500: boom"
        );
    }
}
