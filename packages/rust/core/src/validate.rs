//! Length and format rules for proposal fields and repository identifiers.
//!
//! The `validate_*` predicates are pure. [`validate_proposal`] checks the
//! fields in order (title, description, conclusions) and reports only the
//! first rule that fails.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use proposalgen_shared::ValidationError;
use proposalgen_shared::limits::{
    MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, MIN_DESCRIPTION_LENGTH, MIN_TITLE_LENGTH,
};

use crate::conclusions::parse_conclusions;
use crate::proposal::Proposal;
use crate::sanitize::sanitize;

/// `owner/repo`, each side one or more of `[A-Za-z0-9._-]`.
static REPO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+/[A-Za-z0-9._-]+$").expect("repo id regex"));

fn char_len(s: &str) -> usize {
    s.trim().chars().count()
}

/// Title is 5 to 100 characters after trimming.
pub fn validate_title(title: &str) -> bool {
    (MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&char_len(title))
}

/// Description is 10 to 1000 characters after trimming.
pub fn validate_description(description: &str) -> bool {
    (MIN_DESCRIPTION_LENGTH..=MAX_DESCRIPTION_LENGTH).contains(&char_len(description))
}

/// At least one conclusion, and none blank.
pub fn validate_conclusions<S: AsRef<str>>(conclusions: &[S]) -> bool {
    !conclusions.is_empty() && conclusions.iter().all(|c| !c.as_ref().trim().is_empty())
}

/// Repository identifier has the shape `owner/repo`.
pub fn validate_repo_id(repo_id: &str) -> bool {
    REPO_ID_RE.is_match(repo_id.trim())
}

/// Like [`validate_repo_id`], but fails with the offending value.
pub fn ensure_repo_id(repo_id: &str) -> Result<(), ValidationError> {
    if validate_repo_id(repo_id) {
        Ok(())
    } else {
        Err(ValidationError::RepoId {
            value: repo_id.to_string(),
        })
    }
}

/// Check all proposal fields, failing on the first violated rule.
pub fn validate_proposal<S: AsRef<str>>(
    title: &str,
    description: &str,
    conclusions: &[S],
) -> Result<(), ValidationError> {
    if !validate_title(title) {
        return Err(ValidationError::title_length(char_len(title)));
    }
    if !validate_description(description) {
        return Err(ValidationError::description_length(char_len(description)));
    }
    if !validate_conclusions(conclusions) {
        return Err(ValidationError::Conclusions);
    }
    Ok(())
}

/// Sanitize raw user input, parse the conclusions, and validate the result.
///
/// Conclusions are split on the raw text before each item is sanitized, so
/// line breaks still separate items.
#[instrument(skip_all)]
pub fn validate_and_sanitize_proposal(
    title: &str,
    description: &str,
    conclusions: &str,
) -> Result<Proposal, ValidationError> {
    let clean_title = sanitize(title);
    let clean_description = sanitize(description);
    let clean_conclusions: Vec<String> = parse_conclusions(conclusions)
        .iter()
        .map(|item| sanitize(item))
        .collect();

    if let Err(err) = validate_proposal(&clean_title, &clean_description, &clean_conclusions) {
        debug!(rule = err.rule(), "proposal rejected");
        return Err(err);
    }

    Ok(Proposal::from_parts(
        clean_title,
        clean_description,
        clean_conclusions,
    ))
}
