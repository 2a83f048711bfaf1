//! Keyword search query builder.
//!
//! Turns raw proposal fields into a repository search query: a few
//! keywords from each field, minus stop words and short tokens, plus an
//! optional language filter and fixed engagement thresholds.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use tracing::{debug, instrument};

use proposalgen_shared::{ProposalGenError, Result};

/// Tokens taken from the start of each field.
const TITLE_TOKENS: usize = 3;
const DESCRIPTION_TOKENS: usize = 5;
const CONCLUSION_TOKENS: usize = 3;

/// Maximum keyword terms in one query.
const MAX_TERMS: usize = 5;

/// Tokens of this many characters or fewer are dropped.
const MIN_TERM_LEN: usize = 2;

/// Only repositories above these thresholds are returned.
pub const MIN_STARS: u32 = 10;
pub const MIN_FORKS: u32 = 2;

/// Characters stripped from the end of each token.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did",
        "will", "would", "could", "should", "may", "might", "can", "this", "that", "these",
        "those",
    ]
    .into_iter()
    .collect()
});

/// A built search query. Rebuilt per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Up to five lowercase keywords, unique, in first-seen order.
    pub terms: Vec<String>,
    /// Optional `language:` qualifier.
    pub language: Option<String>,
}

impl SearchQuery {
    /// Extract keywords from proposal fields.
    ///
    /// Fails with [`ProposalGenError::NoSearchTerms`] when nothing survives
    /// filtering, which includes all three fields being empty.
    #[instrument(skip_all)]
    pub fn from_proposal(
        title: &str,
        description: &str,
        conclusions: &str,
        language: Option<&str>,
    ) -> Result<Self> {
        let conclusions = conclusions.replace([';', '\n', '\r'], " ");

        let candidates = title
            .split_whitespace()
            .take(TITLE_TOKENS)
            .chain(description.split_whitespace().take(DESCRIPTION_TOKENS))
            .chain(conclusions.split_whitespace().take(CONCLUSION_TOKENS));

        let mut seen = HashSet::new();
        let terms: Vec<String> = candidates
            .filter_map(normalize_token)
            .filter(|term| seen.insert(term.clone()))
            .take(MAX_TERMS)
            .collect();

        if terms.is_empty() {
            debug!("every candidate keyword was filtered out");
            return Err(ProposalGenError::NoSearchTerms);
        }

        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from);

        debug!(?terms, ?language, "search query built");
        Ok(Self { terms, language })
    }
}

/// Lower-case, strip trailing punctuation, and drop short or stop words.
fn normalize_token(token: &str) -> Option<String> {
    let lowered = token.to_lowercase();
    let term = lowered.trim_end_matches(TRAILING_PUNCTUATION);
    if term.chars().count() <= MIN_TERM_LEN || STOP_WORDS.contains(term) {
        return None;
    }
    Some(term.to_string())
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.terms.join(" "))?;
        if let Some(language) = &self.language {
            write!(f, " language:{language}")?;
        }
        write!(f, " stars:>{MIN_STARS} forks:>{MIN_FORKS}")
    }
}

/// Build the query string sent to the repository search endpoint.
pub fn build_query(
    title: &str,
    description: &str,
    conclusions: &str,
    language: Option<&str>,
) -> Result<String> {
    SearchQuery::from_proposal(title, description, conclusions, language).map(|q| q.to_string())
}
