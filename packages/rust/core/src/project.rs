//! Repository metadata as fetched from the hosting API.
//!
//! [`ProjectModel::from_api_response`] maps the handful of keys the
//! generator uses and keeps every other key in
//! [`ProjectModel::additional_data`], so new API fields never break
//! construction.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use proposalgen_shared::limits::{NO_DESCRIPTION, UNKNOWN_DATE, URL_NOT_AVAILABLE};
use proposalgen_shared::{ProposalGenError, Result};

/// Long-form calendar date, e.g. `January 05, 2023`.
const LONG_DATE_FORMAT: &str = "%B %d, %Y";

/// Timestamp layouts tried after RFC 3339, for values without an offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// ---------------------------------------------------------------------------
// ProjectModel
// ---------------------------------------------------------------------------

/// Normalized snapshot of one repository at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectModel {
    /// Short repository name (`react`).
    pub name: String,
    /// `owner/name`; falls back to `name` when the payload omits it.
    pub full_name: String,
    /// Web URL of the repository.
    pub url: Option<String>,
    /// Repository description, or the "No description available" placeholder.
    pub description: String,
    /// Primary language, if the host detected one.
    pub language: Option<String>,
    pub star_count: u64,
    pub fork_count: u64,
    pub open_issue_count: u64,
    /// ISO-8601 creation timestamp.
    pub created_at: Option<String>,
    /// ISO-8601 last-update timestamp.
    pub updated_at: Option<String>,
    /// Unrecognized payload keys, preserved but not interpreted.
    #[serde(skip)]
    pub additional_data: Map<String, Value>,
}

/// Wire shape of a repository object. Counts that are missing or `null`
/// become zero.
#[derive(Deserialize)]
struct RawProject {
    name: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default, deserialize_with = "count_or_zero")]
    stargazers_count: u64,
    #[serde(default, deserialize_with = "count_or_zero")]
    forks_count: u64,
    #[serde(default, deserialize_with = "count_or_zero")]
    open_issues_count: u64,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn count_or_zero<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<RawProject> for ProjectModel {
    fn from(raw: RawProject) -> Self {
        let full_name = non_empty(raw.full_name).unwrap_or_else(|| raw.name.clone());
        Self {
            name: raw.name,
            full_name,
            url: non_empty(raw.html_url),
            description: non_empty(raw.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            language: non_empty(raw.language),
            star_count: raw.stargazers_count,
            fork_count: raw.forks_count,
            open_issue_count: raw.open_issues_count,
            created_at: non_empty(raw.created_at),
            updated_at: non_empty(raw.updated_at),
            additional_data: raw.extra,
        }
    }
}

impl ProjectModel {
    /// A project with only a name; every other field takes its default.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            url: None,
            description: NO_DESCRIPTION.to_string(),
            language: None,
            star_count: 0,
            fork_count: 0,
            open_issue_count: 0,
            created_at: None,
            updated_at: None,
            additional_data: Map::new(),
        }
    }

    /// Build from a repository object returned by the hosting API.
    ///
    /// Fails only when `name` is missing or a known key has the wrong type
    /// (e.g. a negative count).
    #[instrument(skip_all)]
    pub fn from_api_response(data: Map<String, Value>) -> Result<Self> {
        let raw: RawProject = serde_json::from_value(Value::Object(data))
            .map_err(|e| ProposalGenError::parse(format!("invalid repository payload: {e}")))?;
        let project = Self::from(raw);
        debug!(
            full_name = %project.full_name,
            extra_fields = project.additional_data.len(),
            "project model built"
        );
        Ok(project)
    }

    /// `Language: … | Stars: … | Forks: … | Open Issues: …`, language omitted when unknown.
    pub fn stats_summary(&self) -> String {
        let mut stats = Vec::with_capacity(4);
        if let Some(language) = &self.language {
            stats.push(format!("Language: {language}"));
        }
        stats.push(format!("Stars: {}", self.star_count));
        stats.push(format!("Forks: {}", self.fork_count));
        stats.push(format!("Open Issues: {}", self.open_issue_count));
        stats.join(" | ")
    }

    pub fn formatted_created(&self) -> String {
        format_optional_date(self.created_at.as_deref())
    }

    pub fn formatted_updated(&self) -> String {
        format_optional_date(self.updated_at.as_deref())
    }
}

impl fmt::Display for ProjectModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project: {}", self.full_name)?;
        writeln!(f, "URL: {}", self.url.as_deref().unwrap_or(URL_NOT_AVAILABLE))?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Stats: {}", self.stats_summary())?;
        write!(f, "Created: {}", self.formatted_created())
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Render an ISO-8601 timestamp as `Month DD, YYYY`.
///
/// Accepts RFC 3339 (including a trailing `Z`), offset-less date-times, and
/// bare dates. Anything else is returned unchanged; this never fails.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format(LONG_DATE_FORMAT).to_string();
    }
    for layout in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return dt.format(LONG_DATE_FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format(LONG_DATE_FORMAT).to_string();
    }

    debug!(raw, "unparseable date left as-is");
    raw.to_string()
}

fn format_optional_date(raw: Option<&str>) -> String {
    match raw {
        Some(value) if !value.trim().is_empty() => format_date(value),
        _ => UNKNOWN_DATE.to_string(),
    }
}

/// Insert `,` between groups of three digits: `1234567` → `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
