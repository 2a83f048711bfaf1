//! The user-authored proposal: title, description, and conclusions.

use serde::{Deserialize, Serialize};

use proposalgen_shared::ValidationError;

use crate::conclusions::parse_conclusions;
use crate::validate::validate_proposal;

/// A proposal as typed by the user.
///
/// Conclusions are parsed once at construction; the value is not mutated
/// afterwards. Validity is checked on demand, never enforced by mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Proposal title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Ordered conclusions/objectives.
    pub conclusions: Vec<String>,
}

impl Proposal {
    /// Build a proposal, splitting `conclusions` on line breaks and semicolons.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        conclusions: &str,
    ) -> Self {
        Self::from_parts(title, description, parse_conclusions(conclusions))
    }

    /// Build a proposal from an already-parsed conclusions list.
    pub fn from_parts(
        title: impl Into<String>,
        description: impl Into<String>,
        conclusions: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            conclusions,
        }
    }

    /// Run the proposal rules, reporting the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_proposal(&self.title, &self.description, &self.conclusions)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Short plain-text rendering for terminal display.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Title: {}\n\nDescription: {}\n\nConclusions:\n",
            self.title, self.description
        );
        for conclusion in &self.conclusions {
            out.push_str("- ");
            out.push_str(conclusion);
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}
