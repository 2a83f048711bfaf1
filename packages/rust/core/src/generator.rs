//! Proposal document generator.
//!
//! Combines a validated [`Proposal`] with a [`ProjectModel`] into a
//! Markdown document. Every generated document is also appended to the
//! generator's own history so a session can revisit earlier output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use proposalgen_shared::limits::{LANGUAGE_NOT_SPECIFIED, URL_NOT_AVAILABLE};

use crate::project::{ProjectModel, group_thousands};
use crate::proposal::Proposal;

/// Stars above which community interest is described as "strong".
const STRONG_INTEREST_STARS: u64 = 100;

/// Footer timestamp, e.g. `March 11, 2024 at 09:42 AM`.
const FOOTER_TIME_FORMAT: &str = "%B %d, %Y at %I:%M %p";

const RECOMMENDATIONS: &str = "\
## Implementation Recommendations
Based on the project's characteristics and the stated objectives, the following implementation approach is recommended:

1. **Assessment Phase**: Review existing codebase and documentation
2. **Planning Phase**: Align proposal objectives with project roadmap
3. **Development Phase**: Implement changes following project conventions
4. **Testing Phase**: Ensure compatibility with existing functionality
5. **Documentation Phase**: Update relevant documentation and examples
6. **Community Engagement**: Collaborate with maintainers and contributors
";

const EXPECTED_OUTCOMES: &str = "\
## Expected Outcomes
The implementation of this proposal should result in:
- Enhanced project functionality aligned with stated objectives
- Improved user experience and community value
- Sustainable code changes that follow project best practices
- Clear documentation for future maintenance and development
";

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One generated document with the inputs that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRecord {
    /// Time-sortable record identifier.
    pub id: Uuid,
    /// The proposal as it was at generation time.
    pub proposal: Proposal,
    /// The project snapshot used.
    pub project: ProjectModel,
    /// When the document was rendered.
    pub generated_at: DateTime<Utc>,
    /// The rendered Markdown.
    pub rendered: String,
}

/// Renders proposal documents and keeps an append-only history of them.
///
/// History is owned by this instance. Use one generator per session or
/// serialize calls to [`ProposalGenerator::generate`].
#[derive(Debug, Default)]
pub struct ProposalGenerator {
    history: Vec<GenerationRecord>,
}

impl ProposalGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a document stamped with the current time and record it.
    pub fn generate(&mut self, proposal: &Proposal, project: &ProjectModel) -> String {
        self.generate_at(proposal, project, Utc::now())
    }

    /// Render a document stamped with `now` and record it.
    #[instrument(skip_all, fields(repo = %project.full_name, title = %proposal.title))]
    pub fn generate_at(
        &mut self,
        proposal: &Proposal,
        project: &ProjectModel,
        now: DateTime<Utc>,
    ) -> String {
        let rendered = render(proposal, project, now);

        self.history.push(GenerationRecord {
            id: Uuid::now_v7(),
            proposal: proposal.clone(),
            project: project.clone(),
            generated_at: now,
            rendered: rendered.clone(),
        });

        info!(
            bytes = rendered.len(),
            history = self.history.len(),
            "proposal generated"
        );
        rendered
    }

    /// Most recent record, if any document has been generated.
    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.history.last()
    }

    /// Every record, oldest first.
    pub fn all(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Rendered text of the record at `index`.
    pub fn rendered(&self, index: usize) -> Option<&str> {
        self.history.get(index).map(|r| r.rendered.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the full proposal document.
///
/// Sections are always emitted in the same order. Output depends only on
/// the inputs and `now`, which appears solely in the footer.
pub fn render(proposal: &Proposal, project: &ProjectModel, now: DateTime<Utc>) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("# {}\n\n", proposal.title));
    doc.push_str(&project_information(project));
    doc.push('\n');
    doc.push_str(&project_statistics(project));
    doc.push('\n');
    doc.push_str(&format!("## Project Description\n{}\n\n", project.description));
    doc.push_str(&format!(
        "## Proposal Description\n{}\n\n",
        proposal.description
    ));
    doc.push_str(&conclusions_list(&proposal.conclusions));
    doc.push('\n');
    doc.push_str(&context_analysis(project));
    doc.push('\n');
    doc.push_str(RECOMMENDATIONS);
    doc.push('\n');
    doc.push_str(EXPECTED_OUTCOMES);
    doc.push_str(&format!(
        "\n---\n*Proposal generated on {} UTC*\n",
        now.format(FOOTER_TIME_FORMAT)
    ));

    debug!(sections = 10, "document rendered");
    doc
}

fn project_information(project: &ProjectModel) -> String {
    format!(
        "## Project Information\n\
         **Repository:** {}\n\
         **URL:** {}\n\
         **Language:** {}\n",
        project.full_name,
        project.url.as_deref().unwrap_or(URL_NOT_AVAILABLE),
        project.language.as_deref().unwrap_or(LANGUAGE_NOT_SPECIFIED),
    )
}

fn project_statistics(project: &ProjectModel) -> String {
    format!(
        "## Project Statistics\n\
         - **Stars:** {}\n\
         - **Forks:** {}\n\
         - **Open Issues:** {}\n\
         - **Created:** {}\n\
         - **Last Updated:** {}\n",
        group_thousands(project.star_count),
        group_thousands(project.fork_count),
        group_thousands(project.open_issue_count),
        project.formatted_created(),
        project.formatted_updated(),
    )
}

fn conclusions_list(conclusions: &[String]) -> String {
    let mut out = String::from("## Objectives and Conclusions\n");
    for (i, conclusion) in conclusions.iter().enumerate() {
        out.push_str(&format!("{}. {conclusion}\n", i + 1));
    }
    out
}

fn community_interest(project: &ProjectModel) -> &'static str {
    if project.star_count > STRONG_INTEREST_STARS {
        "strong"
    } else {
        "emerging"
    }
}

fn development_activity(project: &ProjectModel) -> &'static str {
    if project.open_issue_count > 0 {
        "are active development opportunities"
    } else {
        "appears to be stable maintenance"
    }
}

fn context_analysis(project: &ProjectModel) -> String {
    format!(
        "## Project Context Analysis\n\
         This proposal is designed for the **{full_name}** repository, which is primarily written in **{language}**.\n\n\
         The project has demonstrated community engagement with **{stars} stars** and **{forks} forks**, indicating {interest} community interest.\n\n\
         With **{issues} open issues**, there {activity} that align with this proposal's objectives.\n",
        full_name = project.full_name,
        language = project.language.as_deref().unwrap_or("multiple languages"),
        stars = group_thousands(project.star_count),
        forks = group_thousands(project.fork_count),
        interest = community_interest(project),
        issues = group_thousands(project.open_issue_count),
        activity = development_activity(project),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_proposal() -> Proposal {
        Proposal::new(
            "Test Proposal",
            "This is a test proposal for validation purposes.",
            "Improve documentation\nAdd unit tests\nEnhance user experience",
        )
    }

    fn sample_project(stars: u64, issues: u64) -> ProjectModel {
        ProjectModel {
            url: Some("https://github.com/user/test-repo".into()),
            full_name: "user/test-repo".into(),
            description: "A test repository".into(),
            language: Some("Python".into()),
            star_count: stars,
            fork_count: 30,
            open_issue_count: issues,
            created_at: Some("2023-01-01T00:00:00Z".into()),
            updated_at: Some("2023-12-01T00:00:00Z".into()),
            ..ProjectModel::new("test-repo")
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 11, 14, 5, 0).unwrap()
    }

    #[test]
    fn new_generator_has_empty_history() {
        let generator = ProposalGenerator::new();
        assert!(generator.all().is_empty());
        assert!(generator.latest().is_none());
        assert!(generator.rendered(0).is_none());
    }

    #[test]
    fn document_contains_inputs() {
        let mut generator = ProposalGenerator::new();
        let doc = generator.generate(&sample_proposal(), &sample_project(150, 5));

        assert!(doc.starts_with("# Test Proposal\n"));
        assert!(doc.contains("**Repository:** user/test-repo"));
        assert!(doc.contains("**Language:** Python"));
        assert!(doc.contains("- **Stars:** 150"));
        assert!(doc.contains("- **Created:** January 01, 2023"));
        assert!(doc.contains("- **Last Updated:** December 01, 2023"));
        assert!(doc.contains("## Project Description\nA test repository\n"));
        assert!(doc.contains("This is a test proposal for validation purposes."));
        assert_eq!(doc.matches("# Test Proposal").count(), 1);
    }

    #[test]
    fn conclusions_numbered_in_order() {
        let doc = render(&sample_proposal(), &sample_project(150, 5), fixed_now());
        let first = doc.find("1. Improve documentation").unwrap();
        let second = doc.find("2. Add unit tests").unwrap();
        let third = doc.find("3. Enhance user experience").unwrap();
        assert!(first < second && second < third);
        assert_eq!(doc.matches("Add unit tests").count(), 1);
    }

    #[test]
    fn narrative_strong_and_active() {
        let doc = render(&sample_proposal(), &sample_project(150, 5), fixed_now());
        assert!(doc.contains("indicating strong community interest"));
        assert!(doc.contains("active development opportunities"));
        assert!(!doc.contains("emerging"));
    }

    #[test]
    fn narrative_emerging_and_stable() {
        let doc = render(&sample_proposal(), &sample_project(50, 0), fixed_now());
        assert!(doc.contains("indicating emerging community interest"));
        assert!(doc.contains("stable maintenance"));
        assert!(!doc.contains("active development opportunities"));
    }

    #[test]
    fn star_threshold_is_exclusive() {
        let doc = render(&sample_proposal(), &sample_project(100, 0), fixed_now());
        assert!(doc.contains("emerging"));
    }

    #[test]
    fn placeholders_for_missing_metadata() {
        let project = ProjectModel::new("bare");
        let doc = render(&sample_proposal(), &project, fixed_now());
        assert!(doc.contains("**Language:** Not specified"));
        assert!(doc.contains("**URL:** Not available"));
        assert!(doc.contains("- **Created:** Unknown"));
        assert!(doc.contains("No description available"));
        assert!(doc.contains("primarily written in **multiple languages**"));
    }

    #[test]
    fn counts_are_grouped() {
        let mut project = sample_project(228_000, 1_204);
        project.fork_count = 46_600;
        let doc = render(&sample_proposal(), &project, fixed_now());
        assert!(doc.contains("- **Stars:** 228,000"));
        assert!(doc.contains("- **Forks:** 46,600"));
        assert!(doc.contains("- **Open Issues:** 1,204"));
    }

    #[test]
    fn static_sections_present_in_order() {
        let doc = render(&sample_proposal(), &sample_project(150, 5), fixed_now());
        let headings = [
            "## Project Information",
            "## Project Statistics",
            "## Project Description",
            "## Proposal Description",
            "## Objectives and Conclusions",
            "## Project Context Analysis",
            "## Implementation Recommendations",
            "## Expected Outcomes",
            "*Proposal generated on",
        ];
        let positions: Vec<usize> = headings.iter().map(|h| doc.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(doc.contains("6. **Community Engagement**"));
    }

    #[test]
    fn fixed_clock_is_deterministic() {
        let now = fixed_now();
        let a = render(&sample_proposal(), &sample_project(150, 5), now);
        let b = render(&sample_proposal(), &sample_project(150, 5), now);
        assert_eq!(a, b);
        assert!(a.ends_with("*Proposal generated on March 11, 2024 at 02:05 PM UTC*\n"));
    }

    #[test]
    fn history_accumulates() {
        let mut generator = ProposalGenerator::new();
        let first = generator.generate_at(&sample_proposal(), &sample_project(150, 5), fixed_now());
        let second = generator.generate_at(&sample_proposal(), &sample_project(50, 0), fixed_now());

        assert_eq!(generator.all().len(), 2);
        assert_eq!(generator.rendered(0), Some(first.as_str()));
        let latest = generator.latest().unwrap();
        assert_eq!(latest.rendered, second);
        assert_eq!(latest.project.star_count, 50);
        assert_eq!(latest.generated_at, fixed_now());
        assert_ne!(generator.all()[0].id, latest.id);
    }
}
