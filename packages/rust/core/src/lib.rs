//! Core domain logic for the proposal generator.
//!
//! Everything here is pure and synchronous: input normalization and
//! validation, the repository metadata model, the proposal document
//! renderer, and the keyword search query builder. HTTP lives in
//! `proposalgen-github`.

pub mod conclusions;
pub mod generator;
pub mod project;
pub mod proposal;
pub mod sanitize;
pub mod search;
pub mod validate;

pub use conclusions::parse_conclusions;
pub use generator::{GenerationRecord, ProposalGenerator, render};
pub use project::{ProjectModel, format_date, group_thousands};
pub use proposal::Proposal;
pub use sanitize::{sanitize, sanitize_optional};
pub use search::{SearchQuery, build_query};
pub use validate::{
    ensure_repo_id, validate_and_sanitize_proposal, validate_conclusions, validate_description,
    validate_proposal, validate_repo_id, validate_title,
};
