//! Shared error model, configuration, and limits for the proposal generator.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`ProposalGenError`]: the unified error type, plus the tagged
//!   [`ValidationError`] and [`ApiError`] kinds
//! - Configuration ([`AppConfig`], [`GitHubConfig`], config loading)
//! - Validation bounds and display placeholders ([`limits`])

pub mod config;
pub mod error;
pub mod limits;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GitHubConfig, OutputConfig, OutputFormat, SearchConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_token,
};
pub use error::{ApiError, ProposalGenError, Result, ValidationError};
