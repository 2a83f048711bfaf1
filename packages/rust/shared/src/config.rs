//! Application configuration for the proposal generator.
//!
//! User config lives at `~/.proposalgen/proposalgen.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ProposalGenError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "proposalgen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".proposalgen";

// ---------------------------------------------------------------------------
// Config structs (matching proposalgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Repository host API settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Repository search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Generated document output.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Name of the env var holding the API token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GitHubConfig {
    /// Parse `api_url`, rejecting anything that is not an absolute URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(self.api_url.trim_end_matches('/')).map_err(|e| {
            ProposalGenError::config(format!("invalid github.api_url '{}': {e}", self.api_url))
        })
    }
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of results requested per search.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Sort key passed to the search endpoint.
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Sort order passed to the search endpoint.
    #[serde(default = "default_order")]
    pub order: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            sort: default_sort(),
            order: default_order(),
        }
    }
}

fn default_per_page() -> u32 {
    10
}
fn default_sort() -> String {
    "stars".into()
}
fn default_order() -> String {
    "desc".into()
}

/// Format used when saving a generated proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    /// File extension for saved documents.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory saved proposals are written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Default save format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.proposalgen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ProposalGenError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.proposalgen/proposalgen.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ProposalGenError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ProposalGenError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ProposalGenError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ProposalGenError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ProposalGenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the API token from the env var named in the config.
///
/// Unset or empty means anonymous access, which the API allows at a lower
/// rate limit.
pub fn resolve_token(config: &GitHubConfig) -> Option<String> {
    match std::env::var(&config.token_env) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        _ => {
            tracing::debug!(var = %config.token_env, "no API token set, using anonymous access");
            None
        }
    }
}
