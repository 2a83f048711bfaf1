//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use proposalgen_core::{
    ProposalGenerator, SearchQuery, ensure_repo_id, group_thousands, validate_and_sanitize_proposal,
};
use proposalgen_github::{GitHubClient, GitHubOptions, SearchParams};
use proposalgen_shared::limits::{LANGUAGE_NOT_SPECIFIED, URL_NOT_AVAILABLE};
use proposalgen_shared::{AppConfig, OutputFormat, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// proposalgen: structured proposals for GitHub projects.
#[derive(Parser)]
#[command(
    name = "proposalgen",
    version,
    about = "Generate structured proposals for GitHub projects from live repository data.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override the API base URL from the config file.
    #[arg(long, env = "GITHUB_URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a proposal document for a repository.
    Generate {
        /// Repository in `owner/repo` form (e.g. facebook/react).
        repository: String,

        /// Proposal title.
        title: String,

        /// Proposal description.
        description: String,

        /// Conclusions/objectives separated by semicolons or new lines.
        conclusions: String,

        /// Output file path (defaults to an auto-generated name).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save as JSON instead of Markdown.
        #[arg(long)]
        json: bool,

        /// Print only; do not write a file.
        #[arg(long)]
        no_save: bool,

        /// Validate the inputs and stop.
        #[arg(long)]
        validate_only: bool,
    },

    /// Show repository metadata.
    Repo {
        /// Repository in `owner/repo` form.
        repository: String,
    },

    /// Find repositories related to a proposal.
    Search {
        /// Proposal title.
        #[arg(long, default_value = "")]
        title: String,

        /// Proposal description.
        #[arg(long, default_value = "")]
        description: String,

        /// Conclusions/objectives.
        #[arg(long, default_value = "")]
        conclusions: String,

        /// Restrict results to a language.
        #[arg(short, long)]
        language: Option<String>,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "proposalgen=info",
        1 => "proposalgen=debug",
        _ => "proposalgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config()?;
    if let Some(api_url) = cli.api_url {
        config.github.api_url = api_url;
    }

    match cli.command {
        Command::Generate {
            repository,
            title,
            description,
            conclusions,
            output,
            json,
            no_save,
            validate_only,
        } => {
            let opts = GenerateOptions {
                output,
                json,
                no_save,
                validate_only,
            };
            cmd_generate(&config, &repository, &title, &description, &conclusions, &opts).await
        }
        Command::Repo { repository } => cmd_repo(&config, &repository).await,
        Command::Search {
            title,
            description,
            conclusions,
            language,
            limit,
        } => {
            cmd_search(
                &config,
                &title,
                &description,
                &conclusions,
                language.as_deref(),
                limit,
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(&config).await,
        },
    }
}

fn github_client(config: &AppConfig) -> Result<GitHubClient> {
    let opts = GitHubOptions::from_config(&config.github)?;
    Ok(GitHubClient::new(&opts)?)
}

/// Spinner shown while waiting on the API.
fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

struct GenerateOptions {
    output: Option<PathBuf>,
    json: bool,
    no_save: bool,
    validate_only: bool,
}

async fn cmd_generate(
    config: &AppConfig,
    repository: &str,
    title: &str,
    description: &str,
    conclusions: &str,
    opts: &GenerateOptions,
) -> Result<()> {
    ensure_repo_id(repository)?;
    let proposal = validate_and_sanitize_proposal(title, description, conclusions)?;

    if opts.validate_only {
        println!("All inputs are valid.");
        return Ok(());
    }

    let client = github_client(config)?;
    let progress = spinner(format!("Fetching project data for '{repository}'"));
    let project = client.fetch_project(repository).await;
    progress.finish_and_clear();
    let project = project?;

    info!(repo = %project.full_name, stars = project.star_count, "project data fetched");

    let mut generator = ProposalGenerator::new();
    let document = generator.generate(&proposal, &project);
    let generated_at = generator
        .latest()
        .map(|record| record.generated_at)
        .unwrap_or_else(Utc::now);

    let format = if opts.json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    let rendered = match format {
        OutputFormat::Markdown => document,
        OutputFormat::Json => json_document(&document, generated_at)?,
    };

    if !opts.no_save {
        let path = opts.output.clone().unwrap_or_else(|| {
            Path::new(&config.output.dir).join(default_file_name(repository, generated_at, format))
        });
        std::fs::write(&path, &rendered)
            .map_err(|e| eyre!("failed to save proposal to '{}': {e}", path.display()))?;
        info!(path = %path.display(), "proposal saved");
        println!("Proposal saved to '{}'", path.display());
        println!();
    }

    println!("{rendered}");
    Ok(())
}

/// `{ "proposal": …, "generated_at": … }`, pretty-printed.
fn json_document(document: &str, generated_at: DateTime<Utc>) -> Result<String> {
    let value = serde_json::json!({
        "proposal": document,
        "generated_at": generated_at.to_rfc3339(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// `proposal_<owner>_<repo>_<YYYYmmdd_HHMMSS>.<ext>`
fn default_file_name(repository: &str, at: DateTime<Utc>, format: OutputFormat) -> String {
    format!(
        "proposal_{}_{}.{}",
        repository.trim().replace('/', "_"),
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

// ---------------------------------------------------------------------------
// repo
// ---------------------------------------------------------------------------

async fn cmd_repo(config: &AppConfig, repository: &str) -> Result<()> {
    ensure_repo_id(repository)?;

    let client = github_client(config)?;
    let progress = spinner(format!("Fetching project data for '{repository}'"));
    let project = client.fetch_project(repository).await;
    progress.finish_and_clear();
    let project = project?;

    println!();
    println!("  Project:     {}", project.full_name);
    println!("  URL:         {}", project.url.as_deref().unwrap_or(URL_NOT_AVAILABLE));
    println!("  Description: {}", project.description);
    println!(
        "  Language:    {}",
        project.language.as_deref().unwrap_or(LANGUAGE_NOT_SPECIFIED)
    );
    println!("  Stars:       {}", group_thousands(project.star_count));
    println!("  Forks:       {}", group_thousands(project.fork_count));
    println!("  Open issues: {}", group_thousands(project.open_issue_count));
    println!("  Created:     {}", project.formatted_created());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

async fn cmd_search(
    config: &AppConfig,
    title: &str,
    description: &str,
    conclusions: &str,
    language: Option<&str>,
    limit: Option<u32>,
) -> Result<()> {
    let query = SearchQuery::from_proposal(title, description, conclusions, language)?;

    let mut params = SearchParams::from(&config.search);
    if let Some(limit) = limit {
        params.per_page = limit;
    }

    info!(query = %query, per_page = params.per_page, "searching repositories");

    let client = github_client(config)?;
    let progress = spinner("Searching repositories");
    let results = client.search_repositories(&query, &params).await;
    progress.finish_and_clear();
    let results = results?;

    println!();
    println!("  Query: {query}");
    println!();

    if results.is_empty() {
        println!("  No repositories found.");
        println!();
        return Ok(());
    }

    for (i, project) in results.iter().enumerate() {
        println!("  {}. {}", i + 1, project.full_name);
        println!("     {}", project.description);
        println!("     {}", project.stats_summary());
        if let Some(url) = &project.url {
            println!("     {url}");
        }
        println!();
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
