//! proposalgen CLI: structured proposals for GitHub projects.
//!
//! Validates a proposal, pulls live repository metadata, and renders a
//! Markdown document; can also turn a proposal into a repository search.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
