//! Issuerun - label-driven delivery pipeline for AI-assisted issue work.
//!
//! One invocation advances one ticket by one pipeline step. Connection
//! settings come from the environment (or a `.env` file).

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use issuerun::{Config, Engine, GitCli, GitHubTracker};

/// Label-driven delivery pipeline for AI-assisted issue work
#[derive(Parser)]
#[command(name = "issuerun")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ticket number to process
    ticket: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Credentials may live in a .env file next to the repository.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let config = Config::from_env()?;
    let repo_root = std::env::current_dir()?;

    let tracker = GitHubTracker::new(config.github_token, config.owner, config.repo);
    let vcs = GitCli::new(&repo_root);
    let engine = Engine::new(tracker, vcs, repo_root);

    // Create tokio runtime for the async tracker calls
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(engine.run(cli.ticket))?;

    Ok(())
}
