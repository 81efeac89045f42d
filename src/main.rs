//! issue-pilot entrypoint.
//!
//! Two subcommands share one configuration and one embedding adapter:
//! `index` populates the vector store from a source tree, `analyze` matches
//! the configured issue against it and opens a pull request.

mod config;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, IssueContext};

#[derive(Parser)]
#[command(name = "issue-pilot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index the repository's source files into the vector store.
    Index {
        /// Root directory to scan.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Embed the configured issue, query related chunks and open a PR.
    Analyze {
        /// How many nearest chunks to retrieve.
        #[arg(long, default_value_t = 5)]
        top_k: u64,
    },
}

#[tokio::main]
async fn main() {
    // Optional in CI: required values are validated from the environment.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    if let Err(err) = run().await {
        error!("fatal: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::from_env()?;

    match cli.command {
        Command::Index { root } => {
            pipeline::run_index(&cfg, &root).await?;
        }
        Command::Analyze { top_k } => {
            let issue = IssueContext::from_env()?;
            pipeline::run_analyze(&cfg, &issue, top_k).await?;
        }
    }

    info!("run completed");
    Ok(())
}
