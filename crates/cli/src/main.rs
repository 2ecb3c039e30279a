//! Percept CLI — the main entry point.
//!
//! Commands:
//! - `run`          — Start the agent loop
//! - `memory-demo`  — Exercise the memory system offline with mock embeddings

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "percept",
    about = "Percept — an autonomous agent with layered memory",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the agent loop
    Run {
        /// Path to the config file (defaults to ~/.percept/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use mock reasoning and embedding services instead of the API
        #[arg(long)]
        mock: bool,
    },

    /// Store a small graded corpus and run relevance queries against it
    MemoryDemo,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { config, mock } => commands::run::run(config, mock).await?,
        Commands::MemoryDemo => commands::memory_demo::run().await?,
    }

    Ok(())
}
