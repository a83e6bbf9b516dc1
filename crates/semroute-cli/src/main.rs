//! semroute CLI - route free-text queries to configured intents.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "semroute")]
#[command(author, version, about = "semroute - semantic intent routing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: semroute.toml in the current or a parent directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter semroute.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Classify a single query
    Classify {
        /// Query text
        query: String,

        /// Override the configured match threshold
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify one query per line from a file or stdin
    Batch {
        /// Input file (default: stdin)
        file: Option<PathBuf>,

        /// Override the configured match threshold
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// List the configured intents
    Intents,
}

/// Log to stderr; `SEMROUTE_LOG` overrides the level picked by `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("SEMROUTE_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { path, force } => commands::init::run(path, force),
        Commands::Classify {
            query,
            threshold,
            json,
        } => commands::classify::run(&query, config, threshold, json),
        Commands::Batch {
            file,
            threshold,
            json,
        } => commands::batch::run(file.as_deref(), config, threshold, json),
        Commands::Intents => commands::intents::run(config),
    }
}
