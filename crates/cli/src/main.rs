//! Blife Healthy CLI - Operator tools for the marketplace data directory.
//!
//! # Usage
//!
//! ```bash
//! # Write the sample marketplace into ./data
//! blife-cli seed --data-dir ./data
//!
//! # Load a YAML fixture instead
//! blife-cli seed --data-dir ./data --file fixtures/demo.yaml
//!
//! # Remove every collection (the storefront reseeds on next read)
//! blife-cli reset --data-dir ./data
//!
//! # Show warnings from the store workflow
//! blife-cli logs --level WARN --source Store
//! ```
//!
//! `--data-dir` falls back to `BLIFE_DATA_DIR`, the same variable the
//! storefront reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "blife-cli")]
#[command(author, version, about = "Blife Healthy CLI tools")]
struct Cli {
    /// Data directory (defaults to `BLIFE_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the sample dataset, or a YAML fixture, into the data directory
    Seed {
        /// YAML fixture file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Remove every stored collection
    Reset,
    /// Print marketplace log entries, newest first
    Logs {
        /// Only this level (`INFO`, `WARN`, `ERROR`)
        #[arg(short, long)]
        level: Option<String>,

        /// Only this source (`Auth`, `Product`, `Order`, `Store`, `General`)
        #[arg(short, long)]
        source: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dir = commands::data_dir(cli.data_dir)?;
    match cli.command {
        Commands::Seed { file } => {
            commands::data::seed(&dir, file.as_deref()).await?;
        }
        Commands::Reset => commands::data::reset(&dir).await?,
        Commands::Logs { level, source } => {
            commands::logs::show(&dir, level.as_deref(), source.as_deref())?;
        }
    }
    Ok(())
}
