//! Sweet Home CLI - migrations and developer tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sh-cli migrate
//!
//! # Issue a bearer token for local testing
//! sh-cli token --user 0b0e5a3c-6f0e-4b8e-9a43-2f1d8c6f7d21
//!
//! # Drive the tracker from a scripted page session
//! sh-cli replay sessions/checkout.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sh-cli")]
#[command(author, version, about = "Sweet Home CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Issue a developer bearer token
    Token {
        /// User ID (UUID) to put in the `sub` claim
        #[arg(short, long)]
        user: String,

        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
    /// Replay a YAML page session through the tracker
    Replay {
        /// Path to the script
        script: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Token { user, ttl_hours } => commands::token::issue(&user, ttl_hours)?,
        Commands::Replay { script } => commands::replay::run(&script).await?,
    }
    Ok(())
}
