//! CloudMart CLI - Store migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply PostgreSQL migrations
//! cm-cli migrate
//!
//! # Seed the demo catalog (no-op when products exist)
//! cm-cli seed
//!
//! # Mint a bearer token for manual API testing
//! cm-cli token --username demo
//! ```
//!
//! All commands read the same environment variables as the API server
//! (see `cloudmart_api::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cm-cli")]
#[command(author, version, about = "CloudMart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the demo product catalog
    Seed,
    /// Issue a bearer token signed with the configured secret
    Token {
        /// Subject to put in the token
        #[arg(short, long, default_value = "demo")]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so `token` output can be captured from stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

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
        Commands::Seed => commands::seed::run().await?,
        Commands::Token { username } => commands::token::run(&username)?,
    }
    Ok(())
}
