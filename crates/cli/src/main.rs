//! Frosted Mango CLI - catalog audits and reporting tools.
//!
//! # Usage
//!
//! ```bash
//! # Scan the live catalog for data-quality defects
//! fm-cli catalog audit
//!
//! # Print a per-category catalog summary
//! fm-cli catalog summary
//! ```
//!
//! # Commands
//!
//! - `catalog audit` - Report ambiguous facet combinations, negative
//!   prices, and dangling category references (exit code 1 on findings)
//! - `catalog summary` - Per-category counts and representative cards

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fm-cli")]
#[command(author, version, about = "Frosted Mango CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the live catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Scan for data-quality defects
    Audit,
    /// Print a per-category summary
    Summary,
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
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Audit => {
                let findings = commands::catalog::audit().await?;
                if findings > 0 {
                    tracing::error!("audit found {findings} defect(s)");
                    std::process::exit(1);
                }
            }
            CatalogAction::Summary => commands::catalog::summary().await?,
        },
    }

    Ok(())
}
