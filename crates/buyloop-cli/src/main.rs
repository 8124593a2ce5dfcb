mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "buyloop-cli")]
#[command(about = "Search and manage the BuyLoop business catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Filter a catalog by text, category and distance
    Search {
        /// Catalog JSON file (defaults to `BUYLOOP_CATALOG_PATH`)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Free text matched against name, description, category and address
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long, short)]
        category: Option<String>,
        /// Maximum distance in km; 0 disables (defaults to `BUYLOOP_DEFAULT_DISTANCE_KM`)
        #[arg(long, short)]
        distance: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Print matches as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the distinct categories in a catalog
    Categories {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Show one business by id
    Show {
        id: String,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Seed the store document from a catalog file
    Seed {
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Clear existing data before seeding
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("buyloop-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = buyloop_core::load_app_config()?;
    let output = commands::run(command, &config)?;
    print!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests;
