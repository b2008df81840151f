//! Leafwise CLI
//!
//! Resolve plant condition names to normalized information records.

use anyhow::Result;
use clap::Parser;
use leafwise_core::Config;

mod app;
mod commands;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    // Load config (use LEAFWISE_CONFIG env var if set, otherwise use default)
    let config = match std::env::var("LEAFWISE_CONFIG") {
        Ok(path) => Config::load_from(&std::path::PathBuf::from(path))?,
        Err(_) => Config::load()?,
    };

    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &config, cli.format).await,
        Commands::Terms(args) => commands::terms::run(args, cli.format),
        Commands::Status => commands::status::run(&config, cli.format),
    }
}
