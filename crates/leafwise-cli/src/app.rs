//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leafwise")]
#[command(
    author,
    version,
    about = "Plant condition information resolver with online and offline sources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a condition name to a full information record
    Resolve(ResolveArgs),

    /// Show the lookup terms generated for a condition name
    Terms(TermsArgs),

    /// Show provider chain and configuration status
    Status,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Condition name, e.g. "Apple Scab Leaf"
    pub name: Vec<String>,

    /// Image of the specimen, consulted for healthy plants
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Skip all remote providers and answer from the local database
    #[arg(long)]
    pub offline: bool,
}

#[derive(Args)]
pub struct TermsArgs {
    /// Condition name
    pub name: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
