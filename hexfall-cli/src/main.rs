//! HEXFALL CLI - Command-line driver for the rules engine
//!
//! Commands:
//! - simulate: Run a fully scripted skirmish and report the outcome
//! - map: Print a generated battlefield

mod map;
mod simulate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexfall_core::RulesConfig;

#[derive(Parser)]
#[command(name = "hexfall")]
#[command(about = "HEXFALL combat rules driver")]
struct Cli {
    /// Override the RNG seed from the config
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted skirmish between the default rosters
    Simulate(simulate::SimulateArgs),
    /// Render a generated battlefield as ASCII
    Map(map::MapArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => simulate::run(args, cli.seed),
        Commands::Map(args) => map::run(args, cli.seed),
    }
}

/// Rules from a JSON file (or defaults), with an optional seed override
pub(crate) fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<RulesConfig> {
    let config = match path {
        Some(path) => RulesConfig::load(path)
            .with_context(|| format!("Failed to load rules config: {}", path.display()))?,
        None => RulesConfig::default(),
    };
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}
