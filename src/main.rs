use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod dataset;
mod dedupe;
mod error;
mod geocode;
mod merge;
mod model;
mod nearest;
mod pipeline;
mod stations;
mod utils;

#[derive(Debug, Parser)]
struct Cli {
    /// Re-download the transactions, geocode every unique address, and
    /// recompute nearest-station distances. Without this flag the previous
    /// run's merged dataset is loaded from disk.
    #[arg(long)]
    recompute: bool,
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = config::Config::load(&cli.config)?;
    match pipeline::run(&config, cli.recompute)? {
        Some(merged) => println!("{} merged rows", merged.len()),
        None => println!("no merged dataset found, run with --recompute first"),
    }
    Ok(())
}
