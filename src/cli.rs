//! Command-line interface definitions

use clap::Parser;
use std::path::PathBuf;

/// Headless 2D fighting bout simulator
#[derive(Parser, Debug)]
#[command(name = "brawlsim", version, about)]
pub struct Args {
    /// Path to a headless bout configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Random seed for deterministic simulation (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write the combat log JSON (overrides the config file)
    #[arg(long, value_name = "FILE")]
    pub output: Option<String>,

    /// Hard cap on simulated seconds (overrides the config file)
    #[arg(long, value_name = "SECS")]
    pub max_duration: Option<u64>,
}
