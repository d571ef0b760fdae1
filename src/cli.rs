//! Command-line interface for WuxiaSim
//!
//! Supports both graphical (default) and headless modes.

use clap::Parser;
use std::path::PathBuf;

/// Wuxia action combat simulator
#[derive(Parser, Debug)]
#[command(name = "wuxiasim")]
#[command(about = "Wuxia action combat simulator")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the session log (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum session duration in seconds, overriding the config file's
    /// (headless mode only)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed, overriding the config file's (headless mode only)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
