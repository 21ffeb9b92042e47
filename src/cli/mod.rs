//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for paramsweep using clap.

pub mod commands;
pub mod progress;

use clap::{Parser, Subcommand};

/// paramsweep - batch export of parametric design variants
#[derive(Parser, Debug)]
#[command(name = "paramsweep")]
#[command(version, about, long_about = None)]
#[command(author = "Paramsweep Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "paramsweep.toml", env = "PSWEEP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PSWEEP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sweep the parameter and export every variation
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List the parameters and objects of the configured model
    Inspect(commands::inspect::InspectArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
