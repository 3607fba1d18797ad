//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for managing pip and Python packages.
///
/// Global options override the configuration file and `PIPKIT_*`
/// environment variables for this invocation only.
#[derive(Debug, Parser)]
#[command(name = "pipkit")]
#[command(about = "Inspect, install and manage Python packages through pip")]
#[command(version)]
pub struct Cli {
    /// Python interpreter to use
    #[arg(long, global = true, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// pip executable or command template (e.g. "python3 -m pip")
    #[arg(long, global = true, value_name = "CMD")]
    pub pip: Option<String>,

    /// Timeout for each pip command, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// JSON configuration file
    #[arg(long, global = true, env = "PIPKIT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run inside the virtual environment at this path
    #[arg(long, global = true, value_name = "DIR")]
    pub venv: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
