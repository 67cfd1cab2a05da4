//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - install: run the full install sequence and launch the validator
//! - logs: follow the validator container's output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hyperlane-setup - provision a host and run a Hyperlane validator
#[derive(Parser, Debug)]
#[command(name = "hyperlane-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute (default: interactive menu)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install everything and start the validator (menu option 1)
    Install,

    /// Follow the validator container's logs (menu option 2)
    Logs,
}
