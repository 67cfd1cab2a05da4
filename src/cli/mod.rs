//! CLI module for hyperlane-setup - command-line interface and subcommands.
//!
//! With no subcommand the interactive menu runs.

pub mod commands;

pub use commands::Cli;
