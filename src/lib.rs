//! hyperlane-setup - provision a host and launch a Hyperlane validator
//!
//! Installs the base packages, Docker, Node.js, Foundry and the Hyperlane
//! CLI, pulls the agent image and starts the validator container. Every
//! installer step probes the host first, so the whole sequence is safe to
//! re-run.

pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod guard;
pub mod host;
pub mod logging;
pub mod logs;
pub mod menu;
pub mod pipeline;
pub mod prompt;
pub mod steps;
pub mod validator;

pub use error::{Result, SetupError};
