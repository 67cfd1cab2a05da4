//! Host abstraction - every external effect of the provisioning tool.
//!
//! Steps never spawn processes directly. They describe a [`HostCommand`]
//! and hand it to a [`Host`], which lets the whole pipeline run against
//! [`FakeHost`] in tests.

mod command;
mod fake;
mod system;

pub use command::{Arg, CommandOutput, HostCommand};
pub use fake::FakeHost;
pub use system::SystemHost;

use crate::error::{Result, SetupError};
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait Host: Send + Sync {
    /// Effective user id of this process
    async fn effective_uid(&self) -> Result<u32>;

    /// Whether `name` resolves to a command (binary or shell function)
    async fn command_exists(&self, name: &str) -> bool;

    /// Whether `path` exists on the host filesystem
    async fn path_exists(&self, path: &Path) -> bool;

    /// Run a command to completion, capturing its output
    async fn run(&self, command: &HostCommand) -> Result<CommandOutput>;

    /// Run a command with inherited stdio, returning its exit code
    async fn follow(&self, command: &HostCommand) -> Result<Option<i32>>;

    /// Download an installer script
    async fn fetch_script(&self, url: &str) -> Result<String>;

    /// Prepend `dir` to the search path of every later command
    fn prepend_path(&self, dir: &Path);

    /// Source `script` before every later command
    fn add_prelude(&self, script: &Path);
}

/// Run `command` and turn a non-zero exit into `SetupError::CommandFailed`
pub async fn run_checked(host: &dyn Host, step: &str, command: &HostCommand) -> Result<CommandOutput> {
    log::debug!("{}: running {}", step, command);
    let output = host.run(command).await?;
    if !output.success() {
        return Err(SetupError::command_failed(step, output.failure_detail()));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_checked_maps_failure() {
        let host = FakeHost::new();
        host.fail_on("apt-get update", CommandOutput::failed(100, "no network"));

        let err = run_checked(&host, "Package index refresh", &HostCommand::new("apt-get").arg("update"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Package index refresh failed: exit code 100: no network");
    }

    #[tokio::test]
    async fn test_run_checked_passes_output() {
        let host = FakeHost::new();
        let output = run_checked(&host, "echo", &HostCommand::new("true")).await.unwrap();
        assert!(output.success());
    }
}
