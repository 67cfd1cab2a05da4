//! The full install sequence.
//!
//! Steps run strictly in order and the first error aborts the run.
//! Nothing already done is rolled back.

use crate::context::SetupContext;
use crate::error::Result;
use crate::steps::{self, StepOutcome};
use crate::validator;

/// What `install_all` did
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub steps: Vec<(&'static str, StepOutcome)>,
    pub container: String,
}

impl InstallReport {
    /// Names of the steps that had to install something
    pub fn installed(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .filter(|(_, outcome)| outcome.installed())
            .map(|(name, _)| *name)
            .collect()
    }
}

pub async fn install_all(ctx: &mut SetupContext<'_>) -> Result<InstallReport> {
    let mut report = Vec::new();

    report.push(("packages", steps::packages::ensure(ctx).await?));
    report.push(("docker", steps::docker::ensure(ctx).await?));
    report.push(("node", steps::node::ensure(ctx).await?));
    report.push(("foundry", steps::foundry::ensure(ctx).await?));
    report.push(("hyperlane-cli", steps::hyperlane::ensure_cli(ctx).await?));
    report.push(("hyperlane-image", steps::hyperlane::ensure_image(ctx).await?));

    let container = validator::launch(ctx).await?;
    Ok(InstallReport {
        steps: report,
        container,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::console::Console;
    use crate::host::{CommandOutput, FakeHost, Host};
    use crate::prompt::ScriptedPrompter;

    #[tokio::test]
    async fn test_failure_stops_later_steps() {
        let config = Config::default();
        let host = FakeHost::with_installers(&config);
        host.fail_on("nvm install", CommandOutput::failed(1, "boom"));
        let mut prompter = ScriptedPrompter::default();
        let console = Console::quiet();
        let mut ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        assert!(install_all(&mut ctx).await.is_err());
        // docker stays installed, foundry never starts
        assert!(host.command_exists("docker").await);
        assert!(!host.ran("foundry.paradigm.xyz"));
        assert!(!host.ran("docker pull"));
    }
}
