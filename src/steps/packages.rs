//! Base OS packages via apt-get.

use super::StepOutcome;
use crate::context::SetupContext;
use crate::error::Result;
use crate::host::{run_checked, HostCommand};

fn apt_get() -> HostCommand {
    HostCommand::new("apt-get")
        .env("DEBIAN_FRONTEND", "noninteractive")
        .show_output()
}

/// Refresh the package index and install the base utilities.
///
/// Always runs: apt-get is itself idempotent for installed packages.
pub async fn ensure(ctx: &SetupContext<'_>) -> Result<StepOutcome> {
    ctx.console.log("Updating package index...");
    run_checked(ctx.host, "Package index update", &apt_get().arg("update")).await?;

    let packages = &ctx.config.packages.base;
    ctx.console.log(format!("Installing base packages: {}", packages.join(" ")));
    run_checked(
        ctx.host,
        "Base package installation",
        &apt_get().args(["install", "-y"]).args(packages.iter().cloned()),
    )
    .await?;

    ctx.console.log("Base packages installed");
    Ok(StepOutcome::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::console::Console;
    use crate::host::{CommandOutput, FakeHost};
    use crate::prompt::ScriptedPrompter;

    #[tokio::test]
    async fn test_update_then_install() {
        let config = Config::default();
        let host = FakeHost::new();
        let mut prompter = ScriptedPrompter::default();
        let console = Console::quiet();
        let ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        ensure(&ctx).await.unwrap();

        let actions = host.actions();
        assert_eq!(actions[0], "apt-get update");
        assert!(actions[1].starts_with("apt-get install -y curl"));
        assert!(host.history()[0]
            .env
            .contains(&("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())));
    }

    #[tokio::test]
    async fn test_update_failure_stops_before_install() {
        let config = Config::default();
        let host = FakeHost::new();
        host.fail_on("apt-get update", CommandOutput::failed(100, "Could not resolve"));
        let mut prompter = ScriptedPrompter::default();
        let console = Console::quiet();
        let ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        assert!(ensure(&ctx).await.is_err());
        assert!(!host.ran("apt-get install"));
    }
}
