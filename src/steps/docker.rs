//! Docker engine: install, start, enable on boot.

use super::StepOutcome;
use crate::context::SetupContext;
use crate::error::Result;
use crate::host::{run_checked, HostCommand};

pub async fn ensure(ctx: &SetupContext<'_>) -> Result<StepOutcome> {
    if ctx.host.command_exists("docker").await {
        ctx.console.log("Docker is already installed");
        return Ok(StepOutcome::AlreadyPresent);
    }

    ctx.console.log("Installing Docker...");
    run_checked(
        ctx.host,
        "Docker installation",
        &HostCommand::new("apt-get")
            .env("DEBIAN_FRONTEND", "noninteractive")
            .args(["install", "-y", ctx.config.packages.docker_package.as_str()])
            .show_output(),
    )
    .await?;
    run_checked(
        ctx.host,
        "Docker service start",
        &HostCommand::new("systemctl").args(["start", "docker"]),
    )
    .await?;
    run_checked(
        ctx.host,
        "Docker service enable",
        &HostCommand::new("systemctl").args(["enable", "docker"]),
    )
    .await?;

    ctx.console.log("Docker installed and started");
    Ok(StepOutcome::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::console::Console;
    use crate::host::{CommandOutput, FakeHost, Host};
    use crate::prompt::ScriptedPrompter;

    #[tokio::test]
    async fn test_installs_starts_and_enables() {
        let config = Config::default();
        let host = FakeHost::with_installers(&config);
        let mut prompter = ScriptedPrompter::default();
        let console = Console::quiet();
        let ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        assert_eq!(ensure(&ctx).await.unwrap(), StepOutcome::Installed);
        assert_eq!(
            host.actions(),
            vec![
                "apt-get install -y docker.io",
                "systemctl start docker",
                "systemctl enable docker"
            ]
        );
        assert!(host.command_exists("docker").await);
    }

    #[tokio::test]
    async fn test_present_docker_is_left_alone() {
        let config = Config::default();
        let host = FakeHost::new();
        host.add_tool("docker");
        let mut prompter = ScriptedPrompter::default();
        let console = Console::quiet();
        let ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        assert_eq!(ensure(&ctx).await.unwrap(), StepOutcome::AlreadyPresent);
        assert!(host.history().is_empty());
    }

    #[tokio::test]
    async fn test_start_failure_skips_enable() {
        let config = Config::default();
        let host = FakeHost::new();
        host.fail_on("systemctl start", CommandOutput::failed(1, "Unit docker.service not found."));
        let mut prompter = ScriptedPrompter::default();
        let console = Console::quiet();
        let ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        let err = ensure(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("Docker service start failed"));
        assert!(!host.ran("systemctl enable"));
    }
}
