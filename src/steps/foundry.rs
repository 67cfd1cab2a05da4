//! Foundry smart-contract toolchain.

use super::{run_remote_script, StepOutcome};
use crate::context::SetupContext;
use crate::error::{Result, SetupError};
use crate::host::{run_checked, HostCommand};

pub async fn ensure(ctx: &SetupContext<'_>) -> Result<StepOutcome> {
    let bin_dir = ctx.config.foundry.resolved_bin_dir();

    // A previous run may have installed into a directory this process
    // does not have on its PATH yet.
    if ctx.host.path_exists(&bin_dir).await {
        ctx.host.prepend_path(&bin_dir);
    }

    if ctx.host.command_exists("foundryup").await {
        ctx.console.log("Foundry is already installed");
        return Ok(StepOutcome::AlreadyPresent);
    }

    ctx.console.log("Installing Foundry...");
    run_remote_script(ctx.host, "Foundry installation", &ctx.config.foundry.install_url, &[]).await?;

    ctx.host.prepend_path(&bin_dir);
    if !ctx.host.command_exists("foundryup").await {
        return Err(SetupError::command_failed(
            "Foundry installation",
            format!("foundryup not found in {}", bin_dir.display()),
        ));
    }

    run_checked(ctx.host, "foundryup", &HostCommand::new("foundryup").show_output()).await?;
    ctx.console.log("Foundry installed");
    Ok(StepOutcome::Installed)
}
