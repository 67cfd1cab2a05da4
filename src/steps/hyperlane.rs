//! Hyperlane CLI package and agent image.

use super::StepOutcome;
use crate::context::SetupContext;
use crate::error::Result;
use crate::host::{run_checked, HostCommand};

/// Install the Hyperlane CLI globally through npm
pub async fn ensure_cli(ctx: &SetupContext<'_>) -> Result<StepOutcome> {
    let hyperlane = &ctx.config.hyperlane;
    if ctx.host.command_exists(&hyperlane.cli_command).await {
        ctx.console.log("Hyperlane CLI is already installed");
        return Ok(StepOutcome::AlreadyPresent);
    }

    ctx.console.log("Installing Hyperlane CLI...");
    run_checked(
        ctx.host,
        "Hyperlane CLI installation",
        &HostCommand::new("npm")
            .args(["install", "-g", hyperlane.cli_package.as_str()])
            .show_output(),
    )
    .await?;
    ctx.console.log("Hyperlane CLI installed");
    Ok(StepOutcome::Installed)
}

/// Whether the pinned agent image is in the local image store
pub async fn image_present(ctx: &SetupContext<'_>) -> Result<bool> {
    let output = run_checked(
        ctx.host,
        "Docker image lookup",
        &HostCommand::new("docker").args(["images", "-q", ctx.config.hyperlane.image.as_str()]),
    )
    .await?;
    Ok(!output.stdout.trim().is_empty())
}

/// Pull the pinned agent image for the pinned platform
pub async fn ensure_image(ctx: &SetupContext<'_>) -> Result<StepOutcome> {
    let hyperlane = &ctx.config.hyperlane;
    if image_present(ctx).await? {
        ctx.console.log("Hyperlane Docker image is already present");
        return Ok(StepOutcome::AlreadyPresent);
    }

    ctx.console.log(format!("Pulling {}...", hyperlane.image));
    run_checked(
        ctx.host,
        "Hyperlane image pull",
        &HostCommand::new("docker").args([
            "pull",
            "--platform",
            hyperlane.platform.as_str(),
            hyperlane.image.as_str(),
        ])
        .show_output(),
    )
    .await?;
    ctx.console.log("Hyperlane Docker image pulled");
    Ok(StepOutcome::Installed)
}
