//! Node.js through nvm.
//!
//! Two independent axes: nvm itself, then one pinned Node.js major
//! version. Once nvm exists its `nvm.sh` is registered as a shell prelude
//! so later commands (npm, the Hyperlane CLI) resolve through it.

use super::{run_remote_script, StepOutcome};
use crate::context::SetupContext;
use crate::error::{Result, SetupError};
use crate::host::{run_checked, HostCommand};

pub async fn ensure(ctx: &SetupContext<'_>) -> Result<StepOutcome> {
    let nvm_installed = ensure_nvm(ctx).await?;
    let node_installed = ensure_node(ctx).await?;
    Ok(if nvm_installed.installed() || node_installed.installed() {
        StepOutcome::Installed
    } else {
        StepOutcome::AlreadyPresent
    })
}

async fn ensure_nvm(ctx: &SetupContext<'_>) -> Result<StepOutcome> {
    let node = &ctx.config.node;
    let nvm_dir = node.resolved_nvm_dir();
    let nvm_sh = nvm_dir.join("nvm.sh");

    let outcome = if ctx.host.path_exists(&nvm_sh).await {
        ctx.console.log("nvm is already installed");
        StepOutcome::AlreadyPresent
    } else {
        ctx.console.log("Installing nvm...");
        // install.sh refuses an NVM_DIR that does not exist yet
        let nvm_dir_arg = nvm_dir.display().to_string();
        run_checked(
            ctx.host,
            "nvm directory creation",
            &HostCommand::new("mkdir").args(["-p", nvm_dir_arg.as_str()]),
        )
        .await?;
        run_remote_script(
            ctx.host,
            "nvm installation",
            &node.nvm_install_url,
            &[("NVM_DIR", nvm_dir_arg)],
        )
        .await?;
        if !ctx.host.path_exists(&nvm_sh).await {
            return Err(SetupError::command_failed(
                "nvm installation",
                format!("{} was not created", nvm_sh.display()),
            ));
        }
        ctx.console.log("nvm installed");
        StepOutcome::Installed
    };

    ctx.host.add_prelude(&nvm_sh);
    Ok(outcome)
}

async fn ensure_node(ctx: &SetupContext<'_>) -> Result<StepOutcome> {
    if ctx.host.command_exists("node").await {
        ctx.console.log("Node.js is already installed");
        return Ok(StepOutcome::AlreadyPresent);
    }

    let version = ctx.config.node.major_version.to_string();
    ctx.console.log(format!("Installing Node.js {}...", version));
    run_checked(
        ctx.host,
        "Node.js installation",
        &HostCommand::new("nvm")
            .args(["install", version.as_str()])
            .show_output(),
    )
    .await?;
    run_checked(
        ctx.host,
        "Node.js default alias",
        &HostCommand::new("nvm").args(["alias", "default", version.as_str()]),
    )
    .await?;

    if !ctx.host.command_exists("node").await {
        return Err(SetupError::command_failed("Node.js installation", "node is not callable after install"));
    }
    ctx.console.log(format!("Node.js {} installed", version));
    Ok(StepOutcome::Installed)
}
