//! Validator launch: operator input, name conflicts, `docker run`.

use super::containers;
use super::key::PrivateKey;
use crate::config::Config;
use crate::context::SetupContext;
use crate::error::{Result, SetupError};
use crate::host::{run_checked, HostCommand};

/// Operator-supplied launch parameters, held in memory only
#[derive(Debug, Clone)]
pub struct ValidatorInput {
    pub validator_id: String,
    pub private_key: PrivateKey,
    pub rpc_url: String,
}

fn require(answer: Option<String>, what: &str) -> Result<String> {
    answer.ok_or_else(|| SetupError::InputClosed(what.to_string()))
}

/// Ask for the private key until it is well formed or attempts run out.
///
/// `max_attempts == 0` never gives up.
pub fn prompt_private_key(ctx: &mut SetupContext<'_>, max_attempts: u32) -> Result<PrivateKey> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let answer = require(
            ctx.prompter.read_secret("Enter private key (0x followed by 64 hex characters): ")?,
            "private key",
        )?;
        if let Some(key) = PrivateKey::parse(answer.trim()) {
            return Ok(key);
        }
        ctx.console
            .error("Invalid private key format. It must be 0x followed by 64 hexadecimal characters");
        if max_attempts != 0 && attempts >= max_attempts {
            return Err(SetupError::InvalidPrivateKey { attempts });
        }
    }
}

/// Collect validator id, signing key and RPC URL
pub fn collect_input(ctx: &mut SetupContext<'_>) -> Result<ValidatorInput> {
    let validator_id = require(ctx.prompter.read_line("Enter validator name: ")?, "validator name")?;
    let max_attempts = ctx.config.validator.max_key_attempts;
    let private_key = prompt_private_key(ctx, max_attempts)?;
    ctx.console
        .log(format!("Private key accepted (fingerprint {})", private_key.fingerprint()));
    let rpc_url = require(ctx.prompter.read_line("Enter RPC URL: ")?, "RPC URL")?;

    Ok(ValidatorInput {
        validator_id: validator_id.trim().to_string(),
        private_key,
        rpc_url: rpc_url.trim().to_string(),
    })
}

/// Pick the container name, clearing or sidestepping an existing one
pub async fn resolve_container_name(ctx: &mut SetupContext<'_>) -> Result<String> {
    let default_name = ctx.config.validator.container_name.clone();
    let Some(existing) = containers::find(ctx.host, &default_name).await? else {
        return Ok(default_name);
    };

    ctx.console.log(format!(
        "A container named '{}' already exists ({})",
        default_name, existing.state
    ));
    let answer = require(
        ctx.prompter
            .read_line("Remove the existing container and reuse the name? [y/N]: ")?,
        "container removal choice",
    )?;

    if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        ctx.console.log(format!("Removing container '{}'...", default_name));
        run_checked(
            ctx.host,
            "Container removal",
            &HostCommand::new("docker").args(["rm", "-f", default_name.as_str()]),
        )
        .await?;
        return Ok(default_name);
    }

    let name = require(ctx.prompter.read_line("Enter a new container name: ")?, "container name")?;
    let name = name.trim();
    if name.is_empty() {
        return Err(SetupError::EmptyContainerName);
    }
    Ok(name.to_string())
}

/// The `docker run` that starts the validator
pub fn run_command(config: &Config, container_name: &str, input: &ValidatorInput) -> HostCommand {
    let validator = &config.validator;
    let db = validator.container_db_path.as_str();
    let chain = validator.chain.as_str();
    let key = input.private_key.expose();

    HostCommand::new("docker")
        .args(["run", "-d", "-it", "--name", container_name])
        .arg("--mount")
        .arg(format!(
            "type=bind,source={},target={}",
            validator.db_dir.display(),
            db
        ))
        .args([config.hyperlane.image.as_str(), "./validator", "--db", db])
        .args(["--originChainName", chain])
        .arg("--reorgPeriod")
        .arg(validator.reorg_period.to_string())
        .args(["--validator.id", input.validator_id.as_str()])
        .args(["--checkpointSyncer.type", "localStorage"])
        .args(["--checkpointSyncer.folder", chain])
        .arg("--checkpointSyncer.path")
        .arg(format!("{}/{}_checkpoints", db, chain))
        .arg("--validator.key")
        .secret_arg(key)
        .arg(format!("--chains.{}.signer.key", chain))
        .secret_arg(key)
        .arg(format!("--chains.{}.customRpcUrls", chain))
        .arg(input.rpc_url.as_str())
}

/// Prompt, resolve the name, prepare the database directory and start
/// the container. Returns the container name used.
pub async fn launch(ctx: &mut SetupContext<'_>) -> Result<String> {
    let input = collect_input(ctx)?;
    let name = resolve_container_name(ctx).await?;

    let db_dir = ctx.config.validator.db_dir.display().to_string();
    run_checked(
        ctx.host,
        "Database directory creation",
        &HostCommand::new("mkdir").args(["-p", db_dir.as_str()]),
    )
    .await?;
    run_checked(
        ctx.host,
        "Database directory permissions",
        &HostCommand::new("chmod").args(["-R", "777", db_dir.as_str()]),
    )
    .await?;

    ctx.console.log(format!("Starting validator container '{}'...", name));
    run_checked(ctx.host, "Validator start", &run_command(ctx.config, &name, &input)).await?;
    ctx.console
        .success(format!("Validator started in container '{}'", name));
    Ok(name)
}
