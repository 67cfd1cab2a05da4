//! Follow the validator container's output.

use crate::context::SetupContext;
use crate::error::{Result, SetupError};
use crate::host::HostCommand;
use crate::validator::containers;

/// Stream `docker logs -f` for the default container until it stops or
/// the operator interrupts. Renamed containers are not followed.
pub async fn view(ctx: &SetupContext<'_>) -> Result<()> {
    let name = ctx.config.validator.container_name.as_str();
    if containers::find(ctx.host, name).await?.is_none() {
        return Err(SetupError::ContainerNotStarted(name.to_string()));
    }

    ctx.console.log(format!("Showing logs for '{}' (Ctrl+C to stop)", name));
    let code = ctx
        .host
        .follow(&HostCommand::new("docker").args(["logs", "-f", name]))
        .await?;
    log::debug!("docker logs exited with {:?}", code);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::console::Console;
    use crate::host::FakeHost;
    use crate::prompt::ScriptedPrompter;

    #[tokio::test]
    async fn test_missing_container_fails_without_following() {
        let config = Config::default();
        let host = FakeHost::new();
        host.add_container("validator-2", "running", "img");
        let mut prompter = ScriptedPrompter::default();
        let console = Console::quiet();
        let ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        let err = view(&ctx).await.unwrap_err();
        assert!(matches!(err, SetupError::ContainerNotStarted(ref n) if n == "hyperlane"));
        assert!(!host.ran("docker logs"));
    }

    #[tokio::test]
    async fn test_existing_container_is_followed() {
        let config = Config::default();
        let host = FakeHost::new();
        host.add_container("hyperlane", "exited", "img");
        let mut prompter = ScriptedPrompter::default();
        let console = Console::quiet();
        let ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        view(&ctx).await.unwrap();
        assert_eq!(host.actions(), vec!["docker logs -f hyperlane"]);
    }
}
