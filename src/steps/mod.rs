//! Installer steps.
//!
//! Each step probes the host first and only acts when something is
//! missing, so the whole sequence can be re-run safely. Presence is never
//! cached; it is re-derived on every run.

pub mod docker;
pub mod foundry;
pub mod hyperlane;
pub mod node;
pub mod packages;

use crate::error::Result;
use crate::host::{run_checked, Host, HostCommand};

/// What a step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Installed,
    AlreadyPresent,
}

impl StepOutcome {
    pub fn installed(self) -> bool {
        self == StepOutcome::Installed
    }
}

/// Download an installer script and pipe it into bash
pub(crate) async fn run_remote_script(host: &dyn Host, step: &str, url: &str, env: &[(&str, String)]) -> Result<()> {
    log::debug!("{}: downloading {}", step, url);
    let script = host.fetch_script(url).await?;
    let mut command = HostCommand::new("bash").arg("-s").stdin(script).show_output();
    for (key, value) in env {
        command = command.env(*key, value.clone());
    }
    run_checked(host, step, &command).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{CommandOutput, FakeHost};

    #[tokio::test]
    async fn test_remote_script_is_piped_to_bash() {
        let host = FakeHost::new();
        run_remote_script(&host, "Example install", "https://example.com/install.sh", &[])
            .await
            .unwrap();

        let history = host.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].to_string(), "bash -s");
        assert!(history[0].stdin.as_deref().unwrap().contains("https://example.com/install.sh"));
    }

    #[tokio::test]
    async fn test_remote_script_failure_is_fatal() {
        let host = FakeHost::new();
        host.fail_on("example.com", CommandOutput::failed(1, "curl: (6)"));
        let err = run_remote_script(&host, "Example install", "https://example.com/install.sh", &[])
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Example install failed"));
    }
}
