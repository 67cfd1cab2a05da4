//! Container lookup through `docker ps`.

use crate::error::{Result, SetupError};
use crate::host::{run_checked, Host, HostCommand};
use serde::Deserialize;

/// One line of `docker ps --format '{{json .}}'`
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContainerSummary {
    #[serde(rename = "Names")]
    pub names: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Image")]
    pub image: String,
}

impl ContainerSummary {
    /// Docker joins multiple names with commas
    pub fn has_name(&self, name: &str) -> bool {
        self.names.split(',').any(|n| n.trim().trim_start_matches('/') == name)
    }
}

/// Parse `docker ps` JSON lines, skipping blanks
pub fn parse_ps(stdout: &str) -> Result<Vec<ContainerSummary>> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<ContainerSummary>(line).map_err(SetupError::from))
        .collect()
}

/// Find a container, running or stopped, with exactly this name
pub async fn find(host: &dyn Host, name: &str) -> Result<Option<ContainerSummary>> {
    let output = run_checked(
        host,
        "Container lookup",
        &HostCommand::new("docker").args([
            "ps".to_string(),
            "-a".to_string(),
            "--filter".to_string(),
            format!("name={}", name),
            "--format".to_string(),
            "{{json .}}".to_string(),
        ]),
    )
    .await?;
    Ok(parse_ps(&output.stdout)?.into_iter().find(|c| c.has_name(name)))
}
