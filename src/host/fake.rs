//! In-memory host for tests.
//!
//! Tracks installed tools, files, images and containers, records every
//! command it is asked to run, and applies install effects through
//! pattern rules so pipelines can be exercised end to end.

use super::{CommandOutput, Host, HostCommand};
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Commands that only inspect state
const QUERY_PREFIXES: &[&str] = &["docker ps", "docker images", "id -u"];

#[derive(Debug, Clone)]
enum Effect {
    Tool(String),
    /// Tool that only resolves once `dir` is on the search path
    ToolIn(String, PathBuf),
    Path(PathBuf),
}

/// A container known to the fake docker daemon.
#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub name: String,
    pub state: String,
    pub image: String,
    /// The `docker run` that created it, if created through this host
    pub created_by: Option<HostCommand>,
}

#[derive(Debug, Default)]
struct FakeState {
    uid: u32,
    tools: HashMap<String, Option<PathBuf>>,
    paths: HashSet<PathBuf>,
    images: HashSet<String>,
    containers: BTreeMap<String, FakeContainer>,
    extra_path: Vec<PathBuf>,
    preludes: Vec<PathBuf>,
    rules: Vec<(String, Effect)>,
    failures: Vec<(String, CommandOutput)>,
    history: Vec<HostCommand>,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    state: Mutex<FakeState>,
}

impl FakeHost {
    /// An empty host running as root
    pub fn new() -> Self {
        Self::default()
    }

    /// A clean host whose installers behave like the real ones would
    pub fn with_installers(config: &Config) -> Self {
        let host = Self::new();
        host.provides_tool(&format!("install -y {}", config.packages.docker_package), "docker");
        host.provides_path(&config.node.nvm_install_url, config.node.resolved_nvm_dir().join("nvm.sh"));
        host.provides_tool("nvm install", "node");
        host.provides_tool("nvm install", "npm");
        let foundry_bin = config.foundry.resolved_bin_dir();
        host.provides_path(&config.foundry.install_url, foundry_bin.clone());
        host.provides_tool_in(&config.foundry.install_url, "foundryup", &foundry_bin);
        host.provides_tool_in(&config.foundry.install_url, "forge", &foundry_bin);
        host.provides_tool(
            &format!("npm install -g {}", config.hyperlane.cli_package),
            &config.hyperlane.cli_command,
        );
        host
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_uid(&self, uid: u32) {
        self.lock().uid = uid;
    }

    pub fn add_tool(&self, name: &str) {
        self.lock().tools.insert(name.to_string(), None);
    }

    pub fn add_path(&self, path: impl Into<PathBuf>) {
        self.lock().paths.insert(path.into());
    }

    pub fn add_image(&self, image: &str) {
        self.lock().images.insert(image.to_string());
    }

    pub fn add_container(&self, name: &str, state: &str, image: &str) {
        self.lock().containers.insert(
            name.to_string(),
            FakeContainer {
                name: name.to_string(),
                state: state.to_string(),
                image: image.to_string(),
                created_by: None,
            },
        );
    }

    /// Running a command matching `pattern` makes `tool` callable
    pub fn provides_tool(&self, pattern: &str, tool: &str) {
        self.lock()
            .rules
            .push((pattern.to_string(), Effect::Tool(tool.to_string())));
    }

    /// Like `provides_tool`, but the tool lives in `dir`
    pub fn provides_tool_in(&self, pattern: &str, tool: &str, dir: &Path) {
        self.lock()
            .rules
            .push((pattern.to_string(), Effect::ToolIn(tool.to_string(), dir.to_path_buf())));
    }

    /// Running a command matching `pattern` creates `path`
    pub fn provides_path(&self, pattern: &str, path: impl Into<PathBuf>) {
        self.lock()
            .rules
            .push((pattern.to_string(), Effect::Path(path.into())));
    }

    /// Commands matching `pattern` return `output` instead of succeeding
    pub fn fail_on(&self, pattern: &str, output: CommandOutput) {
        self.lock().failures.push((pattern.to_string(), output));
    }

    /// Every command run or followed, in order
    pub fn history(&self) -> Vec<HostCommand> {
        self.lock().history.clone()
    }

    /// Rendered history without state queries
    pub fn actions(&self) -> Vec<String> {
        self.history()
            .iter()
            .map(|c| c.to_string())
            .filter(|c| !QUERY_PREFIXES.iter().any(|q| c.starts_with(q)))
            .collect()
    }

    /// Whether any recorded command contains `needle`
    pub fn ran(&self, needle: &str) -> bool {
        self.history().iter().any(|c| matching_text(c).contains(needle))
    }

    pub fn containers(&self) -> Vec<FakeContainer> {
        self.lock().containers.values().cloned().collect()
    }

    pub fn has_image(&self, image: &str) -> bool {
        self.lock().images.contains(image)
    }

    pub fn search_path(&self) -> Vec<PathBuf> {
        self.lock().extra_path.clone()
    }

    pub fn preludes(&self) -> Vec<PathBuf> {
        self.lock().preludes.clone()
    }
}

/// Text that rules and failures are matched against: the rendered
/// command line followed by its stdin.
fn matching_text(command: &HostCommand) -> String {
    match &command.stdin {
        Some(input) => format!("{} {}", command, input),
        None => command.to_string(),
    }
}

impl FakeState {
    fn docker(&mut self, command: &HostCommand) -> CommandOutput {
        let args = command.arg_values();
        match args.first().copied() {
            Some("images") => match args.last() {
                Some(image) if self.images.contains(*image) => CommandOutput::ok("sha256:0f3c\n"),
                _ => CommandOutput::ok(""),
            },
            Some("pull") => {
                if let Some(image) = args.last() {
                    self.images.insert(image.to_string());
                }
                CommandOutput::ok("")
            }
            Some("ps") => {
                let lines: Vec<String> = self
                    .containers
                    .values()
                    .map(|c| {
                        serde_json::json!({ "Names": c.name, "State": c.state, "Image": c.image }).to_string()
                    })
                    .collect();
                CommandOutput::ok(lines.join("\n"))
            }
            Some("rm") => match args.last() {
                Some(name) if self.containers.remove(*name).is_some() => CommandOutput::ok(format!("{}\n", name)),
                Some(name) => CommandOutput::failed(1, format!("Error: No such container: {}", name)),
                None => CommandOutput::failed(1, "requires at least 1 argument"),
            },
            Some("run") => {
                let Some(name) = command.value_of("--name").map(str::to_string) else {
                    return CommandOutput::failed(125, "missing --name");
                };
                if self.containers.contains_key(&name) {
                    return CommandOutput::failed(125, format!("Conflict. The container name \"/{}\" is already in use", name));
                }
                let image = args
                    .iter()
                    .find(|a| self.images.contains(**a))
                    .map(|a| a.to_string())
                    .unwrap_or_default();
                self.containers.insert(
                    name.clone(),
                    FakeContainer {
                        name,
                        state: "running".to_string(),
                        image,
                        created_by: Some(command.clone()),
                    },
                );
                CommandOutput::ok("4f1d2c\n")
            }
            _ => CommandOutput::ok(""),
        }
    }

    fn apply_rules(&mut self, text: &str) {
        let effects: Vec<Effect> = self
            .rules
            .iter()
            .filter(|(pattern, _)| text.contains(pattern.as_str()))
            .map(|(_, effect)| effect.clone())
            .collect();
        for effect in effects {
            match effect {
                Effect::Tool(tool) => {
                    self.tools.insert(tool, None);
                }
                Effect::ToolIn(tool, dir) => {
                    self.tools.insert(tool, Some(dir));
                }
                Effect::Path(path) => {
                    self.paths.insert(path);
                }
            }
        }
    }
}

#[async_trait]
impl Host for FakeHost {
    async fn effective_uid(&self) -> Result<u32> {
        let mut state = self.lock();
        state.history.push(HostCommand::new("id").arg("-u"));
        Ok(state.uid)
    }

    async fn command_exists(&self, name: &str) -> bool {
        let state = self.lock();
        match state.tools.get(name) {
            Some(None) => true,
            Some(Some(dir)) => state.extra_path.contains(dir),
            None => false,
        }
    }

    async fn path_exists(&self, path: &Path) -> bool {
        self.lock().paths.contains(path)
    }

    async fn run(&self, command: &HostCommand) -> Result<CommandOutput> {
        let mut state = self.lock();
        state.history.push(command.clone());
        let text = matching_text(command);

        if let Some((_, output)) = state.failures.iter().find(|(p, _)| text.contains(p.as_str())) {
            return Ok(output.clone());
        }

        let output = if command.program == "docker" {
            state.docker(command)
        } else {
            CommandOutput::ok("")
        };
        if output.success() {
            state.apply_rules(&text);
        }
        Ok(output)
    }

    async fn follow(&self, command: &HostCommand) -> Result<Option<i32>> {
        let mut state = self.lock();
        state.history.push(command.clone());
        let text = matching_text(command);
        if let Some((_, output)) = state.failures.iter().find(|(p, _)| text.contains(p.as_str())) {
            return Ok(output.code);
        }
        match command.arg_values().last() {
            Some(name) if command.program == "docker" && !state.containers.contains_key(*name) => Ok(Some(1)),
            _ => Ok(Some(0)),
        }
    }

    async fn fetch_script(&self, url: &str) -> Result<String> {
        Ok(format!("#!/usr/bin/env bash\n# installer from {}\n", url))
    }

    fn prepend_path(&self, dir: &Path) {
        let mut state = self.lock();
        if !state.extra_path.iter().any(|p| p == dir) {
            state.extra_path.insert(0, dir.to_path_buf());
        }
    }

    fn add_prelude(&self, script: &Path) {
        let mut state = self.lock();
        if !state.preludes.iter().any(|p| p == script) {
            state.preludes.push(script.to_path_buf());
        }
    }
}
