//! The real host: child processes via tokio, downloads via reqwest.

use super::{CommandOutput, Host, HostCommand};
use crate::error::{Result, SetupError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Default)]
struct ShellEnv {
    extra_path: Vec<PathBuf>,
    preludes: Vec<PathBuf>,
}

/// Host backed by the machine this process runs on.
#[derive(Debug, Default)]
pub struct SystemHost {
    env: Mutex<ShellEnv>,
    http: reqwest::Client,
}

impl SystemHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn search_path(&self) -> Option<String> {
        let env = self.env.lock().unwrap_or_else(|e| e.into_inner());
        if env.extra_path.is_empty() {
            return None;
        }
        let mut dirs: Vec<PathBuf> = env.extra_path.clone();
        if let Some(current) = std::env::var_os("PATH") {
            dirs.extend(std::env::split_paths(&current));
        }
        std::env::join_paths(dirs)
            .ok()
            .map(|p| p.to_string_lossy().into_owned())
    }

    /// Build the process for `command`, wrapping it in bash when preludes
    /// must be sourced first or when `in_shell` asks for a shell builtin.
    fn build(&self, command: &HostCommand, in_shell: bool) -> Command {
        let preludes = {
            let env = self.env.lock().unwrap_or_else(|e| e.into_inner());
            env.preludes.clone()
        };

        let mut cmd = if preludes.is_empty() && !in_shell {
            let mut cmd = Command::new(&command.program);
            cmd.args(command.arg_values());
            cmd
        } else {
            let mut script = String::new();
            for prelude in &preludes {
                script.push_str(&format!(". '{}' >/dev/null 2>&1; ", prelude.display()));
            }
            script.push_str("\"$@\"");
            let mut cmd = Command::new("bash");
            cmd.arg("-c").arg(script).arg("bash").arg(&command.program);
            cmd.args(command.arg_values());
            cmd
        };

        if let Some(path) = self.search_path() {
            cmd.env("PATH", path);
        }
        for (key, value) in &command.env {
            cmd.env(key, value);
        }
        cmd
    }
}

fn spawn_error(command: &HostCommand, source: std::io::Error) -> SetupError {
    SetupError::Spawn {
        program: command.program.clone(),
        source,
    }
}

#[async_trait]
impl Host for SystemHost {
    async fn effective_uid(&self) -> Result<u32> {
        let output = self.run(&HostCommand::new("id").arg("-u")).await?;
        if !output.success() {
            return Err(SetupError::command_failed("Privilege check", output.failure_detail()));
        }
        output
            .stdout
            .trim()
            .parse()
            .map_err(|_| SetupError::command_failed("Privilege check", format!("unexpected uid '{}'", output.stdout.trim())))
    }

    async fn command_exists(&self, name: &str) -> bool {
        // `command` is a builtin; it must run in the shell that sourced the
        // preludes to see functions such as `nvm`.
        let probe = HostCommand::new("command").args(["-v", name]);
        let mut cmd = self.build(&probe, true);
        cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
        match cmd.status().await {
            Ok(status) => status.success(),
            Err(e) => {
                log::warn!("Probe for {} failed: {}", name, e);
                false
            }
        }
    }

    async fn path_exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn run(&self, command: &HostCommand) -> Result<CommandOutput> {
        let mut cmd = self.build(command, false);
        cmd.stdout(if command.show_output {
            Stdio::inherit()
        } else {
            Stdio::piped()
        })
        .stderr(Stdio::piped());
        cmd.stdin(if command.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = cmd.spawn().map_err(|e| spawn_error(command, e))?;
        if let (Some(input), Some(mut stdin)) = (&command.stdin, child.stdin.take()) {
            stdin.write_all(input.as_bytes()).await?;
            // Closing stdin lets `bash -s` style readers finish
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn follow(&self, command: &HostCommand) -> Result<Option<i32>> {
        let mut cmd = self.build(command, false);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        let status = cmd
            .spawn()
            .map_err(|e| spawn_error(command, e))?
            .wait()
            .await?;
        Ok(status.code())
    }

    async fn fetch_script(&self, url: &str) -> Result<String> {
        let download_error = |e: reqwest::Error| SetupError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(download_error)?;
        response.text().await.map_err(download_error)
    }

    fn prepend_path(&self, dir: &Path) {
        let mut env = self.env.lock().unwrap_or_else(|e| e.into_inner());
        if !env.extra_path.iter().any(|p| p == dir) {
            env.extra_path.insert(0, dir.to_path_buf());
        }
    }

    fn add_prelude(&self, script: &Path) {
        let mut env = self.env.lock().unwrap_or_else(|e| e.into_inner());
        if !env.preludes.iter().any(|p| p == script) {
            env.preludes.push(script.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_captures_stdout_and_exit_code() {
        let host = SystemHost::new();
        let output = host
            .run(&HostCommand::new("sh").args(["-c", "echo hello; exit 3"]))
            .await
            .unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_feeds_stdin() {
        let host = SystemHost::new();
        let output = host
            .run(&HostCommand::new("sh").arg("-s").stdin("echo from-stdin\n"))
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "from-stdin");
    }

    #[tokio::test]
    async fn test_shown_output_is_not_captured() {
        let host = SystemHost::new();
        let output = host
            .run(&HostCommand::new("sh").args(["-c", "echo progress; echo oops >&2; exit 2"]).show_output())
            .await
            .unwrap();
        assert_eq!(output.code, Some(2));
        assert!(output.stdout.is_empty());
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let host = SystemHost::new();
        let err = host
            .run(&HostCommand::new("definitely-not-a-real-program-xyz"))
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_command_exists() {
        let host = SystemHost::new();
        assert!(host.command_exists("sh").await);
        assert!(!host.command_exists("definitely-not-a-real-program-xyz").await);
    }

    #[tokio::test]
    async fn test_prelude_functions_are_visible() {
        let dir = TempDir::new().unwrap();
        let prelude = dir.path().join("env.sh");
        std::fs::write(&prelude, "greet() { echo \"hi $1\"; }\n").unwrap();

        let host = SystemHost::new();
        assert!(!host.command_exists("greet").await);

        host.add_prelude(&prelude);
        assert!(host.command_exists("greet").await);
        let output = host.run(&HostCommand::new("greet").arg("there")).await.unwrap();
        assert_eq!(output.stdout.trim(), "hi there");
    }

    #[tokio::test]
    async fn test_prepend_path_makes_tool_callable() {
        let dir = TempDir::new().unwrap();
        let tool = dir.path().join("mytool-xyz");
        std::fs::write(&tool, "#!/bin/sh\necho tool-ran\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let host = SystemHost::new();
        assert!(!host.command_exists("mytool-xyz").await);
        host.prepend_path(dir.path());
        assert!(host.command_exists("mytool-xyz").await);
    }
}
