//! Command descriptions handed to a [`Host`](super::Host).

use std::fmt;

/// One argument of a host command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Shown verbatim when the command is rendered
    Plain(String),
    /// Passed to the process but rendered as `***`
    Secret(String),
}

impl Arg {
    /// The real value passed to the process
    pub fn value(&self) -> &str {
        match self {
            Arg::Plain(s) | Arg::Secret(s) => s,
        }
    }
}

/// A program invocation: program, arguments, environment and optional stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    pub program: String,
    pub args: Vec<Arg>,
    pub env: Vec<(String, String)>,
    pub stdin: Option<String>,
    /// Let stdout reach the operator's terminal instead of capturing it
    pub show_output: bool,
}

impl HostCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            stdin: None,
            show_output: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Plain(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|a| Arg::Plain(a.into())));
        self
    }

    /// Add an argument that must never appear in logs
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Secret(arg.into()));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Feed `input` to the process on stdin
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Long-running installers: progress goes to the terminal, stderr is
    /// still captured for failure reports
    pub fn show_output(mut self) -> Self {
        self.show_output = true;
        self
    }

    /// Argument values as passed to the process
    pub fn arg_values(&self) -> Vec<&str> {
        self.args.iter().map(Arg::value).collect()
    }

    /// Value following `flag`, if present
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        let values = self.arg_values();
        values
            .iter()
            .position(|a| *a == flag)
            .and_then(|i| values.get(i + 1).copied())
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            match arg {
                Arg::Plain(s) if s.contains(' ') => write!(f, " '{}'", s)?,
                Arg::Plain(s) => write!(f, " {}", s)?,
                Arg::Secret(_) => write!(f, " ***")?,
            }
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short description of a failure for error messages
    pub fn failure_detail(&self) -> String {
        let code = self
            .code
            .map(|c| format!("exit code {}", c))
            .unwrap_or_else(|| "terminated by signal".to_string());
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            code
        } else {
            format!("{}: {}", code, stderr)
        }
    }
}
