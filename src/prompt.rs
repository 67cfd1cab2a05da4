//! Operator input
//!
//! Prompts go through the [`Prompter`] trait so the launcher and menu can
//! be driven by a terminal or by scripted answers in tests.

use crate::error::{Result, SetupError};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

/// Source of operator answers. `Ok(None)` means input has ended.
pub trait Prompter {
    /// Ask for a line of text
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Ask for a line of text without echoing it
    fn read_secret(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Prompter reading from the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

/// Restores cooked mode when dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().map_err(|e| SetupError::Terminal(e.to_string()))?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_hidden() -> Result<Option<String>> {
    let _raw = RawModeGuard::enable()?;
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read().map_err(|e| SetupError::Terminal(e.to_string()))? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(SetupError::Terminal("interrupted".to_string()));
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) && secret.is_empty() => {
                return Ok(None);
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn read_secret(&mut self, prompt: &str) -> Result<Option<String>> {
        if !io::stdin().is_terminal() {
            return self.read_line(prompt);
        }
        print!("{}", prompt);
        io::stdout().flush()?;
        let secret = read_hidden();
        println!();
        secret
    }
}

/// Prompter that replays canned answers
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, secrets included
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn read_secret(&mut self, prompt: &str) -> Result<Option<String>> {
        self.read_line(prompt)
    }
}
