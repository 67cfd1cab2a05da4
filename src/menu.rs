//! Interactive menu
//!
//! A small state machine: `Menu` reads a choice, `Running` performs one
//! action, `Exited` ends the loop. Input comes from a [`Prompter`], so the
//! loop can be driven by scripted answers.
//!
//! [`Prompter`]: crate::prompt::Prompter

use crate::context::SetupContext;
use crate::error::{Result, SetupError};
use crate::{logs, pipeline};
use colored::*;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, IsTerminal};

/// Actions reachable from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    InstallAll,
    ViewLogs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Menu,
    Running(Action),
    Exited,
}

/// Map a menu answer to the next state. `None` is end of input.
pub fn transition(answer: Option<&str>) -> std::result::Result<MenuState, String> {
    match answer.map(str::trim) {
        None | Some("0") => Ok(MenuState::Exited),
        Some("1") => Ok(MenuState::Running(Action::InstallAll)),
        Some("2") => Ok(MenuState::Running(Action::ViewLogs)),
        Some(other) => Err(other.to_string()),
    }
}

fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    if stdout.is_terminal() {
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)).map_err(|e| SetupError::Terminal(e.to_string()))?;
    }
    Ok(())
}

fn render_banner() {
    println!("{}", "==============================================".cyan());
    println!("{}", "        Hyperlane Validator Node Setup        ".cyan().bold());
    println!("{}", "==============================================".cyan());
    println!();
    println!("  {} Install everything and start the validator", "1)".bold());
    println!("  {} View validator logs", "2)".bold());
    println!("  {} Exit", "0)".bold());
    println!();
}

async fn dispatch(ctx: &mut SetupContext<'_>, action: Action) -> Result<()> {
    log::info!("Menu action: {:?}", action);
    match action {
        Action::InstallAll => {
            let report = pipeline::install_all(ctx).await?;
            log::info!("Installed this run: {:?}", report.installed());
        }
        Action::ViewLogs => logs::view(ctx).await?,
    }
    Ok(())
}

/// Run the menu until the operator exits. Any failing action is fatal.
pub async fn run(ctx: &mut SetupContext<'_>) -> Result<()> {
    let mut state = MenuState::Menu;
    loop {
        state = match state {
            MenuState::Menu => {
                if !ctx.console.is_quiet() {
                    clear_screen()?;
                    render_banner();
                }
                let answer = ctx.prompter.read_line("Select an option: ")?;
                match transition(answer.as_deref()) {
                    Ok(next) => next,
                    Err(invalid) => {
                        ctx.console.error(format!("Invalid option: '{}'", invalid));
                        MenuState::Menu
                    }
                }
            }
            MenuState::Running(action) => {
                dispatch(ctx, action).await?;
                ctx.prompter.read_line("Press Enter to return to the menu...")?;
                MenuState::Menu
            }
            MenuState::Exited => {
                ctx.console.log("Exiting");
                return Ok(());
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::console::Console;
    use crate::host::FakeHost;
    use crate::prompt::ScriptedPrompter;

    #[test]
    fn test_transitions() {
        assert_eq!(transition(Some("0")), Ok(MenuState::Exited));
        assert_eq!(transition(Some(" 1 ")), Ok(MenuState::Running(Action::InstallAll)));
        assert_eq!(transition(Some("2")), Ok(MenuState::Running(Action::ViewLogs)));
        assert_eq!(transition(None), Ok(MenuState::Exited));
        assert_eq!(transition(Some("3")), Err("3".to_string()));
        assert_eq!(transition(Some("")), Err(String::new()));
    }

    #[tokio::test]
    async fn test_invalid_choices_return_to_menu() {
        let config = Config::default();
        let host = FakeHost::new();
        let mut prompter = ScriptedPrompter::new(["9", "abc", "0", "1"]);
        let console = Console::quiet();
        let mut ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        run(&mut ctx).await.unwrap();
        drop(ctx);
        assert_eq!(prompter.prompts().len(), 3);
        assert!(host.history().is_empty());
    }

    #[tokio::test]
    async fn test_view_logs_then_exit() {
        let config = Config::default();
        let host = FakeHost::new();
        host.add_container("hyperlane", "running", "img");
        let mut prompter = ScriptedPrompter::new(["2", "", "0"]);
        let console = Console::quiet();
        let mut ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        run(&mut ctx).await.unwrap();
        assert_eq!(host.actions(), vec!["docker logs -f hyperlane"]);
    }

    #[tokio::test]
    async fn test_view_logs_without_container_is_fatal() {
        let config = Config::default();
        let host = FakeHost::new();
        let mut prompter = ScriptedPrompter::new(["2", "", "0"]);
        let console = Console::quiet();
        let mut ctx = SetupContext::new(&config, &host, &mut prompter, &console);

        let err = run(&mut ctx).await.unwrap_err();
        assert!(matches!(err, SetupError::ContainerNotStarted(_)));
    }
}
