//! Operator-facing status output.
//!
//! Every message is printed to the terminal and also recorded through the
//! `log` facade, which `logging::init` routes into the timestamped log file.

use colored::*;

#[derive(Debug, Clone, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console that only writes to the log (tests, automation)
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Status message
    pub fn log(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if !self.quiet {
            println!("{}", message);
        }
        log::info!("{}", message);
    }

    /// Successful completion of something worth highlighting
    pub fn success(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if !self.quiet {
            println!("{}", message.green());
        }
        log::info!("{}", message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if !self.quiet {
            eprintln!("{} {}", "ERROR:".red().bold(), message);
        }
        log::error!("{}", message);
    }
}
