//! Everything a step needs, passed explicitly.

use crate::config::Config;
use crate::console::Console;
use crate::host::Host;
use crate::prompt::Prompter;

pub struct SetupContext<'a> {
    pub config: &'a Config,
    pub host: &'a dyn Host,
    pub prompter: &'a mut dyn Prompter,
    pub console: &'a Console,
}

impl<'a> SetupContext<'a> {
    pub fn new(config: &'a Config, host: &'a dyn Host, prompter: &'a mut dyn Prompter, console: &'a Console) -> Self {
        Self {
            config,
            host,
            prompter,
            console,
        }
    }
}
