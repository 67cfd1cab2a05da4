use clap::Parser;
use eyre::{Context, Result};
use log::info;

use hyperlane_setup::config::Config;
use hyperlane_setup::console::Console;
use hyperlane_setup::context::SetupContext;
use hyperlane_setup::host::SystemHost;
use hyperlane_setup::prompt::TerminalPrompter;
use hyperlane_setup::{guard, logging, logs, menu, pipeline};

mod cli;

use cli::Cli;
use cli::commands::Commands;

fn log_level(cli: &Cli, config: &Config) -> String {
    if cli.is_verbose() {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    }
}

async fn run_application(cli: &Cli, config: &Config, console: &Console) -> Result<()> {
    let host = SystemHost::new();

    // Preconditions come before anything touches the log file
    guard::check(&host, &config.log_file)
        .await
        .context("Startup checks failed")?;
    logging::init(&config.log_file, &log_level(cli, config)).context("Failed to setup logging")?;
    info!("Starting with config from: {:?}", cli.config);

    let mut prompter = TerminalPrompter::new();
    let mut ctx = SetupContext::new(config, &host, &mut prompter, console);

    match &cli.command {
        None => menu::run(&mut ctx).await?,
        Some(Commands::Install) => {
            let report = pipeline::install_all(&mut ctx).await?;
            info!("Installed this run: {:?}", report.installed());
        }
        Some(Commands::Logs) => logs::view(&ctx).await?,
    }
    Ok(())
}

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();
    let console = Console::new();

    let result = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")
        .and_then(|config| {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start runtime")?
                .block_on(run_application(&cli, &config, &console))
        });

    if let Err(e) = result {
        console.error(format!("{:#}", e));
        std::process::exit(1);
    }
}
