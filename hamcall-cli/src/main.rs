use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use hamcall_cli::app::App;
use hamcall_cli::cli::{Cli, Commands};
use hamcall_cli::repl;
use hamcall_core::{config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let found = config::read_config(&cli.config)?;
    let config = config::CONFIG.get().context("Configuration not loaded")?;
    let _logging_guard = logging::init_logging(&logging::LogSettings::from_config(config, "hamcall"))?;

    if !found {
        tracing::info!("Config file {} not found, using defaults", cli.config);
    }
    tracing::info!("hamcall {} started.", env!("CARGO_PKG_VERSION"));

    let app = App::bootstrap(config).await?;

    let code = match cli.command {
        Some(Commands::Lookup { callsign }) => match app.lookup(&callsign).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        },
        Some(Commands::History) => {
            println!("{}", app.history_text());
            ExitCode::SUCCESS
        }
        Some(Commands::ClearHistory) => {
            app.clear_history().await;
            println!("History cleared");
            ExitCode::SUCCESS
        }
        Some(Commands::ToggleTheme) => {
            println!("Switched to {} mode", app.toggle_theme().await);
            ExitCode::SUCCESS
        }
        None => {
            repl::run(&app).await?;
            ExitCode::SUCCESS
        }
    };

    tracing::info!("hamcall exiting.");
    Ok(code)
}
