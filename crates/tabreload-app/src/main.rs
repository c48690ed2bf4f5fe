//! TabReload - headless host simulator
//!
//! Drives the background process and the options page against an
//! in-memory browser, with settings persisted to a JSON file.

mod cli;
mod commands;
mod logging;
mod storage;

use clap::Parser;
use cli::{Cli, Command, OptionsCommand};
use logging::LogConfig;
use storage::{default_storage_path, JsonFileStorage};
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = if cli.verbose {
        LogConfig::debug()
    } else {
        LogConfig::default()
    };
    if let Err(e) = logging::init_logging(&config.with_format(cli.log_format)) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let storage = JsonFileStorage::new(cli.storage.unwrap_or_else(default_storage_path));
    debug!(path = %storage.path().display(), "using storage file");

    let result = match cli.command {
        Command::Reload(args) => commands::reload(storage, args).await,
        Command::Options(OptionsCommand::Show) => commands::show_options(storage).await,
        Command::Options(OptionsCommand::Set(args)) => commands::set_options(storage, args).await,
        Command::Menus => commands::menus(storage).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
