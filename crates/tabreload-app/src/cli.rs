use crate::logging::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "tabreload",
    version,
    about = "Reload every tab in a window, against a simulated browser host"
)]
pub struct Cli {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Settings storage file (defaults to the user data directory)
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open simulated windows and click the toolbar icon in each
    Reload(ReloadArgs),

    /// Inspect or change the saved options
    #[command(subcommand)]
    Options(OptionsCommand),

    /// Run startup and list the registered context menu entries
    Menus,
}

#[derive(Debug, Args)]
pub struct ReloadArgs {
    /// Tabs per window
    #[arg(long, default_value_t = 3)]
    pub tabs: usize,

    /// Number of windows, reloaded concurrently
    #[arg(long, default_value_t = 1)]
    pub windows: usize,

    /// Tab ids whose reload should fail
    #[arg(long = "fail", value_name = "TAB_ID")]
    pub fail: Vec<u64>,
}

#[derive(Debug, Subcommand)]
pub enum OptionsCommand {
    /// Print the effective settings as JSON
    Show,

    /// Edit settings the way the options page does
    Set(SetArgs),
}

/// Numeric values are taken as typed text; anything unparseable saves as 0.
#[derive(Debug, Args)]
pub struct SetArgs {
    /// Fixed delay between tab reloads (ms)
    #[arg(long)]
    pub delay: Option<String>,

    /// Randomized delay offset (ms)
    #[arg(long)]
    pub range_start: Option<String>,

    /// Randomized delay scale (ms)
    #[arg(long)]
    pub range_end: Option<String>,

    /// Use the randomized delay
    #[arg(long)]
    pub advanced: Option<bool>,

    /// Show the page context menu entry
    #[arg(long)]
    pub page_menu: Option<bool>,
}
