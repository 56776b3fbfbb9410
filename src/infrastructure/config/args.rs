use super::app_config::{LogLevel, ThemeName};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "zaptui",
    version,
    about = "Terminal UI for a local NFC token reader service",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable mouse support.
    #[arg(long)]
    pub mouse: Option<bool>,

    /// Fixed 75x15 window for small CRT displays.
    #[arg(long)]
    pub crt_mode: Option<bool>,

    /// Colour theme.
    #[arg(long, value_enum)]
    pub theme: Option<ThemeName>,

    /// Timeout for ordinary service requests, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub request_timeout_ms: Option<u64>,
}
