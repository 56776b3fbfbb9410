//! Application configuration.

use crate::application::services::Timeouts;
use crate::domain::entities::WriteFormat;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;

pub(crate) const APP_NAME: &str = "zaptui";
pub(crate) const APP_QUALIFIER: &str = "org";
pub(crate) const APP_ORGANIZATION: &str = "zaptui";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Built-in colour themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    /// Dark blue background with yellow accents.
    #[default]
    Default,
    /// Black background with bright yellow.
    HighContrast,
    /// Dracula palette.
    Dracula,
    /// Nord palette.
    Nord,
}

impl ThemeName {
    /// All themes in menu order.
    pub const ALL: [Self; 4] = [Self::Default, Self::HighContrast, Self::Dracula, Self::Nord];

    /// Name shown in the theme selector.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Default => "Default (Dark Blue)",
            Self::HighContrast => "High Contrast",
            Self::Dracula => "Dracula",
            Self::Nord => "Nord",
        }
    }

    /// Position in [`ThemeName::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Theme at `index`, falling back to the default theme.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

/// Persisted TUI preferences.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Enable mouse support.
    #[serde(default)]
    pub mouse: bool,

    /// Fixed 75x15 window for small CRT displays.
    #[serde(default)]
    pub crt_mode: bool,

    /// Colour theme.
    #[serde(default)]
    pub theme: ThemeName,

    /// Value written to tokens from search results.
    #[serde(default)]
    pub write_format: WriteFormat,

    /// Timeout for ordinary service requests.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Timeout while waiting for a token on the reader.
    #[serde(default = "default_token_wait_timeout_ms")]
    pub token_wait_timeout_ms: u64,
}

const fn default_request_timeout_ms() -> u64 {
    5_000
}

const fn default_token_wait_timeout_ms() -> u64 {
    30_000
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(mouse) = args.mouse {
            self.mouse = mouse;
        }
        if let Some(crt_mode) = args.crt_mode {
            self.crt_mode = crt_mode;
        }
        if let Some(theme) = args.theme {
            self.theme = theme;
        }
        if let Some(request_timeout_ms) = args.request_timeout_ms {
            self.request_timeout_ms = request_timeout_ms;
        }
    }

    /// Service timeouts derived from the configuration.
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        Timeouts::from_millis(self.request_timeout_ms, self.token_wait_timeout_ms)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("zaptui.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            mouse: false,
            crt_mode: false,
            theme: ThemeName::Default,
            write_format: WriteFormat::ZapScript,
            request_timeout_ms: default_request_timeout_ms(),
            token_wait_timeout_ms: default_token_wait_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            theme = "high_contrast"
            write_format = "path"
            mouse = true
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.theme, ThemeName::HighContrast);
        assert_eq!(config.write_format, WriteFormat::Path);
        assert!(config.mouse);
        assert!(!config.crt_mode);
        assert_eq!(config.request_timeout_ms, 5_000);
        assert_eq!(config.token_wait_timeout_ms, 30_000);
    }

    #[test]
    fn test_merge_with_args_overrides_only_given_flags() {
        let mut config = AppConfig {
            mouse: true,
            ..AppConfig::default()
        };
        let args = CliArgs::parse_from(["zaptui", "--theme", "nord", "--crt-mode", "true"]);

        config.merge_with_args(args);

        assert_eq!(config.theme, ThemeName::Nord);
        assert!(config.crt_mode);
        assert!(config.mouse);
    }

    #[test]
    fn test_timeouts_follow_config() {
        let config = AppConfig {
            request_timeout_ms: 250,
            ..AppConfig::default()
        };
        let timeouts = config.timeouts();
        assert_eq!(timeouts.request, Duration::from_millis(250));
        assert_eq!(timeouts.token_wait, Duration::from_secs(30));
    }

    #[test]
    fn test_theme_index_round_trip() {
        for theme in ThemeName::ALL {
            assert_eq!(ThemeName::from_index(theme.index()), theme);
        }
        assert_eq!(ThemeName::from_index(99), ThemeName::Default);
    }
}
