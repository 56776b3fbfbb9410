//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Settings service adapters.
pub mod service;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager, ThemeName};
pub use service::InMemorySettingsService;
