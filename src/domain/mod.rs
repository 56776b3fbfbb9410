//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Keybinding definitions.
pub mod keybinding;
/// Port definitions.
pub mod ports;

pub use entities::{PageId, ScanMode, Settings, SettingsUpdate};
pub use errors::{ServiceError, UiError, ValidationError};
pub use ports::{PageRouter, SettingsServicePort};
