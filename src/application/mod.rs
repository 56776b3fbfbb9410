//! Application layer with session state, use cases and background services.

/// Background services.
pub mod services;
/// Cross-page session state.
pub mod session;
/// Use case implementations.
pub mod use_cases;

pub use services::Timeouts;
pub use session::{Session, SessionState};
pub use use_cases::{
    MediaDbUseCase, SearchMediaUseCase, SettingsUseCase, WriteOutcome, WriteTokenUseCase,
};
