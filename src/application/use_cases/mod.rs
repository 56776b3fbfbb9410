//! Use case implementations.

mod media_db_use_case;
mod search_media_use_case;
mod settings_use_case;
mod write_token_use_case;

pub use media_db_use_case::MediaDbUseCase;
pub use search_media_use_case::SearchMediaUseCase;
pub use settings_use_case::SettingsUseCase;
pub use write_token_use_case::{WriteOutcome, WriteTokenUseCase};
