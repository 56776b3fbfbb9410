//! Settings/control service port definition.

use async_trait::async_trait;

use crate::domain::entities::{
    IndexingProgress, Notification, ReaderInfo, SearchQuery, SearchResults, Settings,
    SettingsUpdate, System,
};
use crate::domain::errors::ServiceError;

/// Port for the local settings and reader control service.
///
/// Calls carry no timeout of their own; callers bound them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsServicePort: Send + Sync {
    /// Fetches the current service settings.
    async fn settings(&self) -> Result<Settings, ServiceError>;

    /// Applies a partial settings update.
    async fn update_settings(&self, update: SettingsUpdate) -> Result<(), ServiceError>;

    /// Lists the systems media can be filtered by.
    async fn systems(&self) -> Result<Vec<System>, ServiceError>;

    /// Lists connected readers.
    async fn readers(&self) -> Result<Vec<ReaderInfo>, ServiceError>;

    /// Writes `text` to the next token placed on a reader.
    ///
    /// Resolves once the token is written; dropping the future abandons the
    /// wait locally, `cancel_write` tells the service to stop waiting.
    async fn write_token(&self, text: String) -> Result<(), ServiceError>;

    /// Cancels a pending token write.
    async fn cancel_write(&self) -> Result<(), ServiceError>;

    /// Searches indexed media.
    async fn search_media(&self, query: SearchQuery) -> Result<SearchResults, ServiceError>;

    /// Progress of the media index run in flight, `None` when idle.
    async fn media_status(&self) -> Result<Option<IndexingProgress>, ServiceError>;

    /// Starts rebuilding the media index. Progress arrives as notifications.
    async fn generate_media(&self) -> Result<(), ServiceError>;

    /// Waits for the next pushed notification.
    async fn next_notification(&self) -> Result<Notification, ServiceError>;
}
