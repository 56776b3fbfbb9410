//! Media index status and rebuild use case.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::services::{Timeouts, with_timeout};
use crate::domain::entities::IndexingProgress;
use crate::domain::errors::ServiceError;
use crate::domain::ports::SettingsServicePort;

/// Starts media index runs and reports the one in flight.
#[derive(Clone)]
pub struct MediaDbUseCase {
    service: Arc<dyn SettingsServicePort>,
    timeouts: Timeouts,
}

impl MediaDbUseCase {
    /// Use case over `service` with its request timeout.
    #[must_use]
    pub fn new(service: Arc<dyn SettingsServicePort>, timeouts: Timeouts) -> Self {
        Self { service, timeouts }
    }

    /// Progress of the current run; `None` when the index is idle.
    ///
    /// # Errors
    /// Returns error if the service fails or times out.
    pub async fn status(&self) -> Result<Option<IndexingProgress>, ServiceError> {
        with_timeout(self.timeouts.request, self.service.media_status())
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to fetch media index status"))
    }

    /// Asks the service to rebuild the index.
    ///
    /// # Errors
    /// Returns error if the service refuses or times out.
    pub async fn generate(&self) -> Result<(), ServiceError> {
        with_timeout(self.timeouts.request, self.service.generate_media())
            .await
            .inspect(|()| info!("Media index rebuild started"))
            .inspect_err(|e| warn!(error = %e, "Failed to start media index rebuild"))
    }
}
