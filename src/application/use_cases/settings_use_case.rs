//! Settings fetch/apply use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::services::{Timeouts, with_timeout};
use crate::domain::entities::{ReaderInfo, Settings, SettingsUpdate, System};
use crate::domain::errors::ServiceError;
use crate::domain::ports::SettingsServicePort;

/// Reads and updates service settings under the request timeout.
#[derive(Clone)]
pub struct SettingsUseCase {
    service: Arc<dyn SettingsServicePort>,
    timeouts: Timeouts,
}

impl SettingsUseCase {
    #[must_use]
    pub fn new(service: Arc<dyn SettingsServicePort>, timeouts: Timeouts) -> Self {
        Self { service, timeouts }
    }

    /// Fetches the current settings.
    ///
    /// # Errors
    /// Returns error if the service fails or does not answer in time.
    pub async fn load(&self) -> Result<Settings, ServiceError> {
        with_timeout(self.timeouts.request, self.service.settings())
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to fetch settings"))
    }

    /// Applies a partial update. Empty updates never reach the service.
    ///
    /// # Errors
    /// Returns error if the service rejects the update or times out.
    pub async fn apply(&self, update: SettingsUpdate) -> Result<(), ServiceError> {
        if update.is_empty() {
            debug!("Skipping empty settings update");
            return Ok(());
        }

        debug!(?update, "Applying settings update");
        with_timeout(self.timeouts.request, self.service.update_settings(update))
            .await
            .inspect(|()| info!("Settings updated"))
            .inspect_err(|e| warn!(error = %e, "Failed to apply settings update"))
    }

    /// Lists systems sorted by display name.
    ///
    /// # Errors
    /// Returns error if the service fails or times out.
    pub async fn systems(&self) -> Result<Vec<System>, ServiceError> {
        let mut systems = with_timeout(self.timeouts.request, self.service.systems()).await?;
        systems.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(systems)
    }

    /// Lists connected readers.
    ///
    /// # Errors
    /// Returns error if the service fails or times out.
    pub async fn readers(&self) -> Result<Vec<ReaderInfo>, ServiceError> {
        with_timeout(self.timeouts.request, self.service.readers()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ScanMode;
    use crate::domain::ports::mocks::MockSettingsServicePort;
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_apply_sends_partial_update() {
        let update = SettingsUpdate::default().scan_mode(ScanMode::Hold);
        let mut service = MockSettingsServicePort::new();
        service
            .expect_update_settings()
            .with(eq(update.clone()))
            .times(1)
            .returning(|_| Ok(()));

        let use_case = SettingsUseCase::new(Arc::new(service), Timeouts::default());
        assert_ok!(use_case.apply(update).await);
    }

    #[tokio::test]
    async fn test_empty_update_is_not_sent() {
        let mut service = MockSettingsServicePort::new();
        service.expect_update_settings().never();

        let use_case = SettingsUseCase::new(Arc::new(service), Timeouts::default());
        assert_ok!(use_case.apply(SettingsUpdate::default()).await);
    }

    #[tokio::test]
    async fn test_systems_are_sorted_by_name() {
        let mut service = MockSettingsServicePort::new();
        service.expect_systems().returning(|| {
            Ok(vec![
                System::new("SNES", "Super Nintendo"),
                System::new("Genesis", "Mega Drive"),
                System::new("NES", "NES"),
            ])
        });

        let use_case = SettingsUseCase::new(Arc::new(service), Timeouts::default());
        let names: Vec<_> = use_case
            .systems()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Mega Drive", "NES", "Super Nintendo"]);
    }

    #[tokio::test]
    async fn test_load_failure_is_returned() {
        let mut service = MockSettingsServicePort::new();
        service
            .expect_settings()
            .returning(|| Err(ServiceError::unavailable("socket missing")));

        let use_case = SettingsUseCase::new(Arc::new(service), Timeouts::default());
        let err = assert_err!(use_case.load().await);
        assert!(err.is_retryable());
    }
}
