//! Media search use case.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::services::{Timeouts, with_timeout};
use crate::domain::entities::{SearchQuery, SearchResults};
use crate::domain::errors::{ServiceError, ValidationError};
use crate::domain::ports::SettingsServicePort;

/// Validates search filters and runs the query.
#[derive(Clone)]
pub struct SearchMediaUseCase {
    service: Arc<dyn SettingsServicePort>,
    timeouts: Timeouts,
}

impl SearchMediaUseCase {
    #[must_use]
    pub fn new(service: Arc<dyn SettingsServicePort>, timeouts: Timeouts) -> Self {
        Self { service, timeouts }
    }

    /// Builds a query from the form fields. An empty system id means all.
    ///
    /// # Errors
    /// Returns error when neither a name nor a system narrows the search.
    pub fn validate(name: &str, system_id: &str) -> Result<SearchQuery, ValidationError> {
        let name = name.trim();
        if name.is_empty() && system_id.is_empty() {
            return Err(ValidationError::new(
                "Enter a name or pick a system to search",
            ));
        }

        Ok(SearchQuery {
            name: name.to_string(),
            system: (!system_id.is_empty()).then(|| system_id.to_string()),
        })
    }

    /// Runs the search.
    ///
    /// # Errors
    /// Returns error if the service fails or times out.
    pub async fn execute(&self, query: SearchQuery) -> Result<SearchResults, ServiceError> {
        debug!(name = %query.name, system = ?query.system, "Searching media");
        with_timeout(self.timeouts.request, self.service.search_media(query))
            .await
            .inspect(|results| debug!(total = results.total, "Search finished"))
            .inspect_err(|e| warn!(error = %e, "Media search failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{MediaResult, System};
    use crate::domain::ports::mocks::MockSettingsServicePort;
    use test_case::test_case;

    #[test_case("", "" ; "nothing")]
    #[test_case("   ", "" ; "whitespace name")]
    fn test_rejects_unfiltered_search(name: &str, system: &str) {
        assert!(SearchMediaUseCase::validate(name, system).is_err());
    }

    #[test]
    fn test_system_only_search_is_valid() {
        let query = SearchMediaUseCase::validate("", "NES").unwrap();
        assert_eq!(query.name, "");
        assert_eq!(query.system.as_deref(), Some("NES"));
    }

    #[test]
    fn test_name_is_trimmed() {
        let query = SearchMediaUseCase::validate("  mario ", "").unwrap();
        assert_eq!(query.name, "mario");
        assert!(query.system.is_none());
    }

    #[tokio::test]
    async fn test_execute_returns_results() {
        let mut service = MockSettingsServicePort::new();
        service.expect_search_media().returning(|query| {
            Ok(SearchResults {
                results: vec![MediaResult {
                    name: format!("{} World", query.name),
                    path: "/media/snes/smw.sfc".to_string(),
                    zapscript: "@snes/smw".to_string(),
                    system: System::new("SNES", "Super Nintendo"),
                }],
                total: 1,
            })
        });

        let use_case = SearchMediaUseCase::new(Arc::new(service), Timeouts::default());
        let query = SearchMediaUseCase::validate("Mario", "").unwrap();
        let results = use_case.execute(query).await.unwrap();

        assert_eq!(results.total, 1);
        assert_eq!(results.results[0].name, "Mario World");
    }
}
