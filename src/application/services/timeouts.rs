use std::future::Future;
use std::time::Duration;

use crate::domain::errors::ServiceError;

/// Limit for ordinary service requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Limit for waiting on a token during a write.
pub const DEFAULT_TOKEN_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Time limits applied to service calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Ordinary request/response calls.
    pub request: Duration,
    /// Waiting for a physical token on the reader.
    pub token_wait: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: DEFAULT_REQUEST_TIMEOUT,
            token_wait: DEFAULT_TOKEN_WAIT_TIMEOUT,
        }
    }
}

impl Timeouts {
    /// Limits as stored in the config file.
    #[must_use]
    pub const fn from_millis(request_ms: u64, token_wait_ms: u64) -> Self {
        Self {
            request: Duration::from_millis(request_ms),
            token_wait: Duration::from_millis(token_wait_ms),
        }
    }
}

/// Runs a service call, mapping expiry of `limit` to [`ServiceError::Timeout`].
///
/// # Errors
/// Returns the call's own error, or a timeout error.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| ServiceError::timeout(limit))?
}
