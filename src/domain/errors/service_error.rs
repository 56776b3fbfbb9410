//! Settings service error types.

use std::time::Duration;

use thiserror::Error;

/// Failures reported by the local settings/control service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ServiceError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("service unavailable: {message}")]
    Unavailable { message: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("request rejected by service: {message}")]
    Rejected { message: String },

    #[error("operation cancelled")]
    Cancelled,
}

impl ServiceError {
    /// Creates timeout error.
    #[must_use]
    pub fn timeout(limit: Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Creates unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Unavailable { .. } | Self::Transport { .. }
        )
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_retryable() {
        let err = ServiceError::timeout(Duration::from_secs(5));
        assert!(err.is_retryable());
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "request timed out after 5000ms");
    }

    #[test]
    fn test_rejected_is_not_retryable() {
        assert!(!ServiceError::rejected("bad scan mode").is_retryable());
        assert!(!ServiceError::Cancelled.is_retryable());
    }
}
