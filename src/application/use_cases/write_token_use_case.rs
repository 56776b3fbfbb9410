//! Token write use case.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::services::{Timeouts, with_timeout};
use crate::domain::errors::{ServiceError, ValidationError};
use crate::domain::ports::SettingsServicePort;

/// Result of waiting for a token to write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// No token was placed on a reader before the wait expired.
    NoToken,
    Cancelled,
}

/// Writes text to the next token placed on a reader.
#[derive(Clone)]
pub struct WriteTokenUseCase {
    service: Arc<dyn SettingsServicePort>,
    timeouts: Timeouts,
}

impl WriteTokenUseCase {
    #[must_use]
    pub fn new(service: Arc<dyn SettingsServicePort>, timeouts: Timeouts) -> Self {
        Self { service, timeouts }
    }

    /// Checks the text before a write is started.
    ///
    /// # Errors
    /// Returns error for empty or whitespace-only text.
    pub fn validate(text: &str) -> Result<String, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::new("Text to write cannot be empty"));
        }
        Ok(text.to_string())
    }

    /// Waits up to the token timeout for a write. Expiry and cancellation
    /// both tell the service to stop waiting and are not errors.
    ///
    /// # Errors
    /// Returns error if the service fails the write.
    pub async fn execute(
        &self,
        text: String,
        cancel: CancellationToken,
    ) -> Result<WriteOutcome, ServiceError> {
        debug!(len = text.len(), "Waiting for token to write");

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => WriteOutcome::Cancelled,
            result = tokio::time::timeout(self.timeouts.token_wait, self.service.write_token(text)) => {
                match result {
                    Ok(Ok(())) => WriteOutcome::Written,
                    Ok(Err(e)) => {
                        warn!(error = %e, "Token write failed");
                        return Err(e);
                    }
                    Err(_) => WriteOutcome::NoToken,
                }
            }
        };

        match outcome {
            WriteOutcome::Written => info!("Token written"),
            WriteOutcome::NoToken | WriteOutcome::Cancelled => {
                info!(?outcome, "Token write abandoned");
                self.cancel_pending().await;
            }
        }
        Ok(outcome)
    }

    async fn cancel_pending(&self) {
        if let Err(e) = with_timeout(self.timeouts.request, self.service.cancel_write()).await {
            warn!(error = %e, "Failed to cancel pending token write");
        }
    }
}
