use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::timeouts::{Timeouts, with_timeout};
use crate::domain::entities::Notification;
use crate::domain::ports::SettingsServicePort;

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Background task relaying service notifications to the UI loop.
pub struct NotificationWatcher {
    service: Arc<dyn SettingsServicePort>,
    timeouts: Timeouts,
    retry_delay: Duration,
}

impl NotificationWatcher {
    /// Watcher over `service`; the readers fetch uses the request timeout.
    #[must_use]
    pub fn new(service: Arc<dyn SettingsServicePort>, timeouts: Timeouts) -> Self {
        Self {
            service,
            timeouts,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Pause between retries after a transient notification failure.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Spawns the watcher. It first reports the current readers, then
    /// forwards every notification through `map` until `cancel` fires,
    /// the receiver goes away or the service fails permanently.
    ///
    /// A failed readers fetch and a permanent failure are both reported as
    /// [`Notification::ServiceUnavailable`].
    pub fn spawn<M, F>(
        self,
        cancel: CancellationToken,
        tx: mpsc::UnboundedSender<M>,
        map: F,
    ) -> JoinHandle<()>
    where
        M: Send + 'static,
        F: Fn(Notification) -> M + Send + 'static,
    {
        let Self {
            service,
            timeouts,
            retry_delay,
        } = self;

        tokio::spawn(async move {
            let readers = tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                readers = with_timeout(timeouts.request, service.readers()) => readers,
            };
            let first = readers.map_or_else(
                |e| {
                    warn!(error = %e, "Failed to fetch connected readers");
                    Notification::ServiceUnavailable
                },
                Notification::ReadersChanged,
            );
            if tx.send(map(first)).is_err() {
                return;
            }

            loop {
                let next = tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    next = service.next_notification() => next,
                };

                match next {
                    Ok(notification) => {
                        debug!(?notification, "Service notification");
                        if tx.send(map(notification)).is_err() {
                            debug!("Notification channel closed");
                            break;
                        }
                    }
                    Err(e) if e.is_retryable() => {
                        warn!(error = %e, "Notification wait failed, retrying");
                        tokio::select! {
                            biased;
                            () = cancel.cancelled() => break,
                            () = tokio::time::sleep(retry_delay) => {}
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Notification wait failed permanently");
                        let _ = tx.send(map(Notification::ServiceUnavailable));
                        break;
                    }
                }
            }

            debug!("Notification watcher stopped");
        })
    }
}
