//! Messages queued from background tasks to the UI loop.

use tokio::sync::mpsc;
use tracing::debug;

use crate::application::WriteOutcome;
use crate::domain::entities::{
    IndexingProgress, Notification, SearchResults, Settings, SettingsUpdate, System,
};
use crate::domain::errors::ServiceError;

/// Result of handling a terminal event at the application level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Continue processing.
    Continue,
    /// Exit application.
    Exit,
}

/// Typed update applied by the UI loop before the next redraw.
#[derive(Debug, Clone, PartialEq)]
pub enum UiMessage {
    /// Repaint without any state change (animation ticks).
    Redraw,
    Notification(Notification),
    SettingsLoaded(Result<Settings, ServiceError>),
    /// The update that was sent, with the service's answer.
    SettingsApplied(SettingsUpdate, Result<(), ServiceError>),
    SystemsLoaded(Result<Vec<System>, ServiceError>),
    SearchFinished(Result<SearchResults, ServiceError>),
    /// Result of the write started under `id`.
    WriteFinished {
        id: u64,
        result: Result<WriteOutcome, ServiceError>,
    },
    MediaStatusLoaded(Result<Option<IndexingProgress>, ServiceError>),
    IndexingStarted(Result<(), ServiceError>),
}

/// Sending half of the UI message queue, cloned into background tasks.
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiMessage>,
}

impl UiHandle {
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<UiMessage>) -> Self {
        Self { tx }
    }

    /// Creates a handle together with its receiver.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queues a message. Returns false once the UI loop has gone away.
    pub fn send(&self, message: UiMessage) -> bool {
        if self.tx.send(message).is_err() {
            debug!("UI message queue closed");
            return false;
        }
        true
    }

    pub fn request_redraw(&self) -> bool {
        self.send(UiMessage::Redraw)
    }

    /// Raw sender for tasks that map their own payloads.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<UiMessage> {
        self.tx.clone()
    }
}
