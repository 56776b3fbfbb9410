//! Background token write with its waiting and result modals.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::application::WriteOutcome;
use crate::domain::errors::ServiceError;
use crate::presentation::context::UiContext;
use crate::presentation::events::UiMessage;
use crate::presentation::widgets::MessageModal;

pub(super) const WAITING_MESSAGE: &str = "Place tag on the reader...";
pub(super) const NO_TOKEN_MESSAGE: &str = "No token detected";
pub(super) const WRITE_FAILED_MESSAGE: &str = "Could not write the tag. Try again.";

/// At most one write in flight per page.
///
/// Every write gets an id; results carrying any other id belong to an
/// abandoned write and are dropped.
#[derive(Debug, Default)]
pub(super) struct TokenWrite {
    next_id: u64,
    pending: Option<(u64, CancellationToken)>,
}

impl TokenWrite {
    /// Spawns the write. Returns `false` when there is no runtime to run it on.
    pub(super) fn start(&mut self, text: String, ctx: &UiContext) -> bool {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return false;
        };
        self.cancel();

        self.next_id = self.next_id.wrapping_add(1);
        let id = self.next_id;
        let cancel = CancellationToken::new();
        let use_case = ctx.write_use_case();
        let ui = ctx.ui.clone();
        let token = cancel.clone();
        runtime.spawn(async move {
            let result = use_case.execute(text, token).await;
            ui.send(UiMessage::WriteFinished { id, result });
        });

        self.pending = Some((id, cancel));
        true
    }

    pub(super) fn cancel(&mut self) {
        if let Some((id, cancel)) = self.pending.take() {
            debug!(id, "Cancelling token write");
            cancel.cancel();
        }
    }

    /// Settles the write `id` and picks the modal for its result.
    ///
    /// Results of cancelled or superseded writes yield nothing.
    pub(super) fn finish(
        &mut self,
        id: u64,
        result: Result<WriteOutcome, ServiceError>,
        success: &str,
    ) -> Option<MessageModal> {
        if !matches!(self.pending, Some((pending, _)) if pending == id) {
            debug!(id, "Dropping result of an abandoned write");
            return None;
        }
        self.pending = None;

        match result {
            Ok(WriteOutcome::Written) => Some(MessageModal::info(success)),
            Ok(WriteOutcome::NoToken) => Some(MessageModal::info(NO_TOKEN_MESSAGE)),
            Ok(WriteOutcome::Cancelled) => None,
            Err(e) => {
                error!(error = %e, id, "Token write failed");
                Some(MessageModal::error(WRITE_FAILED_MESSAGE))
            }
        }
    }
}
