//! Shared widget plumbing: key outcomes, the help sink and the
//! [`Component`] trait hosted by a page frame.

use std::sync::Arc;

use parking_lot::Mutex;
use ratatui::{buffer::Buffer, layout::Rect};

use crate::domain::errors::UiError;
use crate::domain::keybinding::Direction;
use crate::presentation::commands::Input;
use crate::presentation::theme::Theme;

/// What a widget did with an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<E> {
    /// Not handled; the host may act on it.
    Ignored,
    /// Handled internally, nothing to report.
    Consumed,
    /// Movement ran off an edge the widget hands over to its host.
    Boundary(Direction),
    /// The widget reports an event for the page to act on.
    Event(E),
}

impl<E> Outcome<E> {
    pub fn map<F>(self, f: impl FnOnce(E) -> F) -> Outcome<F> {
        match self {
            Self::Ignored => Outcome::Ignored,
            Self::Consumed => Outcome::Consumed,
            Self::Boundary(direction) => Outcome::Boundary(direction),
            Self::Event(event) => Outcome::Event(f(event)),
        }
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    /// Returns the event, if any.
    pub fn into_event(self) -> Option<E> {
        match self {
            Self::Event(event) => Some(event),
            _ => None,
        }
    }
}

/// Shared slot holding the help line text of a frame.
#[derive(Debug, Clone, Default)]
pub struct HelpSink(Arc<Mutex<String>>);

impl HelpSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, text: impl Into<String>) {
        *self.0.lock() = text.into();
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.0.lock().clone()
    }
}

/// A focusable region hosted by a `PageFrame`.
pub trait Component {
    /// Event reported to the owning page.
    type Event;

    fn handle_input(&mut self, input: Input) -> Outcome<Self::Event>;

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool);

    /// Connects the frame's help line. Called once when the component is attached.
    fn attach_help(&mut self, _sink: HelpSink) {}

    /// Re-publishes help for the current selection, after focus returns.
    fn publish_help(&self) {}

    /// Rejects components that cannot be focused meaningfully.
    ///
    /// # Errors
    /// Returns the violated contract.
    fn validate(&self) -> Result<(), UiError> {
        Ok(())
    }

    /// When enabled, moving past the first/last row reports a
    /// [`Outcome::Boundary`] instead of clamping.
    fn set_boundary_handoff(&mut self, _enabled: bool) {}
}
