use crossterm::event::KeyEvent;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,

    // Navigation / Focus
    NavigateUp,
    NavigateDown,
    NavigateLeft,
    NavigateRight,
    FocusNext,
    FocusPrevious,
    Select,

    // Input
    Backspace,
    Cancel,
}

impl Action {
    /// Returns the navigation direction carried by this action, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::NavigateUp => Some(Direction::Up),
            Self::NavigateDown => Some(Direction::Down),
            Self::NavigateLeft => Some(Direction::Left),
            Self::NavigateRight => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Focus movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybind {
    pub key: KeyEvent,
    pub action: Action,
    pub label: Cow<'static, str>,
    pub key_display: Option<Cow<'static, str>>,
    pub visible_in_bar: bool,
}

impl Keybind {
    pub fn new(key: KeyEvent, action: Action, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key,
            action,
            label: label.into(),
            key_display: None,
            visible_in_bar: true,
        }
    }

    /// Overrides the rendered key name (e.g. one hint covering all arrows).
    #[must_use]
    pub fn display_as(mut self, display: impl Into<Cow<'static, str>>) -> Self {
        self.key_display = Some(display.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible_in_bar = false;
        self
    }
}
