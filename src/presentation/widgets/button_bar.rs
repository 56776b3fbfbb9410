//! Horizontal row of buttons.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::component::{Component, HelpSink, Outcome};
use crate::domain::errors::UiError;
use crate::domain::keybinding::{Action, Direction};
use crate::presentation::commands::Input;
use crate::presentation::theme::{ColorToken, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button<E> {
    label: String,
    help: Option<String>,
    event: E,
}

impl<E> Button<E> {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// What happens when focus leaves the bar in a given direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hook<E> {
    /// Hand focus to the sibling region of the hosting frame.
    Sibling,
    /// Report an event to the page.
    Emit(E),
}

/// Buttons navigated with left/right; up/down leave through hooks.
///
/// Left/right wrap around, except at an edge where a left/right hook is
/// registered; that hook fires instead.
#[derive(Debug, Clone)]
pub struct ButtonBar<E> {
    buttons: Vec<Button<E>>,
    focused: usize,
    on_up: Option<Hook<E>>,
    on_down: Option<Hook<E>>,
    on_left: Option<Hook<E>>,
    on_right: Option<Hook<E>>,
    on_escape: Option<E>,
    help: Option<HelpSink>,
}

impl<E> Default for ButtonBar<E> {
    fn default() -> Self {
        Self {
            buttons: Vec::new(),
            focused: 0,
            on_up: None,
            on_down: None,
            on_left: None,
            on_right: None,
            on_escape: None,
            help: None,
        }
    }
}

impl<E: Clone> ButtonBar<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_button(mut self, label: impl Into<String>, event: E) -> Self {
        self.buttons.push(Button {
            label: label.into(),
            help: None,
            event,
        });
        self
    }

    #[must_use]
    pub fn add_button_with_help(
        mut self,
        label: impl Into<String>,
        help: impl Into<String>,
        event: E,
    ) -> Self {
        self.buttons.push(Button {
            label: label.into(),
            help: Some(help.into()),
            event,
        });
        self
    }

    /// Registers the event reported for escape, whichever button is focused.
    #[must_use]
    pub fn setup_navigation(mut self, on_escape: E) -> Self {
        self.on_escape = Some(on_escape);
        self
    }

    pub fn set_on_up(&mut self, hook: Hook<E>) {
        self.on_up = Some(hook);
    }

    pub fn set_on_down(&mut self, hook: Hook<E>) {
        self.on_down = Some(hook);
    }

    pub fn set_on_left(&mut self, hook: Hook<E>) {
        self.on_left = Some(hook);
    }

    pub fn set_on_right(&mut self, hook: Hook<E>) {
        self.on_right = Some(hook);
    }

    /// Whether moving down hands focus to the sibling region.
    #[must_use]
    pub const fn links_down(&self) -> bool {
        matches!(self.on_down, Some(Hook::Sibling))
    }

    /// Relabels a button in place; focus is left alone.
    ///
    /// # Errors
    /// Returns error if `index` does not name a button.
    pub fn update_button_label(&mut self, index: usize, label: impl Into<String>) -> Result<(), UiError> {
        let len = self.buttons.len();
        let button = self
            .buttons
            .get_mut(index)
            .ok_or(UiError::ButtonIndexOutOfRange { index, len })?;
        button.label = label.into();
        Ok(())
    }

    #[must_use]
    pub fn buttons(&self) -> &[Button<E>] {
        &self.buttons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    #[must_use]
    pub const fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn set_focused_index(&mut self, index: usize) {
        self.focused = index.min(self.buttons.len().saturating_sub(1));
        self.publish_help();
    }

    fn fire(hook: Option<&Hook<E>>, direction: Direction) -> Outcome<E> {
        match hook {
            Some(Hook::Sibling) => Outcome::Boundary(direction),
            Some(Hook::Emit(event)) => Outcome::Event(event.clone()),
            None => Outcome::Consumed,
        }
    }

    fn move_focus(&mut self, direction: Direction) -> Outcome<E> {
        let len = self.buttons.len();
        let last = len - 1;
        match direction {
            Direction::Up => Self::fire(self.on_up.as_ref(), direction),
            Direction::Down => Self::fire(self.on_down.as_ref(), direction),
            Direction::Left if self.focused == 0 && self.on_left.is_some() => {
                Self::fire(self.on_left.as_ref(), direction)
            }
            Direction::Right if self.focused == last && self.on_right.is_some() => {
                Self::fire(self.on_right.as_ref(), direction)
            }
            Direction::Left => {
                self.focused = (self.focused + len - 1) % len;
                self.publish_help();
                Outcome::Consumed
            }
            Direction::Right => {
                self.focused = (self.focused + 1) % len;
                self.publish_help();
                Outcome::Consumed
            }
        }
    }

    fn button_style(&self, index: usize, theme: &Theme, focused: bool) -> Style {
        if index == self.focused && focused {
            theme.selection_style
        } else {
            Style::default()
                .fg(theme.color(ColorToken::Text))
                .bg(theme.color(ColorToken::FieldFocused))
        }
    }
}

impl<E: Clone> Component for ButtonBar<E> {
    type Event = E;

    fn handle_input(&mut self, input: Input) -> Outcome<E> {
        if self.buttons.is_empty() {
            return Outcome::Ignored;
        }

        match input.action() {
            Some(Action::Select) => Outcome::Event(self.buttons[self.focused].event.clone()),
            Some(Action::Cancel) => self
                .on_escape
                .clone()
                .map_or(Outcome::Ignored, Outcome::Event),
            Some(action) => action
                .direction()
                .map_or(Outcome::Ignored, |direction| self.move_focus(direction)),
            None => Outcome::Ignored,
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        if area.height == 0 || self.buttons.is_empty() {
            return;
        }

        let mut constraints = Vec::with_capacity(self.buttons.len() * 2);
        for i in 0..self.buttons.len() {
            if i > 0 {
                constraints.push(Constraint::Length(1));
            }
            constraints.push(Constraint::Fill(1));
        }
        let cells = Layout::horizontal(constraints).split(area);

        for (i, button) in self.buttons.iter().enumerate() {
            let cell = cells[i * 2];
            Paragraph::new(button.label.as_str())
                .style(self.button_style(i, theme, focused))
                .alignment(Alignment::Center)
                .render(cell, buf);
        }
    }

    fn attach_help(&mut self, sink: HelpSink) {
        self.help = Some(sink);
    }

    fn publish_help(&self) {
        if let (Some(sink), Some(help)) = (
            &self.help,
            self.buttons.get(self.focused).and_then(|b| b.help.as_ref()),
        ) {
            sink.publish(help.clone());
        }
    }
}
