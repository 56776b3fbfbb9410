//! Vertical multi-select list: every row is a checkbox.

use std::collections::BTreeSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::component::{Component, HelpSink, Outcome};
use crate::domain::errors::UiError;
use crate::domain::keybinding::{Action, Direction};
use crate::presentation::commands::Input;
use crate::presentation::theme::{ColorToken, Theme};

/// One checkbox row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    /// Text shown after the box.
    pub label: String,
    /// Value reported while checked.
    pub value: String,
}

impl CheckItem {
    /// Unchecked row.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Reported after every toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckEvent {
    /// Values now checked, in list order.
    Changed(Vec<String>),
}

/// Checkbox list; select flips the highlighted row.
#[derive(Debug, Clone, Default)]
pub struct CheckList {
    items: Vec<CheckItem>,
    checked: BTreeSet<usize>,
    current: usize,
    help_text: String,
    help: Option<HelpSink>,
    handoff: bool,
}

impl CheckList {
    /// `help_text` is shown on the help line for every row.
    #[must_use]
    pub fn new(items: Vec<CheckItem>, help_text: impl Into<String>) -> Self {
        Self {
            items,
            help_text: help_text.into(),
            ..Self::default()
        }
    }

    /// Rows in display order.
    #[must_use]
    pub fn items(&self) -> &[CheckItem] {
        &self.items
    }

    /// Highlighted row.
    #[must_use]
    pub const fn current_item(&self) -> usize {
        self.current
    }

    /// Whether row `index` is checked.
    #[must_use]
    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    /// Checked values in list order.
    #[must_use]
    pub fn selected(&self) -> Vec<String> {
        self.checked
            .iter()
            .filter_map(|&i| self.items.get(i))
            .map(|item| item.value.clone())
            .collect()
    }

    /// Number of checked rows.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.checked.len()
    }

    /// Checks exactly the rows whose value is in `values`; unknown values
    /// are skipped.
    pub fn set_selected(&mut self, values: &[String]) {
        self.checked = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| values.contains(&item.value))
            .map(|(i, _)| i)
            .collect();
    }

    fn toggle_current(&mut self) -> Outcome<CheckEvent> {
        if !self.checked.remove(&self.current) {
            self.checked.insert(self.current);
        }
        Outcome::Event(CheckEvent::Changed(self.selected()))
    }

    fn step(&mut self, direction: Direction) -> Outcome<CheckEvent> {
        let last = self.items.len().saturating_sub(1);
        let next = match direction {
            Direction::Up if self.current == 0 => None,
            Direction::Up => Some(self.current - 1),
            Direction::Down if self.current >= last => None,
            Direction::Down => Some(self.current + 1),
            Direction::Left | Direction::Right => return Outcome::Ignored,
        };

        match next {
            Some(index) => {
                self.current = index;
                Outcome::Consumed
            }
            None if self.handoff => Outcome::Boundary(direction),
            None => Outcome::Consumed,
        }
    }
}

impl Component for CheckList {
    type Event = CheckEvent;

    fn handle_input(&mut self, input: Input) -> Outcome<CheckEvent> {
        if self.items.is_empty() {
            return Outcome::Ignored;
        }

        match input.action() {
            Some(Action::Select) => self.toggle_current(),
            Some(action) => action
                .direction()
                .map_or(Outcome::Ignored, |direction| self.step(direction)),
            None => Outcome::Ignored,
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        if area.height == 0 || self.items.is_empty() {
            return;
        }
        buf.set_style(area, theme.base_style());

        let visible = usize::from(area.height);
        let first = self.current.saturating_sub(visible - 1);
        let lines: Vec<Line<'static>> = self
            .items
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, item)| {
                let mark = if self.is_checked(i) { "[*] " } else { "[ ] " };
                let label_style = if i == self.current {
                    theme.highlight(focused)
                } else {
                    theme.base_style()
                };
                Line::from(vec![
                    Span::styled(mark, theme.style(ColorToken::Primary)),
                    Span::styled(item.label.clone(), label_style),
                ])
            })
            .collect();

        Paragraph::new(lines).render(area, buf);
    }

    fn attach_help(&mut self, sink: HelpSink) {
        self.help = Some(sink);
        self.publish_help();
    }

    fn publish_help(&self) {
        if let Some(sink) = &self.help {
            sink.publish(self.help_text.clone());
        }
    }

    fn validate(&self) -> Result<(), UiError> {
        if self.items.is_empty() {
            return Err(UiError::EmptyCheckList);
        }
        Ok(())
    }

    fn set_boundary_handoff(&mut self, enabled: bool) {
        self.handoff = enabled;
    }
}
