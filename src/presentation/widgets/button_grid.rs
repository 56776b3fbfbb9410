//! Fixed-column grid of buttons with two-dimensional navigation.

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

/// One grid cell's button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem<E> {
    label: String,
    help: String,
    event: E,
    disabled: bool,
}

impl<E> GridItem<E> {
    /// Enabled button reporting `event` when selected.
    #[must_use]
    pub fn new(label: impl Into<String>, help: impl Into<String>, event: E) -> Self {
        Self {
            label: label.into(),
            help: help.into(),
            event,
            disabled: false,
        }
    }

    /// Button caption.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the button is skipped by navigation.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Rows of up to `cols` buttons; a cell may be empty.
///
/// Left/right wrap within the row. When the neighbour is empty or disabled
/// the search continues cell by cell, spilling onto the next row, until an
/// enabled button turns up. Up/down wrap between rows and stay put when
/// the cell above or below cannot take focus.
#[derive(Debug, Clone)]
pub struct ButtonGrid<E> {
    cols: usize,
    rows: Vec<Vec<Option<GridItem<E>>>>,
    row: usize,
    col: usize,
    help: Option<HelpSink>,
}

impl<E: Clone + PartialEq> ButtonGrid<E> {
    /// Empty grid with `cols` columns (at least one).
    #[must_use]
    pub fn new(cols: usize) -> Self {
        Self {
            cols: cols.max(1),
            rows: Vec::new(),
            row: 0,
            col: 0,
            help: None,
        }
    }

    /// Appends a row, padded with empty cells or cut to the column count.
    #[must_use]
    pub fn add_row(mut self, mut items: Vec<Option<GridItem<E>>>) -> Self {
        items.resize_with(self.cols, || None);
        self.rows.push(items);
        self
    }

    fn item(&self, row: usize, col: usize) -> Option<&GridItem<E>> {
        self.rows.get(row)?.get(col)?.as_ref()
    }

    fn is_enabled(&self, row: usize, col: usize) -> bool {
        self.item(row, col).is_some_and(|item| !item.disabled)
    }

    /// Button under the cursor.
    #[must_use]
    pub fn focused_item(&self) -> Option<&GridItem<E>> {
        self.item(self.row, self.col)
    }

    /// Focused cell as `row * cols + col`.
    #[must_use]
    pub const fn focused_index(&self) -> usize {
        self.row * self.cols + self.col
    }

    /// Focuses the cell at `index`, moving on to the next enabled button
    /// when that cell cannot take focus.
    pub fn set_focused_index(&mut self, index: usize) {
        if self.rows.is_empty() {
            return;
        }
        let index = index.min(self.rows.len() * self.cols - 1);
        self.row = index / self.cols;
        self.col = index % self.cols;
        if !self.is_enabled(self.row, self.col) {
            self.find_next_enabled(true);
        }
        self.publish_help();
    }

    /// Focuses the first enabled button.
    pub fn focus_first(&mut self) {
        self.set_focused_index(0);
    }

    /// Enables or disables the button reporting `event`. Focus leaves a
    /// button when it is disabled.
    pub fn set_disabled(&mut self, event: &E, disabled: bool) {
        for item in self.rows.iter_mut().flatten().flatten() {
            if item.event == *event {
                item.disabled = disabled;
            }
        }
        if !self.is_enabled(self.row, self.col) {
            self.find_next_enabled(true);
            self.publish_help();
        }
    }

    /// Replaces the help text of the button reporting `event`.
    pub fn set_help(&mut self, event: &E, help: impl Into<String>) {
        let help = help.into();
        for item in self.rows.iter_mut().flatten().flatten() {
            if item.event == *event {
                item.help.clone_from(&help);
            }
        }
        self.publish_help();
    }

    /// Steps through cells in reading order (or against it) until an
    /// enabled button is found. Returns `false`, with focus unchanged,
    /// after a full lap without one.
    fn find_next_enabled(&mut self, forward: bool) -> bool {
        let rows = self.rows.len();
        if rows == 0 {
            return false;
        }
        let start = (self.row, self.col);
        let (mut row, mut col) = start;

        loop {
            if forward {
                col += 1;
                if col == self.cols {
                    col = 0;
                    row = (row + 1) % rows;
                }
            } else if col == 0 {
                col = self.cols - 1;
                row = (row + rows - 1) % rows;
            } else {
                col -= 1;
            }

            if (row, col) == start {
                return false;
            }
            if self.is_enabled(row, col) {
                self.row = row;
                self.col = col;
                return true;
            }
        }
    }

    fn move_focus(&mut self, direction: Direction) -> Outcome<E> {
        let rows = self.rows.len();
        match direction {
            Direction::Left | Direction::Right => {
                let forward = direction == Direction::Right;
                let col = if forward {
                    (self.col + 1) % self.cols
                } else {
                    (self.col + self.cols - 1) % self.cols
                };
                if self.is_enabled(self.row, col) {
                    self.col = col;
                } else {
                    self.find_next_enabled(forward);
                }
            }
            Direction::Up | Direction::Down => {
                let row = if direction == Direction::Up {
                    (self.row + rows - 1) % rows
                } else {
                    (self.row + 1) % rows
                };
                if self.is_enabled(row, self.col) {
                    self.row = row;
                }
            }
        }
        self.publish_help();
        Outcome::Consumed
    }

    fn button_style(&self, row: usize, col: usize, item: &GridItem<E>, theme: &Theme, focused: bool) -> Style {
        if item.disabled {
            theme.style(ColorToken::Label)
        } else if focused && (row, col) == (self.row, self.col) {
            theme.selection_style
        } else {
            Style::default()
                .fg(theme.color(ColorToken::Text))
                .bg(theme.color(ColorToken::FieldFocused))
        }
    }
}

impl<E: Clone + PartialEq> Component for ButtonGrid<E> {
    type Event = E;

    fn handle_input(&mut self, input: Input) -> Outcome<E> {
        if self.rows.is_empty() {
            return Outcome::Ignored;
        }

        match input.action() {
            Some(Action::Select) => match self.focused_item() {
                Some(item) if !item.disabled => Outcome::Event(item.event.clone()),
                _ => Outcome::Consumed,
            },
            Some(action) => action
                .direction()
                .map_or(Outcome::Ignored, |direction| self.move_focus(direction)),
            None => Outcome::Ignored,
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        if area.height == 0 || self.rows.is_empty() {
            return;
        }

        let mut constraints = Vec::with_capacity(self.cols * 2);
        for i in 0..self.cols {
            if i > 0 {
                constraints.push(Constraint::Length(1));
            }
            constraints.push(Constraint::Fill(1));
        }
        let row_areas = Layout::vertical(self.rows.iter().map(|_| Constraint::Length(1))).split(area);

        for (r, (cells, row_area)) in self.rows.iter().zip(row_areas.iter()).enumerate() {
            let columns = Layout::horizontal(constraints.clone()).split(*row_area);
            for (c, item) in cells.iter().enumerate() {
                let Some(item) = item else {
                    continue;
                };
                Paragraph::new(item.label.as_str())
                    .style(self.button_style(r, c, item, theme, focused))
                    .alignment(Alignment::Center)
                    .render(columns[c * 2], buf);
            }
        }
    }

    fn attach_help(&mut self, sink: HelpSink) {
        self.help = Some(sink);
        self.publish_help();
    }

    fn publish_help(&self) {
        if let (Some(sink), Some(item)) = (&self.help, self.focused_item()) {
            sink.publish(item.help.clone());
        }
    }

    fn validate(&self) -> Result<(), UiError> {
        let any_enabled = self.rows.iter().flatten().flatten().any(|item| !item.disabled);
        if !any_enabled {
            return Err(UiError::EmptyButtonGrid);
        }
        Ok(())
    }
}
