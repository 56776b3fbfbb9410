//! Modal virtual keyboard for entering text with arrow keys only.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Widget},
};

use super::component::{Component, Outcome};
use super::keyboard_layout::{KeyCap, KeyboardLayout};
use crate::domain::keybinding::{Action, Direction};
use crate::presentation::commands::Input;
use crate::presentation::theme::{ColorToken, Theme};

/// Width of the key grid in cells.
pub const KEYBOARD_WIDTH: u16 = 39;
const KEY_WIDTH: u16 = 4;
const ACTION_KEY_WIDTH: u16 = 5;
const SPACE_KEY_WIDTH: u16 = 7;

/// What the keyboard reports when it closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardEvent {
    Submit(String),
    Cancel,
}

/// Text buffer plus the highlighted key of the current layout.
#[derive(Debug, Clone, Default)]
pub struct OnScreenKeyboard {
    text: String,
    cursor_row: usize,
    cursor_col: usize,
    shift_on: bool,
    symbols_on: bool,
}

impl OnScreenKeyboard {
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: initial.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Highlighted `(row, column)`.
    #[must_use]
    pub const fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    #[must_use]
    pub const fn layout(&self) -> KeyboardLayout {
        if self.symbols_on {
            KeyboardLayout::Symbols
        } else if self.shift_on {
            KeyboardLayout::Upper
        } else {
            KeyboardLayout::Lower
        }
    }

    #[must_use]
    pub fn focused_key(&self) -> Option<KeyCap> {
        self.layout().key(self.cursor_row, self.cursor_col)
    }

    fn move_cursor(&mut self, direction: Direction) {
        let layout = self.layout();
        let row_len = layout.rows()[self.cursor_row].len();
        match direction {
            Direction::Left => {
                self.cursor_col = (self.cursor_col + row_len - 1) % row_len;
            }
            Direction::Right => {
                self.cursor_col = (self.cursor_col + 1) % row_len;
            }
            Direction::Up | Direction::Down => {
                let target = if direction == Direction::Up {
                    layout.row_above(self.cursor_row)
                } else {
                    layout.row_below(self.cursor_row)
                };
                self.cursor_col = layout.remap_column(self.cursor_row, target, self.cursor_col);
                self.cursor_row = target;
            }
        }
    }

    /// Keeps the cursor on a real key after the layout changed underneath it.
    fn clamp_cursor(&mut self) {
        let rows = self.layout().rows();
        if rows[self.cursor_row].is_empty() {
            self.cursor_row = self.layout().row_above(self.cursor_row);
        }
        self.cursor_col = self.cursor_col.min(rows[self.cursor_row].len() - 1);
    }

    fn press(&mut self, key: KeyCap) -> Outcome<KeyboardEvent> {
        match key {
            KeyCap::Char(c) => {
                self.text.push_str(c);
                if self.shift_on && !self.symbols_on {
                    self.shift_on = false;
                }
            }
            KeyCap::Space => self.text.push(' '),
            KeyCap::Delete => {
                self.text.pop();
            }
            KeyCap::Submit => return Outcome::Event(KeyboardEvent::Submit(self.text.clone())),
            KeyCap::Cancel => return Outcome::Event(KeyboardEvent::Cancel),
            KeyCap::Shift => {
                self.shift_on = !self.shift_on;
                self.symbols_on = false;
            }
            KeyCap::Symbols => {
                self.symbols_on = true;
                self.shift_on = false;
                self.cursor_col = 0;
            }
            KeyCap::Letters => {
                self.symbols_on = false;
                self.cursor_col = 0;
            }
        }
        self.clamp_cursor();
        Outcome::Consumed
    }

    fn popup_area(area: Rect) -> Rect {
        let width = (KEYBOARD_WIDTH + 2).min(area.width);
        let rows = u16::try_from(KeyboardLayout::Lower.rows().len()).unwrap_or(u16::MAX);
        let height = (rows + 3).min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }

    fn key_style(&self, key: KeyCap, selected: bool, theme: &Theme) -> Style {
        if selected {
            theme.selection_style
        } else if key.is_action() {
            Style::default()
                .fg(theme.color(ColorToken::Label))
                .bg(theme.color(ColorToken::Background))
        } else if self.shift_on && !self.symbols_on {
            theme.base_style().add_modifier(Modifier::BOLD)
        } else {
            theme.base_style()
        }
    }

    fn draw_input_line(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let style = Style::default()
            .fg(theme.color(ColorToken::Text))
            .bg(theme.color(ColorToken::FieldFocused));
        buf.set_style(area, style);

        let max_len = usize::from(area.width.saturating_sub(2));
        let count = self.text.chars().count();
        let shown: String = self.text.chars().skip(count.saturating_sub(max_len)).collect();
        buf.set_stringn(area.x + 1, area.y, &shown, max_len, style);

        let cursor_x = area.x + 1 + u16::try_from(shown.chars().count()).unwrap_or(0);
        if cursor_x < area.right().saturating_sub(1) {
            buf.set_string(cursor_x, area.y, "_", style.add_modifier(Modifier::SLOW_BLINK));
        }
    }

    fn draw_key(buf: &mut Buffer, x: u16, y: u16, width: u16, label: &str, style: Style) {
        let label_width = u16::try_from(label.chars().count()).unwrap_or(width);
        let padding = width.saturating_sub(label_width) / 2;
        let cell = Rect::new(x, y, width, 1).intersection(buf.area);
        buf.set_style(cell, style);
        if cell.width > padding {
            buf.set_stringn(x + padding, y, label, usize::from(cell.width - padding), style);
        }
    }

    fn draw_row(&self, row: usize, x: u16, y: u16, buf: &mut Buffer, theme: &Theme) {
        let layout = self.layout();
        let keys = layout.rows()[row];
        let selected = |col: usize| row == self.cursor_row && col == self.cursor_col;

        if row != layout.bottom_row() {
            for (col, key) in (0u16..).zip(keys.iter()) {
                let style = self.key_style(*key, selected(usize::from(col)), theme);
                Self::draw_key(buf, x + col * KEY_WIDTH, y, KEY_WIDTH - 1, key.label(), style);
            }
            return;
        }

        // Left group, a wide centered space bar, right group flush right.
        let space_index = keys.iter().position(|k| *k == KeyCap::Space).unwrap_or(0);
        let right_count = u16::try_from(keys.len() - space_index - 1).unwrap_or(0);
        let space_x = x + (KEYBOARD_WIDTH - SPACE_KEY_WIDTH) / 2;
        let right_x = x + KEYBOARD_WIDTH - right_count * ACTION_KEY_WIDTH;

        for (col, key) in keys.iter().enumerate() {
            let offset = u16::try_from(col).unwrap_or(0);
            let (key_x, width) = match col.cmp(&space_index) {
                std::cmp::Ordering::Less => (x + offset * ACTION_KEY_WIDTH, ACTION_KEY_WIDTH - 1),
                std::cmp::Ordering::Equal => (space_x, SPACE_KEY_WIDTH - 1),
                std::cmp::Ordering::Greater => {
                    let index = offset - u16::try_from(space_index).unwrap_or(0) - 1;
                    (right_x + index * ACTION_KEY_WIDTH, ACTION_KEY_WIDTH - 1)
                }
            };
            let style = self.key_style(*key, selected(col), theme);
            Self::draw_key(buf, key_x, y, width, key.label(), style);
        }
    }
}

impl Component for OnScreenKeyboard {
    type Event = KeyboardEvent;

    fn handle_input(&mut self, input: Input) -> Outcome<KeyboardEvent> {
        match input {
            Input::Char(c) => {
                self.text.push(c);
                Outcome::Consumed
            }
            Input::Action(Action::Backspace) => {
                self.text.pop();
                Outcome::Consumed
            }
            Input::Action(Action::Cancel) => Outcome::Event(KeyboardEvent::Cancel),
            Input::Action(Action::Select) => match self.focused_key() {
                Some(key) => self.press(key),
                None => Outcome::Consumed,
            },
            Input::Action(action) => match action.direction() {
                Some(direction) => {
                    self.move_cursor(direction);
                    Outcome::Consumed
                }
                None => Outcome::Ignored,
            },
            Input::Ignored => Outcome::Ignored,
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, _focused: bool) {
        let popup = Self::popup_area(area);
        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.style(ColorToken::Primary))
            .style(theme.base_style())
            .title(" Keyboard ");
        let inner = block.inner(popup);
        block.render(popup, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        self.draw_input_line(Rect { height: 1, ..inner }, buf, theme);

        let grid_x = inner.x + inner.width.saturating_sub(KEYBOARD_WIDTH) / 2;
        for (row, y) in (0..self.layout().rows().len()).zip(inner.y + 1..inner.bottom()) {
            self.draw_row(row, grid_x, y, buf, theme);
        }
    }
}
