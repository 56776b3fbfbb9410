use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::component::{Component, Outcome};
use crate::domain::keybinding::Action;
use crate::presentation::commands::Input;
use crate::presentation::theme::{ColorToken, Theme};

const MAX_WIDTH: u16 = 60;
const MIN_WIDTH: u16 = 24;

/// Message box flavour; picks the title and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Info,
    Error,
    /// Waiting on something outside the program, e.g. a tag on the reader.
    Waiting,
    /// Yes/No question.
    Confirm,
}

impl ModalKind {
    const fn title(self) -> &'static str {
        match self {
            Self::Info => " Info ",
            Self::Error => " Error ",
            Self::Waiting => " Waiting ",
            Self::Confirm => " Confirm ",
        }
    }

    const fn buttons(self) -> &'static [&'static str] {
        match self {
            Self::Info | Self::Error => &["OK"],
            Self::Waiting => &["Cancel"],
            Self::Confirm => &["Yes", "No"],
        }
    }

    const fn token(self) -> ColorToken {
        match self {
            Self::Info => ColorToken::Primary,
            Self::Error => ColorToken::Error,
            Self::Waiting | Self::Confirm => ColorToken::Warning,
        }
    }
}

/// How a modal was closed.
///
/// Escape always declines. Single-button modals confirm on select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalResponse {
    Confirmed,
    Declined,
}

/// Message box drawn centered over the page.
///
/// Every kind has one button except [`ModalKind::Confirm`], which offers
/// Yes and No side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageModal {
    kind: ModalKind,
    message: String,
    choice: usize,
}

impl MessageModal {
    #[must_use]
    pub fn new(kind: ModalKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            choice: 0,
        }
    }

    #[must_use]
    pub fn confirm(message: impl Into<String>) -> Self {
        Self::new(ModalKind::Confirm, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ModalKind::Info, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ModalKind::Error, message)
    }

    #[must_use]
    pub fn waiting(message: impl Into<String>) -> Self {
        Self::new(ModalKind::Waiting, message)
    }

    #[must_use]
    pub const fn kind(&self) -> ModalKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Label of the highlighted button.
    #[must_use]
    pub fn selected_button(&self) -> &'static str {
        self.kind.buttons()[self.choice]
    }

    fn move_choice(&mut self, step: isize) -> Outcome<ModalResponse> {
        let count = self.kind.buttons().len();
        if count > 1 {
            self.choice = self.choice.saturating_add_signed(step).min(count - 1);
        }
        Outcome::Consumed
    }

    fn button_line(&self, theme: &Theme) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, label) in self.kind.buttons().iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            let style = if i == self.choice {
                theme.selection_style
            } else {
                theme.style(ColorToken::Text)
            };
            spans.push(Span::styled(format!(" {label} "), style));
        }
        Line::from(spans)
    }

    fn popup_area(&self, area: Rect) -> Rect {
        let max_width = MAX_WIDTH.min(area.width.saturating_sub(2));
        let message_width = u16::try_from(self.message.width()).unwrap_or(u16::MAX);
        let width = message_width
            .saturating_add(4)
            .clamp(MIN_WIDTH.min(max_width), max_width);

        let inner_width = width.saturating_sub(2).max(1);
        let lines = message_width.div_ceil(inner_width).max(1);
        // Borders, a blank spacer and the button row.
        let height = lines.saturating_add(4).min(area.height);

        Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        )
    }
}

impl Component for MessageModal {
    type Event = ModalResponse;

    fn handle_input(&mut self, input: Input) -> Outcome<ModalResponse> {
        match input {
            Input::Action(Action::Select) if self.choice == 0 => {
                Outcome::Event(ModalResponse::Confirmed)
            }
            Input::Action(Action::Select | Action::Cancel) => {
                Outcome::Event(ModalResponse::Declined)
            }
            Input::Action(Action::NavigateLeft) => self.move_choice(-1),
            Input::Action(Action::NavigateRight) => self.move_choice(1),
            Input::Action(Action::Quit) | Input::Ignored => Outcome::Ignored,
            _ => Outcome::Consumed,
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, _focused: bool) {
        let popup = self.popup_area(area);
        if popup.area() == 0 {
            return;
        }

        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.style(self.kind.token()))
            .style(theme.base_style())
            .title(self.kind.title());
        let inner = block.inner(popup);
        block.render(popup, buf);

        let button_row = inner.bottom().saturating_sub(1);
        let text_area = Rect {
            height: inner.height.saturating_sub(2),
            ..inner
        };
        Paragraph::new(self.message.as_str())
            .style(theme.style(ColorToken::Text).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        if inner.height > 0 {
            Paragraph::new(self.button_line(theme))
                .style(theme.base_style())
                .alignment(Alignment::Center)
                .render(Rect::new(inner.x, button_row, inner.width, 1), buf);
        }
    }
}
