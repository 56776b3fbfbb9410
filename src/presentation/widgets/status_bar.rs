//! Single-row help / status line.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::presentation::theme::{ColorToken, Theme};

/// Status line severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    /// Help text for the focused item.
    #[default]
    Help,
    /// Informational.
    Info,
    /// Success.
    Success,
    /// Warning, used for rejected input.
    Warning,
    /// Error.
    Error,
}

impl StatusLevel {
    /// Returns the theme colour for the level.
    #[must_use]
    pub const fn token(self) -> ColorToken {
        match self {
            Self::Help => ColorToken::Label,
            Self::Info => ColorToken::Primary,
            Self::Success => ColorToken::Success,
            Self::Warning => ColorToken::Warning,
            Self::Error => ColorToken::Error,
        }
    }
}

/// Status line widget.
#[derive(Debug, Clone, Copy)]
pub struct StatusBar<'a> {
    text: &'a str,
    level: StatusLevel,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    #[must_use]
    pub const fn new(text: &'a str, level: StatusLevel, theme: &'a Theme) -> Self {
        Self { text, level, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let style = self.theme.style(self.level.token());
        buf.set_style(area, style);
        Paragraph::new(Line::from(self.text))
            .style(style)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
