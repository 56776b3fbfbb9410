use crate::domain::keybinding::Keybind;
use crate::presentation::theme::{ColorToken, Theme};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct FooterBarStyle {
    pub key_style: Style,
    pub label_style: Style,
    pub separator_style: Style,
}

impl FooterBarStyle {
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            key_style: theme.style(ColorToken::Primary).add_modifier(Modifier::BOLD),
            label_style: theme.style(ColorToken::Secondary),
            separator_style: theme.style(ColorToken::Border),
        }
    }
}

/// Static key hints drawn into the bottom border of a frame, e.g.
/// `←↑↓→: Navigate | Enter: Select | ESC: Back`.
pub struct FooterBar<'a> {
    keybindings: Vec<&'a Keybind>,
    style: FooterBarStyle,
}

impl<'a> FooterBar<'a> {
    #[must_use]
    pub fn new(keybindings: impl IntoIterator<Item = &'a Keybind>, style: FooterBarStyle) -> Self {
        Self {
            keybindings: keybindings.into_iter().collect(),
            style,
        }
    }

    fn format_key(key: &KeyEvent) -> String {
        use std::fmt::Write;
        let mut s = String::new();
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }

        match key.code {
            KeyCode::Char(c) => s.push(c.to_ascii_uppercase()),
            KeyCode::Enter => s.push_str("Enter"),
            KeyCode::Esc => s.push_str("ESC"),
            KeyCode::Tab => s.push_str("Tab"),
            KeyCode::Backspace => s.push_str("Bksp"),
            KeyCode::Up => s.push('↑'),
            KeyCode::Down => s.push('↓'),
            KeyCode::Left => s.push('←'),
            KeyCode::Right => s.push('→'),
            code => {
                let _ = write!(s, "{code:?}");
            }
        }
        s
    }

    fn build_line(self) -> Line<'a> {
        let mut spans = vec![Span::styled(" ", self.style.separator_style)];

        for (i, binding) in self
            .keybindings
            .into_iter()
            .filter(|k| k.visible_in_bar)
            .enumerate()
        {
            if i > 0 {
                spans.push(Span::styled(" | ", self.style.separator_style));
            }

            let key_text = binding
                .key_display
                .as_deref()
                .map_or_else(|| Self::format_key(&binding.key), ToString::to_string);

            spans.push(Span::styled(key_text, self.style.key_style));
            spans.push(Span::styled(
                format!(": {}", binding.label),
                self.style.label_style,
            ));
        }

        spans.push(Span::styled(" ", self.style.separator_style));
        Line::from(spans)
    }
}

impl Widget for FooterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        Paragraph::new(self.build_line())
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::commands::KeyRules;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_renders_default_hints() {
        let rules = KeyRules::new();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);

        FooterBar::new(rules.hints(), FooterBarStyle::from_theme(&theme)).render(area, &mut buf);

        let text = row_text(&buf, 0);
        assert!(text.contains("←↑↓→: Navigate | Enter: Select | ESC: Back"), "{text}");
        assert!(!text.contains("Quit"));
    }

    #[test]
    fn test_format_key_with_modifier() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(FooterBar::format_key(&key), "Ctrl+C");
    }
}
