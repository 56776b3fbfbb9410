use super::adapter::ColorConverter;
use crate::infrastructure::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Named colour roles used by widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorToken {
    Background,
    Text,
    Primary,
    Secondary,
    Border,
    Label,
    Success,
    Warning,
    Error,
    HighlightFg,
    HighlightBg,
    FieldFocused,
}

impl ColorToken {
    pub const ALL: [Self; 12] = [
        Self::Background,
        Self::Text,
        Self::Primary,
        Self::Secondary,
        Self::Border,
        Self::Label,
        Self::Success,
        Self::Warning,
        Self::Error,
        Self::HighlightFg,
        Self::HighlightBg,
        Self::FieldFocused,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    background: Color,
    text: Color,
    primary: Color,
    secondary: Color,
    border: Color,
    label: Color,
    success: Color,
    warning: Color,
    error: Color,
    highlight_fg: Color,
    highlight_bg: Color,
    field_focused: Color,
}

impl Palette {
    const fn for_theme(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self {
                background: Color::Rgb(0, 0, 139),
                text: Color::White,
                primary: Color::Yellow,
                secondary: Color::Gray,
                border: Color::LightYellow,
                label: Color::Gray,
                success: Color::Green,
                warning: Color::Yellow,
                error: Color::Red,
                highlight_fg: Color::Black,
                highlight_bg: Color::Yellow,
                field_focused: Color::Rgb(0, 0, 255),
            },
            ThemeName::HighContrast => Self {
                background: Color::Rgb(0, 0, 0),
                text: Color::White,
                primary: Color::Yellow,
                secondary: Color::White,
                border: Color::Yellow,
                label: Color::White,
                success: Color::LightGreen,
                warning: Color::Yellow,
                error: Color::Red,
                highlight_fg: Color::Rgb(0, 0, 0),
                highlight_bg: Color::Yellow,
                field_focused: Color::Yellow,
            },
            ThemeName::Dracula => Self {
                background: Color::Rgb(0x28, 0x2a, 0x36),
                text: Color::Rgb(0xf8, 0xf8, 0xf2),
                primary: Color::Rgb(0xbd, 0x93, 0xf9),
                secondary: Color::Rgb(0x62, 0x72, 0xa4),
                border: Color::Rgb(0xbd, 0x93, 0xf9),
                label: Color::Rgb(0x62, 0x72, 0xa4),
                success: Color::Rgb(0x50, 0xfa, 0x7b),
                warning: Color::Rgb(0xf1, 0xfa, 0x8c),
                error: Color::Rgb(0xff, 0x55, 0x55),
                highlight_fg: Color::Rgb(0x28, 0x2a, 0x36),
                highlight_bg: Color::Rgb(0xbd, 0x93, 0xf9),
                field_focused: Color::Rgb(0x44, 0x47, 0x5a),
            },
            ThemeName::Nord => Self {
                background: Color::Rgb(0x2e, 0x34, 0x40),
                text: Color::Rgb(0xec, 0xef, 0xf4),
                primary: Color::Rgb(0x88, 0xc0, 0xd0),
                secondary: Color::Rgb(0xd8, 0xde, 0xe9),
                border: Color::Rgb(0x88, 0xc0, 0xd0),
                label: Color::Rgb(0x4c, 0x56, 0x6a),
                success: Color::Rgb(0xa3, 0xbe, 0x8c),
                warning: Color::Rgb(0xeb, 0xcb, 0x8b),
                error: Color::Rgb(0xbf, 0x61, 0x6a),
                highlight_fg: Color::Rgb(0x2e, 0x34, 0x40),
                highlight_bg: Color::Rgb(0x88, 0xc0, 0xd0),
                field_focused: Color::Rgb(0x3b, 0x42, 0x52),
            },
        }
    }
}

/// Resolved colours and derived styles for one [`ThemeName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: ThemeName,
    palette: Palette,
    /// Highlighted row in a focused region.
    pub selection_style: Style,
    /// Highlighted row in a region that does not hold focus.
    pub inactive_selection_style: Style,
    pub dimmed_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeName::default())
    }
}

impl Theme {
    #[must_use]
    pub fn new(name: ThemeName) -> Self {
        let palette = Palette::for_theme(name);

        let selection_style = Style::default()
            .fg(palette.highlight_fg)
            .bg(palette.highlight_bg)
            .add_modifier(Modifier::BOLD);

        let inactive_bg = ColorConverter::shade(palette.highlight_bg, 0.25, 0.35);
        let inactive_selection_style = Style::default().fg(palette.text).bg(inactive_bg);

        let dimmed_style = Style::default()
            .fg(palette.secondary)
            .bg(palette.background);

        Self {
            name,
            palette,
            selection_style,
            inactive_selection_style,
            dimmed_style,
        }
    }

    #[must_use]
    pub const fn color(&self, token: ColorToken) -> Color {
        let p = &self.palette;
        match token {
            ColorToken::Background => p.background,
            ColorToken::Text => p.text,
            ColorToken::Primary => p.primary,
            ColorToken::Secondary => p.secondary,
            ColorToken::Border => p.border,
            ColorToken::Label => p.label,
            ColorToken::Success => p.success,
            ColorToken::Warning => p.warning,
            ColorToken::Error => p.error,
            ColorToken::HighlightFg => p.highlight_fg,
            ColorToken::HighlightBg => p.highlight_bg,
            ColorToken::FieldFocused => p.field_focused,
        }
    }

    /// Foreground `token` on the theme background.
    #[must_use]
    pub const fn style(&self, token: ColorToken) -> Style {
        Style::new().fg(self.color(token)).bg(self.palette.background)
    }

    #[must_use]
    pub const fn base_style(&self) -> Style {
        self.style(ColorToken::Text)
    }

    /// Selection style depending on whether the owning region has focus.
    #[must_use]
    pub const fn highlight(&self, focused: bool) -> Style {
        if focused {
            self.selection_style
        } else {
            self.inactive_selection_style
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_resolves_every_token() {
        for name in ThemeName::ALL {
            let theme = Theme::new(name);
            for token in ColorToken::ALL {
                assert_ne!(theme.color(token), Color::Reset, "{name:?} {token:?}");
            }
        }
    }

    #[test]
    fn test_focused_highlight_uses_highlight_colors() {
        let theme = Theme::new(ThemeName::Default);
        let style = theme.highlight(true);
        assert_eq!(style.fg, Some(Color::Black));
        assert_eq!(style.bg, Some(Color::Yellow));
        assert_ne!(theme.highlight(false), style);
    }

    #[test]
    fn test_themes_differ() {
        assert_ne!(
            Theme::new(ThemeName::Dracula).color(ColorToken::Background),
            Theme::new(ThemeName::Nord).color(ColorToken::Background)
        );
    }
}
