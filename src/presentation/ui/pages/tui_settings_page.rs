//! Local TUI preferences stored in the app config file.

use ratatui::{buffer::Buffer, layout::Rect};
use tracing::info;

use crate::domain::entities::{PageId, WriteFormat};
use crate::domain::errors::UiError;
use crate::infrastructure::ThemeName;
use crate::presentation::commands::Input;
use crate::presentation::context::UiContext;
use crate::presentation::ui::page::{Page, PageCommand, breadcrumb, escape_command};
use crate::presentation::widgets::{ButtonBar, MenuEvent, Outcome, PageFrame, SettingsList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiKey {
    Theme,
    Mouse,
    CrtMode,
    WriteFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TuiEvent {
    Menu(MenuEvent<TuiKey>),
    Back,
}

pub struct TuiSettingsPage {
    frame: PageFrame<SettingsList<TuiKey>, TuiEvent>,
}

impl TuiSettingsPage {
    /// # Errors
    /// Returns error if the settings list cannot be built.
    pub fn new(ctx: &UiContext) -> Result<Self, UiError> {
        let config = ctx.config_snapshot();

        let mut list = SettingsList::new();
        list.add_cycle(
            TuiKey::Theme,
            "Theme",
            "Visual theme for the TUI",
            ThemeName::ALL.iter().map(|t| t.display_name().to_string()).collect(),
            config.theme.index(),
        )?
        .add_toggle(TuiKey::Mouse, "Mouse support", "Enable mouse input in TUI", config.mouse)
        .add_toggle(
            TuiKey::CrtMode,
            "CRT mode",
            "Fixed 75x15 window (restart required)",
            config.crt_mode,
        )
        .add_cycle(
            TuiKey::WriteFormat,
            "Write format",
            "Format for tag writes from search",
            WriteFormat::ALL.iter().map(|f| f.label().to_string()).collect(),
            config.write_format.index(),
        )?;

        let buttons = ButtonBar::new()
            .add_button_with_help("Back", "Back to settings", TuiEvent::Back)
            .setup_navigation(TuiEvent::Back);

        let frame = PageFrame::new(TuiEvent::Back)
            .with_title(&breadcrumb(PageId::TuiSettings))
            .with_content(list, TuiEvent::Menu)?
            .with_button_bar(buttons)
            .link_content_to_button_bar();

        Ok(Self { frame })
    }

    fn apply(event: MenuEvent<TuiKey>, ctx: &UiContext) -> PageCommand {
        match event {
            MenuEvent::Cycled { key: TuiKey::Theme, index, .. } => {
                let theme = ThemeName::from_index(index);
                info!(theme = theme.display_name(), "Theme changed");
                ctx.persist_config(|config| config.theme = theme);
                PageCommand::SetTheme(theme)
            }
            MenuEvent::Toggled { key: TuiKey::Mouse, value } => {
                ctx.persist_config(|config| config.mouse = value);
                PageCommand::SetMouse(value)
            }
            MenuEvent::Toggled { key: TuiKey::CrtMode, value } => {
                ctx.persist_config(|config| config.crt_mode = value);
                PageCommand::None
            }
            MenuEvent::Cycled { key: TuiKey::WriteFormat, index, .. } => {
                let format = WriteFormat::from_index(index);
                ctx.persist_config(|config| config.write_format = format);
                PageCommand::None
            }
            _ => PageCommand::None,
        }
    }
}

impl Page for TuiSettingsPage {
    fn id(&self) -> PageId {
        PageId::TuiSettings
    }

    fn handle_input(&mut self, input: Input, ctx: &UiContext) -> PageCommand {
        match self.frame.handle_input(input) {
            Outcome::Event(TuiEvent::Back) => escape_command(PageId::TuiSettings),
            Outcome::Event(TuiEvent::Menu(event)) => Self::apply(event, ctx),
            _ => PageCommand::None,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &UiContext) {
        self.frame.render(area, buf, &ctx.theme, ctx.keys.hints());
    }
}
