//! Service settings fetched from and applied to the settings service.
//!
//! One page type serves the top-level settings menu and the readers
//! submenu; each shows the subset of [`SettingKey`] rows it was built with.

use ratatui::{buffer::Buffer, layout::Rect};
use tracing::{error, info, warn};

use crate::domain::entities::{EXIT_DELAY_OPTIONS, ExitDelayOption, PageId, ScanMode, Settings, SettingsUpdate};
use crate::domain::errors::UiError;
use crate::presentation::commands::Input;
use crate::presentation::context::UiContext;
use crate::presentation::events::UiMessage;
use crate::presentation::ui::page::{Page, PageCommand, breadcrumb, escape_command};
use crate::presentation::widgets::{ButtonBar, MenuEvent, MessageModal, Outcome, PageFrame, SettingsList};

pub(super) const APPLY_FAILED_MESSAGE: &str = "Failed to save setting";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingKey {
    Audio,
    Readers,
    Debug,
    Tui,
    AutoDetect,
    ScanMode,
    ExitDelay,
    IgnoreSystems,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SettingsEvent {
    Menu(MenuEvent<SettingKey>),
    Back,
    /// Loading was cancelled or failed and the error was acknowledged.
    Abandon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Loading,
    Ready,
    Failed,
}

/// Service settings: the main menu or the Readers submenu.
pub struct SettingsPage {
    id: PageId,
    frame: PageFrame<SettingsList<SettingKey>, SettingsEvent>,
    state: LoadState,
    /// Values the service has accepted; rejected updates fall back to these.
    confirmed: Settings,
}

impl SettingsPage {
    /// Top-level settings menu.
    ///
    /// # Errors
    /// Returns error if the settings list cannot be built.
    pub fn new() -> Result<Self, UiError> {
        let settings = Settings::default();
        let mut list = SettingsList::new();
        list.add_toggle(
            SettingKey::Audio,
            "Audio feedback",
            "Enable or disable the audio notification on scan",
            settings.audio_feedback,
        )
        .add_action(SettingKey::Readers, "Readers", "Reader detection and scan behavior")
        .add_toggle(
            SettingKey::Debug,
            "Debug logging",
            "Write verbose logs for troubleshooting",
            settings.debug_logging,
        )
        .add_action(SettingKey::Tui, "TUI settings", "Theme, mouse and display options");

        Self::build(PageId::Settings, list, "Back to main menu")
    }

    /// Readers submenu: detection, scan mode, exit delay and ignored systems.
    ///
    /// # Errors
    /// Returns error if the settings list cannot be built.
    pub fn readers() -> Result<Self, UiError> {
        let settings = Settings::default();
        let delays: Vec<String> = EXIT_DELAY_OPTIONS.iter().map(|o| o.label.to_string()).collect();

        let mut list = SettingsList::new();
        list.add_toggle(
            SettingKey::AutoDetect,
            "Auto-detect readers",
            "Look for newly connected readers automatically",
            settings.auto_detect_readers,
        )
        .add_cycle(
            SettingKey::ScanMode,
            "Scan mode",
            "Tap: launch on scan. Hold: exit when the token is removed",
            ScanMode::ALL.iter().map(|m| m.label().to_string()).collect(),
            settings.scan_mode.index(),
        )?
        .add_cycle(
            SettingKey::ExitDelay,
            "Exit delay",
            "Delay before exiting media after the token is removed",
            delays,
            ExitDelayOption::nearest_index(settings.exit_delay_secs),
        )?
        .add_action(
            SettingKey::IgnoreSystems,
            "Ignore systems",
            "Systems whose tokens are not launched on scan",
        );

        Self::build(PageId::ReaderSettings, list, "Back to settings")
    }

    fn build(id: PageId, list: SettingsList<SettingKey>, back_help: &str) -> Result<Self, UiError> {
        let buttons = ButtonBar::new()
            .add_button_with_help("Back", back_help, SettingsEvent::Back)
            .setup_navigation(SettingsEvent::Back);

        let frame = PageFrame::new(SettingsEvent::Back)
            .with_title(&breadcrumb(id))
            .with_content(list, SettingsEvent::Menu)?
            .with_button_bar(buttons)
            .link_content_to_button_bar();

        Ok(Self {
            id,
            frame,
            state: LoadState::Loading,
            confirmed: Settings::default(),
        })
    }

    fn list_mut(&mut self) -> Option<&mut SettingsList<SettingKey>> {
        self.frame.content_mut()
    }

    /// Shows the fields `update` touches; rows this menu lacks are skipped.
    fn show_update(&mut self, update: &SettingsUpdate) -> Result<(), UiError> {
        let Some(list) = self.list_mut() else {
            return Ok(());
        };
        if let Some(value) = update.audio_feedback {
            list.set_toggle_value(&SettingKey::Audio, value);
        }
        if let Some(value) = update.auto_detect_readers {
            list.set_toggle_value(&SettingKey::AutoDetect, value);
        }
        if let Some(value) = update.debug_logging {
            list.set_toggle_value(&SettingKey::Debug, value);
        }
        if let Some(mode) = update.scan_mode {
            list.set_cycle_index(&SettingKey::ScanMode, mode.index())?;
        }
        if let Some(seconds) = update.exit_delay_secs {
            list.set_cycle_index(&SettingKey::ExitDelay, ExitDelayOption::nearest_index(seconds))?;
        }
        Ok(())
    }

    fn update_for(event: &MenuEvent<SettingKey>) -> Option<SettingsUpdate> {
        let update = SettingsUpdate::default();
        match event {
            MenuEvent::Toggled { key: SettingKey::Audio, value } => Some(update.audio_feedback(*value)),
            MenuEvent::Toggled { key: SettingKey::AutoDetect, value } => {
                Some(update.auto_detect_readers(*value))
            }
            MenuEvent::Toggled { key: SettingKey::Debug, value } => Some(update.debug_logging(*value)),
            MenuEvent::Cycled { key: SettingKey::ScanMode, index, .. } => {
                Some(update.scan_mode(ScanMode::from_index(*index)))
            }
            MenuEvent::Cycled { key: SettingKey::ExitDelay, index, .. } => EXIT_DELAY_OPTIONS
                .get(*index)
                .map(|o| update.exit_delay_secs(o.seconds)),
            _ => None,
        }
    }

    fn apply(update: SettingsUpdate, ctx: &UiContext) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let use_case = ctx.settings_use_case();
        let ui = ctx.ui.clone();
        runtime.spawn(async move {
            let result = use_case.apply(update.clone()).await;
            ui.send(UiMessage::SettingsApplied(update, result));
        });
    }

    fn settle(&mut self, update: &SettingsUpdate, accepted: bool) {
        if accepted {
            update.apply_to(&mut self.confirmed);
            return;
        }

        let restored = update.restore_from(&self.confirmed);
        if let Err(e) = self.show_update(&restored) {
            warn!(error = %e, "Could not restore setting");
        }
        self.frame
            .show_message(MessageModal::error(APPLY_FAILED_MESSAGE), None);
    }
}

impl Page for SettingsPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn on_enter(&mut self, ctx: &UiContext) {
        self.state = LoadState::Loading;
        self.frame
            .show_message(MessageModal::waiting("Loading settings..."), Some(SettingsEvent::Abandon));

        if tokio::runtime::Handle::try_current().is_err() {
            return;
        }
        let use_case = ctx.settings_use_case();
        let ui = ctx.ui.clone();
        tokio::spawn(async move {
            ui.send(UiMessage::SettingsLoaded(use_case.load().await));
        });
    }

    fn handle_input(&mut self, input: Input, ctx: &UiContext) -> PageCommand {
        let outcome = self.frame.handle_input(input);
        let Outcome::Event(event) = outcome else {
            return PageCommand::None;
        };

        match event {
            SettingsEvent::Back | SettingsEvent::Abandon => escape_command(self.id),
            SettingsEvent::Menu(MenuEvent::Invoked(key)) => match key {
                SettingKey::Readers => PageCommand::Navigate(PageId::ReaderSettings),
                SettingKey::IgnoreSystems => PageCommand::Navigate(PageId::IgnoreSystems),
                SettingKey::Tui => PageCommand::Navigate(PageId::TuiSettings),
                _ => PageCommand::None,
            },
            SettingsEvent::Menu(menu) => {
                if self.state == LoadState::Ready
                    && let Some(update) = Self::update_for(&menu)
                {
                    info!(?update, "Applying setting");
                    Self::apply(update, ctx);
                }
                PageCommand::None
            }
        }
    }

    fn handle_message(&mut self, message: UiMessage, _ctx: &UiContext) -> PageCommand {
        match message {
            UiMessage::SettingsLoaded(Ok(settings)) if self.state == LoadState::Loading => {
                self.frame.close_overlay();
                match self.show_update(&SettingsUpdate::from(&settings)) {
                    Ok(()) => {
                        self.confirmed = settings;
                        self.state = LoadState::Ready;
                    }
                    Err(e) => {
                        error!(error = %e, "Settings out of range");
                        self.state = LoadState::Failed;
                        self.frame.show_message(
                            MessageModal::error("Could not show settings"),
                            Some(SettingsEvent::Abandon),
                        );
                    }
                }
            }
            UiMessage::SettingsLoaded(Err(e)) if self.state == LoadState::Loading => {
                error!(error = %e, "Failed to load settings");
                self.state = LoadState::Failed;
                self.frame.show_message(
                    MessageModal::error("Could not load settings from the service"),
                    Some(SettingsEvent::Abandon),
                );
            }
            UiMessage::SettingsApplied(update, result) if self.state == LoadState::Ready => {
                if let Err(e) = &result {
                    error!(error = %e, ?update, "Failed to apply setting");
                }
                self.settle(&update, result.is_ok());
            }
            _ => {}
        }
        PageCommand::None
    }

    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &UiContext) {
        self.frame.render(area, buf, &ctx.theme, ctx.keys.hints());
    }
}
