//! Multi-select of systems the service skips when a token is scanned.

use ratatui::{buffer::Buffer, layout::Rect};
use tracing::{error, info};

use crate::domain::entities::{PageId, Settings, SettingsUpdate, System};
use crate::presentation::commands::Input;
use crate::presentation::context::UiContext;
use crate::presentation::events::UiMessage;
use crate::presentation::ui::page::{Page, PageCommand, breadcrumb, escape_command};
use crate::presentation::widgets::{
    ButtonBar, CheckEvent, CheckItem, CheckList, MessageModal, Outcome, PageFrame, StatusLevel,
};

use super::settings_page::APPLY_FAILED_MESSAGE;

const HELP_TEXT: &str = "Tokens for checked systems are not launched";

#[derive(Debug, Clone, PartialEq, Eq)]
enum IgnoreEvent {
    Check(CheckEvent),
    Back,
}

/// Settings and systems arrive separately; the list is built once both have.
#[derive(Debug, Default)]
struct Pending {
    settings: Option<Settings>,
    systems: Option<Vec<System>>,
}

/// Ignore-systems checklist under the Readers menu.
pub struct IgnoreSystemsPage {
    frame: PageFrame<CheckList, IgnoreEvent>,
    pending: Option<Pending>,
    confirmed: Settings,
}

impl IgnoreSystemsPage {
    /// Empty page; the list is built once settings and systems load.
    #[must_use]
    pub fn new() -> Self {
        let buttons = ButtonBar::new()
            .add_button_with_help("Back", "Back to reader settings", IgnoreEvent::Back)
            .setup_navigation(IgnoreEvent::Back);
        let frame = PageFrame::new(IgnoreEvent::Back)
            .with_title(&breadcrumb(PageId::IgnoreSystems))
            .with_button_bar(buttons)
            .link_content_to_button_bar();

        Self {
            frame,
            pending: None,
            confirmed: Settings::default(),
        }
    }

    fn fail(&mut self, message: &str) {
        self.pending = None;
        self.frame
            .show_message(MessageModal::error(message), Some(IgnoreEvent::Back));
    }

    fn try_show(&mut self) {
        if !matches!(
            &self.pending,
            Some(Pending {
                settings: Some(_),
                systems: Some(_)
            })
        ) {
            return;
        }
        let Some(Pending {
            settings: Some(settings),
            systems: Some(systems),
        }) = self.pending.take()
        else {
            return;
        };

        let items = systems
            .into_iter()
            .map(|system| CheckItem::new(system.name, system.id))
            .collect();
        let mut list = CheckList::new(items, HELP_TEXT);
        list.set_selected(&settings.ignore_systems);

        match self.frame.set_content(list, IgnoreEvent::Check) {
            Ok(()) => {
                self.frame.close_overlay();
                self.confirmed = settings;
                self.show_count();
            }
            Err(e) => {
                error!(error = %e, "Nothing to choose from");
                self.fail("No systems available");
            }
        }
    }

    fn show_count(&mut self) {
        let count = self.frame.content().map_or(0, CheckList::selected_count);
        self.frame
            .set_status(StatusLevel::Info, format!("{count} systems ignored"));
    }

    fn apply(values: Vec<String>, ctx: &UiContext) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let update = SettingsUpdate::default().ignore_systems(values);
        let use_case = ctx.settings_use_case();
        let ui = ctx.ui.clone();
        runtime.spawn(async move {
            let result = use_case.apply(update.clone()).await;
            ui.send(UiMessage::SettingsApplied(update, result));
        });
    }
}

impl Default for IgnoreSystemsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for IgnoreSystemsPage {
    fn id(&self) -> PageId {
        PageId::IgnoreSystems
    }

    fn on_enter(&mut self, ctx: &UiContext) {
        self.pending = Some(Pending::default());
        self.frame
            .show_message(MessageModal::waiting("Loading systems..."), Some(IgnoreEvent::Back));

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let use_case = ctx.settings_use_case();
        let ui = ctx.ui.clone();
        runtime.spawn(async move {
            let (settings, systems) = tokio::join!(use_case.load(), use_case.systems());
            ui.send(UiMessage::SettingsLoaded(settings));
            ui.send(UiMessage::SystemsLoaded(systems));
        });
    }

    fn on_leave(&mut self, _ctx: &UiContext) {
        self.pending = None;
        self.frame.close_overlay();
    }

    fn handle_input(&mut self, input: Input, ctx: &UiContext) -> PageCommand {
        match self.frame.handle_input(input) {
            Outcome::Event(IgnoreEvent::Back) => escape_command(PageId::IgnoreSystems),
            Outcome::Event(IgnoreEvent::Check(CheckEvent::Changed(values))) => {
                info!(count = values.len(), "Updating ignored systems");
                Self::apply(values, ctx);
                self.show_count();
                PageCommand::None
            }
            _ => PageCommand::None,
        }
    }

    fn handle_message(&mut self, message: UiMessage, _ctx: &UiContext) -> PageCommand {
        match message {
            UiMessage::SettingsLoaded(result) if self.pending.is_some() => match result {
                Ok(settings) => {
                    if let Some(pending) = self.pending.as_mut() {
                        pending.settings = Some(settings);
                    }
                    self.try_show();
                }
                Err(e) => {
                    error!(error = %e, "Failed to load settings");
                    self.fail("Could not load settings from the service");
                }
            },
            UiMessage::SystemsLoaded(result) if self.pending.is_some() => match result {
                Ok(systems) => {
                    if let Some(pending) = self.pending.as_mut() {
                        pending.systems = Some(systems);
                    }
                    self.try_show();
                }
                Err(e) => {
                    error!(error = %e, "Failed to load systems");
                    self.fail("Could not load the system list");
                }
            },
            UiMessage::SettingsApplied(update, Ok(())) => update.apply_to(&mut self.confirmed),
            UiMessage::SettingsApplied(update, Err(e)) => {
                error!(error = %e, ?update, "Failed to save ignored systems");
                let confirmed = self.confirmed.ignore_systems.clone();
                if let Some(list) = self.frame.content_mut() {
                    list.set_selected(&confirmed);
                }
                self.frame
                    .show_message(MessageModal::error(APPLY_FAILED_MESSAGE), None);
            }
            _ => {}
        }
        PageCommand::None
    }

    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &UiContext) {
        self.frame.render(area, buf, &ctx.theme, ctx.keys.hints());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ServiceError;
    use crate::domain::keybinding::Action;
    use crate::domain::ports::mocks::MockSettingsServicePort;
    use crate::presentation::context::testing::context;
    use crate::presentation::widgets::{ModalKind, Region};
    use mockall::predicate::eq;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn press(page: &mut IgnoreSystemsPage, ctx: &UiContext, action: Action) -> PageCommand {
        page.handle_input(Input::Action(action), ctx)
    }

    fn service() -> MockSettingsServicePort {
        let mut service = MockSettingsServicePort::new();
        service.expect_settings().returning(|| {
            Ok(Settings {
                ignore_systems: vec!["SNES".to_string()],
                ..Settings::default()
            })
        });
        service.expect_systems().returning(|| {
            Ok(vec![
                System::new("NES", "Nintendo Entertainment System"),
                System::new("SNES", "Super Nintendo"),
            ])
        });
        service
    }

    async fn deliver(page: &mut IgnoreSystemsPage, ctx: &UiContext, rx: &mut UnboundedReceiver<UiMessage>) {
        for _ in 0..2 {
            let message = rx.recv().await.unwrap();
            page.handle_message(message, ctx);
        }
    }

    #[tokio::test]
    async fn test_load_checks_ignored_systems() {
        let (ctx, mut rx) = context(service());
        let mut page = IgnoreSystemsPage::new();

        page.on_enter(&ctx);
        assert_eq!(page.frame.message().map(MessageModal::kind), Some(ModalKind::Waiting));
        deliver(&mut page, &ctx, &mut rx).await;

        assert!(page.frame.message().is_none());
        assert_eq!(page.frame.focus(), Region::Content);
        let list = page.frame.content().unwrap();
        assert_eq!(list.selected(), ["SNES"]);
        assert_eq!(page.frame.help_text(), "1 systems ignored");
    }

    #[tokio::test]
    async fn test_toggle_sends_whole_list() {
        let mut service = service();
        service
            .expect_update_settings()
            .with(eq(SettingsUpdate::default()
                .ignore_systems(vec!["NES".to_string(), "SNES".to_string()])))
            .times(1)
            .returning(|_| Ok(()));
        let (ctx, mut rx) = context(service);
        let mut page = IgnoreSystemsPage::new();
        page.on_enter(&ctx);
        deliver(&mut page, &ctx, &mut rx).await;

        press(&mut page, &ctx, Action::Select);
        assert_eq!(page.frame.help_text(), "2 systems ignored");

        let message = rx.recv().await.unwrap();
        page.handle_message(message, &ctx);
        assert_eq!(page.confirmed.ignore_systems, ["NES", "SNES"]);
    }

    #[tokio::test]
    async fn test_rejected_change_restores_checks() {
        let mut service = service();
        service
            .expect_update_settings()
            .returning(|_| Err(ServiceError::unavailable("socket closed")));
        let (ctx, mut rx) = context(service);
        let mut page = IgnoreSystemsPage::new();
        page.on_enter(&ctx);
        deliver(&mut page, &ctx, &mut rx).await;

        press(&mut page, &ctx, Action::NavigateDown);
        press(&mut page, &ctx, Action::Select);
        assert!(page.frame.content().unwrap().selected().is_empty());

        let message = rx.recv().await.unwrap();
        page.handle_message(message, &ctx);
        assert_eq!(page.frame.content().unwrap().selected(), ["SNES"]);
        assert_eq!(page.frame.message().map(MessageModal::message), Some(APPLY_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_empty_system_list_is_reported() {
        let mut service = MockSettingsServicePort::new();
        service.expect_settings().returning(|| Ok(Settings::default()));
        service.expect_systems().returning(|| Ok(Vec::new()));
        let (ctx, mut rx) = context(service);
        let mut page = IgnoreSystemsPage::new();
        page.on_enter(&ctx);
        deliver(&mut page, &ctx, &mut rx).await;

        assert!(page.frame.content().is_none());
        assert_eq!(page.frame.message().map(MessageModal::message), Some("No systems available"));
        assert_eq!(
            press(&mut page, &ctx, Action::Select),
            PageCommand::Navigate(PageId::ReaderSettings)
        );
    }

    #[tokio::test]
    async fn test_load_failure_goes_back() {
        let mut service = MockSettingsServicePort::new();
        service
            .expect_settings()
            .returning(|| Err(ServiceError::unavailable("not running")));
        service.expect_systems().returning(|| Ok(Vec::new()));
        let (ctx, mut rx) = context(service);
        let mut page = IgnoreSystemsPage::new();
        page.on_enter(&ctx);
        deliver(&mut page, &ctx, &mut rx).await;

        assert_eq!(page.frame.message().map(MessageModal::kind), Some(ModalKind::Error));
        assert_eq!(
            press(&mut page, &ctx, Action::Cancel),
            PageCommand::Navigate(PageId::ReaderSettings)
        );
    }
}
