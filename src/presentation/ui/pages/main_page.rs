//! Landing page: service and reader status above the top-level button grid.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::services::NotificationWatcher;
use crate::domain::entities::{Notification, PageId};
use crate::domain::errors::UiError;
use crate::presentation::commands::Input;
use crate::presentation::context::UiContext;
use crate::presentation::events::UiMessage;
use crate::presentation::theme::{ColorToken, Theme};
use crate::presentation::ui::page::{Page, PageCommand, breadcrumb, escape_command};
use crate::presentation::widgets::{
    ButtonGrid, Component, GridItem, HelpSink, Outcome, PageFrame, ScanningArea,
};

const GRID_COLUMNS: usize = 3;
const EXIT_HELP_RUNNING: &str = "Exit TUI app (service will continue running)";
const EXIT_HELP_DOWN: &str = "Exit TUI app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainItem {
    Search,
    Write,
    UpdateMedia,
    Settings,
    Exit,
}

impl MainItem {
    /// Items that need the service to do anything.
    const SERVICE: [Self; 4] = [Self::Search, Self::Write, Self::UpdateMedia, Self::Settings];
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MainEvent {
    Item(MainItem),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServiceState {
    Checking,
    Running,
    Down,
}

/// Status on the left, scanning area on the right, buttons below.
struct MainContent {
    grid: ButtonGrid<MainItem>,
    scanning: ScanningArea,
    service: ServiceState,
    indexing: Option<String>,
}

impl MainContent {
    fn status_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let label = Span::styled("Service: ", theme.style(ColorToken::Label));
        let mut lines = vec![match self.service {
            ServiceState::Checking => Line::from(vec![label, Span::raw("checking...")]),
            ServiceState::Running => Line::from(vec![
                label,
                Span::styled("✓ RUNNING", theme.style(ColorToken::Success)),
            ]),
            ServiceState::Down => Line::from(vec![
                label,
                Span::styled("✗ NOT RUNNING", theme.style(ColorToken::Error)),
            ]),
        }];
        if self.service == ServiceState::Down {
            lines.push(Line::raw("Service may not have started."));
            lines.push(Line::raw("Check the logs for details."));
        }
        if let Some(indexing) = &self.indexing {
            lines.push(Line::raw(""));
            lines.push(Line::styled(indexing.clone(), theme.style(ColorToken::Warning)));
        }
        lines
    }

    fn set_service(&mut self, state: ServiceState) {
        if self.service == state {
            return;
        }
        debug!(?state, "Service state changed");
        self.service = state;
        let down = state == ServiceState::Down;
        for item in MainItem::SERVICE {
            self.grid.set_disabled(&item, down);
        }
        let exit_help = if down { EXIT_HELP_DOWN } else { EXIT_HELP_RUNNING };
        self.grid.set_help(&MainItem::Exit, exit_help);
    }
}

impl Component for MainContent {
    type Event = MainItem;

    fn handle_input(&mut self, input: Input) -> Outcome<Self::Event> {
        self.grid.handle_input(input)
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        let [top, grid_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(area);
        let [left, divider, right] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(top);

        Paragraph::new(self.status_lines(theme))
            .style(theme.base_style())
            .wrap(Wrap { trim: true })
            .render(left, buf);
        Block::default()
            .borders(Borders::LEFT)
            .border_style(theme.style(ColorToken::Border))
            .render(divider, buf);
        self.scanning.draw(right, buf, theme);

        self.grid.draw(grid_area, buf, theme, focused);
    }

    fn attach_help(&mut self, sink: HelpSink) {
        self.grid.attach_help(sink);
    }

    fn publish_help(&self) {
        self.grid.publish_help();
    }

    fn validate(&self) -> Result<(), UiError> {
        self.grid.validate()
    }
}

/// Landing page; its escape quits.
pub struct MainPage {
    frame: PageFrame<MainContent, MainEvent>,
    watcher: Option<(CancellationToken, JoinHandle<()>)>,
}

impl MainPage {
    /// # Errors
    /// Returns error if the button grid cannot be attached to the frame.
    pub fn new(ctx: &UiContext) -> Result<Self, UiError> {
        let item = |label, help, event| Some(GridItem::new(label, help, event));
        let mut grid = ButtonGrid::new(GRID_COLUMNS)
            .add_row(vec![
                item("Search media", "Search for media and write to an NFC tag", MainItem::Search),
                item("Custom write", "Write custom ZapScript to an NFC tag", MainItem::Write),
                item("Update media", "Scan disk to create index of games", MainItem::UpdateMedia),
            ])
            .add_row(vec![
                item("Settings", "Manage settings for Core service", MainItem::Settings),
                None,
                item("Exit", EXIT_HELP_RUNNING, MainItem::Exit),
            ]);
        grid.set_focused_index(ctx.session.main_menu_index());

        let content = MainContent {
            grid,
            scanning: ScanningArea::new(Some(ctx.ui.clone())),
            service: ServiceState::Checking,
            indexing: ctx.session.indexing().map(|p| p.describe()),
        };
        let frame = PageFrame::new(MainEvent::Escape)
            .with_title(&breadcrumb(PageId::Main))
            .with_content(content, MainEvent::Item)?;

        Ok(Self {
            frame,
            watcher: None,
        })
    }

    fn content(&self) -> Option<&MainContent> {
        self.frame.content()
    }

    fn apply_notification(&mut self, notification: Notification, ctx: &UiContext) {
        let Some(content) = self.frame.content_mut() else {
            return;
        };

        if notification == Notification::ServiceUnavailable {
            warn!("Service unavailable, disabling service actions");
            content.set_service(ServiceState::Down);
            return;
        }
        content.set_service(ServiceState::Running);

        match notification {
            Notification::ReadersChanged(readers) => {
                let driver = readers.first().map(|r| r.driver.clone()).unwrap_or_default();
                content.scanning.set_reader_info(readers.len(), driver);
            }
            Notification::TokenScanned(token) => content.scanning.set_token(token),
            Notification::TokenRemoved => content.scanning.clear_token(),
            Notification::Indexing(progress) => {
                ctx.session.set_indexing(progress);
                content.indexing = ctx.session.indexing().map(|p| p.describe());
            }
            Notification::ServiceUnavailable => {}
        }
    }

    fn stop_watcher(&mut self) {
        if let Some((cancel, _handle)) = self.watcher.take() {
            cancel.cancel();
        }
    }
}

impl Page for MainPage {
    fn id(&self) -> PageId {
        PageId::Main
    }

    fn on_enter(&mut self, ctx: &UiContext) {
        self.stop_watcher();
        if let Some(content) = self.frame.content_mut() {
            content.grid.set_focused_index(ctx.session.main_menu_index());
            content.indexing = ctx.session.indexing().map(|p| p.describe());
            content.scanning.resume();
        }

        if tokio::runtime::Handle::try_current().is_err() {
            return;
        }
        let cancel = CancellationToken::new();
        let handle = NotificationWatcher::new(ctx.service.clone(), ctx.timeouts()).spawn(
            cancel.clone(),
            ctx.ui.sender(),
            UiMessage::Notification,
        );
        debug!("Notification watcher started");
        self.watcher = Some((cancel, handle));
    }

    fn on_leave(&mut self, _ctx: &UiContext) {
        self.stop_watcher();
        if let Some(content) = self.content() {
            content.scanning.stop();
        }
    }

    fn handle_input(&mut self, input: Input, ctx: &UiContext) -> PageCommand {
        let outcome = self.frame.handle_input(input);
        if let Some(content) = self.content() {
            ctx.session.set_main_menu_index(content.grid.focused_index());
        }

        match outcome {
            Outcome::Event(MainEvent::Escape) => escape_command(PageId::Main),
            Outcome::Event(MainEvent::Item(item)) => match item {
                MainItem::Search => PageCommand::Navigate(PageId::SearchMedia),
                MainItem::Write => PageCommand::Navigate(PageId::WriteText),
                MainItem::UpdateMedia => PageCommand::Navigate(PageId::UpdateMedia),
                MainItem::Settings => PageCommand::Navigate(PageId::Settings),
                MainItem::Exit => PageCommand::Quit,
            },
            _ => PageCommand::None,
        }
    }

    fn handle_message(&mut self, message: UiMessage, ctx: &UiContext) -> PageCommand {
        if let UiMessage::Notification(notification) = message {
            self.apply_notification(notification, ctx);
        }
        PageCommand::None
    }

    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &UiContext) {
        self.frame.render(area, buf, &ctx.theme, ctx.keys.hints());
    }
}

impl Drop for MainPage {
    fn drop(&mut self) {
        self.stop_watcher();
    }
}
