//! Rebuilds the service's media database and follows the indexing run.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::application::services::NotificationWatcher;
use crate::domain::entities::{IndexingProgress, Notification, PageId};
use crate::domain::errors::UiError;
use crate::domain::keybinding::Direction;
use crate::presentation::commands::Input;
use crate::presentation::context::UiContext;
use crate::presentation::events::UiMessage;
use crate::presentation::theme::{ColorToken, Theme};
use crate::presentation::ui::page::{Page, PageCommand, breadcrumb, escape_command};
use crate::presentation::widgets::{
    ButtonBar, Component, MessageModal, Outcome, PageFrame, StatusLevel,
};

const IDLE_MESSAGE: &str = "Update Core's internal database of media files.";
const CONFIRM_MESSAGE: &str = "Rebuild the media database? This may take a while.";
const START_FAILED_MESSAGE: &str = "Could not start the media update.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum MediaState {
    Idle,
    Indexing(IndexingProgress),
    Complete { files: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaEvent {
    Update,
    Confirmed,
    Hide,
    Done,
    Back,
}

/// Read-only body; up and down hand focus straight back to the buttons.
struct MediaView {
    state: MediaState,
}

impl Component for MediaView {
    type Event = MediaEvent;

    fn handle_input(&mut self, input: Input) -> Outcome<Self::Event> {
        match input.action().and_then(|action| action.direction()) {
            Some(direction @ (Direction::Up | Direction::Down)) => Outcome::Boundary(direction),
            _ => Outcome::Ignored,
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, _focused: bool) {
        let [text_area, _, gauge_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let text = match &self.state {
            MediaState::Idle => IDLE_MESSAGE.to_string(),
            MediaState::Indexing(progress) if progress.total == 0 => {
                "Starting media update...".to_string()
            }
            MediaState::Indexing(progress) => progress.describe(),
            MediaState::Complete { files } => {
                format!("Database update complete!\n{files} files processed.")
            }
        };
        Paragraph::new(text)
            .style(theme.base_style())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        if let MediaState::Indexing(progress) = &self.state {
            let percent = (progress.ratio() * 100.0).round();
            Gauge::default()
                .ratio(progress.ratio())
                .label(format!("{percent}%"))
                .gauge_style(theme.style(ColorToken::Primary))
                .render(gauge_area, buf);
        }
    }
}

/// Media database rebuild page.
pub struct UpdateMediaPage {
    frame: PageFrame<MediaView, MediaEvent>,
    watcher: Option<(CancellationToken, JoinHandle<()>)>,
}

impl UpdateMediaPage {
    /// Starts idle, or on the progress view while a run is already known.
    ///
    /// # Errors
    /// Returns error if the view cannot be attached to the frame.
    pub fn new(ctx: &UiContext) -> Result<Self, UiError> {
        let state = ctx
            .session
            .indexing()
            .map_or(MediaState::Idle, MediaState::Indexing);
        let frame = PageFrame::new(MediaEvent::Back)
            .with_title(&breadcrumb(PageId::UpdateMedia))
            .with_content(MediaView { state: MediaState::Idle }, |event| event)?;

        let mut page = Self {
            frame,
            watcher: None,
        };
        page.set_state(state);
        page.frame.focus_button_bar();
        Ok(page)
    }

    fn state(&self) -> Option<&MediaState> {
        self.frame.content().map(|view| &view.state)
    }

    fn buttons(state: &MediaState) -> ButtonBar<MediaEvent> {
        let bar = match state {
            MediaState::Idle => ButtonBar::new()
                .add_button_with_help("Update", "Rebuild the media database", MediaEvent::Update)
                .add_button_with_help("Go back", "Back to main menu", MediaEvent::Back),
            MediaState::Indexing(_) => ButtonBar::new().add_button_with_help(
                "Hide",
                "Keep indexing in the background",
                MediaEvent::Hide,
            ),
            MediaState::Complete { .. } => {
                ButtonBar::new().add_button_with_help("Done", "Back to main menu", MediaEvent::Done)
            }
        };
        bar.setup_navigation(MediaEvent::Back)
    }

    fn set_state(&mut self, state: MediaState) {
        let switch_buttons = self
            .state()
            .is_none_or(|old| std::mem::discriminant(old) != std::mem::discriminant(&state))
            || self.frame.button_bar().is_none();
        if switch_buttons {
            self.frame.set_button_bar(Self::buttons(&state));
        }
        if let Some(view) = self.frame.content_mut() {
            view.state = state;
        }
    }

    fn start(&mut self, ctx: &UiContext) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        self.frame
            .show_message(MessageModal::waiting("Starting media update..."), None);
        let use_case = ctx.media_db_use_case();
        let ui = ctx.ui.clone();
        runtime.spawn(async move {
            ui.send(UiMessage::IndexingStarted(use_case.generate().await));
        });
    }

    fn apply_progress(&mut self, progress: IndexingProgress, ctx: &UiContext) {
        ctx.session.set_indexing(progress.clone());
        let indexing = matches!(self.state(), Some(MediaState::Indexing(_)));

        if progress.is_finished() {
            if indexing {
                let files = progress.files.unwrap_or_default();
                info!(files, "Media update finished");
                self.set_state(MediaState::Complete { files });
            }
        } else {
            self.set_state(MediaState::Indexing(progress));
        }
    }

    fn stop_watcher(&mut self) {
        if let Some((cancel, _handle)) = self.watcher.take() {
            cancel.cancel();
        }
    }
}

impl Page for UpdateMediaPage {
    fn id(&self) -> PageId {
        PageId::UpdateMedia
    }

    fn on_enter(&mut self, ctx: &UiContext) {
        self.stop_watcher();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let use_case = ctx.media_db_use_case();
        let ui = ctx.ui.clone();
        runtime.spawn(async move {
            ui.send(UiMessage::MediaStatusLoaded(use_case.status().await));
        });

        let cancel = CancellationToken::new();
        let handle = NotificationWatcher::new(ctx.service.clone(), ctx.timeouts()).spawn(
            cancel.clone(),
            ctx.ui.sender(),
            UiMessage::Notification,
        );
        self.watcher = Some((cancel, handle));
    }

    fn on_leave(&mut self, _ctx: &UiContext) {
        self.stop_watcher();
        self.frame.close_overlay();
    }

    fn handle_input(&mut self, input: Input, ctx: &UiContext) -> PageCommand {
        match self.frame.handle_input(input) {
            Outcome::Event(MediaEvent::Update) => {
                self.frame
                    .show_confirm(CONFIRM_MESSAGE, MediaEvent::Confirmed, None);
                PageCommand::None
            }
            Outcome::Event(MediaEvent::Confirmed) => {
                info!("Starting media update");
                self.start(ctx);
                PageCommand::None
            }
            Outcome::Event(MediaEvent::Hide | MediaEvent::Done | MediaEvent::Back) => {
                escape_command(PageId::UpdateMedia)
            }
            _ => PageCommand::None,
        }
    }

    fn handle_message(&mut self, message: UiMessage, ctx: &UiContext) -> PageCommand {
        match message {
            UiMessage::MediaStatusLoaded(Ok(Some(progress))) => self.apply_progress(progress, ctx),
            UiMessage::MediaStatusLoaded(Ok(None)) => debug!("Media database idle"),
            UiMessage::MediaStatusLoaded(Err(e)) => {
                warn!(error = %e, "Media status unavailable");
                self.frame
                    .set_status(StatusLevel::Warning, "Could not read the media status");
            }
            UiMessage::IndexingStarted(Ok(())) => {
                self.frame.close_overlay();
                if !matches!(self.state(), Some(MediaState::Indexing(_))) {
                    self.set_state(MediaState::Indexing(IndexingProgress {
                        step: 0,
                        total: 0,
                        system: None,
                        files: None,
                    }));
                }
            }
            UiMessage::IndexingStarted(Err(e)) => {
                error!(error = %e, "Media update did not start");
                self.frame
                    .show_message(MessageModal::error(START_FAILED_MESSAGE), None);
            }
            UiMessage::Notification(Notification::Indexing(progress)) => {
                self.apply_progress(progress, ctx);
            }
            UiMessage::Notification(Notification::ServiceUnavailable) => {
                self.frame
                    .set_status(StatusLevel::Error, "Service unavailable");
            }
            _ => {}
        }
        PageCommand::None
    }

    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &UiContext) {
        self.frame.render(area, buf, &ctx.theme, ctx.keys.hints());
    }
}

impl Drop for UpdateMediaPage {
    fn drop(&mut self) {
        self.stop_watcher();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ReaderInfo;
    use crate::domain::errors::ServiceError;
    use crate::domain::keybinding::Action;
    use crate::domain::ports::mocks::MockSettingsServicePort;
    use crate::presentation::context::testing::context;
    use crate::presentation::widgets::ModalKind;

    fn press(page: &mut UpdateMediaPage, ctx: &UiContext, action: Action) -> PageCommand {
        page.handle_input(Input::Action(action), ctx)
    }

    fn progress(step: u32, total: u32, files: Option<u32>) -> IndexingProgress {
        IndexingProgress {
            step,
            total,
            system: Some("NES".to_string()),
            files,
        }
    }

    fn indexing(page: &mut UpdateMediaPage, ctx: &UiContext, progress: IndexingProgress) {
        page.handle_message(UiMessage::Notification(Notification::Indexing(progress)), ctx);
    }

    fn labels(page: &UpdateMediaPage) -> Vec<String> {
        page.frame
            .button_bar()
            .map(|bar| bar.buttons().iter().map(|b| b.label().to_string()).collect())
            .unwrap_or_default()
    }

    fn screen(page: &UpdateMediaPage, ctx: &UiContext) -> Vec<String> {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        page.render(area, &mut buf, ctx);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_update_asks_for_confirmation() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = UpdateMediaPage::new(&ctx).unwrap();
        assert_eq!(labels(&page), ["Update", "Go back"]);

        press(&mut page, &ctx, Action::Select);
        let modal = page.frame.message().unwrap();
        assert_eq!(modal.kind(), ModalKind::Confirm);
        assert_eq!(modal.message(), CONFIRM_MESSAGE);

        press(&mut page, &ctx, Action::NavigateRight);
        press(&mut page, &ctx, Action::Select);
        assert!(page.frame.message().is_none());
        assert_eq!(page.state(), Some(&MediaState::Idle));
    }

    #[tokio::test]
    async fn test_confirmed_update_starts_indexing() {
        let mut service = MockSettingsServicePort::new();
        service.expect_generate_media().times(1).returning(|| Ok(()));
        let (ctx, mut rx) = context(service);
        let mut page = UpdateMediaPage::new(&ctx).unwrap();

        press(&mut page, &ctx, Action::Select);
        press(&mut page, &ctx, Action::Select);
        assert_eq!(page.frame.message().map(MessageModal::kind), Some(ModalKind::Waiting));

        let message = rx.recv().await.unwrap();
        assert_eq!(message, UiMessage::IndexingStarted(Ok(())));
        page.handle_message(message, &ctx);
        assert!(page.frame.message().is_none());
        assert!(matches!(page.state(), Some(MediaState::Indexing(_))));
        assert_eq!(labels(&page), ["Hide"]);
    }

    #[test]
    fn test_start_failure_shows_error() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = UpdateMediaPage::new(&ctx).unwrap();

        let failed = Err(ServiceError::rejected("already running"));
        page.handle_message(UiMessage::IndexingStarted(failed), &ctx);
        assert_eq!(page.frame.message().map(MessageModal::message), Some(START_FAILED_MESSAGE));
        assert_eq!(page.state(), Some(&MediaState::Idle));
    }

    #[test]
    fn test_progress_then_completion() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = UpdateMediaPage::new(&ctx).unwrap();

        indexing(&mut page, &ctx, progress(2, 5, None));
        assert_eq!(labels(&page), ["Hide"]);
        assert!(screen(&page, &ctx).iter().any(|r| r.contains("Indexing media 2/5 (NES)")));
        assert!(screen(&page, &ctx).iter().any(|r| r.contains("40%")));
        assert!(ctx.session.indexing().is_some());

        indexing(&mut page, &ctx, progress(5, 5, Some(120)));
        assert_eq!(page.state(), Some(&MediaState::Complete { files: 120 }));
        assert!(screen(&page, &ctx).iter().any(|r| r.contains("120 files processed.")));
        assert!(ctx.session.indexing().is_none());

        assert_eq!(
            press(&mut page, &ctx, Action::Select),
            PageCommand::Navigate(PageId::Main)
        );
    }

    #[test]
    fn test_finished_run_seen_while_idle_stays_idle() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = UpdateMediaPage::new(&ctx).unwrap();

        indexing(&mut page, &ctx, progress(5, 5, Some(10)));
        assert_eq!(page.state(), Some(&MediaState::Idle));
    }

    #[test]
    fn test_hide_leaves_run_going() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        ctx.session.set_indexing(progress(1, 4, None));
        let mut page = UpdateMediaPage::new(&ctx).unwrap();
        assert_eq!(labels(&page), ["Hide"]);

        assert_eq!(
            press(&mut page, &ctx, Action::Select),
            PageCommand::Navigate(PageId::Main)
        );
        assert!(ctx.session.indexing().is_some());
    }

    #[tokio::test]
    async fn test_enter_picks_up_running_index() {
        let mut service = MockSettingsServicePort::new();
        service
            .expect_media_status()
            .returning(|| Ok(Some(progress(3, 6, None))));
        service
            .expect_readers()
            .returning(|| Ok(vec![ReaderInfo::new("r1", "pn532")]));
        service
            .expect_next_notification()
            .returning(|| Err(ServiceError::Cancelled));
        let (ctx, mut rx) = context(service);
        let mut page = UpdateMediaPage::new(&ctx).unwrap();

        page.on_enter(&ctx);
        // Status answer, readers and the watcher's give-up notice
        for _ in 0..3 {
            let message = rx.recv().await.unwrap();
            page.handle_message(message, &ctx);
        }
        assert_eq!(page.state(), Some(&MediaState::Indexing(progress(3, 6, None))));

        page.on_leave(&ctx);
        assert!(page.watcher.is_none());
    }
}
