//! Main application loop.

use std::io;

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent, MouseEvent,
        MouseEventKind,
    },
    execute,
};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame, layout::Rect};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::PageId;
use crate::domain::errors::UiError;
use crate::domain::keybinding::Action;
use crate::domain::ports::PageRouter;
use crate::infrastructure::ThemeName;
use crate::presentation::commands::Input;
use crate::presentation::context::UiContext;
use crate::presentation::events::{EventResult, UiMessage};
use crate::presentation::ui::page::PageCommand;
use crate::presentation::ui::pages;
use crate::presentation::ui::router::Pages;

/// Fixed window used in CRT mode.
const CRT_SIZE: (u16, u16) = (75, 15);
/// Largest area used outside CRT mode; bigger terminals get a centred window.
const MAX_SIZE: (u16, u16) = (100, 30);

pub struct App {
    ctx: UiContext,
    pages: Pages,
    rx: mpsc::UnboundedReceiver<UiMessage>,
    mouse: bool,
    crt_mode: bool,
    running: bool,
}

impl App {
    #[must_use]
    pub fn new(ctx: UiContext, rx: mpsc::UnboundedReceiver<UiMessage>) -> Self {
        let config = ctx.config_snapshot();
        Self {
            ctx,
            pages: Pages::new(),
            rx,
            mouse: config.mouse,
            crt_mode: config.crt_mode,
            running: true,
        }
    }

    /// # Errors
    /// Returns error if the terminal fails or the main page cannot be built.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        if self.mouse {
            execute!(io::stdout(), EnableMouseCapture)?;
        }
        self.navigate(PageId::Main)?;

        let result = self.run_event_loop(terminal).await;

        if let Some(page) = self.pages.front_mut() {
            page.on_leave(&self.ctx);
        }
        if self.mouse {
            execute!(io::stdout(), DisableMouseCapture)?;
        }
        info!("Application exiting normally");
        result
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            tokio::select! {
                Some(message) = self.rx.recv() => {
                    self.handle_message(message);
                }

                Some(event) = terminal_events.next() => {
                    if let EventResult::Exit = self.handle_terminal_event(event?) {
                        self.running = false;
                    }
                }

                else => break,
            }

            if self.running {
                terminal.draw(|frame| self.render(frame))?;
            }
        }

        Ok(())
    }

    fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) if self.mouse => self.handle_mouse(mouse),
            _ => EventResult::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        let input = self.ctx.keys.resolve(key);
        if input == Input::Action(Action::Quit) {
            return EventResult::Exit;
        }
        self.dispatch(input)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> EventResult {
        let action = match mouse.kind {
            MouseEventKind::ScrollUp => Action::NavigateUp,
            MouseEventKind::ScrollDown => Action::NavigateDown,
            _ => return EventResult::Continue,
        };
        self.dispatch(Input::Action(action))
    }

    fn dispatch(&mut self, input: Input) -> EventResult {
        let Some(page) = self.pages.front_mut() else {
            return EventResult::Continue;
        };
        let command = page.handle_input(input, &self.ctx);
        self.apply(command)
    }

    fn handle_message(&mut self, message: UiMessage) {
        if matches!(message, UiMessage::Redraw) {
            return;
        }
        let Some(page) = self.pages.front_mut() else {
            return;
        };
        let command = page.handle_message(message, &self.ctx);
        if let EventResult::Exit = self.apply(command) {
            self.running = false;
        }
    }

    fn apply(&mut self, command: PageCommand) -> EventResult {
        match command {
            PageCommand::None => {}
            PageCommand::Quit => return EventResult::Exit,
            PageCommand::Navigate(id) => {
                if let Err(e) = self.navigate(id) {
                    error!(error = %e, page = %id, "Navigation failed");
                }
            }
            PageCommand::SetTheme(theme) => {
                if let Err(e) = self.rebuild_with_theme(theme) {
                    error!(error = %e, "Failed to rebuild pages for theme");
                }
            }
            PageCommand::SetMouse(enabled) => self.set_mouse(enabled),
        }
        EventResult::Continue
    }

    /// Leaves the front page, building `id` on first use, and enters it.
    fn navigate(&mut self, id: PageId) -> Result<(), UiError> {
        if let Some(page) = self.pages.front_mut() {
            page.on_leave(&self.ctx);
        }
        if !self.pages.contains(id) {
            let page = pages::build(id, &self.ctx)?;
            self.pages.add_page(id, page);
        }
        self.pages.switch_to(id)?;
        if let Some(page) = self.pages.front_mut() {
            page.on_enter(&self.ctx);
        }
        Ok(())
    }

    fn rebuild_with_theme(&mut self, theme: ThemeName) -> Result<(), UiError> {
        debug!(theme = theme.display_name(), "Rebuilding pages");
        let front = self.pages.front_page().unwrap_or(PageId::Main);
        if let Some(page) = self.pages.front_mut() {
            page.on_leave(&self.ctx);
        }
        self.pages.clear();
        self.ctx = self.ctx.with_theme(theme);
        self.navigate(front)
    }

    fn set_mouse(&mut self, enabled: bool) {
        if self.mouse == enabled {
            return;
        }
        let result = if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        };
        match result {
            Ok(()) => self.mouse = enabled,
            Err(e) => warn!(error = %e, "Failed to change mouse capture"),
        }
    }

    fn page_area(&self, screen: Rect) -> Rect {
        let (max_width, max_height) = if self.crt_mode { CRT_SIZE } else { MAX_SIZE };
        let width = max_width.min(screen.width);
        let height = max_height.min(screen.height);
        Rect::new(
            screen.x + (screen.width - width) / 2,
            screen.y + (screen.height - height) / 2,
            width,
            height,
        )
    }

    fn render(&self, frame: &mut Frame) {
        let screen = frame.area();
        let area = self.page_area(screen);
        let buf = frame.buffer_mut();
        buf.set_style(screen, self.ctx.theme.base_style());
        if let Some(page) = self.pages.front() {
            page.render(area, buf, &self.ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockSettingsServicePort;
    use crate::presentation::context::testing::context;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App {
        let (ctx, rx) = context(MockSettingsServicePort::new());
        App::new(ctx, rx)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_page_area_is_capped_and_centred() {
        let mut app = app();
        let area = app.page_area(Rect::new(0, 0, 120, 40));
        assert_eq!(area, Rect::new(10, 5, 100, 30));

        app.crt_mode = true;
        let area = app.page_area(Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(2, 4, 75, 15));

        let area = app.page_area(Rect::new(0, 0, 40, 10));
        assert_eq!(area, Rect::new(0, 0, 40, 10));
    }

    #[test]
    fn test_ctrl_c_quits_from_any_page() {
        let mut app = app();
        app.navigate(PageId::Main).unwrap();
        app.navigate(PageId::TuiSettings).unwrap();

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(app.handle_terminal_event(ctrl_c), EventResult::Exit);
    }

    #[test]
    fn test_navigation_follows_page_commands() {
        let mut app = app();
        app.navigate(PageId::Main).unwrap();

        app.handle_terminal_event(key(KeyCode::Right));
        app.handle_terminal_event(key(KeyCode::Enter));
        assert_eq!(app.pages.front_page(), Some(PageId::WriteText));

        // Closes the keyboard, then leaves the page
        app.handle_terminal_event(key(KeyCode::Esc));
        app.handle_terminal_event(key(KeyCode::Esc));
        assert_eq!(app.pages.front_page(), Some(PageId::Main));

        assert_eq!(app.handle_terminal_event(key(KeyCode::Esc)), EventResult::Exit);
    }

    #[test]
    fn test_theme_change_rebuilds_on_same_page() {
        let mut app = app();
        app.navigate(PageId::Main).unwrap();
        app.navigate(PageId::TuiSettings).unwrap();

        app.handle_terminal_event(key(KeyCode::Right));
        assert_eq!(app.ctx.theme.name, ThemeName::from_index(1));
        assert_eq!(app.pages.front_page(), Some(PageId::TuiSettings));
        assert!(!app.pages.contains(PageId::Main));
    }

    #[test]
    fn test_mouse_scroll_ignored_when_disabled() {
        let mut app = app();
        app.navigate(PageId::Main).unwrap();
        let scroll = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });

        assert_eq!(app.handle_terminal_event(scroll), EventResult::Continue);
        assert_eq!(app.ctx.session.main_menu_index(), 0);
    }
}
