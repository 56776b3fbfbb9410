//! Free-text token write entered through the on-screen keyboard.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget, Wrap},
};

use crate::application::WriteTokenUseCase;
use crate::domain::entities::PageId;
use crate::domain::errors::UiError;
use crate::domain::keybinding::{Action, Direction};
use crate::presentation::commands::Input;
use crate::presentation::context::UiContext;
use crate::presentation::events::UiMessage;
use crate::presentation::theme::{ColorToken, Theme};
use crate::presentation::ui::page::{Page, PageCommand, breadcrumb, escape_command};
use crate::presentation::ui::pages::token_write::{TokenWrite, WAITING_MESSAGE};
use crate::presentation::widgets::{
    ButtonBar, Component, HelpSink, MessageModal, Outcome, PageFrame, StatusLevel,
};

const SUCCESS_MESSAGE: &str = "Token written successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
enum WriteEvent {
    Edit,
    Submitted(String),
    Write,
    CancelWrite,
    Back,
}

/// Read-only view of the text about to be written.
struct TextPreview {
    text: String,
    handoff: bool,
    help: Option<HelpSink>,
}

impl Component for TextPreview {
    type Event = WriteEvent;

    fn handle_input(&mut self, input: Input) -> Outcome<Self::Event> {
        match input.action() {
            Some(Action::Select) => Outcome::Event(WriteEvent::Edit),
            Some(Action::NavigateUp) if self.handoff => Outcome::Boundary(Direction::Up),
            Some(Action::NavigateDown) if self.handoff => Outcome::Boundary(Direction::Down),
            Some(action) if action.direction().is_some() => Outcome::Consumed,
            _ => Outcome::Ignored,
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        let body = if self.text.is_empty() {
            Line::styled("(empty)", theme.dimmed_style)
        } else {
            Line::styled(self.text.as_str(), theme.highlight(focused))
        };
        Paragraph::new(vec![
            Line::styled("Text to write:", theme.style(ColorToken::Label)),
            body,
        ])
        .wrap(Wrap { trim: false })
        .render(area, buf);
    }

    fn attach_help(&mut self, sink: HelpSink) {
        self.help = Some(sink);
        self.publish_help();
    }

    fn publish_help(&self) {
        if let Some(sink) = &self.help {
            sink.publish("Select to edit the text");
        }
    }

    fn set_boundary_handoff(&mut self, enabled: bool) {
        self.handoff = enabled;
    }
}

pub struct WritePage {
    frame: PageFrame<TextPreview, WriteEvent>,
    write: TokenWrite,
}

impl WritePage {
    /// # Errors
    /// Returns error if the preview cannot be attached to the frame.
    pub fn new(ctx: &UiContext) -> Result<Self, UiError> {
        let preview = TextPreview {
            text: ctx.session.pending_write_text(),
            handoff: false,
            help: None,
        };
        let buttons = ButtonBar::new()
            .add_button_with_help("Write", "Write the text to a token", WriteEvent::Write)
            .add_button_with_help("Edit", "Edit the text", WriteEvent::Edit)
            .add_button_with_help("Back", "Back to main menu", WriteEvent::Back)
            .setup_navigation(WriteEvent::Back);

        let frame = PageFrame::new(WriteEvent::Back)
            .with_title(&breadcrumb(PageId::WriteText))
            .with_content(preview, |event| event)?
            .with_button_bar(buttons)
            .link_content_to_button_bar();

        Ok(Self {
            frame,
            write: TokenWrite::default(),
        })
    }

    fn text(&self) -> String {
        self.frame.content().map(|p| p.text.clone()).unwrap_or_default()
    }

    fn open_keyboard(&mut self) {
        let text = self.text();
        self.frame.open_keyboard(text, WriteEvent::Submitted, None);
    }

    fn write(&mut self, ctx: &UiContext) {
        let text = match WriteTokenUseCase::validate(&self.text()) {
            Ok(text) => text,
            Err(e) => {
                self.frame.set_status(StatusLevel::Warning, e.message());
                return;
            }
        };
        if self.write.start(text, ctx) {
            self.frame
                .show_message(MessageModal::waiting(WAITING_MESSAGE), Some(WriteEvent::CancelWrite));
        }
    }
}

impl WritePage {
    fn handle_event(&mut self, event: WriteEvent, ctx: &UiContext) -> PageCommand {
        match event {
            WriteEvent::Back => return escape_command(PageId::WriteText),
            WriteEvent::Edit => self.open_keyboard(),
            WriteEvent::Submitted(text) => {
                ctx.session.set_pending_write_text(text.clone());
                if let Some(preview) = self.frame.content_mut() {
                    preview.text = text;
                }
                self.frame.focus_button_bar();
                self.write(ctx);
            }
            WriteEvent::Write => self.write(ctx),
            WriteEvent::CancelWrite => self.write.cancel(),
        }
        PageCommand::None
    }
}

impl Page for WritePage {
    fn id(&self) -> PageId {
        PageId::WriteText
    }

    fn on_enter(&mut self, ctx: &UiContext) {
        let text = ctx.session.pending_write_text();
        if let Some(preview) = self.frame.content_mut() {
            preview.text = text;
        }
        self.open_keyboard();
    }

    fn on_leave(&mut self, _ctx: &UiContext) {
        self.write.cancel();
        self.frame.close_overlay();
    }

    fn handle_input(&mut self, input: Input, ctx: &UiContext) -> PageCommand {
        match self.frame.handle_input(input) {
            Outcome::Event(event) => self.handle_event(event, ctx),
            _ => PageCommand::None,
        }
    }

    fn handle_message(&mut self, message: UiMessage, _ctx: &UiContext) -> PageCommand {
        if let UiMessage::WriteFinished { id, result } = message
            && let Some(modal) = self.write.finish(id, result, SUCCESS_MESSAGE)
        {
            self.frame.show_message(modal, None);
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
    use crate::domain::ports::mocks::MockSettingsServicePort;
    use crate::presentation::context::testing::context;
    use crate::presentation::widgets::ModalKind;

    fn press(page: &mut WritePage, ctx: &UiContext, action: Action) -> PageCommand {
        page.handle_input(Input::Action(action), ctx)
    }

    #[test]
    fn test_enter_opens_keyboard_with_pending_text() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        ctx.session.set_pending_write_text("**launch.random");
        let mut page = WritePage::new(&ctx).unwrap();

        page.on_enter(&ctx);
        assert_eq!(page.frame.keyboard().map(|k| k.text().to_string()), Some("**launch.random".to_string()));
    }

    #[test]
    fn test_empty_submit_is_rejected_inline() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = WritePage::new(&ctx).unwrap();

        page.handle_event(WriteEvent::Submitted("   ".to_string()), &ctx);
        assert_eq!(page.frame.help_text(), "Text to write cannot be empty");
        assert!(page.frame.message().is_none());
    }

    #[test]
    fn test_write_button_validates() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = WritePage::new(&ctx).unwrap();

        press(&mut page, &ctx, Action::FocusNext);
        press(&mut page, &ctx, Action::Select);
        assert_eq!(page.frame.help_text(), "Text to write cannot be empty");
    }

    #[test]
    fn test_keyboard_cancel_keeps_page() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = WritePage::new(&ctx).unwrap();
        page.on_enter(&ctx);

        assert_eq!(press(&mut page, &ctx, Action::Cancel), PageCommand::None);
        assert!(page.frame.keyboard().is_none());
        assert_eq!(
            press(&mut page, &ctx, Action::Cancel),
            PageCommand::Navigate(PageId::Main)
        );
    }

    #[tokio::test]
    async fn test_submit_writes_and_reports_success() {
        let mut service = MockSettingsServicePort::new();
        service
            .expect_write_token()
            .withf(|text| text == "hello")
            .returning(|_| Ok(()));
        let (ctx, mut rx) = context(service);
        let mut page = WritePage::new(&ctx).unwrap();

        page.handle_event(WriteEvent::Submitted("hello".to_string()), &ctx);
        assert_eq!(ctx.session.pending_write_text(), "hello");
        assert_eq!(page.frame.message().map(MessageModal::kind), Some(ModalKind::Waiting));

        let message = rx.recv().await.unwrap();
        page.handle_message(message, &ctx);
        assert_eq!(page.frame.message().map(MessageModal::message), Some(SUCCESS_MESSAGE));
    }
}
