//! Common page chrome: breadcrumb border, content, help line, buttons and
//! key hints, plus the focus mediation between them.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{Block, BorderType, Borders, Widget},
};
use tracing::debug;

use super::button_bar::{ButtonBar, Hook};
use super::component::{Component, HelpSink, Outcome};
use super::footer_bar::{FooterBar, FooterBarStyle};
use super::modal::{MessageModal, ModalResponse};
use super::on_screen_keyboard::{KeyboardEvent, OnScreenKeyboard};
use super::status_bar::{StatusBar, StatusLevel};
use crate::domain::errors::UiError;
use crate::domain::keybinding::{Action, Direction, Keybind};
use crate::presentation::commands::Input;
use crate::presentation::theme::{ColorToken, Theme};

/// Region of a frame that receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Content,
    ButtonBar,
    /// A keyboard or message box drawn over the page.
    Modal,
}

enum Overlay<E> {
    Keyboard {
        keyboard: OnScreenKeyboard,
        on_submit: fn(String) -> E,
        on_cancel: Option<E>,
    },
    Message {
        modal: MessageModal,
        on_confirm: Option<E>,
        on_dismiss: Option<E>,
    },
}

struct Content<C: Component, E> {
    widget: C,
    map: fn(C::Event) -> E,
}

/// Hosts at most one content component and at most one [`ButtonBar`].
///
/// Escape is handled here, not by the children: an open overlay is closed
/// first, otherwise the frame's escape event is reported.
pub struct PageFrame<C: Component, E> {
    title: String,
    content: Option<Content<C, E>>,
    buttons: Option<ButtonBar<E>>,
    overlay: Option<Overlay<E>>,
    focus: Region,
    escape: E,
    help: HelpSink,
    status: Option<(StatusLevel, String)>,
}

impl<C: Component, E: Clone> PageFrame<C, E> {
    #[must_use]
    pub fn new(escape: E) -> Self {
        Self {
            title: String::new(),
            content: None,
            buttons: None,
            overlay: None,
            focus: Region::Content,
            escape,
            help: HelpSink::new(),
            status: None,
        }
    }

    /// Breadcrumb title, e.g. `["Settings", "TUI"]` shows ` Settings > TUI `.
    #[must_use]
    pub fn with_title<S: AsRef<str>>(mut self, path: &[S]) -> Self {
        self.set_title(path);
        self
    }

    pub fn set_title<S: AsRef<str>>(&mut self, path: &[S]) {
        let parts: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
        self.title = format!(" {} ", parts.join(" > "));
    }

    /// Attaches the content region and gives it focus.
    ///
    /// # Errors
    /// Returns the component's validation error, e.g. an empty list.
    pub fn with_content(mut self, widget: C, map: fn(C::Event) -> E) -> Result<Self, UiError> {
        self.set_content(widget, map)?;
        Ok(self)
    }

    /// Replaces the content region, e.g. once its data has loaded, and
    /// gives it focus. The old content stays when `widget` is invalid.
    ///
    /// # Errors
    /// Returns the component's validation error.
    pub fn set_content(&mut self, mut widget: C, map: fn(C::Event) -> E) -> Result<(), UiError> {
        widget.validate()?;
        widget.attach_help(self.help.clone());
        let handoff = self.buttons.as_ref().is_some_and(ButtonBar::links_down);
        widget.set_boundary_handoff(handoff);
        self.content = Some(Content { widget, map });
        self.focus_content();
        Ok(())
    }

    /// Attaches the button bar; moving up out of it returns to the content.
    #[must_use]
    pub fn with_button_bar(mut self, bar: ButtonBar<E>) -> Self {
        self.set_button_bar(bar);
        self
    }

    /// Replaces the button bar. Focus moves to it when there is no content
    /// or the old bar had focus.
    pub fn set_button_bar(&mut self, mut bar: ButtonBar<E>) {
        bar.set_on_up(Hook::Sibling);
        if let Some(old) = &self.buttons
            && old.links_down()
        {
            bar.set_on_down(Hook::Sibling);
        }
        bar.attach_help(self.help.clone());
        self.buttons = Some(bar);
        if self.content.is_none() || self.focus == Region::ButtonBar {
            self.focus_button_bar();
        }
    }

    /// Lets the content hand focus to the buttons when moving past its
    /// first or last row; down from the buttons wraps back to the content.
    /// Content attached later with [`PageFrame::set_content`] is linked too.
    #[must_use]
    pub fn link_content_to_button_bar(mut self) -> Self {
        if let Some(bar) = self.buttons.as_mut() {
            bar.set_on_down(Hook::Sibling);
            if let Some(content) = self.content.as_mut() {
                content.widget.set_boundary_handoff(true);
            }
        }
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> Option<&C> {
        self.content.as_ref().map(|c| &c.widget)
    }

    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.content.as_mut().map(|c| &mut c.widget)
    }

    #[must_use]
    pub fn button_bar(&self) -> Option<&ButtonBar<E>> {
        self.buttons.as_ref()
    }

    pub fn button_bar_mut(&mut self) -> Option<&mut ButtonBar<E>> {
        self.buttons.as_mut()
    }

    /// Region currently receiving input.
    #[must_use]
    pub const fn focus(&self) -> Region {
        if self.overlay.is_some() {
            Region::Modal
        } else {
            self.focus
        }
    }

    pub fn focus_content(&mut self) {
        if let Some(content) = &self.content {
            self.focus = Region::Content;
            content.widget.publish_help();
        }
    }

    pub fn focus_button_bar(&mut self) {
        if let Some(bar) = &self.buttons {
            self.focus = Region::ButtonBar;
            bar.publish_help();
        }
    }

    /// Overrides the help line until the next handled key.
    pub fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some((level, text.into()));
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Text of the help line as it would be drawn now.
    #[must_use]
    pub fn help_text(&self) -> String {
        self.status
            .as_ref()
            .map_or_else(|| self.help.text(), |(_, text)| text.clone())
    }

    pub fn open_keyboard(
        &mut self,
        initial: impl Into<String>,
        on_submit: fn(String) -> E,
        on_cancel: Option<E>,
    ) {
        self.overlay = Some(Overlay::Keyboard {
            keyboard: OnScreenKeyboard::new(initial),
            on_submit,
            on_cancel,
        });
    }

    /// Shows a message box; `on_dismiss` is reported when it is closed.
    pub fn show_message(&mut self, modal: MessageModal, on_dismiss: Option<E>) {
        debug!(kind = ?modal.kind(), message = modal.message(), "Showing modal");
        self.overlay = Some(Overlay::Message {
            modal,
            on_confirm: None,
            on_dismiss,
        });
    }

    /// Asks a yes/no question. `on_yes` is reported for Yes; No and escape
    /// report `on_no`.
    pub fn show_confirm(&mut self, message: impl Into<String>, on_yes: E, on_no: Option<E>) {
        let modal = MessageModal::confirm(message);
        debug!(message = modal.message(), "Asking for confirmation");
        self.overlay = Some(Overlay::Message {
            modal,
            on_confirm: Some(on_yes),
            on_dismiss: on_no,
        });
    }

    /// Removes any overlay without reporting its events.
    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    #[must_use]
    pub fn message(&self) -> Option<&MessageModal> {
        match &self.overlay {
            Some(Overlay::Message { modal, .. }) => Some(modal),
            _ => None,
        }
    }

    #[must_use]
    pub fn keyboard(&self) -> Option<&OnScreenKeyboard> {
        match &self.overlay {
            Some(Overlay::Keyboard { keyboard, .. }) => Some(keyboard),
            _ => None,
        }
    }

    fn handle_overlay(&mut self, input: Input) -> Option<Outcome<E>> {
        let (outcome, close) = match self.overlay.as_mut()? {
            Overlay::Keyboard {
                keyboard,
                on_submit,
                on_cancel,
            } => match keyboard.handle_input(input) {
                Outcome::Event(KeyboardEvent::Submit(text)) => {
                    (Outcome::Event((*on_submit)(text)), true)
                }
                Outcome::Event(KeyboardEvent::Cancel) => {
                    (on_cancel.take().map_or(Outcome::Consumed, Outcome::Event), true)
                }
                Outcome::Ignored => (Outcome::Ignored, false),
                Outcome::Consumed | Outcome::Boundary(_) => (Outcome::Consumed, false),
            },
            Overlay::Message {
                modal,
                on_confirm,
                on_dismiss,
            } => match modal.handle_input(input) {
                Outcome::Event(ModalResponse::Confirmed) => {
                    let event = on_confirm.take().or_else(|| on_dismiss.take());
                    (event.map_or(Outcome::Consumed, Outcome::Event), true)
                }
                Outcome::Event(ModalResponse::Declined) => {
                    (on_dismiss.take().map_or(Outcome::Consumed, Outcome::Event), true)
                }
                Outcome::Ignored => (Outcome::Ignored, false),
                Outcome::Consumed | Outcome::Boundary(_) => (Outcome::Consumed, false),
            },
        };

        if close {
            self.overlay = None;
            self.restore_help();
        }
        Some(outcome)
    }

    fn restore_help(&self) {
        match self.focus {
            Region::Content => {
                if let Some(content) = &self.content {
                    content.widget.publish_help();
                }
            }
            Region::ButtonBar | Region::Modal => {
                if let Some(bar) = &self.buttons {
                    bar.publish_help();
                }
            }
        }
    }

    fn toggle_region(&mut self) -> Outcome<E> {
        match self.focus {
            Region::Content if self.buttons.is_some() => self.focus_button_bar(),
            Region::ButtonBar if self.content.is_some() => self.focus_content(),
            _ => {}
        }
        Outcome::Consumed
    }

    fn handle_content(&mut self, input: Input) -> Outcome<E> {
        let Some(content) = self.content.as_mut() else {
            return Outcome::Ignored;
        };

        match content.widget.handle_input(input) {
            Outcome::Event(event) => Outcome::Event((content.map)(event)),
            Outcome::Boundary(Direction::Up | Direction::Down) => {
                self.focus_button_bar();
                Outcome::Consumed
            }
            Outcome::Boundary(_) | Outcome::Consumed => Outcome::Consumed,
            Outcome::Ignored => Outcome::Ignored,
        }
    }

    fn handle_buttons(&mut self, input: Input) -> Outcome<E> {
        let Some(bar) = self.buttons.as_mut() else {
            return Outcome::Ignored;
        };

        match bar.handle_input(input) {
            Outcome::Boundary(_) => {
                self.focus_content();
                Outcome::Consumed
            }
            outcome => outcome,
        }
    }

    /// Routes one key: overlay first, then the central escape, then
    /// Tab between regions, then the focused region.
    pub fn handle_input(&mut self, input: Input) -> Outcome<E> {
        if input != Input::Ignored {
            self.status = None;
        }

        if let Some(outcome) = self.handle_overlay(input) {
            return outcome;
        }

        match input.action() {
            Some(Action::Cancel) => return Outcome::Event(self.escape.clone()),
            Some(Action::FocusNext | Action::FocusPrevious) => return self.toggle_region(),
            _ => {}
        }

        match self.focus {
            Region::Content => self.handle_content(input),
            Region::ButtonBar => self.handle_buttons(input),
            Region::Modal => Outcome::Ignored,
        }
    }

    pub fn render<'k>(
        &self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        hints: impl IntoIterator<Item = &'k Keybind>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.style(ColorToken::Border))
            .style(theme.base_style())
            .title(self.title.as_str());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let button_rows = u16::from(self.buttons.is_some());
        let [content_area, help_area, button_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(button_rows),
        ])
        .areas(inner);

        if let Some(content) = &self.content {
            let focused = self.focus() == Region::Content;
            content.widget.draw(content_area, buf, theme, focused);
        }

        let (level, text) = self
            .status
            .as_ref()
            .map_or_else(|| (StatusLevel::Help, self.help.text()), |(l, t)| (*l, t.clone()));
        StatusBar::new(&text, level, theme).render(help_area, buf);

        if let Some(bar) = &self.buttons {
            bar.draw(button_area, buf, theme, self.focus() == Region::ButtonBar);
        }

        if area.width > 4 && area.height > 2 {
            let footer = Rect::new(area.x + 2, area.bottom() - 1, area.width - 4, 1);
            FooterBar::new(hints, FooterBarStyle::from_theme(theme)).render(footer, buf);
        }

        match &self.overlay {
            Some(Overlay::Keyboard { keyboard, .. }) => keyboard.draw(inner, buf, theme, true),
            Some(Overlay::Message { modal, .. }) => modal.draw(inner, buf, theme, true),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::commands::KeyRules;
    use crate::presentation::widgets::modal::ModalKind;
    use crate::presentation::widgets::settings_list::{MenuEvent, SettingsList};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Ev {
        Menu(MenuEvent<u8>),
        Back,
        Search,
        Typed(String),
        TypingCancelled,
        Acknowledged,
    }

    fn act(action: Action) -> Input {
        Input::Action(action)
    }

    fn list() -> SettingsList<u8> {
        let mut list = SettingsList::new();
        list.add_toggle(1, "Audio", "Play a sound on scan", false)
            .add_action(2, "Readers", "Manage connected readers");
        list
    }

    fn bar() -> ButtonBar<Ev> {
        ButtonBar::new()
            .add_button_with_help("Search", "Run the search", Ev::Search)
            .add_button("Back", Ev::Back)
            .setup_navigation(Ev::Back)
    }

    fn frame() -> PageFrame<SettingsList<u8>, Ev> {
        PageFrame::new(Ev::Back)
            .with_title(&["Settings", "Audio"])
            .with_content(list(), Ev::Menu)
            .unwrap()
            .with_button_bar(bar())
            .link_content_to_button_bar()
    }

    #[test]
    fn test_empty_content_is_rejected() {
        let result = PageFrame::<SettingsList<u8>, Ev>::new(Ev::Back)
            .with_content(SettingsList::new(), Ev::Menu);
        assert!(matches!(result, Err(UiError::EmptySettingsList)));
    }

    #[test]
    fn test_focus_defaults() {
        assert_eq!(frame().focus(), Region::Content);

        let buttons_only = PageFrame::<SettingsList<u8>, Ev>::new(Ev::Back).with_button_bar(bar());
        assert_eq!(buttons_only.focus(), Region::ButtonBar);
    }

    #[test]
    fn test_boundary_moves_focus_between_regions() {
        let mut frame = frame();
        frame.handle_input(act(Action::NavigateDown));
        assert_eq!(frame.focus(), Region::Content);
        frame.handle_input(act(Action::NavigateDown));
        assert_eq!(frame.focus(), Region::ButtonBar);
        assert_eq!(frame.help_text(), "Run the search");

        frame.handle_input(act(Action::NavigateUp));
        assert_eq!(frame.focus(), Region::Content);
        assert_eq!(frame.help_text(), "Manage connected readers");

        frame.handle_input(act(Action::NavigateUp));
        frame.handle_input(act(Action::NavigateUp));
        assert_eq!(frame.focus(), Region::ButtonBar);
        frame.handle_input(act(Action::NavigateDown));
        assert_eq!(frame.focus(), Region::Content);
    }

    #[test]
    fn test_unlinked_content_clamps() {
        let mut frame = PageFrame::new(Ev::Back)
            .with_content(list(), Ev::Menu)
            .unwrap()
            .with_button_bar(bar());
        frame.handle_input(act(Action::NavigateUp));
        assert_eq!(frame.focus(), Region::Content);
    }

    #[test]
    fn test_tab_toggles_regions() {
        let mut frame = frame();
        frame.handle_input(act(Action::FocusNext));
        assert_eq!(frame.focus(), Region::ButtonBar);
        frame.handle_input(act(Action::FocusPrevious));
        assert_eq!(frame.focus(), Region::Content);
    }

    #[test]
    fn test_events_are_mapped() {
        let mut frame = frame();
        assert_eq!(
            frame.handle_input(act(Action::Select)),
            Outcome::Event(Ev::Menu(MenuEvent::Toggled { key: 1, value: true }))
        );
        frame.focus_button_bar();
        assert_eq!(frame.handle_input(act(Action::Select)), Outcome::Event(Ev::Search));
    }

    #[test]
    fn test_escape_is_central_from_every_region() {
        let mut frame = frame();
        assert_eq!(frame.handle_input(act(Action::Cancel)), Outcome::Event(Ev::Back));
        frame.focus_button_bar();
        assert_eq!(frame.handle_input(act(Action::Cancel)), Outcome::Event(Ev::Back));
    }

    #[test]
    fn test_keyboard_overlay_takes_input_and_escape() {
        let mut frame = frame();
        frame.open_keyboard("mar", Ev::Typed, Some(Ev::TypingCancelled));
        assert_eq!(frame.focus(), Region::Modal);

        assert_eq!(frame.handle_input(Input::Char('i')), Outcome::Consumed);
        assert_eq!(frame.keyboard().map(OnScreenKeyboard::text), Some("mari"));

        assert_eq!(
            frame.handle_input(act(Action::Cancel)),
            Outcome::Event(Ev::TypingCancelled)
        );
        assert_eq!(frame.focus(), Region::Content);
        assert!(frame.keyboard().is_none());
    }

    #[test]
    fn test_keyboard_submit_returns_text() {
        let mut frame = frame();
        frame.open_keyboard("zelda", Ev::Typed, None);
        // Up from the top row wraps onto the action row, leading cell (SHIFT);
        // OK is four cells to the right.
        frame.handle_input(act(Action::NavigateUp));
        for _ in 0..4 {
            frame.handle_input(act(Action::NavigateRight));
        }
        assert_eq!(
            frame.handle_input(act(Action::Select)),
            Outcome::Event(Ev::Typed("zelda".to_string()))
        );
        assert_eq!(frame.focus(), Region::Content);
    }

    #[test]
    fn test_message_dismiss() {
        let mut frame = frame();
        frame.show_message(MessageModal::error("Search failed"), Some(Ev::Acknowledged));
        assert_eq!(frame.message().map(MessageModal::kind), Some(ModalKind::Error));
        assert_eq!(frame.handle_input(act(Action::NavigateDown)), Outcome::Consumed);
        assert_eq!(
            frame.handle_input(act(Action::Select)),
            Outcome::Event(Ev::Acknowledged)
        );
        assert!(frame.message().is_none());

        frame.show_message(MessageModal::info("Done"), None);
        assert_eq!(frame.handle_input(act(Action::Cancel)), Outcome::Consumed);
        assert_eq!(frame.focus(), Region::Content);
    }

    #[test]
    fn test_confirm_reports_yes_or_no() {
        let mut frame = frame();
        frame.show_confirm("Rebuild?", Ev::Search, Some(Ev::Back));
        assert_eq!(frame.message().map(MessageModal::kind), Some(ModalKind::Confirm));
        assert_eq!(frame.handle_input(act(Action::Select)), Outcome::Event(Ev::Search));

        frame.show_confirm("Rebuild?", Ev::Search, Some(Ev::Back));
        frame.handle_input(act(Action::NavigateRight));
        assert_eq!(frame.handle_input(act(Action::Select)), Outcome::Event(Ev::Back));

        frame.show_confirm("Rebuild?", Ev::Search, None);
        assert_eq!(frame.handle_input(act(Action::Cancel)), Outcome::Consumed);
        assert!(frame.message().is_none());
    }

    #[test]
    fn test_set_content_replaces_and_keeps_link() {
        let mut frame = frame();
        frame.focus_button_bar();

        let mut other = SettingsList::new();
        other.add_action(7, "Ignore systems", "Pick systems to skip");
        frame.set_content(other, Ev::Menu).unwrap();
        assert_eq!(frame.focus(), Region::Content);
        assert_eq!(frame.help_text(), "Pick systems to skip");

        frame.handle_input(act(Action::NavigateDown));
        assert_eq!(frame.focus(), Region::ButtonBar);

        assert!(matches!(
            frame.set_content(SettingsList::new(), Ev::Menu),
            Err(UiError::EmptySettingsList)
        ));
        assert_eq!(frame.content().map(SettingsList::len), Some(1));
    }

    #[test]
    fn test_set_button_bar_keeps_focus_on_buttons() {
        let mut frame = frame();
        frame.focus_button_bar();
        frame.set_button_bar(ButtonBar::new().add_button_with_help("Done", "Close", Ev::Back));

        assert_eq!(frame.focus(), Region::ButtonBar);
        assert_eq!(frame.help_text(), "Close");
        assert_eq!(frame.handle_input(act(Action::Select)), Outcome::Event(Ev::Back));
        frame.handle_input(act(Action::NavigateDown));
        assert_eq!(frame.focus(), Region::Content);
    }

    #[test]
    fn test_status_overrides_help_until_next_key() {
        let mut frame = frame();
        frame.set_status(StatusLevel::Warning, "Enter a name");
        assert_eq!(frame.help_text(), "Enter a name");
        frame.handle_input(act(Action::NavigateDown));
        assert_eq!(frame.help_text(), "Manage connected readers");
    }

    #[test]
    fn test_render_layout() {
        let frame = frame();
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        let rules = KeyRules::new();
        frame.render(area, &mut buf, &Theme::default(), rules.hints());

        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect();
        assert!(rows[0].contains(" Settings > Audio "));
        assert!(rows[1].contains("[ ] Audio"));
        assert!(rows[9].contains("Play a sound on scan"));
        assert!(rows[10].contains("Search"));
        assert!(rows[10].contains("Back"));
        assert!(rows[11].contains("Enter: Select"));
        assert!(rows[11].contains("ESC: Back"));
    }
}
