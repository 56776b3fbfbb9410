//! Media search with a system filter; a selected result is written to a token.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use tracing::{debug, error, warn};

use crate::application::SearchMediaUseCase;
use crate::domain::entities::{ALL_SYSTEMS_LABEL, MediaResult, PageId, SearchResults, System, WriteFormat};
use crate::domain::errors::UiError;
use crate::domain::keybinding::{Action, Direction};
use crate::presentation::commands::Input;
use crate::presentation::context::UiContext;
use crate::presentation::events::UiMessage;
use crate::presentation::theme::{ColorToken, Theme};
use crate::presentation::ui::page::{Page, PageCommand, breadcrumb, escape_command};
use crate::presentation::ui::pages::token_write::{TokenWrite, WAITING_MESSAGE};
use crate::presentation::widgets::{
    ButtonBar, Component, HelpSink, Hook, MessageModal, Outcome, PageFrame, Region, StatusLevel,
};

const LEFT_COLUMN_WIDTH: u16 = 24;
const SYSTEM_LABEL_MAX: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    System,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormEvent {
    NameEdited,
    EditName,
    SystemChanged,
    Write(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SearchEvent {
    Form(FormEvent),
    NameSubmitted(String),
    Search,
    CancelSearch,
    CancelWrite,
    Back,
}

fn truncate_system(name: &str) -> String {
    if name.chars().count() <= SYSTEM_LABEL_MAX {
        return name.to_string();
    }
    let head: String = name.chars().take(SYSTEM_LABEL_MAX - 3).collect();
    format!("{head}...")
}

/// Name and system on the left, results on the right.
struct SearchForm {
    name: String,
    systems: Vec<System>,
    /// 0 is "All", `n` is `systems[n - 1]`.
    system: usize,
    results: Vec<MediaResult>,
    searched: bool,
    format: WriteFormat,
    selected: usize,
    field: Field,
    last_left: Field,
    handoff: bool,
    help: Option<HelpSink>,
}

impl SearchForm {
    fn new(name: String, format: WriteFormat) -> Self {
        Self {
            name,
            systems: Vec::new(),
            system: 0,
            results: Vec::new(),
            searched: false,
            format,
            selected: 0,
            field: Field::Name,
            last_left: Field::Name,
            handoff: false,
            help: None,
        }
    }

    fn system_id(&self) -> &str {
        self.system
            .checked_sub(1)
            .and_then(|i| self.systems.get(i))
            .map_or("", |s| s.id.as_str())
    }

    fn system_label(&self) -> &str {
        self.system
            .checked_sub(1)
            .and_then(|i| self.systems.get(i))
            .map_or(ALL_SYSTEMS_LABEL, |s| s.name.as_str())
    }

    /// Replaces the system list, keeping `selected_id` when it is still offered.
    fn set_systems(&mut self, systems: Vec<System>, selected_id: &str) {
        self.system = systems
            .iter()
            .position(|s| s.id == selected_id)
            .map_or(0, |i| i + 1);
        self.systems = systems;
    }

    fn set_results(&mut self, results: Vec<MediaResult>) {
        self.results = results;
        self.selected = 0;
        self.searched = true;
        if self.results.is_empty() && self.field == Field::Results {
            self.focus(self.last_left);
        }
    }

    fn focus(&mut self, field: Field) {
        self.field = field;
        if field != Field::Results {
            self.last_left = field;
        }
        self.publish_help();
    }

    /// Focus when arriving from the button bar moving in `direction`.
    fn enter_from(&mut self, direction: Direction) {
        match direction {
            Direction::Up | Direction::Right if !self.results.is_empty() => {
                self.focus(Field::Results);
            }
            Direction::Up => self.focus(Field::System),
            Direction::Left | Direction::Right => self.focus(self.last_left),
            Direction::Down => self.focus(Field::Name),
        }
    }

    fn cycle_system(&mut self, forward: bool) -> Outcome<FormEvent> {
        let len = self.systems.len() + 1;
        self.system = if forward {
            (self.system + 1) % len
        } else {
            (self.system + len - 1) % len
        };
        Outcome::Event(FormEvent::SystemChanged)
    }

    fn edge(&self, direction: Direction) -> Outcome<FormEvent> {
        if self.handoff {
            Outcome::Boundary(direction)
        } else {
            Outcome::Consumed
        }
    }

    fn handle_name(&mut self, input: Input) -> Outcome<FormEvent> {
        match input {
            Input::Char(c) => {
                self.name.push(c);
                Outcome::Event(FormEvent::NameEdited)
            }
            Input::Action(Action::Backspace) => {
                if self.name.pop().is_some() {
                    Outcome::Event(FormEvent::NameEdited)
                } else {
                    Outcome::Consumed
                }
            }
            Input::Action(Action::Select) => Outcome::Event(FormEvent::EditName),
            Input::Action(Action::NavigateUp) => self.edge(Direction::Up),
            Input::Action(Action::NavigateDown) => {
                self.focus(Field::System);
                Outcome::Consumed
            }
            Input::Action(Action::NavigateRight) => self.to_results(),
            Input::Action(Action::NavigateLeft) => Outcome::Consumed,
            _ => Outcome::Ignored,
        }
    }

    fn handle_system(&mut self, input: Input) -> Outcome<FormEvent> {
        match input.action() {
            Some(Action::Select) => self.cycle_system(true),
            Some(Action::NavigateLeft) => self.cycle_system(false),
            Some(Action::NavigateRight) => {
                if self.results.is_empty() {
                    self.cycle_system(true)
                } else {
                    self.to_results()
                }
            }
            Some(Action::NavigateUp) => {
                self.focus(Field::Name);
                Outcome::Consumed
            }
            Some(Action::NavigateDown) => self.edge(Direction::Down),
            _ => Outcome::Ignored,
        }
    }

    fn handle_results(&mut self, input: Input) -> Outcome<FormEvent> {
        match input.action() {
            Some(Action::Select) => Outcome::Event(FormEvent::Write(self.selected)),
            Some(Action::NavigateUp) if self.selected == 0 => self.edge(Direction::Up),
            Some(Action::NavigateUp) => {
                self.selected -= 1;
                Outcome::Consumed
            }
            Some(Action::NavigateDown) if self.selected + 1 >= self.results.len() => {
                self.edge(Direction::Down)
            }
            Some(Action::NavigateDown) => {
                self.selected += 1;
                Outcome::Consumed
            }
            Some(Action::NavigateLeft) => {
                self.focus(self.last_left);
                Outcome::Consumed
            }
            Some(Action::NavigateRight) => Outcome::Consumed,
            _ => Outcome::Ignored,
        }
    }

    fn to_results(&mut self) -> Outcome<FormEvent> {
        if !self.results.is_empty() {
            self.focus(Field::Results);
        }
        Outcome::Consumed
    }

    fn field_style(&self, field: Field, theme: &Theme, focused: bool) -> Style {
        if field == self.field {
            theme.highlight(focused)
        } else {
            theme.base_style()
        }
    }

    fn draw_left(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        let width = usize::from(area.width.saturating_sub(1));
        let shown: String = {
            let skip = self.name.chars().count().saturating_sub(width.saturating_sub(1));
            self.name.chars().skip(skip).collect()
        };
        let cursor = if focused && self.field == Field::Name { "_" } else { "" };
        let field = format!("{shown}{cursor}");
        let name_style = if self.field == Field::Name && focused {
            theme.style(ColorToken::Text).bg(theme.color(ColorToken::FieldFocused))
        } else {
            theme.base_style()
        };

        let lines = vec![
            Line::styled("Name:", theme.style(ColorToken::Label)),
            Line::styled(format!("{field:<width$}"), name_style),
            Line::default(),
            Line::styled("System:", theme.style(ColorToken::Label)),
            Line::from(vec![
                Span::styled("< ", theme.style(ColorToken::Primary)),
                Span::styled(
                    truncate_system(self.system_label()),
                    self.field_style(Field::System, theme, focused),
                ),
                Span::styled(" >", theme.style(ColorToken::Primary)),
            ]),
        ];
        Paragraph::new(lines).render(area, buf);
    }

    fn draw_results(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        if area.height == 0 {
            return;
        }
        if self.results.is_empty() {
            let text = if self.searched { "No results" } else { "" };
            Paragraph::new(Line::styled(text, theme.dimmed_style)).render(area, buf);
            return;
        }

        let visible = usize::from(area.height);
        let first = self.selected.saturating_sub(visible - 1);
        let lines: Vec<Line> = self
            .results
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, result)| {
                let name_style = if i == self.selected && self.field == Field::Results {
                    theme.highlight(focused)
                } else {
                    theme.base_style()
                };
                Line::from(vec![
                    Span::styled(result.display_name(self.format), name_style),
                    Span::styled(format!(" ({})", result.system.name), theme.dimmed_style),
                ])
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
    }
}

impl Component for SearchForm {
    type Event = FormEvent;

    fn handle_input(&mut self, input: Input) -> Outcome<Self::Event> {
        match self.field {
            Field::Name => self.handle_name(input),
            Field::System => self.handle_system(input),
            Field::Results => self.handle_results(input),
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        let [left, _, right] = Layout::horizontal([
            Constraint::Length(LEFT_COLUMN_WIDTH),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        self.draw_left(left, buf, theme, focused);
        self.draw_results(right, buf, theme, focused);
    }

    fn attach_help(&mut self, sink: HelpSink) {
        self.help = Some(sink);
        self.publish_help();
    }

    fn publish_help(&self) {
        let Some(sink) = &self.help else {
            return;
        };
        sink.publish(match self.field {
            Field::Name => "Type a name, Enter opens the keyboard",
            Field::System => "Left/Right to filter by system",
            Field::Results => "Select to write tag",
        });
    }

    fn set_boundary_handoff(&mut self, enabled: bool) {
        self.handoff = enabled;
    }
}

pub struct SearchPage {
    frame: PageFrame<SearchForm, SearchEvent>,
    searching: bool,
    systems_loaded: bool,
    write: TokenWrite,
}

impl SearchPage {
    /// # Errors
    /// Returns error if the form cannot be attached to the frame.
    pub fn new(ctx: &UiContext) -> Result<Self, UiError> {
        let form = SearchForm::new(ctx.session.search_name(), ctx.config_snapshot().write_format);
        let mut buttons = ButtonBar::new()
            .add_button_with_help("Search", "Search for media", SearchEvent::Search)
            .add_button_with_help("Back", "Back to main menu", SearchEvent::Back)
            .setup_navigation(SearchEvent::Back);
        buttons.set_on_left(Hook::Sibling);
        buttons.set_on_right(Hook::Sibling);

        let frame = PageFrame::new(SearchEvent::Back)
            .with_title(&breadcrumb(PageId::SearchMedia))
            .with_content(form, SearchEvent::Form)?
            .with_button_bar(buttons)
            .link_content_to_button_bar();

        Ok(Self {
            frame,
            searching: false,
            systems_loaded: false,
            write: TokenWrite::default(),
        })
    }

    fn form(&self) -> Option<&SearchForm> {
        self.frame.content()
    }

    fn form_mut(&mut self) -> Option<&mut SearchForm> {
        self.frame.content_mut()
    }

    fn store_filters(&self, ctx: &UiContext) {
        if let Some(form) = self.form() {
            ctx.session.set_search_name(form.name.clone());
            ctx.session.set_search_system(form.system_id(), form.system_label());
        }
    }

    fn search(&mut self, ctx: &UiContext) {
        if self.searching {
            return;
        }
        let Some(form) = self.form() else {
            return;
        };

        let query = match SearchMediaUseCase::validate(&form.name, form.system_id()) {
            Ok(query) => query,
            Err(e) => {
                self.frame.set_status(StatusLevel::Warning, e.message());
                return;
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let use_case = ctx.search_use_case();
        let ui = ctx.ui.clone();
        runtime.spawn(async move {
            ui.send(UiMessage::SearchFinished(use_case.execute(query).await));
        });

        self.searching = true;
        self.frame
            .show_message(MessageModal::waiting("Searching..."), Some(SearchEvent::CancelSearch));
    }

    fn write_result(&mut self, index: usize, ctx: &UiContext) {
        let Some(form) = self.form() else {
            return;
        };
        let Some(result) = form.results.get(index) else {
            return;
        };
        let value = result.write_value(form.format).to_string();
        debug!(name = %result.name, "Writing search result");

        if self.write.start(value, ctx) {
            self.frame
                .show_message(MessageModal::waiting(WAITING_MESSAGE), Some(SearchEvent::CancelWrite));
        }
    }

    fn show_results(&mut self, results: SearchResults) {
        let count = results.results.len();
        if let Some(form) = self.form_mut() {
            form.set_results(results.results);
            if count > 0 {
                form.focus(Field::Results);
            }
        }
        if count > 0 {
            self.frame.focus_content();
        }
        self.frame.set_status(
            StatusLevel::Info,
            format!("Found {count} results. Select to write tag"),
        );
    }

    fn handle_event(&mut self, event: SearchEvent, ctx: &UiContext) -> PageCommand {
        match event {
            SearchEvent::Back => {
                self.store_filters(ctx);
                return escape_command(PageId::SearchMedia);
            }
            SearchEvent::Form(FormEvent::NameEdited | FormEvent::SystemChanged) => {
                self.store_filters(ctx);
            }
            SearchEvent::Form(FormEvent::EditName) => {
                let name = self.form().map(|f| f.name.clone()).unwrap_or_default();
                self.frame.open_keyboard(name, SearchEvent::NameSubmitted, None);
            }
            SearchEvent::Form(FormEvent::Write(index)) => self.write_result(index, ctx),
            SearchEvent::NameSubmitted(name) => {
                if let Some(form) = self.form_mut() {
                    form.name = name;
                }
                self.store_filters(ctx);
                self.search(ctx);
            }
            SearchEvent::Search => self.search(ctx),
            SearchEvent::CancelSearch => self.searching = false,
            SearchEvent::CancelWrite => self.write.cancel(),
        }
        PageCommand::None
    }
}

impl Page for SearchPage {
    fn id(&self) -> PageId {
        PageId::SearchMedia
    }

    fn on_enter(&mut self, ctx: &UiContext) {
        let format = ctx.config_snapshot().write_format;
        let name = ctx.session.search_name();
        if let Some(form) = self.form_mut() {
            form.format = format;
            form.name = name;
        }

        if self.systems_loaded {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let use_case = ctx.settings_use_case();
        let ui = ctx.ui.clone();
        runtime.spawn(async move {
            ui.send(UiMessage::SystemsLoaded(use_case.systems().await));
        });
    }

    fn on_leave(&mut self, ctx: &UiContext) {
        self.write.cancel();
        self.searching = false;
        self.frame.close_overlay();
        self.store_filters(ctx);
    }

    fn handle_input(&mut self, input: Input, ctx: &UiContext) -> PageCommand {
        let before = self.frame.focus();
        let outcome = self.frame.handle_input(input);

        if before == Region::ButtonBar
            && self.frame.focus() == Region::Content
            && let Some(direction) = input.action().and_then(Action::direction)
            && let Some(form) = self.form_mut()
        {
            form.enter_from(direction);
        }

        match outcome {
            Outcome::Event(event) => self.handle_event(event, ctx),
            _ => PageCommand::None,
        }
    }

    fn handle_message(&mut self, message: UiMessage, ctx: &UiContext) -> PageCommand {
        match message {
            UiMessage::SystemsLoaded(Ok(systems)) => {
                let (selected, _) = ctx.session.search_system();
                if let Some(form) = self.form_mut() {
                    form.set_systems(systems, &selected);
                }
                self.systems_loaded = true;
            }
            UiMessage::SystemsLoaded(Err(e)) => {
                warn!(error = %e, "Failed to load systems");
                self.frame
                    .set_status(StatusLevel::Warning, "Could not load the system list");
            }
            UiMessage::SearchFinished(result) if self.searching => {
                self.searching = false;
                self.frame.close_overlay();
                match result {
                    Ok(results) => self.show_results(results),
                    Err(e) => {
                        error!(error = %e, "Search failed");
                        self.frame.set_status(StatusLevel::Error, "An error occurred during search");
                    }
                }
            }
            UiMessage::WriteFinished { id, result } => {
                if let Some(modal) = self.write.finish(id, result, "Tag written successfully!") {
                    self.frame.show_message(modal, None);
                }
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
    use crate::domain::ports::mocks::MockSettingsServicePort;
    use crate::presentation::context::testing::context;
    use crate::presentation::widgets::ModalKind;

    fn press(page: &mut SearchPage, ctx: &UiContext, action: Action) -> PageCommand {
        page.handle_input(Input::Action(action), ctx)
    }

    fn type_text(page: &mut SearchPage, ctx: &UiContext, text: &str) {
        for c in text.chars() {
            page.handle_input(Input::Char(c), ctx);
        }
    }

    fn media(name: &str) -> MediaResult {
        MediaResult {
            name: name.to_string(),
            path: format!("/roms/snes/{name}.sfc"),
            zapscript: format!("**launch:{name}"),
            system: System::new("SNES", "Super Nintendo"),
        }
    }

    fn systems() -> Vec<System> {
        vec![System::new("NES", "Nintendo"), System::new("SNES", "Super Nintendo")]
    }

    #[test]
    fn test_unfiltered_search_is_rejected_inline() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = SearchPage::new(&ctx).unwrap();

        press(&mut page, &ctx, Action::FocusNext);
        press(&mut page, &ctx, Action::Select);

        assert_eq!(page.frame.help_text(), "Enter a name or pick a system to search");
        assert!(!page.searching);
    }

    #[test]
    fn test_typing_updates_session() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = SearchPage::new(&ctx).unwrap();

        type_text(&mut page, &ctx, "marioo");
        press(&mut page, &ctx, Action::Backspace);
        assert_eq!(ctx.session.search_name(), "mario");

        let rebuilt = SearchPage::new(&ctx).unwrap();
        assert_eq!(rebuilt.form().unwrap().name, "mario");
    }

    #[test]
    fn test_system_cycle_includes_all() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = SearchPage::new(&ctx).unwrap();
        page.handle_message(UiMessage::SystemsLoaded(Ok(systems())), &ctx);

        press(&mut page, &ctx, Action::NavigateDown);
        press(&mut page, &ctx, Action::NavigateRight);
        assert_eq!(ctx.session.search_system(), ("NES".to_string(), "Nintendo".to_string()));
        press(&mut page, &ctx, Action::NavigateLeft);
        press(&mut page, &ctx, Action::NavigateLeft);
        assert_eq!(ctx.session.search_system().0, "SNES");
        press(&mut page, &ctx, Action::NavigateRight);
        assert_eq!(ctx.session.search_system(), (String::new(), ALL_SYSTEMS_LABEL.to_string()));
    }

    #[test]
    fn test_restores_system_filter() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        ctx.session.set_search_system("SNES", "Super Nintendo");
        let mut page = SearchPage::new(&ctx).unwrap();

        page.handle_message(UiMessage::SystemsLoaded(Ok(systems())), &ctx);
        assert_eq!(page.form().unwrap().system_id(), "SNES");
    }

    #[test]
    fn test_select_on_name_opens_keyboard() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = SearchPage::new(&ctx).unwrap();
        type_text(&mut page, &ctx, "zel");

        press(&mut page, &ctx, Action::Select);
        assert_eq!(page.frame.keyboard().map(|k| k.text().to_string()), Some("zel".to_string()));
    }

    #[tokio::test]
    async fn test_search_then_write_result() {
        let mut service = MockSettingsServicePort::new();
        service.expect_search_media().returning(|_| {
            Ok(SearchResults {
                results: vec![media("Mario"), media("Zelda")],
                total: 2,
            })
        });
        service
            .expect_write_token()
            .withf(|text| text == "**launch:Zelda")
            .returning(|_| Ok(()));
        let (ctx, mut rx) = context(service);
        let mut page = SearchPage::new(&ctx).unwrap();

        type_text(&mut page, &ctx, "a");
        press(&mut page, &ctx, Action::FocusNext);
        press(&mut page, &ctx, Action::Select);
        assert!(page.searching);
        assert_eq!(page.frame.message().map(MessageModal::kind), Some(ModalKind::Waiting));

        let message = rx.recv().await.unwrap();
        page.handle_message(message, &ctx);
        assert_eq!(page.frame.help_text(), "Found 2 results. Select to write tag");
        assert_eq!(page.frame.focus(), Region::Content);

        press(&mut page, &ctx, Action::NavigateDown);
        press(&mut page, &ctx, Action::Select);
        assert_eq!(page.frame.message().map(MessageModal::message), Some(WAITING_MESSAGE));

        let message = rx.recv().await.unwrap();
        page.handle_message(message, &ctx);
        assert_eq!(
            page.frame.message().map(MessageModal::message),
            Some("Tag written successfully!")
        );
    }

    #[test]
    fn test_button_bar_entry_points() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = SearchPage::new(&ctx).unwrap();

        press(&mut page, &ctx, Action::NavigateUp);
        assert_eq!(page.frame.focus(), Region::ButtonBar);
        press(&mut page, &ctx, Action::NavigateUp);
        assert_eq!(page.form().unwrap().field, Field::System);

        press(&mut page, &ctx, Action::NavigateDown);
        assert_eq!(page.frame.focus(), Region::ButtonBar);
        press(&mut page, &ctx, Action::NavigateDown);
        assert_eq!(page.form().unwrap().field, Field::Name);
    }

    #[test]
    fn test_button_bar_edges_return_to_form() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = SearchPage::new(&ctx).unwrap();

        press(&mut page, &ctx, Action::NavigateDown);
        press(&mut page, &ctx, Action::FocusNext);
        press(&mut page, &ctx, Action::NavigateLeft);
        assert_eq!(page.frame.focus(), Region::Content);
        assert_eq!(page.form().unwrap().field, Field::System);

        press(&mut page, &ctx, Action::FocusNext);
        press(&mut page, &ctx, Action::NavigateRight);
        assert_eq!(page.frame.focus(), Region::ButtonBar);
        assert_eq!(page.frame.button_bar().unwrap().focused_index(), 1);
        press(&mut page, &ctx, Action::NavigateRight);
        assert_eq!(page.frame.focus(), Region::Content);
        assert_eq!(page.form().unwrap().field, Field::System);

        page.form_mut().unwrap().set_results(vec![media("Mario")]);
        press(&mut page, &ctx, Action::FocusNext);
        press(&mut page, &ctx, Action::NavigateRight);
        assert_eq!(page.form().unwrap().field, Field::Results);
    }

    #[test]
    fn test_escape_goes_back() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let mut page = SearchPage::new(&ctx).unwrap();
        assert_eq!(
            press(&mut page, &ctx, Action::Cancel),
            PageCommand::Navigate(PageId::Main)
        );
    }

    #[test]
    fn test_truncate_system() {
        assert_eq!(truncate_system("SNES"), "SNES");
        assert_eq!(truncate_system("Nintendo Entertainment System"), "Nintendo Entert...");
    }
}
