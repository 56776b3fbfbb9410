use ratatui::{buffer::Buffer, layout::Rect};

use crate::domain::entities::PageId;
use crate::infrastructure::ThemeName;
use crate::presentation::commands::Input;
use crate::presentation::context::UiContext;
use crate::presentation::events::UiMessage;

/// What a page asks the application to do after handling an input or message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageCommand {
    #[default]
    None,
    Navigate(PageId),
    Quit,
    /// Rebuild the context and every page with a new theme.
    SetTheme(ThemeName),
    SetMouse(bool),
}

/// A top-level screen registered with the router.
pub trait Page {
    fn id(&self) -> PageId;

    /// Called when the page comes to the front.
    fn on_enter(&mut self, _ctx: &UiContext) {}

    /// Called when another page replaces this one; background work stops here.
    fn on_leave(&mut self, _ctx: &UiContext) {}

    fn handle_input(&mut self, input: Input, ctx: &UiContext) -> PageCommand;

    fn handle_message(&mut self, _message: UiMessage, _ctx: &UiContext) -> PageCommand {
        PageCommand::None
    }

    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &UiContext);
}

/// Breadcrumb from the root page down to `id`, e.g. `Main > Settings > TUI`.
#[must_use]
pub fn breadcrumb(id: PageId) -> Vec<&'static str> {
    let mut path = vec![id.title()];
    let mut current = id;
    while let Some(parent) = current.parent() {
        path.push(parent.title());
        current = parent;
    }
    path.reverse();
    path
}

/// Command for escape on `id`: the parent page, or quit at the root.
#[must_use]
pub const fn escape_command(id: PageId) -> PageCommand {
    match id.parent() {
        Some(parent) => PageCommand::Navigate(parent),
        None => PageCommand::Quit,
    }
}
