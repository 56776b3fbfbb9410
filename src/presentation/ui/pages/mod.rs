//! Concrete pages and their construction.

mod ignore_systems_page;
mod main_page;
mod search_page;
mod settings_page;
mod token_write;
mod tui_settings_page;
mod update_media_page;
mod write_page;

pub use ignore_systems_page::IgnoreSystemsPage;
pub use main_page::MainPage;
pub use search_page::SearchPage;
pub use settings_page::SettingsPage;
pub use tui_settings_page::TuiSettingsPage;
pub use update_media_page::UpdateMediaPage;
pub use write_page::WritePage;

use crate::domain::entities::PageId;
use crate::domain::errors::UiError;
use crate::presentation::context::UiContext;
use crate::presentation::ui::page::Page;

/// Builds the page registered under `id` from the current context.
///
/// # Errors
/// Returns error if the page's widgets reject their configuration.
pub fn build(id: PageId, ctx: &UiContext) -> Result<Box<dyn Page>, UiError> {
    Ok(match id {
        PageId::Main => Box::new(MainPage::new(ctx)?),
        PageId::Settings => Box::new(SettingsPage::new()?),
        PageId::ReaderSettings => Box::new(SettingsPage::readers()?),
        PageId::IgnoreSystems => Box::new(IgnoreSystemsPage::new()),
        PageId::TuiSettings => Box::new(TuiSettingsPage::new(ctx)?),
        PageId::SearchMedia => Box::new(SearchPage::new(ctx)?),
        PageId::WriteText => Box::new(WritePage::new(ctx)?),
        PageId::UpdateMedia => Box::new(UpdateMediaPage::new(ctx)?),
    })
}
