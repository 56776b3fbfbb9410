//! Page router port definition.

use crate::domain::entities::PageId;
use crate::domain::errors::UiError;

/// Registry of top-level pages with a single front page.
pub trait PageRouter<P> {
    /// Brings a registered page to the front.
    fn switch_to(&mut self, id: PageId) -> Result<(), UiError>;

    /// Registers `page`, replacing any page with the same id.
    fn add_page(&mut self, id: PageId, page: P);

    /// Unregisters a page and returns it.
    fn remove_page(&mut self, id: PageId) -> Option<P>;

    /// Id of the page currently in front.
    fn front_page(&self) -> Option<PageId>;
}
