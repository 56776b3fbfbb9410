use std::collections::HashMap;

use tracing::debug;

use super::page::Page;
use crate::domain::entities::PageId;
use crate::domain::errors::UiError;
use crate::domain::ports::PageRouter;

/// Registered pages and the one in front.
#[derive(Default)]
pub struct Pages {
    pages: HashMap<PageId, Box<dyn Page>>,
    front: Option<PageId>,
}

impl Pages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn front_mut(&mut self) -> Option<&mut Box<dyn Page>> {
        let id = self.front?;
        self.pages.get_mut(&id)
    }

    #[must_use]
    pub fn front(&self) -> Option<&dyn Page> {
        let id = self.front?;
        self.pages.get(&id).map(|page| &**page)
    }

    pub fn get_mut(&mut self, id: PageId) -> Option<&mut Box<dyn Page>> {
        self.pages.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: PageId) -> bool {
        self.pages.contains_key(&id)
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.front = None;
    }
}

impl PageRouter<Box<dyn Page>> for Pages {
    fn switch_to(&mut self, id: PageId) -> Result<(), UiError> {
        if !self.pages.contains_key(&id) {
            return Err(UiError::UnknownPage(id.to_string()));
        }
        debug!(page = %id, "Switching page");
        self.front = Some(id);
        Ok(())
    }

    fn add_page(&mut self, id: PageId, page: Box<dyn Page>) {
        self.pages.insert(id, page);
    }

    fn remove_page(&mut self, id: PageId) -> Option<Box<dyn Page>> {
        if self.front == Some(id) {
            self.front = None;
        }
        self.pages.remove(&id)
    }

    fn front_page(&self) -> Option<PageId> {
        self.front
    }
}
