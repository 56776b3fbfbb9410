//! Pages, routing and the application loop.

mod app;
/// Page trait and navigation commands.
pub mod page;
/// Concrete pages.
pub mod pages;
/// Page registry.
pub mod router;

pub use app::App;
pub use page::{Page, PageCommand};
pub use router::Pages;
