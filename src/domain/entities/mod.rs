//! Domain entity definitions.

mod media;
mod notification;
mod page;
mod reader;
mod settings;

pub use media::{ALL_SYSTEMS_LABEL, MediaResult, SearchQuery, SearchResults, System, WriteFormat};
pub use notification::{IndexingProgress, Notification};
pub use page::PageId;
pub use reader::{ReaderInfo, TokenInfo};
pub use settings::{EXIT_DELAY_OPTIONS, ExitDelayOption, ScanMode, Settings, SettingsUpdate};
