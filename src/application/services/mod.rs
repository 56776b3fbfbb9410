//! Background services shared by the pages.

mod notification_watcher;
mod timeouts;

pub use notification_watcher::NotificationWatcher;
pub use timeouts::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_TOKEN_WAIT_TIMEOUT, Timeouts, with_timeout};
