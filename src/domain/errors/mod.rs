//! Domain error types.

mod service_error;
mod ui_error;

pub use service_error::ServiceError;
pub use ui_error::{UiError, ValidationError};
