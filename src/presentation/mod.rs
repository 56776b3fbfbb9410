//! Presentation layer with pages, widgets and event handling.

/// Key rules and resolved input.
pub mod commands;
/// Dependencies shared by every page.
pub mod context;
/// Background-to-UI messages.
pub mod events;
/// Colour themes.
pub mod theme;
/// Pages and the application loop.
pub mod ui;
/// Reusable widgets.
pub mod widgets;

pub use context::UiContext;
pub use events::{UiHandle, UiMessage};
pub use ui::App;
