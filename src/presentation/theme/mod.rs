//! Colour themes.

mod adapter;
mod service;

pub use adapter::ColorConverter;
pub use service::{ColorToken, Theme};
