//! Zaptui - terminal UI for a local NFC token reader service.
//!
//! This crate provides focus-driven pages over a settings service port:
//! reader status, media search, token writes and settings.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing session state, use cases and services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing configuration and service adapters.
pub mod infrastructure;
/// Presentation layer containing pages, widgets and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "zaptui";
