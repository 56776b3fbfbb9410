//! Settings service adapters.

mod memory_service;

pub use memory_service::InMemorySettingsService;
