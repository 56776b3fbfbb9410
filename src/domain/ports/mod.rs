mod page_router_port;
mod settings_service_port;

pub use page_router_port::PageRouter;
pub use settings_service_port::SettingsServicePort;

#[cfg(test)]
pub mod mocks {
    pub use super::settings_service_port::MockSettingsServicePort;
}
