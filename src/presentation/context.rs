//! Explicit dependencies handed to every page.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::application::{
    MediaDbUseCase, SearchMediaUseCase, Session, SettingsUseCase, Timeouts, WriteTokenUseCase,
};
use crate::domain::ports::SettingsServicePort;
use crate::infrastructure::{AppConfig, StorageManager, ThemeName};
use crate::presentation::commands::KeyRules;
use crate::presentation::events::UiHandle;
use crate::presentation::theme::Theme;

/// Theme, session, configuration and service shared by the pages.
///
/// Cloning is cheap. A theme change builds a new context with
/// [`UiContext::with_theme`] and the pages are rebuilt from it.
#[derive(Clone)]
pub struct UiContext {
    pub theme: Theme,
    pub session: Session,
    pub config: Arc<Mutex<AppConfig>>,
    pub storage: Option<Arc<StorageManager>>,
    pub service: Arc<dyn SettingsServicePort>,
    pub ui: UiHandle,
    pub keys: Arc<KeyRules>,
    save_lock: Arc<Mutex<()>>,
}

impl UiContext {
    #[must_use]
    pub fn new(
        config: AppConfig,
        storage: Option<Arc<StorageManager>>,
        service: Arc<dyn SettingsServicePort>,
        ui: UiHandle,
    ) -> Self {
        Self {
            theme: Theme::new(config.theme),
            session: Session::new(),
            config: Arc::new(Mutex::new(config)),
            storage,
            service,
            ui,
            keys: Arc::new(KeyRules::new()),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Same context with a different theme; session and config are shared.
    #[must_use]
    pub fn with_theme(&self, name: ThemeName) -> Self {
        Self {
            theme: Theme::new(name),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        self.config.lock().timeouts()
    }

    #[must_use]
    pub fn config_snapshot(&self) -> AppConfig {
        self.config.lock().clone()
    }

    #[must_use]
    pub fn settings_use_case(&self) -> SettingsUseCase {
        SettingsUseCase::new(Arc::clone(&self.service), self.timeouts())
    }

    #[must_use]
    pub fn search_use_case(&self) -> SearchMediaUseCase {
        SearchMediaUseCase::new(Arc::clone(&self.service), self.timeouts())
    }

    #[must_use]
    pub fn write_use_case(&self) -> WriteTokenUseCase {
        WriteTokenUseCase::new(Arc::clone(&self.service), self.timeouts())
    }

    #[must_use]
    pub fn media_db_use_case(&self) -> MediaDbUseCase {
        MediaDbUseCase::new(Arc::clone(&self.service), self.timeouts())
    }

    /// Applies `change` to the shared config and saves it off the UI task.
    ///
    /// Saves run one at a time and each writes the config as it is when the
    /// save starts, so the file always ends up with the latest state.
    pub fn persist_config(&self, change: impl FnOnce(&mut AppConfig)) {
        change(&mut self.config.lock());
        self.spawn_save();
    }

    fn spawn_save(&self) -> Option<JoinHandle<()>> {
        let Some(storage) = self.storage.clone() else {
            debug!("No storage configured, config change kept in memory");
            return None;
        };
        let runtime = tokio::runtime::Handle::try_current().ok()?;

        let config = Arc::clone(&self.config);
        let save_lock = Arc::clone(&self.save_lock);
        Some(runtime.spawn_blocking(move || save_latest(&config, &storage, &save_lock)))
    }
}

fn save_latest(config: &Mutex<AppConfig>, storage: &StorageManager, save_lock: &Mutex<()>) {
    let _guard = save_lock.lock();
    let snapshot = config.lock().clone();
    if let Err(e) = storage.save_config(&snapshot) {
        error!(error = %e, "Failed to save config");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::domain::ports::mocks::MockSettingsServicePort;
    use crate::presentation::events::UiMessage;
    use tokio::sync::mpsc;

    /// Context over a mock service with no storage.
    pub(crate) fn context(
        service: MockSettingsServicePort,
    ) -> (UiContext, mpsc::UnboundedReceiver<UiMessage>) {
        let (ui, rx) = UiHandle::channel();
        let ctx = UiContext::new(AppConfig::default(), None, Arc::new(service), ui);
        (ctx, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::context;
    use super::*;
    use crate::domain::ports::mocks::MockSettingsServicePort;
    use crate::infrastructure::config::ThemeName;

    #[test]
    fn test_with_theme_shares_session_and_config() {
        let (ctx, _rx) = context(MockSettingsServicePort::new());
        let themed = ctx.with_theme(ThemeName::Nord);

        themed.session.set_search_name("metroid");
        themed.persist_config(|c| c.mouse = true);

        assert_eq!(themed.theme.name, ThemeName::Nord);
        assert_eq!(ctx.theme.name, ThemeName::Default);
        assert_eq!(ctx.session.search_name(), "metroid");
        assert!(ctx.config_snapshot().mouse);
    }

    #[tokio::test]
    async fn test_persist_writes_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(StorageManager::with_dir(dir.path().to_path_buf()));
        let (ui, _rx) = UiHandle::channel();
        let ctx = UiContext::new(
            AppConfig::default(),
            Some(Arc::clone(&storage)),
            Arc::new(MockSettingsServicePort::new()),
            ui,
        );

        ctx.persist_config(|c| c.theme = ThemeName::Dracula);

        for _ in 0..100 {
            if storage.config_path().exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(storage.load_config().unwrap().theme, ThemeName::Dracula);
    }

    #[test]
    fn test_save_writes_config_current_at_save_time() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::with_dir(dir.path().to_path_buf());
        let config = Mutex::new(AppConfig::default());
        let save_lock = Mutex::new(());

        config.lock().theme = ThemeName::Dracula;
        config.lock().mouse = true;
        save_latest(&config, &storage, &save_lock);

        let saved = storage.load_config().unwrap();
        assert_eq!(saved.theme, ThemeName::Dracula);
        assert!(saved.mouse);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_rapid_changes_end_with_latest_config() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(StorageManager::with_dir(dir.path().to_path_buf()));
        let (ui, _rx) = UiHandle::channel();
        let ctx = UiContext::new(
            AppConfig::default(),
            Some(Arc::clone(&storage)),
            Arc::new(MockSettingsServicePort::new()),
            ui,
        );

        let mut saves = Vec::new();
        for theme in [ThemeName::Nord, ThemeName::Dracula, ThemeName::Nord] {
            ctx.config.lock().theme = theme;
            saves.push(ctx.spawn_save().unwrap());
        }
        ctx.config.lock().mouse = true;
        saves.push(ctx.spawn_save().unwrap());

        for save in saves {
            save.await.unwrap();
        }
        let saved = storage.load_config().unwrap();
        assert_eq!(saved.theme, ThemeName::Nord);
        assert!(saved.mouse);
    }
}
