//! In-process settings service used when no service socket is configured.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, mpsc};
use tracing::{debug, info};

use crate::domain::entities::{
    IndexingProgress, MediaResult, Notification, ReaderInfo, SearchQuery, SearchResults, Settings,
    SettingsUpdate, System, TokenInfo,
};
use crate::domain::errors::ServiceError;
use crate::domain::ports::SettingsServicePort;

const INDEX_STEP: Duration = Duration::from_millis(400);
const DEMO_UID: &str = "04:de:mo:00";

struct State {
    settings: Settings,
    readers: Vec<ReaderInfo>,
    catalog: Vec<MediaResult>,
    written: Vec<String>,
    indexing: Option<IndexingProgress>,
}

impl State {
    fn systems(&self) -> Vec<System> {
        let mut systems: Vec<System> = Vec::new();
        for media in &self.catalog {
            if !systems.contains(&media.system) {
                systems.push(media.system.clone());
            }
        }
        systems
    }
}

/// Keeps settings, readers and a media catalog in memory.
///
/// Writes wait until [`InMemorySettingsService::tap_token`] simulates a token
/// being placed on a reader, or until the auto-tap delay passes.
pub struct InMemorySettingsService {
    state: Arc<Mutex<State>>,
    tap: Notify,
    auto_tap: Option<Duration>,
    notifications_tx: mpsc::UnboundedSender<Notification>,
    notifications_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Notification>>,
}

impl Default for InMemorySettingsService {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemorySettingsService {
    #[must_use]
    pub fn new(catalog: Vec<MediaResult>) -> Self {
        let (notifications_tx, notifications_rx) = mpsc::unbounded_channel();
        Self {
            state: Arc::new(Mutex::new(State {
                settings: Settings::default(),
                readers: Vec::new(),
                catalog,
                written: Vec::new(),
                indexing: None,
            })),
            tap: Notify::new(),
            auto_tap: None,
            notifications_tx,
            notifications_rx: tokio::sync::Mutex::new(notifications_rx),
        }
    }

    /// Small catalog for trying the UI without a running service.
    #[must_use]
    pub fn with_demo_catalog() -> Self {
        let nes = System::new("NES", "Nintendo Entertainment System");
        let snes = System::new("SNES", "Super Nintendo");
        let genesis = System::new("Genesis", "Mega Drive");
        let media = |name: &str, path: &str, system: &System| MediaResult {
            name: name.to_string(),
            path: path.to_string(),
            zapscript: format!("@{}/{name}", system.id),
            system: system.clone(),
        };

        Self::new(vec![
            media("Super Mario Bros.", "/media/nes/Super Mario Bros. (World).nes", &nes),
            media("The Legend of Zelda", "/media/nes/Legend of Zelda (USA).nes", &nes),
            media("Super Mario World", "/media/snes/Super Mario World (USA).sfc", &snes),
            media("Super Metroid", "/media/snes/Super Metroid (JU).sfc", &snes),
            media("Sonic the Hedgehog", "/media/genesis/Sonic (W).md", &genesis),
        ])
    }

    /// Pending writes complete on their own after `delay`, as if a token
    /// had been placed on the reader.
    #[must_use]
    pub const fn with_auto_tap(mut self, delay: Duration) -> Self {
        self.auto_tap = Some(delay);
        self
    }

    /// Connects or disconnects simulated readers.
    pub fn set_readers(&self, readers: Vec<ReaderInfo>) {
        self.state.lock().readers.clone_from(&readers);
        self.push(Notification::ReadersChanged(readers));
    }

    /// Simulates a token placed on the reader: completes a pending write or
    /// reports a scan.
    pub fn tap_token(&self, token: TokenInfo) {
        self.tap.notify_one();
        self.push(Notification::TokenScanned(token));
    }

    /// Texts written so far.
    #[must_use]
    pub fn written(&self) -> Vec<String> {
        self.state.lock().written.clone()
    }

    fn push(&self, notification: Notification) {
        push(&self.notifications_tx, notification);
    }

    async fn wait_for_token(&self, text: &str) {
        let Some(delay) = self.auto_tap else {
            self.tap.notified().await;
            return;
        };

        tokio::select! {
            () = self.tap.notified() => {}
            () = tokio::time::sleep(delay) => {
                debug!("Auto-tap placed a demo token");
                self.push(Notification::TokenScanned(TokenInfo::new(DEMO_UID, text)));
            }
        }
    }
}

fn push(tx: &mpsc::UnboundedSender<Notification>, notification: Notification) {
    if tx.send(notification).is_err() {
        debug!("Notification receiver dropped");
    }
}

/// Steps through one simulated index run, one system per step.
async fn run_index(
    state: Arc<Mutex<State>>,
    tx: mpsc::UnboundedSender<Notification>,
    systems: Vec<System>,
) {
    let total = u32::try_from(systems.len() + 1).unwrap_or(u32::MAX);
    let names = systems
        .into_iter()
        .map(|s| Some(s.name))
        .chain(std::iter::once(None));

    for (step, system) in (1..=total).zip(names) {
        tokio::time::sleep(INDEX_STEP).await;
        let progress = {
            let mut state = state.lock();
            let finished = step == total;
            let progress = IndexingProgress {
                step,
                total,
                system,
                files: finished.then(|| u32::try_from(state.catalog.len()).unwrap_or(u32::MAX)),
            };
            state.indexing = (!finished).then(|| progress.clone());
            progress
        };
        push(&tx, Notification::Indexing(progress));
    }
    info!("Media index rebuilt");
}

#[async_trait]
impl SettingsServicePort for InMemorySettingsService {
    async fn settings(&self) -> Result<Settings, ServiceError> {
        Ok(self.state.lock().settings.clone())
    }

    async fn update_settings(&self, update: SettingsUpdate) -> Result<(), ServiceError> {
        update.apply_to(&mut self.state.lock().settings);
        Ok(())
    }

    async fn systems(&self) -> Result<Vec<System>, ServiceError> {
        Ok(self.state.lock().systems())
    }

    async fn readers(&self) -> Result<Vec<ReaderInfo>, ServiceError> {
        Ok(self.state.lock().readers.clone())
    }

    async fn write_token(&self, text: String) -> Result<(), ServiceError> {
        if self.state.lock().readers.is_empty() {
            return Err(ServiceError::rejected("no reader connected"));
        }
        self.wait_for_token(&text).await;
        info!(len = text.len(), "Token written");
        self.state.lock().written.push(text);
        Ok(())
    }

    async fn cancel_write(&self) -> Result<(), ServiceError> {
        debug!("Write cancelled");
        Ok(())
    }

    async fn search_media(&self, query: SearchQuery) -> Result<SearchResults, ServiceError> {
        let needle = query.name.to_lowercase();
        let results: Vec<MediaResult> = self
            .state
            .lock()
            .catalog
            .iter()
            .filter(|m| query.system.as_ref().is_none_or(|id| m.system.id == *id))
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let total = results.len();
        Ok(SearchResults { results, total })
    }

    async fn media_status(&self) -> Result<Option<IndexingProgress>, ServiceError> {
        Ok(self.state.lock().indexing.clone())
    }

    async fn generate_media(&self) -> Result<(), ServiceError> {
        let systems = {
            let mut state = self.state.lock();
            if state.indexing.is_some() {
                return Err(ServiceError::rejected("media indexing already running"));
            }
            let systems = state.systems();
            state.indexing = Some(IndexingProgress {
                step: 0,
                total: u32::try_from(systems.len() + 1).unwrap_or(u32::MAX),
                system: None,
                files: None,
            });
            systems
        };

        info!(systems = systems.len(), "Rebuilding media index");
        tokio::spawn(run_index(
            Arc::clone(&self.state),
            self.notifications_tx.clone(),
            systems,
        ));
        Ok(())
    }

    async fn next_notification(&self) -> Result<Notification, ServiceError> {
        self.notifications_rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| ServiceError::unavailable("notification stream closed"))
    }
}
