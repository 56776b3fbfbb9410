use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use zaptui::domain::entities::ReaderInfo;
use zaptui::domain::ports::SettingsServicePort;
use zaptui::infrastructure::{AppConfig, CliArgs, InMemorySettingsService, StorageManager};
use zaptui::presentation::{App, UiContext, UiHandle};

/// A demo write completes as if a token was placed after this long.
const DEMO_TAP_DELAY: Duration = Duration::from_secs(3);

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: CliArgs) -> Result<(AppConfig, Option<Arc<StorageManager>>)> {
    let storage = StorageManager::new()
        .ok()
        .map(|storage| storage.with_config_file(args.config.clone()));

    let mut config = match &storage {
        Some(storage) => storage.load_config()?,
        None => AppConfig::default(),
    };
    config.merge_with_args(args);

    Ok((config, storage.map(Arc::new)))
}

fn create_app() -> Result<App> {
    let (config, storage) = load_config(CliArgs::parse())?;

    init_logging(&config)?;

    info!(version = zaptui::VERSION, "Starting {}", zaptui::NAME);
    if storage.is_none() {
        warn!("No config directory available, settings will not be saved");
    }

    let service = Arc::new(InMemorySettingsService::with_demo_catalog().with_auto_tap(DEMO_TAP_DELAY));
    service.set_readers(vec![ReaderInfo::new("demo", "simulated")]);
    let service: Arc<dyn SettingsServicePort> = service;

    let (ui, rx) = UiHandle::channel();
    let ctx = UiContext::new(config, storage, service, ui);

    Ok(App::new(ctx, rx))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let app = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
