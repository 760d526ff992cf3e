pub mod error;
pub mod models;
pub mod settings;
pub mod store;
pub mod terminal;
pub mod timer;
pub mod utils;
pub mod validation;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use settings::SettingsStore;
use timer::{ChannelSink, TimerController};

pub struct AppState {
    pub timer: TimerController,
    pub settings: SettingsStore,
}

impl AppState {
    pub fn new(timer: TimerController, settings: SettingsStore) -> Self {
        Self { timer, settings }
    }
}

pub async fn run(settings_path: PathBuf) -> Result<()> {
    // Reads RUST_LOG; FOCUS_CYCLE_DEBUG=1 lowers the default to Debug.
    utils::logging::init();

    log::info!("focus-cycle starting up...");

    let settings = SettingsStore::new(settings_path)?;
    let tick_interval = settings.settings().tick_interval();

    let (sink, events) = ChannelSink::channel();
    let timer = TimerController::with_system_clock(Arc::new(sink), tick_interval);
    let state = AppState::new(timer, settings);

    terminal::run_terminal(&state, events).await?;

    log::info!("focus-cycle shutting down");
    Ok(())
}
