//! Underpass headless host entry point.
//!
//! Speaks the boundary protocol as JSON lines: inbound messages on stdin,
//! outbound messages on stdout. Logs go to stderr.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;
use underpass_core::clock::SystemClock;
use underpass_core::message::Inbound;
use underpass_core::store::KeyValueStore;
use underpass_persist::infrastructure::memory_store::MemoryStore;
use underpass_runtime::config::RuntimeConfig;
use underpass_runtime::infrastructure::file_store::FileStore;
use underpass_runtime::infrastructure::fs_loader::FsAssetLoader;
use underpass_runtime::infrastructure::log_audio::LogAudioBackend;
use underpass_runtime::infrastructure::stdio_sink::JsonLinesSink;
use underpass_runtime::runtime::{Runtime, RuntimePorts};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber; stdout belongs to the boundary.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Underpass runtime host");

    // Read configuration from environment.
    let config = RuntimeConfig::from_env()?;
    let setup = config.load_game()?;

    let store: Box<dyn KeyValueStore> = match &config.save_file {
        Some(path) => Box::new(FileStore::open(path)?),
        None => {
            tracing::warn!("UNDERPASS_SAVE_FILE not set; saves last for this session only");
            Box::new(MemoryStore::new())
        }
    };

    // Build the runtime.
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let ports = RuntimePorts {
        clock: Arc::new(SystemClock),
        loader: Box::new(FsAssetLoader::new(config.asset_root.clone(), outcome_tx)),
        audio: Box::new(LogAudioBackend),
        store,
        sink: Box::new(JsonLinesSink::stdout()),
    };
    let mut runtime = Runtime::new(setup.catalog, setup.timings, ports);
    runtime.start();

    let frame_ms = u64::try_from(runtime.frame_interval().num_milliseconds())
        .ok()
        .filter(|ms| *ms > 0)
        .ok_or("frame interval must be positive")?;
    let mut frames = tokio::time::interval(Duration::from_millis(frame_ms));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle_line(&mut runtime, &line),
                None => {
                    tracing::info!("boundary closed; shutting down");
                    break;
                }
            },
            Some(outcome) = outcome_rx.recv() => runtime.on_asset_loaded(&outcome),
            _ = frames.tick() => runtime.tick(),
        }
    }

    Ok(())
}

fn handle_line(runtime: &mut Runtime, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match serde_json::from_str::<Inbound>(line) {
        Ok(message) => runtime.dispatch(message),
        Err(e) => tracing::warn!(error = %e, "malformed boundary message ignored"),
    }
}
