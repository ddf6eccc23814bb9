//! Dzikir Counter desktop entry point.
//!
//! Wires together the infrastructure services and starts the Tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config, init tracing, load the saved record
//!  └─ Dispatcher::new()         -- engine + platform interceptor host
//!  └─ spawn
//!       ├─ persistence writer   (saves every published record)
//!       ├─ console              (stdin commands)
//!       └─ Ctrl-C handler       (asks the dispatcher to stop)
//!  └─ Dispatcher::run()         -- until shutdown, then disposes all hooks
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use dzikir_core::Stopwatch;
use dzikir_desktop::application::collaborators::Persistence;
use dzikir_desktop::application::dispatcher::{run_persistence_writer, Dispatcher};
use dzikir_desktop::application::engine::Collaborators;
use dzikir_desktop::infrastructure::audio::SystemAudioPlayer;
use dzikir_desktop::infrastructure::input_capture::platform_host;
use dzikir_desktop::infrastructure::storage::config::{self, AppConfig};
use dzikir_desktop::infrastructure::storage::state_file::FileStatePersistence;
use dzikir_desktop::infrastructure::ui_bridge::{run_console, ConsoleObserver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config is read before logging starts so its level can apply; any
    // error is reported once the subscriber is up.
    let (app_config, config_error) = match config::load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.general.log_level)),
        )
        .init();

    info!("Dzikir Counter starting");
    if let Some(e) = config_error {
        warn!("config unavailable, using defaults: {e}");
    }
    match config::ensure_default_config() {
        Ok(true) => info!("wrote default config"),
        Ok(false) => {}
        Err(e) => warn!("could not write default config: {e}"),
    }

    // ── State ─────────────────────────────────────────────────────────────────
    let state_dir = config::config_dir().unwrap_or_else(|_| PathBuf::from("."));
    let persistence: Arc<dyn Persistence> = Arc::new(FileStatePersistence::new(
        app_config.state_file_path(&state_dir),
    ));
    let record = match persistence.load().await {
        Ok(record) => record,
        Err(e) => {
            error!("failed to load saved state, starting fresh: {e}");
            Default::default()
        }
    };
    info!(count = record.current_count, target = record.target_count, "state loaded");

    // ── Engine ────────────────────────────────────────────────────────────────
    let collaborators = Collaborators {
        host: platform_host(),
        audio: Arc::new(SystemAudioPlayer::new()),
        timer: Box::new(Stopwatch::new()),
        observer: Arc::new(ConsoleObserver),
    };
    let (dispatcher, handle, saves) =
        Dispatcher::new(&record, collaborators, app_config.timer.tick_interval());

    let writer = tokio::spawn(run_persistence_writer(Arc::clone(&persistence), saves));
    tokio::spawn(run_console(handle.clone()));

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let signal_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            let _ = signal_handle.shutdown();
        }
    });

    info!("Dzikir Counter ready.  Type `help` for commands, Ctrl-C to exit.");
    dispatcher.run().await;

    // The dispatcher has dropped its sender, so the writer drains the final
    // record and returns.
    if let Err(e) = writer.await {
        error!("persistence writer failed: {e}");
    }

    info!("Dzikir Counter stopped");
    Ok(())
}
