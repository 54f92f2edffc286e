//! `citygrid-tui` — terminal dashboard for the smart-city VLAN network.
//!
//! Built on [ratatui](https://ratatui.rs). The seeded `NetworkStore` feeds
//! the Dashboard, Devices, VLANs and Topology screens; when a backend is
//! configured, `RemoteSync` polls it for the Live and Settings screens.
//!
//! Logs are written to a file (default `citygrid-tui.log` in the platform
//! data directory) to avoid corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use citygrid_config::Config;
use citygrid_core::{NetworkStore, RemoteSync};

use crate::app::App;
use crate::event::Rates;
use crate::screens::{ScreenOptions, SettingsInfo};

const LOG_FILE_NAME: &str = "citygrid-tui.log";

/// Terminal dashboard for the smart-city VLAN network.
#[derive(Parser, Debug)]
#[command(name = "citygrid-tui", version, about)]
struct Cli {
    /// Backend base URL including the /api prefix (overrides config)
    #[arg(short = 'u', long, env = "CITYGRID_BACKEND_URL")]
    backend_url: Option<String>,

    /// Run on seed data only, without contacting a backend
    #[arg(long, conflicts_with = "backend_url")]
    offline: bool,

    /// Log file path (defaults to the platform data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Seed for node placement and simulated readings
    #[arg(long)]
    seed: Option<u64>,
}

fn log_path(cli: &Cli) -> PathBuf {
    cli.log_file.clone().unwrap_or_else(|| {
        citygrid_config::data_dir()
            .unwrap_or_else(|_| std::env::temp_dir())
            .join(LOG_FILE_NAME)
    })
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// terminal is in raw mode. Hold the guard for the lifetime of the app so
/// logs are flushed.
fn setup_tracing(cli: &Cli, path: &std::path::Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "citygrid_tui={level},citygrid_core={level},citygrid_api={level}",
            level = cli.log_level
        ))
    });

    let log_dir = path.parent().unwrap_or(std::path::Path::new("."));
    let log_filename = path
        .file_name()
        .unwrap_or(std::ffi::OsStr::new(LOG_FILE_NAME));
    let _ = std::fs::create_dir_all(log_dir);

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Build the poller from flags and config. A bad URL or client setup
/// failure leaves the dashboard on seed data instead of aborting.
fn build_sync(cli: &Cli, cfg: &Config) -> Option<RemoteSync> {
    if cli.offline {
        return None;
    }
    let mut backend = cfg.backend.clone();
    if let Some(url) = &cli.backend_url {
        backend.url.clone_from(url);
    }

    let sync_config = match backend.to_sync_config() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "invalid backend configuration; running on seed data");
            return None;
        }
    };
    match RemoteSync::new(sync_config) {
        Ok(sync) => Some(sync),
        Err(e) => {
            warn!(error = %e, "failed to build backend client; running on seed data");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let log_file = log_path(&cli);
    let _log_guard = setup_tracing(&cli, &log_file);

    let cfg = citygrid_config::load_config_or_default();
    let sync = build_sync(&cli, &cfg);
    let seed = cli.seed.or(cfg.tui.seed);

    info!(
        backend = sync.as_ref().map_or("(none)", |s| s.config().url.as_str()),
        seed = ?seed,
        "starting citygrid-tui"
    );

    let settings = SettingsInfo::new(
        &cfg,
        sync.as_ref().map(|s| s.config().url.to_string()),
        citygrid_config::config_path().display().to_string(),
        Some(log_file.display().to_string()),
    );
    let opts = ScreenOptions {
        pulse_probability: cfg.tui.pulse_probability,
        seed,
        settings,
    };
    let rates = Rates::from_millis(cfg.tui.tick_rate_ms, cfg.tui.frame_rate_ms);
    let store = std::sync::Arc::new(NetworkStore::seeded(seed));

    let mut app = App::new(store, sync, rates, opts);
    app.run().await?;

    Ok(())
}
