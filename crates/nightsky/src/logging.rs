//! File logging through `tracing`.
//!
//! The terminal is owned by the animation, so log lines only ever go to a
//! file. Without a configured file no subscriber is installed and every
//! `tracing` macro is a no-op.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use nightsky_config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when the configured level does not parse.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Returns `false` when logging is disabled.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> color_eyre::Result<bool> {
    let Some(path) = config.file.as_deref() else {
        return Ok(false);
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.level));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(open_log_file(path)?))
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;
    Ok(true)
}

/// Parse a filter directive, falling back to `info`.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Open `path` for appending, creating parent directories as needed.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
