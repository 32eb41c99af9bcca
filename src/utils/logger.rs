//! Logging initialization and configuration.
//!
//! Logs are written to files so they never interleave with rendered
//! explanations on stdout. Each run gets its own timestamped file under the
//! platform's local data directory, e.g. `~/.local/share/rusty-explain/logs`.
//!
//! # Configuration
//!
//! The log level can be controlled via the `RUST_LOG` environment variable:
//! - `RUST_LOG=debug` - Show debug and higher level logs
//! - `RUST_LOG=info` - Show info and higher level logs
//! - `RUST_LOG=warn` - Show warnings and errors only (default)
//! - `RUST_LOG=error` - Show errors only
//!
//! `--verbose` on the command line raises the default to `debug`.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::APP_NAME;

pub const DEFAULT_LEVEL: &str = "warn";
pub const VERBOSE_LEVEL: &str = "debug";

/// Directory log files are written to.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// `rusty-explain.2024-12-06-14-30-25.log`
fn log_file_name() -> String {
    format!("{}.{}.log", APP_NAME, Local::now().format("%Y-%m-%d-%H-%M-%S"))
}

/// Initialize the logging system.
///
/// `default_level` applies when `RUST_LOG` is not set. Failure to create
/// the log file is reported on stderr and leaves logging disabled.
pub fn init_logging(default_level: &str) {
    let log_dir = log_dir();

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create logs directory: {}", e);
        return;
    }

    let log_path = log_dir.join(log_file_name());
    let log_file = match fs::File::create(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {}", e);
            return;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the writer alive for the whole process.
    std::mem::forget(guard);

    tracing::info!("Logging initialized - writing to {}", log_path.display());
}
