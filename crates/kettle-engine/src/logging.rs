//! Structured logging setup.
//!
//! Logs go to stderr and to an append-only file named after the start
//! date, `<directory>/<YYYY-MM-DD>.txt`. `RUST_LOG` overrides the
//! configured level.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use kettle_core::config::LoggingConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber.
///
/// If the log file cannot be opened, logging continues on stderr only.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let path = log_file_path(Path::new(&config.directory), Local::now().date_naive());
    let (file_layer, file_error) = match open_log_file(&path) {
        Ok(file) => (
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        warn!(path = %path.display(), error = %e, "Log file unavailable, logging to stderr only");
    }
}

/// Path of the log file for `date` inside `directory`.
pub fn log_file_path(directory: &Path, date: NaiveDate) -> PathBuf {
    directory.join(format!("{}.txt", date.format("%Y-%m-%d")))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
