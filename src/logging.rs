//! File logging through `tracing`.
//!
//! The terminal belongs to the TUI, so log lines go to a file. `RUST_LOG`
//! overrides the configured level.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, default_log_path};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("no log file configured and no home directory to default to")]
    NoPath,
    #[error("cannot open log file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("logger already installed: {0}")]
    Init(String),
}

/// Where log lines are written for these settings.
pub fn log_path(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(default_log_path)
}

/// Filter from `RUST_LOG` if set and valid, else the configured level.
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Install the global subscriber. Returns the log file path.
pub fn init(settings: &LoggingSettings) -> Result<PathBuf, LoggingError> {
    let path = log_path(settings).ok_or(LoggingError::NoPath)?;
    let open_err = |source| LoggingError::Open {
        path: path.clone(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(open_err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(open_err)?;

    tracing_subscriber::registry()
        .with(env_filter(settings))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(path)
}
