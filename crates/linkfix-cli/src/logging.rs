//! Log setup: every event goes to stdout and to a per-run log file.

use crate::error::{CliError, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Name of the log file of a run started at `now`.
pub fn log_file_name(now: chrono::DateTime<chrono::Local>) -> String {
    format!("{}.log", now.format("%m-%d-%Y_%H-%M-%S"))
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default `info` level. Returns the path of the
/// log file.
pub fn init(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(log_file_name(chrono::Local::now()));
    let file = File::create(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stdout))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    Ok(path)
}
