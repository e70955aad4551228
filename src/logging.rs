//! Log file setup.
//!
//! Each run writes to its own timestamped file under the log directory. The
//! terminal is left alone because the TUI owns it.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

const DEFAULT_DIRECTIVE: &str = "math_score=info";

/// Path of the log file for a run started now.
pub fn log_file_path(dir: &Path) -> PathBuf {
    let ts = Local::now().format("%m_%d_%Y_%H_%M_%S");
    dir.join(format!("{ts}.log"))
}

/// Install the global subscriber; returns the file being written.
///
/// `RUST_LOG` overrides the default filter.
pub fn init(dir: &Path) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| {
        AppError::new(4, format!("Failed to create log dir '{}': {e}", dir.display()))
    })?;

    let path = log_file_path(dir);
    let file = File::create(&path).map_err(|e| {
        AppError::new(4, format!("Failed to create log file '{}': {e}", path.display()))
    })?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::new(4, format!("Failed to install logger: {e}")))?;

    Ok(path)
}
