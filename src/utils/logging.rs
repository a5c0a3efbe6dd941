//! Logging system initialization
//!
//! Sets up tracing-based file logging under %APPDATA%\PortableShelf. Each
//! program writes its own `<name>.log`, rotated on startup so the last ten
//! sessions are kept.

use crate::error::{Result, ShelfError, StringError};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Highest history suffix kept (`<name>.log.1` through `<name>.log.9`)
const MAX_LOG_FILES: u8 = 9;

/// Folder holding configuration and logs
pub fn data_dir() -> PathBuf {
    let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(appdata).join("PortableShelf")
}

/// Initialize the logging system for the program called `name`
///
/// Log level defaults to INFO but can be configured via `RUST_LOG`.
/// Returns the path of the log file being written.
pub fn init_logging(name: &str) -> Result<PathBuf> {
    let log_dir = data_dir();
    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join(format!("{name}.log"));
    rotate_logs_on_startup(&log_path)?;

    // Rotation is done above, once per session, so the appender never rolls.
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(|e| ShelfError::ConfigError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ShelfError::ConfigError(Box::new(e)))?;

    tracing::info!("{name} v{} started", env!("CARGO_PKG_VERSION"));

    Ok(log_path)
}

/// Shift `<log>` to `<log>.1`, `<log>.1` to `<log>.2` and so on
///
/// The oldest history file is deleted. Nothing happens when `log_path`
/// does not exist yet.
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| ShelfError::ConfigError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| ShelfError::ConfigError(StringError::new("Invalid log filename")))?
        .to_string_lossy();
    let numbered = |i: u8| log_dir.join(format!("{log_name}.{i}"));

    let oldest = numbered(MAX_LOG_FILES);
    if oldest.exists() {
        std::fs::remove_file(&oldest)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current = numbered(i);
        if current.exists() {
            std::fs::rename(&current, numbered(i + 1))?;
        }
    }

    std::fs::rename(log_path, numbered(1))?;
    Ok(())
}
