//! Error types for `Portable Shelf`
//!
//! This module defines all error types used throughout the application,
//! providing clear error messages and proper error propagation.
//!
//! Probe failures (registry, hashing, unparsable markers met while scanning)
//! are not represented here: they degrade to conservative values at the call
//! site and are only logged.

use std::path::PathBuf;
use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for `Portable Shelf`
#[derive(Debug, Error)]
pub enum ShelfError {
    /// The portable-apps root folder does not exist
    #[error("Portable apps folder not found: {}", .0.display())]
    PortableRootMissing(PathBuf),

    /// The portable-apps root exists but holds no marker files
    #[error("No .app marker files found under {}", .0.display())]
    NoMarkersFound(PathBuf),

    /// A marker file could not be parsed
    #[error("Invalid marker file {}: {source}", path.display())]
    MarkerParse {
        /// Path of the offending marker file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Registry access failed
    /// Preserves the underlying error source for full error chain transparency
    #[error("Registry error: {0}")]
    RegistryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reading or writing a `.lnk` shortcut failed
    /// Preserves the underlying error source for full error chain transparency
    #[error("Shortcut error: {0}")]
    ShortcutLinkError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A Start Menu action was refused because it would be unsafe
    #[error("Action refused: {0}")]
    ActionRefused(String),

    /// The operation is not available on this platform
    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),

    /// Windows API error
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] windows::core::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `Portable Shelf` operations
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Convert an error to a user-friendly message
///
/// This function takes a `ShelfError` and returns a message suitable
/// for displaying to end users in error dialogs.
pub fn get_user_friendly_error(error: &ShelfError) -> String {
    match error {
        ShelfError::PortableRootMissing(path) => {
            format!(
                "The portable apps folder does not exist:\n\n{}\n\n\
                 Set \"portable_root\" in the configuration file or place\n\
                 the program next to your portable app folders.",
                path.display()
            )
        }
        ShelfError::NoMarkersFound(path) => {
            format!(
                "No portable apps were found in:\n\n{}\n\n\
                 Each app folder needs a .app marker file.\n\
                 Use author-marker to create one.",
                path.display()
            )
        }
        ShelfError::MarkerParse { path, source } => {
            format!(
                "The marker file is not valid JSON:\n\n{}\n{source}\n\n\
                 Fix or recreate the file with author-marker.",
                path.display()
            )
        }
        ShelfError::RegistryError(_) => "Failed to read the Windows registry.\n\n\
             Install detection may be incomplete."
            .to_string(),
        ShelfError::ShortcutLinkError(e) => {
            format!(
                "Failed to read or write a shortcut:\n\n{e}\n\n\
                 Check that you have write permissions to the Start Menu folder."
            )
        }
        ShelfError::ConfigError(_) => "Failed to load or save configuration.\n\n\
             Your settings may not persist.\n\
             Check that you have write permissions to:\n\
             %APPDATA%\\PortableShelf"
            .to_string(),
        ShelfError::ActionRefused(reason) => format!("The action was not performed:\n\n{reason}"),
        ShelfError::Unsupported(what) => {
            format!("{what} is only available on Windows.")
        }
        #[cfg(windows)]
        ShelfError::WindowsApiError(e) => {
            format!(
                "A Windows API error occurred:\n\n{e}\n\n\
                 Please ensure your Windows installation is up to date."
            )
        }
        ShelfError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        ShelfError::JsonError(e) => {
            format!("Configuration file is corrupted:\n\n{e}")
        }
    }
}
