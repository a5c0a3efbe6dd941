//! `Portable Shelf` - Start Menu reconciliation for portable Windows apps
//!
//! Scans the portable-apps folder, classifies every app against the Start
//! Menu and the installed-programs registry, and offers a console catalog
//! for creating, refreshing and removing shortcuts.

// Console front end is only in the binary, not the library
mod console;

use anyhow::{Context, Result};
use portable_shelf::{
    config::ConfigManager, controller::AppController, error::get_user_friendly_error, utils,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Main entry point for the application
///
/// Initializes logging and configuration, runs the first scan (a failure
/// there is fatal and shown in a dialog), then hands over to the console.
fn main() -> Result<()> {
    let log_path = utils::init_logging("app").context("Failed to initialize logging system")?;
    info!("Logging to {}", log_path.display());

    let config = ConfigManager::load().unwrap_or_else(|e| {
        warn!("Failed to load configuration, using defaults: {e}");
        portable_shelf::config::AppConfig::default()
    });

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let mut controller = AppController::system(config, &exe_dir);
    info!("Portable apps root: {}", controller.portable_root().display());

    if let Err(e) = controller.rescan() {
        error!("Initial scan failed: {e}");
        show_error_and_exit(&get_user_friendly_error(&e));
    }

    let stdin = std::io::stdin();
    console::run(&mut controller, stdin.lock(), std::io::stdout())
        .context("Console session failed")?;

    info!("Portable Shelf exiting");
    Ok(())
}

/// Shows an error dialog and exits the application.
#[cfg(windows)]
fn show_error_and_exit(message: &str) -> ! {
    use rfd::MessageDialog;

    MessageDialog::new()
        .set_title("Portable Shelf - Error")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .set_level(rfd::MessageLevel::Error)
        .show();

    std::process::exit(1);
}

/// Shows an error dialog and exits the application (non-Windows fallback).
#[cfg(not(windows))]
fn show_error_and_exit(message: &str) -> ! {
    eprintln!("ERROR: {message}");
    std::process::exit(1);
}
