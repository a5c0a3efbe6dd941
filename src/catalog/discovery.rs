//! Portable app discovery
//!
//! The portable-apps root holds one folder per app; each folder carries a
//! marker file. When a folder holds several, the first in file-name order
//! is used.

use crate::catalog::record::AppRecord;
use crate::error::{Result, ShelfError};
use crate::marker::{MarkerStore, is_marker_file};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Load every app folder's marker under `root`
///
/// A missing root or a root without a single usable marker is fatal;
/// individual unreadable markers are skipped.
pub fn discover_portable_apps(root: &Path) -> Result<Vec<AppRecord>> {
    if !root.is_dir() {
        return Err(ShelfError::PortableRootMissing(root.to_path_buf()));
    }

    let mut folders: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", root.display());
                None
            }
        })
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let mut records = Vec::new();
    for folder in folders {
        let Some(marker_path) = first_marker_in(&folder) else {
            debug!("No marker in {}", folder.display());
            continue;
        };
        match MarkerStore::load(&marker_path) {
            Ok(marker) => records.push(AppRecord::new(marker, marker_path)),
            Err(e) => warn!("Skipping marker {}: {e}", marker_path.display()),
        }
    }

    if records.is_empty() {
        return Err(ShelfError::NoMarkersFound(root.to_path_buf()));
    }

    info!(
        "Discovered {} portable app(s) under {}",
        records.len(),
        root.display()
    );
    Ok(records)
}

fn first_marker_in(folder: &Path) -> Option<PathBuf> {
    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read {}: {e}", folder.display());
            return None;
        }
    };

    let mut markers: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .filter(|entry| is_marker_file(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect();
    markers.sort();
    markers.into_iter().next()
}
