//! Reconciliation of portable apps against the Start Menu and the registry
//!
//! # Algorithm
//!
//! For every app record:
//!
//! 1. **Shortcut**: the first deployed shortcut (in scan order) whose
//!    `appName` equals the app's name is its shortcut. The deployed marker
//!    copy is fingerprinted against the app's own marker to decide whether
//!    the shortcut is in sync.
//! 2. **Install**: when `appInstallRegistryData` is set, the native and the
//!    32-bit-on-64-bit uninstall roots are probed, in that order, for that
//!    subkey. The first hit marks the app installed and supplies
//!    `DisplayVersion`.
//!
//! Classification is a pure function of its inputs and runs once per scan;
//! changing the view filter never re-runs it.

use crate::catalog::fingerprint;
use crate::catalog::record::{AppRecord, AppStatus};
use crate::registry::RegistryProbe;
use crate::shortcuts::ShortcutRecord;
use tracing::{debug, info};

/// Uninstall roots probed for installed copies, in probe order
pub const UNINSTALL_ROOTS: [&str; 2] = [
    "HKLM\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Uninstall",
    "HKLM\\SOFTWARE\\WOW6432Node\\Microsoft\\Windows\\CurrentVersion\\Uninstall",
];

/// Registry value holding an installed program's version
pub const DISPLAY_VERSION: &str = "DisplayVersion";

/// Annotate every record with its shortcut and install status
///
/// Previous status is discarded; the returned records carry fresh status.
pub fn classify(
    records: Vec<AppRecord>,
    shortcuts: &[ShortcutRecord],
    probe: &RegistryProbe,
) -> Vec<AppRecord> {
    let classified: Vec<AppRecord> = records
        .into_iter()
        .map(|mut record| {
            record.status = classify_one(&record, shortcuts, probe);
            record
        })
        .collect();

    let with_shortcut = classified.iter().filter(|r| r.status.has_shortcut).count();
    let installed = classified.iter().filter(|r| r.status.is_installed).count();
    info!(
        "Classified {} app(s): {} with shortcut, {} installed",
        classified.len(),
        with_shortcut,
        installed
    );
    classified
}

fn classify_one(
    record: &AppRecord,
    shortcuts: &[ShortcutRecord],
    probe: &RegistryProbe,
) -> AppStatus {
    let mut status = AppStatus::default();

    if let Some(shortcut) = shortcuts.iter().find(|s| s.app_name == record.marker.app_name) {
        status.has_shortcut = true;
        status.shortcut_scope = Some(shortcut.user_scope);
        status.shortcut_version.clone_from(&shortcut.app_version);
        status.shortcut_folder = Some(shortcut.folder_path.clone());
        status.content_matches = fingerprint::identical(record.marker_path(), &shortcut.marker_path);
        debug!(
            "{}: shortcut in {} (in sync: {})",
            record.name(),
            shortcut.folder_path.display(),
            status.content_matches
        );
    }

    let subkey = record.marker.app_install_registry_data.trim();
    if !subkey.is_empty() {
        for root in UNINSTALL_ROOTS {
            let key = format!("{root}\\{subkey}");
            if probe.exists(&key, None, None) {
                status.is_installed = true;
                status.installed_version = probe.read_value(&key, DISPLAY_VERSION).unwrap_or_default();
                debug!("{}: installed ({key})", record.name());
                break;
            }
        }
    }

    status
}
