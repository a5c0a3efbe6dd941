//! Start Menu scanning
//!
//! Deployed shortcuts are recognized by the `.app` marker copy that sits in
//! the same folder as the `.lnk` files. Both Start Menu roots are walked
//! fully, all-users first, entries in file-name order.

use crate::marker::{DEPLOYED_MARKER_NAME, MarkerStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Which Start Menu a shortcut lives in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortcutScope {
    /// Machine-wide Start Menu (`%ProgramData%`)
    AllUsers,
    /// Current user's Start Menu (`%APPDATA%`)
    #[default]
    CurrentUser,
}

impl fmt::Display for ShortcutScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AllUsers => "all users",
            Self::CurrentUser => "current user",
        })
    }
}

/// A deployed Start Menu entry, read from its `.app` marker copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutRecord {
    /// Folder holding the shortcuts and the marker copy
    pub folder_path: PathBuf,
    /// The marker copy itself
    pub marker_path: PathBuf,
    /// Start Menu the folder belongs to
    pub user_scope: ShortcutScope,
    /// `appName` from the marker copy
    pub app_name: String,
    /// `appVersion` from the marker copy
    pub app_version: String,
}

/// The two Start Menu "Programs" folders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartMenuRoots {
    /// Machine-wide Programs folder
    pub all_users: Option<PathBuf>,
    /// Current user's Programs folder
    pub current_user: Option<PathBuf>,
}

fn programs_folder(base: &str) -> PathBuf {
    PathBuf::from(base)
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
}

impl StartMenuRoots {
    /// Resolve both roots from `%ProgramData%` and `%APPDATA%`
    pub fn from_env() -> Self {
        let resolve = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|value| programs_folder(&value))
        };
        Self {
            all_users: resolve("ProgramData"),
            current_user: resolve("APPDATA"),
        }
    }

    /// Programs folder for a scope
    pub fn root_for(&self, scope: ShortcutScope) -> Option<&Path> {
        match scope {
            ShortcutScope::AllUsers => self.all_users.as_deref(),
            ShortcutScope::CurrentUser => self.current_user.as_deref(),
        }
    }

    /// Whether `path` is one of the roots itself
    pub fn is_root(&self, path: &Path) -> bool {
        [self.all_users.as_deref(), self.current_user.as_deref()]
            .into_iter()
            .flatten()
            .any(|root| same_path(root, path))
    }

    fn scan_order(&self) -> [(ShortcutScope, Option<&Path>); 2] {
        [
            (ShortcutScope::AllUsers, self.all_users.as_deref()),
            (ShortcutScope::CurrentUser, self.current_user.as_deref()),
        ]
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    let trim = |p: &Path| {
        p.to_string_lossy()
            .trim_end_matches(['\\', '/'])
            .to_lowercase()
    };
    trim(a) == trim(b)
}

/// Collect every deployed marker under both Start Menu roots
///
/// A missing root is skipped; an unreadable marker is skipped with a warning.
pub fn scan_shortcuts(roots: &StartMenuRoots) -> Vec<ShortcutRecord> {
    let mut records = Vec::new();
    for (scope, root) in roots.scan_order() {
        match root {
            Some(root) if root.is_dir() => scan_root(root, scope, &mut records),
            Some(root) => debug!("Start Menu root for {scope} not present: {}", root.display()),
            None => debug!("Start Menu root for {scope} not configured"),
        }
    }
    info!("Found {} deployed shortcut folder(s)", records.len());
    records
}

fn scan_root(root: &Path, scope: ShortcutScope, records: &mut Vec<ShortcutRecord>) {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable Start Menu entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file()
            || !entry
                .file_name()
                .to_string_lossy()
                .eq_ignore_ascii_case(DEPLOYED_MARKER_NAME)
        {
            continue;
        }

        let marker_path = entry.path();
        match MarkerStore::load(marker_path) {
            Ok(marker) => records.push(ShortcutRecord {
                folder_path: marker_path
                    .parent()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                marker_path: marker_path.to_path_buf(),
                user_scope: scope,
                app_name: marker.app_name,
                app_version: marker.app_version,
            }),
            Err(e) => warn!("Skipping deployed marker {}: {e}", marker_path.display()),
        }
    }
}
