//! Portable app records and their derived status

use crate::marker::AppMarker;
use crate::shortcuts::ShortcutScope;
use std::path::{Path, PathBuf};

/// One discovered portable application
///
/// Always backed by exactly one marker file; the marker path is fixed when
/// the record is created.
#[derive(Debug, Clone, PartialEq)]
pub struct AppRecord {
    /// Marker contents
    pub marker: AppMarker,
    marker_path: PathBuf,
    /// Status computed by [`crate::catalog::classify`]
    pub status: AppStatus,
}

impl AppRecord {
    /// Create an unclassified record for a marker loaded from `marker_path`
    pub fn new(marker: AppMarker, marker_path: impl Into<PathBuf>) -> Self {
        Self {
            marker,
            marker_path: marker_path.into(),
            status: AppStatus::default(),
        }
    }

    /// Marker file backing this record
    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Folder the app currently lives in (the marker's folder)
    pub fn app_root(&self) -> &Path {
        self.marker_path.parent().unwrap_or(Path::new(""))
    }

    /// Application name
    pub fn name(&self) -> &str {
        &self.marker.app_name
    }
}

/// Result of reconciling one app against the Start Menu and the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppStatus {
    /// An uninstall entry for `appInstallRegistryData` exists
    pub is_installed: bool,
    /// `DisplayVersion` of that entry, empty if absent
    pub installed_version: String,
    /// A deployed shortcut folder carries this app's name
    pub has_shortcut: bool,
    /// Start Menu of the matched shortcut folder
    pub shortcut_scope: Option<ShortcutScope>,
    /// Version recorded in the deployed marker copy
    pub shortcut_version: String,
    /// Folder of the matched shortcut
    pub shortcut_folder: Option<PathBuf>,
    /// Deployed marker copy is byte-identical to the app's marker
    pub content_matches: bool,
}

/// Visual state derived from an [`AppStatus`], highest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayState {
    /// Shortcut deployed, but from a different marker
    Drifted,
    /// Shortcut deployed from this exact marker
    Synced,
    /// Installed copy registered, no shortcut
    InstalledOnly,
    /// Neither shortcut nor installed copy
    PortableUnused,
}

impl DisplayState {
    /// One-character marker used in list views
    pub fn glyph(self) -> char {
        match self {
            Self::Drifted => '!',
            Self::Synced => '=',
            Self::InstalledOnly => 'i',
            Self::PortableUnused => '-',
        }
    }

    /// Short description
    pub fn label(self) -> &'static str {
        match self {
            Self::Drifted => "shortcut out of date",
            Self::Synced => "shortcut up to date",
            Self::InstalledOnly => "installed",
            Self::PortableUnused => "not used",
        }
    }
}

impl AppStatus {
    /// Derive the display state; a drifted shortcut dominates everything
    pub fn display_state(&self) -> DisplayState {
        match (self.has_shortcut, self.content_matches, self.is_installed) {
            (true, false, _) => DisplayState::Drifted,
            (true, true, _) => DisplayState::Synced,
            (false, _, true) => DisplayState::InstalledOnly,
            (false, _, false) => DisplayState::PortableUnused,
        }
    }

    /// Adding or refreshing the shortcut would change something
    pub fn needs_shortcut_update(&self) -> bool {
        !self.has_shortcut || !self.content_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(has_shortcut: bool, content_matches: bool, is_installed: bool) -> AppStatus {
        AppStatus {
            has_shortcut,
            content_matches,
            is_installed,
            ..AppStatus::default()
        }
    }

    #[test]
    fn test_drifted_dominates_installed() {
        assert_eq!(status(true, false, true).display_state(), DisplayState::Drifted);
        assert_eq!(status(true, false, false).display_state(), DisplayState::Drifted);
    }

    #[test]
    fn test_remaining_precedence() {
        assert_eq!(status(true, true, true).display_state(), DisplayState::Synced);
        assert_eq!(status(false, false, true).display_state(), DisplayState::InstalledOnly);
        assert_eq!(status(false, false, false).display_state(), DisplayState::PortableUnused);
    }

    #[test]
    fn test_needs_shortcut_update() {
        assert!(status(false, false, false).needs_shortcut_update());
        assert!(status(true, false, false).needs_shortcut_update());
        assert!(!status(true, true, true).needs_shortcut_update());
    }

    #[test]
    fn test_app_root_is_marker_folder() {
        let record = AppRecord::new(AppMarker::new("Foo"), PathBuf::from("/apps/Foo/foo.app"));
        assert_eq!(record.app_root(), Path::new("/apps/Foo"));
        assert_eq!(record.name(), "Foo");
    }
}
