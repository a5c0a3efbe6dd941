//! Reading and writing `.app` marker files
//!
//! Files are opened, read and closed per call; saving goes through a
//! temporary file in the same folder followed by a rename.

use crate::error::{Result, ShelfError};
use crate::marker::models::AppMarker;
use crate::utils::write_atomic;
use std::path::Path;
use tracing::debug;

/// File name of the marker copy deployed next to Start Menu shortcuts
pub const DEPLOYED_MARKER_NAME: &str = ".app";

/// Whether a file name denotes a marker file (`.app` or `<name>.app`)
pub fn is_marker_file(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower == DEPLOYED_MARKER_NAME || lower.ends_with(DEPLOYED_MARKER_NAME)
}

/// Marker file store
pub struct MarkerStore;

impl MarkerStore {
    /// Load and parse a marker file
    pub fn load(path: &Path) -> Result<AppMarker> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|source| ShelfError::MarkerParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse marker JSON, tolerating a leading byte-order mark
    pub fn parse(text: &str) -> std::result::Result<AppMarker, serde_json::Error> {
        serde_json::from_str(text.trim_start_matches('\u{feff}'))
    }

    /// Write a marker file atomically
    pub fn save(path: &Path, marker: &AppMarker) -> Result<()> {
        let mut json = serde_json::to_string_pretty(marker)?;
        json.push('\n');
        write_atomic(path, json.as_bytes())?;

        debug!("Saved marker {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;

    #[test]
    fn test_is_marker_file() {
        assert!(is_marker_file(".app"));
        assert!(is_marker_file("scrcpy.APP"));
        assert!(!is_marker_file("scrcpy.exe"));
        assert!(!is_marker_file("app"));
    }

    #[test]
    fn test_save_then_load_keeps_unknown_fields() {
        let dir = create_test_dir();
        let path = dir.path().join("foo.app");

        let mut marker = AppMarker::new("Foo");
        marker.app_version = "1.0".to_string();
        marker
            .extra
            .insert("license".to_string(), serde_json::json!({"spdx": "MIT"}));

        MarkerStore::save(&path, &marker).unwrap();
        let loaded = MarkerStore::load(&path).unwrap();
        assert_eq!(loaded, marker);
    }

    #[test]
    fn test_load_with_bom() {
        let dir = create_test_dir();
        let path = dir.path().join("foo.app");
        std::fs::write(&path, "\u{feff}{\"appName\":\"Foo\"}").unwrap();

        let loaded = MarkerStore::load(&path).unwrap();
        assert_eq!(loaded.app_name, "Foo");
    }

    #[test]
    fn test_load_malformed_reports_path() {
        let dir = create_test_dir();
        let path = dir.path().join("broken.app");
        std::fs::write(&path, "{ not json").unwrap();

        match MarkerStore::load(&path) {
            Err(ShelfError::MarkerParse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = create_test_dir();
        let result = MarkerStore::load(&dir.path().join("missing.app"));
        assert!(matches!(result, Err(ShelfError::IoError(_))));
    }
}
