#![expect(
    clippy::unwrap_used,
    reason = "Test utilities use .unwrap() for brevity"
)]

//! Shared fixtures for `Portable Shelf` unit tests
//!
//! Only compiled during testing (`#[cfg(test)]`).

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes tests that point APPDATA somewhere else
static APPDATA_LOCK: Mutex<()> = Mutex::new(());

/// Scratch directory removed when dropped
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write a minimal marker file into `dir`, creating the folder
///
/// Returns the path of the written file.
pub fn write_marker(dir: &Path, file_name: &str, app_name: &str, version: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(file_name);
    let json = serde_json::json!({ "appName": app_name, "appVersion": version });
    std::fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).unwrap();
    path
}

/// Points APPDATA at a scratch directory until dropped
///
/// The data directory (config and logs) is derived from APPDATA, so tests
/// touching it hold this guard. The global lock is held for the guard's
/// lifetime; the previous value is restored on drop, also when the test panics.
pub struct AppdataGuard {
    original: Option<String>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only environment mutation serialized by APPDATA_LOCK"
)]
impl AppdataGuard {
    /// Set APPDATA to `temp_dir` for the lifetime of the guard
    pub fn new(temp_dir: &TempDir) -> Self {
        // A test that panicked while holding the lock leaves it poisoned; the
        // guarded value is restored by Drop either way.
        let lock = APPDATA_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let original = std::env::var("APPDATA").ok();
        // SAFETY: every APPDATA writer in the test binary holds APPDATA_LOCK.
        unsafe {
            std::env::set_var("APPDATA", temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only environment mutation serialized by APPDATA_LOCK"
)]
impl Drop for AppdataGuard {
    fn drop(&mut self) {
        // SAFETY: the lock is still held by this guard.
        match &self.original {
            Some(original) => unsafe { std::env::set_var("APPDATA", original) },
            None => unsafe { std::env::remove_var("APPDATA") },
        }
    }
}
