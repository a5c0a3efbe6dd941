//! Configuration data models
//!
//! This module defines the data structures used for application configuration.

use crate::catalog::Filter;
use crate::shortcuts::ShortcutScope;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Folder holding one subfolder per portable app
    ///
    /// When absent, the folder containing the executable is used.
    pub portable_root: Option<PathBuf>,
    /// Start Menu that new shortcuts are created in
    pub shortcut_scope: ShortcutScope,
    /// Filter applied when the catalog opens
    pub default_filter: Filter,
    /// Route every registry query through `reg.exe`
    pub force_registry_fallback: bool,
}

impl AppConfig {
    /// Effective portable-apps root
    ///
    /// `exe_dir` is the folder of the running executable.
    pub fn resolve_portable_root(&self, exe_dir: &Path) -> PathBuf {
        self.portable_root
            .clone()
            .unwrap_or_else(|| exe_dir.to_path_buf())
    }
}
