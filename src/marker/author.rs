//! Building marker files from existing shortcuts
//!
//! Used by the `author-marker` tool: the shortcuts an installer (or the user)
//! placed in a Start Menu folder are read back, their paths tokenized
//! against the portable app's folder, and written into a new marker.

use crate::error::Result;
use crate::marker::models::{AppMarker, ShortcutDefinition};
use crate::paths::{self, TokenContext};
use crate::shortcuts::{ShortcutLink, ShortcutLinks};
use serde_json::Map;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Values the user enters for a new marker
#[derive(Debug, Clone, Default)]
pub struct MarkerDetails {
    /// Application name
    pub app_name: String,
    /// Version of the portable copy
    pub app_version: String,
    /// Group label, empty for ungrouped
    pub app_group: String,
    /// Free-text description
    pub app_description: String,
    /// Start Menu folder name
    pub app_start_menu_folder_name: String,
    /// Uninstall registry subkey, empty for none
    pub app_install_registry_data: String,
}

/// Turn a resolved shortcut back into a relocatable definition
pub fn definition_from_link(
    name: &str,
    link: &ShortcutLink,
    app_root: &str,
    ctx: &TokenContext,
) -> ShortcutDefinition {
    let icon_path = paths::tokenize(&link.icon_location, app_root, ctx);
    let icon = if icon_path.is_empty() {
        String::new()
    } else {
        format!("{icon_path},{}", link.icon_index)
    };

    ShortcutDefinition {
        name: name.trim().to_string(),
        target: paths::tokenize(&link.target, app_root, ctx),
        arguments: paths::tokenize_arguments(&link.arguments, app_root),
        working_directory: paths::tokenize(&link.working_directory, app_root, ctx),
        icon,
        window_style: link.window_style,
        description: paths::clean_description(&link.description),
        extra: Map::new(),
    }
}

/// Assemble a marker from user-entered details and the shortcuts found
///
/// `links` pairs each shortcut's file stem with its resolved contents.
pub fn build_marker(
    app_root: &str,
    links: &[(String, ShortcutLink)],
    details: MarkerDetails,
    ctx: &TokenContext,
) -> AppMarker {
    let group = details.app_group.trim();
    AppMarker {
        app_name: details.app_name.trim().to_string(),
        app_version: details.app_version.trim().to_string(),
        app_group: (!group.is_empty()).then(|| group.to_string()),
        app_description: details.app_description.trim().to_string(),
        app_start_menu_folder_name: details.app_start_menu_folder_name.trim().to_string(),
        app_install_registry_data: details.app_install_registry_data.trim().to_string(),
        shortcuts: links
            .iter()
            .map(|(name, link)| definition_from_link(name, link, app_root, ctx))
            .collect(),
        extra: Map::new(),
    }
}

/// Read every `.lnk` directly inside `folder`, in file-name order
///
/// Pairs each shortcut's file stem with its contents. Shortcuts that cannot
/// be read are skipped with a warning.
pub fn collect_links(folder: &Path, links: &dyn ShortcutLinks) -> Result<Vec<(String, ShortcutLink)>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("lnk"))
        })
        .collect();
    paths.sort();

    let mut found = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        match links.read(&path) {
            Ok(link) => found.push((stem, link)),
            Err(e) => warn!("Skipping shortcut {}: {e}", path.display()),
        }
    }
    Ok(found)
}

/// File name an authored marker is saved under in the app folder
pub fn marker_file_name(app_name: &str) -> String {
    format!("{}.app", app_name.trim())
}
