//! Marker file data models
//!
//! The `.app` format is camelCase JSON. Fields this program does not know
//! about are kept in `extra` and written back unchanged.

use crate::paths::{self, TokenContext};
use crate::shortcuts::ShortcutLink;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Contents of a `.app` marker file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMarker {
    /// Application name, the join key against shortcuts and registry entries
    pub app_name: String,
    /// Version of the portable copy
    #[serde(default, deserialize_with = "null_as_empty")]
    pub app_version: String,
    /// Group label; absent or blank means ungrouped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_group: Option<String>,
    /// Free-text description
    #[serde(default, deserialize_with = "null_as_empty")]
    pub app_description: String,
    /// Start Menu folder the shortcuts are deployed to
    #[serde(default, deserialize_with = "null_as_empty")]
    pub app_start_menu_folder_name: String,
    /// Uninstall registry subkey checked for an installed copy (empty = no check)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub app_install_registry_data: String,
    /// Shortcuts to create in the Start Menu folder
    #[serde(default)]
    pub shortcuts: Vec<ShortcutDefinition>,
    /// Unknown fields, passed through verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppMarker {
    /// Create a marker with only a name set
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            app_version: String::new(),
            app_group: None,
            app_description: String::new(),
            app_start_menu_folder_name: String::new(),
            app_install_registry_data: String::new(),
            shortcuts: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Group label, `None` when the marker is ungrouped
    pub fn group_label(&self) -> Option<&str> {
        self.app_group
            .as_deref()
            .map(str::trim)
            .filter(|group| !group.is_empty())
    }

    /// Start Menu folder name, falling back to the app name
    pub fn start_menu_folder(&self) -> &str {
        let folder = self.app_start_menu_folder_name.trim();
        if folder.is_empty() {
            self.app_name.trim()
        } else {
            folder
        }
    }
}

/// One Start Menu shortcut declared in a marker file
///
/// Path-bearing fields may contain token paths (see [`crate::paths`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutDefinition {
    /// Shortcut file name without the `.lnk` extension
    pub name: String,
    /// Target executable
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target: String,
    /// Command-line arguments
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arguments: String,
    /// Working directory
    #[serde(default, deserialize_with = "null_as_empty")]
    pub working_directory: String,
    /// Icon location, `path` or `path,index`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub icon: String,
    /// Initial window state
    #[serde(default)]
    pub window_style: WindowStyle,
    /// Tooltip text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Unknown fields, passed through verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShortcutDefinition {
    /// Materialize this definition against the app's current root folder
    pub fn resolve(&self, app_root: &str, ctx: &TokenContext) -> ShortcutLink {
        let (icon_path, icon_index) = paths::split_icon_location(&self.icon);
        ShortcutLink {
            target: paths::detokenize(&self.target, app_root, ctx),
            arguments: paths::expand_arguments(&self.arguments, app_root),
            working_directory: paths::detokenize(&self.working_directory, app_root, ctx),
            icon_location: paths::detokenize(icon_path, app_root, ctx),
            icon_index: icon_index.unwrap_or(0),
            window_style: self.window_style,
            description: self.description.clone(),
        }
    }

    /// File name of the `.lnk` this definition produces
    pub fn link_file_name(&self) -> String {
        format!("{}.lnk", self.name.trim())
    }
}

/// Initial window state of a shortcut, stored as the shell's show command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum WindowStyle {
    /// `SW_SHOWNORMAL`
    #[default]
    Normal,
    /// `SW_SHOWMAXIMIZED`
    Maximized,
    /// `SW_SHOWMINNOACTIVE`
    Minimized,
}

impl WindowStyle {
    /// Show-command value as used by `IShellLinkW::SetShowCmd`
    pub fn show_cmd(self) -> i32 {
        match self {
            Self::Normal => 1,
            Self::Maximized => 3,
            Self::Minimized => 7,
        }
    }
}

impl From<i64> for WindowStyle {
    fn from(value: i64) -> Self {
        match value {
            3 => Self::Maximized,
            2 | 6 | 7 => Self::Minimized,
            _ => Self::Normal,
        }
    }
}

impl From<WindowStyle> for i64 {
    fn from(style: WindowStyle) -> Self {
        i64::from(style.show_cmd())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
