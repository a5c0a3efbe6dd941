//! Marker store
//!
//! A portable app is identified by a `.app` JSON marker file in its folder.
//! The same file, copied next to the app's Start Menu shortcuts as `.app`,
//! records what was deployed there.

pub mod author;
pub mod models;
pub mod store;

pub use author::{MarkerDetails, build_marker, collect_links, definition_from_link, marker_file_name};
pub use models::{AppMarker, ShortcutDefinition, WindowStyle};
pub use store::{DEPLOYED_MARKER_NAME, MarkerStore, is_marker_file};
