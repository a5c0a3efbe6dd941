//! Session controller
//!
//! [`AppController`] ties the catalog, the Start Menu and the selection view
//! together and carries out the shortcut actions.
//!
//! # Flow
//!
//! ```text
//! discover_portable_apps ─┐
//! scan_shortcuts ─────────┼─> classify ─> records ─> CatalogView (filter, tree)
//! RegistryProbe ──────────┘                             │
//!                                                       v
//!                        add_or_update_selected / remove_selected ─> rescan
//! ```

pub mod app_controller;

pub use app_controller::{ActionFailure, ActionReport, AppController};
