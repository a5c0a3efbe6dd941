//! `Portable Shelf` - Start Menu reconciliation for portable Windows apps
//!
//! Discovers portable apps by their `.app` marker files, cross-references
//! them with deployed Start Menu shortcuts and installed-program registry
//! entries, and creates, refreshes or removes shortcuts for a selection.
//!
//! # Layers
//!
//! - [`marker`], [`registry`], [`shortcuts`], [`paths`]: leaf components
//! - [`catalog`]: discovery, fingerprints and classification
//! - [`presentation`]: selection tree and filter view
//! - [`controller`]: session state and the shortcut actions

// Module declarations
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod marker;
pub mod paths;
pub mod presentation;
pub mod registry;
pub mod shortcuts;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use error::{Result, ShelfError};
