//! Start Menu shortcuts
//!
//! Scanning the machine-wide and per-user Start Menus for deployed portable
//! apps, and reading/writing the `.lnk` files themselves.

pub mod link;
pub mod scanner;

pub use link::{ShellLinkStore, ShortcutLink, ShortcutLinks};
pub use scanner::{ShortcutRecord, ShortcutScope, StartMenuRoots, scan_shortcuts};
