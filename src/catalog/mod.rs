//! Portable app catalog
//!
//! Discovery of portable apps, drift fingerprints, reconciliation against
//! the Start Menu and the registry, and the grouped/filtered view over the
//! result.

pub mod discovery;
pub mod fingerprint;
pub mod reconcile;
pub mod record;
pub mod view;

pub use discovery::discover_portable_apps;
pub use fingerprint::{Fingerprint, fingerprint, identical};
pub use reconcile::{DISPLAY_VERSION, UNINSTALL_ROOTS, classify};
pub use record::{AppRecord, AppStatus, DisplayState};
pub use view::{AppGroup, Filter, StatusSummary, group_records};
