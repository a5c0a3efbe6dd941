//! Presentation state
//!
//! Toolkit-independent selection logic: the checkbox tree, the active
//! filter, and which actions the selection enables.

pub mod tree;
pub mod view;

pub use tree::{CheckOrigin, NodeId, NodeKind, Row, SelectionTree};
pub use view::{ActionAvailability, CatalogView};
