//! Catalog view state: active filter, selection tree, action availability

use crate::catalog::{AppRecord, Filter, group_records};
use crate::presentation::tree::SelectionTree;

/// Which bulk actions the current selection allows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionAvailability {
    /// Some checked app lacks a shortcut or has a drifted one
    pub add_or_update: bool,
    /// Some checked app has a shortcut
    pub remove: bool,
}

impl ActionAvailability {
    /// Derive availability from the checked record indices
    pub fn from_selection(records: &[AppRecord], checked: &[usize]) -> Self {
        checked
            .iter()
            .filter_map(|index| records.get(*index))
            .fold(Self::default(), |availability, record| Self {
                add_or_update: availability.add_or_update || record.status.needs_shortcut_update(),
                remove: availability.remove || record.status.has_shortcut,
            })
    }
}

/// UI-side state over a classified record set
///
/// Holds no domain data: records are passed in, never owned, so switching
/// filters cannot touch their status.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    filter: Filter,
    tree: SelectionTree,
}

impl CatalogView {
    /// Build a view of `records` under `filter`
    pub fn new(records: &[AppRecord], filter: Filter) -> Self {
        let mut view = Self::default();
        view.rebuild(records, filter);
        view
    }

    /// Repopulate the tree; the selection is reset
    pub fn rebuild(&mut self, records: &[AppRecord], filter: Filter) {
        self.filter = filter;
        self.tree = SelectionTree::from_groups(records, &group_records(records, filter));
    }

    /// Active filter
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Selection tree
    pub fn tree(&self) -> &SelectionTree {
        &self.tree
    }

    /// Selection tree, for check-state changes
    pub fn tree_mut(&mut self) -> &mut SelectionTree {
        &mut self.tree
    }

    /// Availability for the current selection
    pub fn availability(&self, records: &[AppRecord]) -> ActionAvailability {
        ActionAvailability::from_selection(records, &self.tree.checked_records())
    }
}
