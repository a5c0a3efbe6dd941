//! Checkbox selection tree
//!
//! Nodes live in an arena and point at their parent by index. A group's
//! checked state is derived from its children: checked exactly when every
//! child is checked.
//!
//! Only user-originated changes propagate downward. Programmatic changes set
//! the one node and stop, so propagation never feeds back into itself.

use crate::catalog::{AppGroup, AppRecord};

/// Index of a node in a [`SelectionTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A group label
    Group,
    /// An app, by index into the record slice the tree was built from
    App(usize),
}

/// Who caused a check-state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOrigin {
    /// Direct user interaction
    User,
    /// Propagation or other internal updates
    Programmatic,
}

#[derive(Debug, Clone)]
struct Node {
    label: String,
    kind: NodeKind,
    checked: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// One line of the tree in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    /// Node shown on this line
    pub id: NodeId,
    /// Nesting depth, 0 for top-level nodes
    pub depth: usize,
    /// Group label or app name
    pub label: &'a str,
    /// Node kind
    pub kind: NodeKind,
    /// Checked state
    pub checked: bool,
}

/// Arena of group and app nodes
#[derive(Debug, Clone, Default)]
pub struct SelectionTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl SelectionTree {
    /// Build an unchecked tree from grouped records
    ///
    /// Named groups become group nodes; members of the unlabelled group are
    /// placed at the top level after them.
    pub fn from_groups(records: &[AppRecord], groups: &[AppGroup]) -> Self {
        let mut tree = Self::default();
        for group in groups {
            let parent = group
                .label
                .as_ref()
                .map(|label| tree.push(label.clone(), NodeKind::Group, None));
            for &member in &group.members {
                tree.push(records[member].name().to_string(), NodeKind::App(member), parent);
            }
        }
        tree
    }

    fn push(&mut self, label: String, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label,
            kind,
            checked: false,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a node of this tree
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Checked state of a node; `false` for unknown ids
    pub fn is_checked(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|node| node.checked)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |node| node.children.as_slice())
    }

    /// Kind of a node
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id.0).map(|node| node.kind)
    }

    /// All nodes in display order (depth-first, parents before children)
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            rows.push(Row {
                id,
                depth,
                label: &node.label,
                kind: node.kind,
                checked: node.checked,
            });
            stack.extend(node.children.iter().rev().map(|child| (*child, depth + 1)));
        }
        rows
    }

    /// Apply a check-state change
    ///
    /// A user change to a group cascades to every descendant; any user
    /// change then recomputes the ancestor chain. Programmatic changes only
    /// set the node itself. Unknown ids are ignored.
    pub fn handle_check(&mut self, id: NodeId, checked: bool, origin: CheckOrigin) {
        if !self.contains(id) {
            return;
        }
        self.nodes[id.0].checked = checked;
        if origin == CheckOrigin::Programmatic {
            return;
        }

        let mut pending = self.nodes[id.0].children.clone();
        while let Some(child) = pending.pop() {
            self.handle_check(child, checked, CheckOrigin::Programmatic);
            pending.extend_from_slice(&self.nodes[child.0].children);
        }

        let mut ancestor = self.nodes[id.0].parent;
        while let Some(parent) = ancestor {
            let all_checked = self.all_children_checked(parent);
            self.handle_check(parent, all_checked, CheckOrigin::Programmatic);
            ancestor = self.nodes[parent.0].parent;
        }
    }

    /// Flip a node's state as a user would
    pub fn toggle(&mut self, id: NodeId) {
        let checked = !self.is_checked(id);
        self.handle_check(id, checked, CheckOrigin::User);
    }

    /// Check every node
    pub fn select_all(&mut self) {
        self.set_all_leaves(|_| true);
    }

    /// Uncheck every node
    pub fn unselect_all(&mut self) {
        self.set_all_leaves(|_| false);
    }

    /// Flip every app node, then re-derive every group
    pub fn invert_all(&mut self) {
        self.set_all_leaves(|checked| !checked);
    }

    fn set_all_leaves(&mut self, f: impl Fn(bool) -> bool) {
        for node in &mut self.nodes {
            if matches!(node.kind, NodeKind::App(_)) {
                node.checked = f(node.checked);
            }
        }
        self.recompute_groups();
    }

    // Children are always pushed after their parent, so walking the arena
    // backwards visits every child before its parent.
    fn recompute_groups(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            if self.nodes[index].kind == NodeKind::Group {
                self.nodes[index].checked = self.all_children_checked(NodeId(index));
            }
        }
    }

    fn all_children_checked(&self, id: NodeId) -> bool {
        let children = &self.nodes[id.0].children;
        !children.is_empty() && children.iter().all(|child| self.nodes[child.0].checked)
    }

    /// Record indices of checked app nodes, in display order
    pub fn checked_records(&self) -> Vec<usize> {
        self.rows()
            .into_iter()
            .filter(|row| row.checked)
            .filter_map(|row| match row.kind {
                NodeKind::App(record) => Some(record),
                NodeKind::Group => None,
            })
            .collect()
    }
}
