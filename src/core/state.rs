//! # Navigation State
//!
//! The runtime half of the sidebar: which leaf is active, which sections are
//! open, and whether the whole panel is collapsed to icons.
//!
//! ```text
//! NavigationState
//! ├── active_id: String              // leaf considered "current"
//! ├── expanded_ids: BTreeSet<String> // sections whose children are shown
//! └── collapsed: bool                // icon-only rail
//! ```
//!
//! The four operations below are the only mutations. None of them does I/O;
//! when a change must be persisted the caller learns it from the return value
//! (see `action.rs`).
//!
//! Ids are trusted: an id that is not in the tree is stored as-is and simply
//! never matches a rendered node.

use std::collections::BTreeSet;

use crate::core::nav::NavTree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub active_id: String,
    pub expanded_ids: BTreeSet<String>,
    pub collapsed: bool,
}

impl NavigationState {
    pub fn new(active_id: impl Into<String>, collapsed: bool) -> Self {
        Self {
            active_id: active_id.into(),
            expanded_ids: BTreeSet::new(),
            collapsed,
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_ids.contains(id)
    }

    /// Align the state with the current route.
    ///
    /// The matching leaf becomes active and its section is opened. Other open
    /// sections stay open. An unknown route leaves everything as it was.
    /// Returns whether a leaf matched.
    pub fn reconcile(&mut self, tree: &NavTree, current_path: &str) -> bool {
        let Some(found) = tree.find_leaf_by_path(current_path) else {
            return false;
        };
        self.active_id = found.leaf.id.clone();
        if let Some(section) = found.parent {
            self.expanded_ids.insert(section.id.clone());
        }
        true
    }

    /// A leaf was clicked. Its section (if given) is guaranteed to be open afterwards.
    pub fn select_leaf(&mut self, id: &str, parent_id: Option<&str>) {
        self.active_id = id.to_string();
        if let Some(parent) = parent_id {
            self.expanded_ids.insert(parent.to_string());
        }
    }

    /// A section header was clicked.
    ///
    /// On a collapsed rail the click opens the panel with exactly that section
    /// expanded. Returns `true` in that case, since `collapsed` changed and
    /// must be persisted.
    pub fn toggle_section(&mut self, id: &str) -> bool {
        if self.collapsed {
            self.collapsed = false;
            self.expanded_ids.clear();
            self.expanded_ids.insert(id.to_string());
            return true;
        }
        if !self.expanded_ids.remove(id) {
            self.expanded_ids.insert(id.to_string());
        }
        false
    }

    /// Flip the rail mode. Collapsing always forgets the open sections.
    /// Returns the new value of `collapsed`.
    pub fn toggle_collapsed(&mut self) -> bool {
        self.set_collapsed(!self.collapsed);
        self.collapsed
    }

    /// Adopt a collapse value. Same invariant as `toggle_collapsed`: a
    /// collapsed panel has no open sections.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
        if collapsed {
            self.expanded_ids.clear();
        }
    }
}
