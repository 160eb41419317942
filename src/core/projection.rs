//! # Projection
//!
//! Pure mapping from `(tree, state)` to flat display records. The terminal
//! sidebar draws these; tests assert on them directly.
//!
//! One `NavRow` is produced per node, depth-first. Items inside a closed
//! section (or on a collapsed rail) are still emitted with `visible = false`
//! so that the output shape does not depend on state.

use crate::core::nav::{NavEntry, NavTree};
use crate::core::state::NavigationState;

/// Deepest level rendered. Sections live at 0, their items at 1.
pub const MAX_DEPTH: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chevron {
    Open,
    Closed,
}

impl Chevron {
    pub fn glyph(self) -> &'static str {
        match self {
            Chevron::Open => "▾",
            Chevron::Closed => "▸",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Section {
        /// `None` on a collapsed rail.
        chevron: Option<Chevron>,
        children_visible: bool,
    },
    Leaf {
        path: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRow {
    pub id: String,
    pub parent_id: Option<String>,
    pub depth: u8,
    pub icon: String,
    /// `None` on a collapsed rail.
    pub label: Option<String>,
    pub kind: RowKind,
    pub active: bool,
    pub visible: bool,
}

impl NavRow {
    pub fn is_section(&self) -> bool {
        matches!(self.kind, RowKind::Section { .. })
    }
}

pub fn render(tree: &NavTree, state: &NavigationState) -> Vec<NavRow> {
    let mut rows = Vec::new();
    for entry in &tree.entries {
        render_entry(entry, 0, None, true, state, &mut rows);
    }
    rows
}

fn render_entry(
    entry: &NavEntry,
    depth: u8,
    parent: Option<&NavEntry>,
    visible: bool,
    state: &NavigationState,
    rows: &mut Vec<NavRow>,
) {
    let label = (!state.collapsed).then(|| entry.label.clone());

    if !entry.is_section() {
        rows.push(NavRow {
            id: entry.id.clone(),
            parent_id: parent.map(|p| p.id.clone()),
            depth,
            icon: entry.icon_or_initial(),
            label,
            kind: RowKind::Leaf {
                path: entry.path.clone(),
            },
            active: entry.id == state.active_id,
            visible,
        });
        return;
    }

    let expanded = state.is_expanded(&entry.id);
    let children_visible = visible && expanded && !state.collapsed && depth < MAX_DEPTH;
    let chevron = if state.collapsed {
        None
    } else if expanded {
        Some(Chevron::Open)
    } else {
        Some(Chevron::Closed)
    };

    rows.push(NavRow {
        id: entry.id.clone(),
        parent_id: parent.map(|p| p.id.clone()),
        depth,
        icon: entry.icon_or_initial(),
        label,
        kind: RowKind::Section {
            chevron,
            children_visible,
        },
        active: entry.id == state.active_id,
        visible,
    });

    if depth >= MAX_DEPTH {
        return;
    }
    for child in &entry.children {
        render_entry(child, depth + 1, Some(entry), children_visible, state, rows);
    }
}
