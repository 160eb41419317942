//! # Actions
//!
//! Everything that can happen to the sidebar becomes an `Action`.
//! User clicks a section header? That's `Action::ToggleSection(id)`.
//! Router moved? That's `Action::RouteChanged(path)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the caller must do.
//! No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::nav::NavTree;
use crate::core::state::NavigationState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The router now points at this path.
    RouteChanged(String),
    /// A leaf was clicked.
    SelectLeaf {
        id: String,
        parent_id: Option<String>,
    },
    /// A section header was clicked.
    ToggleSection(String),
    /// The collapse control was clicked.
    ToggleCollapsed,
    /// Another writer changed the persisted collapse flag.
    CollapsedChangedExternally(bool),
    Quit,
}

/// Side effect requested by `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Write the collapse flag to storage.
    PersistCollapsed(bool),
    /// Ask the router to move to this path.
    Navigate(String),
    Quit,
}

pub fn update(state: &mut NavigationState, tree: &NavTree, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::RouteChanged(path) => {
            if !state.reconcile(tree, &path) {
                debug!("No leaf for route {}, keeping active '{}'", path, state.active_id);
            }
            Effect::None
        }
        Action::SelectLeaf { id, parent_id } => {
            // A leaf sharing its path with an earlier one loses the highlight
            // to it once the route comes back (first match wins).
            state.select_leaf(&id, parent_id.as_deref());
            match tree.find(&id) {
                Some(entry) if !entry.is_section() => {
                    entry.path.clone().map_or(Effect::None, Effect::Navigate)
                }
                _ => Effect::None,
            }
        }
        Action::ToggleSection(id) => {
            if state.toggle_section(&id) {
                Effect::PersistCollapsed(state.collapsed)
            } else {
                Effect::None
            }
        }
        Action::ToggleCollapsed => Effect::PersistCollapsed(state.toggle_collapsed()),
        Action::CollapsedChangedExternally(collapsed) => {
            if state.collapsed != collapsed {
                state.set_collapsed(collapsed);
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
