//! # Navigation Manager
//!
//! Binds the pure pieces together: the static tree, the runtime state, and an
//! injected `KeyValueStore`. The manager is the only place that turns
//! `Effect::PersistCollapsed` into a storage write; every other effect is
//! handed back to the caller (the TUI loop performs navigation and quitting).
//!
//! ```text
//!   Router ──RouteChanged──┐
//!   Clicks ──Select/Toggle─┼──▶ dispatch() ──▶ update() ──▶ Effect
//!   Storage ──External─────┘                                  │
//!                                      PersistCollapsed ◀─────┤ (handled here)
//!                                      Navigate / Quit  ◀─────┘ (returned)
//! ```

use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::nav::NavTree;
use crate::core::projection::{self, NavRow};
use crate::core::state::NavigationState;
use crate::core::storage::{COLLAPSED_KEY, KeyValueStore, StorageEvent};

pub struct NavigationManager<S: KeyValueStore> {
    tree: NavTree,
    state: NavigationState,
    store: S,
}

impl<S: KeyValueStore> NavigationManager<S> {
    /// Build the state for a freshly mounted panel.
    ///
    /// `collapsed` comes from storage; active item and expansion come from
    /// `current_path`, falling back to `fallback_id` with nothing expanded.
    pub fn mount(tree: NavTree, store: S, current_path: &str, fallback_id: &str) -> Self {
        let collapsed = read_collapsed(&store);
        let mut state = NavigationState::new(fallback_id, collapsed);
        if !state.reconcile(&tree, current_path) {
            info!(
                "Initial route {} matches no entry, using fallback '{}'",
                current_path, fallback_id
            );
        }
        info!(
            "Navigation mounted: active='{}', expanded={:?}, collapsed={}",
            state.active_id, state.expanded_ids, state.collapsed
        );
        Self { tree, state, store }
    }

    pub fn tree(&self) -> &NavTree {
        &self.tree
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Apply an action. Persistence is done here; the returned effect is
    /// what is left for the caller.
    pub fn dispatch(&mut self, action: Action) -> Effect {
        let effect = update(&mut self.state, &self.tree, action);
        if let Effect::PersistCollapsed(collapsed) = effect {
            self.persist_collapsed(collapsed);
            return Effect::None;
        }
        effect
    }

    /// Turn a storage notification into an action, if it concerns us.
    pub fn handle_storage_event(&mut self, event: StorageEvent) -> Effect {
        if event.key != COLLAPSED_KEY {
            return Effect::None;
        }
        let collapsed = parse_collapsed(event.value.as_deref());
        self.dispatch(Action::CollapsedChangedExternally(collapsed))
    }

    /// Display records for the current state.
    pub fn rows(&self) -> Vec<NavRow> {
        projection::render(&self.tree, &self.state)
    }

    fn persist_collapsed(&mut self, collapsed: bool) {
        let value = if collapsed { "true" } else { "false" };
        match self.store.set(COLLAPSED_KEY, value) {
            Ok(()) => debug!("Persisted {}={}", COLLAPSED_KEY, value),
            Err(e) => warn!("Failed to persist {}: {}", COLLAPSED_KEY, e),
        }
    }
}

fn read_collapsed<S: KeyValueStore>(store: &S) -> bool {
    let raw = store.get(COLLAPSED_KEY);
    if let Some(ref value) = raw
        && value != "true"
        && value != "false"
    {
        warn!("Unexpected {} value {:?}, treating as expanded", COLLAPSED_KEY, value);
    }
    parse_collapsed(raw.as_deref())
}

/// Only the literal `"true"` collapses the panel.
fn parse_collapsed(value: Option<&str>) -> bool {
    value == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::{MemoryStore, StorageError};
    use crate::test_support::{sample_tree, set_of};
    use std::sync::mpsc::Receiver;

    /// Store whose writes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }

        fn subscribe(&mut self) -> Result<Receiver<StorageEvent>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[test]
    fn test_mount_defaults_without_storage() {
        let manager = NavigationManager::mount(sample_tree(), MemoryStore::new(), "/", "dashboard");
        let state = manager.state();
        assert_eq!(state.active_id, "dashboard");
        assert!(state.expanded_ids.is_empty());
        assert!(!state.collapsed);
    }

    #[test]
    fn test_mount_reads_collapsed_flag() {
        let store = MemoryStore::with_value(COLLAPSED_KEY, "true");
        let manager = NavigationManager::mount(sample_tree(), store, "/", "dashboard");
        assert!(manager.state().collapsed);
    }

    #[test]
    fn test_mount_garbage_flag_is_not_collapsed() {
        for raw in ["yes", "1", "TRUE", ""] {
            let store = MemoryStore::with_value(COLLAPSED_KEY, raw);
            let manager = NavigationManager::mount(sample_tree(), store, "/", "dashboard");
            assert!(!manager.state().collapsed, "value {raw:?}");
        }
    }

    #[test]
    fn test_mount_reconciles_initial_route() {
        let manager = NavigationManager::mount(
            sample_tree(),
            MemoryStore::new(),
            "/compras/pedidos",
            "dashboard",
        );
        assert_eq!(manager.state().active_id, "pedidos-compra");
        assert_eq!(manager.state().expanded_ids, set_of(&["compras"]));
    }

    #[test]
    fn test_toggle_collapsed_writes_store() {
        let mut manager =
            NavigationManager::mount(sample_tree(), MemoryStore::new(), "/", "dashboard");
        assert_eq!(manager.dispatch(Action::ToggleCollapsed), Effect::None);
        assert_eq!(manager.store().get(COLLAPSED_KEY).as_deref(), Some("true"));
        manager.dispatch(Action::ToggleCollapsed);
        assert_eq!(manager.store().get(COLLAPSED_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_section_click_on_rail_writes_store() {
        let store = MemoryStore::with_value(COLLAPSED_KEY, "true");
        let mut manager = NavigationManager::mount(sample_tree(), store, "/", "dashboard");
        manager.dispatch(Action::ToggleSection("compras".into()));
        assert!(!manager.state().collapsed);
        assert_eq!(manager.store().get(COLLAPSED_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_select_leaf_returns_navigation() {
        let mut manager =
            NavigationManager::mount(sample_tree(), MemoryStore::new(), "/", "dashboard");
        let effect = manager.dispatch(Action::SelectLeaf {
            id: "produtos".into(),
            parent_id: None,
        });
        assert_eq!(effect, Effect::Navigate("/produtos/lista".into()));
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let mut manager = NavigationManager::mount(sample_tree(), BrokenStore, "/", "dashboard");
        assert_eq!(manager.dispatch(Action::ToggleCollapsed), Effect::None);
        assert!(manager.state().collapsed);
    }

    #[test]
    fn test_external_storage_event_is_adopted() {
        let mut manager = NavigationManager::mount(
            sample_tree(),
            MemoryStore::new(),
            "/compras/pedidos",
            "dashboard",
        );
        manager.handle_storage_event(StorageEvent {
            key: COLLAPSED_KEY.into(),
            value: Some("true".into()),
        });
        assert!(manager.state().collapsed);
        assert!(manager.state().expanded_ids.is_empty());

        manager.handle_storage_event(StorageEvent {
            key: COLLAPSED_KEY.into(),
            value: None,
        });
        assert!(!manager.state().collapsed);
    }

    #[test]
    fn test_unrelated_storage_event_is_ignored() {
        let mut manager =
            NavigationManager::mount(sample_tree(), MemoryStore::new(), "/", "dashboard");
        manager.handle_storage_event(StorageEvent {
            key: "theme".into(),
            value: Some("true".into()),
        });
        assert!(!manager.state().collapsed);
    }
}
