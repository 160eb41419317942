//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the shell,
//! and translates keyboard and mouse events into `core::action::Action`s.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Each iteration draws (only if something changed), waits up to 250ms for
//! input, then drains three sources in order:
//!
//! 1. terminal events → sidebar / prompt / global keys
//! 2. router notifications → `Action::RouteChanged`
//! 3. storage notifications (other writers) → `Action::CollapsedChangedExternally`
//!
//! All three touch navigation state only from this loop.

mod component;
pub mod components;
pub mod event;
mod ui;

use log::{info, warn};
use std::io::stdout;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::action::{Action, Effect};
use crate::core::config::ResolvedConfig;
use crate::core::manager::NavigationManager;
use crate::core::router::Router;
use crate::core::storage::{FileStore, KeyValueStore, MemoryStore, StorageEvent};
use crate::tui::component::EventHandler;
use crate::tui::components::{PromptEvent, RoutePromptState, SidebarEvent, SidebarState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(250);

/// TUI-specific presentation state (not part of the navigation core)
pub struct TuiState {
    pub sidebar: SidebarState,
    pub sidebar_width: u16,
    // Route prompt (None = hidden)
    pub route_prompt: Option<RoutePromptState>,
}

impl TuiState {
    pub fn new(sidebar_width: u16) -> Self {
        Self {
            sidebar: SidebarState::new(),
            sidebar_width,
            route_prompt: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Everything the loop mutates, bundled so event handling is testable
/// without a terminal.
pub struct Shell<S: KeyValueStore> {
    pub nav: NavigationManager<S>,
    pub router: Router,
    pub tui: TuiState,
    route_rx: Receiver<String>,
    storage_rx: Option<Receiver<StorageEvent>>,
}

impl<S: KeyValueStore> Shell<S> {
    pub fn new(config: &ResolvedConfig, store: S) -> Self {
        for issue in config.tree.validate() {
            warn!("Navigation tree: {}", issue);
        }

        let mut router = Router::new(config.initial_route.clone());
        let route_rx = router.subscribe();

        let mut nav = NavigationManager::mount(
            config.tree.clone(),
            store,
            router.current_path(),
            &config.fallback_id,
        );
        let storage_rx = match nav.store_mut().subscribe() {
            Ok(rx) => Some(rx),
            Err(e) => {
                warn!("Not watching storage for external changes: {}", e);
                None
            }
        };

        let mut tui = TuiState::new(config.sidebar_width);
        tui.sidebar.sync(&nav.rows());

        Self {
            nav,
            router,
            tui,
            route_rx,
            storage_rx,
        }
    }

    /// Handle one terminal event. Returns `true` when the app should quit.
    pub fn handle_event(&mut self, event: TuiEvent) -> bool {
        if matches!(event, TuiEvent::ForceQuit) {
            return true;
        }

        // Prompt open: it gets everything
        if let Some(prompt) = self.tui.route_prompt.as_mut() {
            match prompt.handle_event(&event) {
                Some(PromptEvent::Navigate(path)) => {
                    self.tui.route_prompt = None;
                    self.router.navigate(&path);
                }
                Some(PromptEvent::Cancel) => self.tui.route_prompt = None,
                None => {}
            }
            return false;
        }

        match event {
            TuiEvent::Escape | TuiEvent::InputChar('q') => self.dispatch(Action::Quit),
            TuiEvent::Tab => self.dispatch(Action::ToggleCollapsed),
            TuiEvent::Backspace => {
                self.router.back();
                false
            }
            TuiEvent::InputChar(':') => {
                self.tui.route_prompt = Some(RoutePromptState::new());
                false
            }
            other => match self.tui.sidebar.handle_event(&other) {
                Some(SidebarEvent::SelectLeaf { id, parent_id }) => {
                    self.dispatch(Action::SelectLeaf { id, parent_id })
                }
                Some(SidebarEvent::ToggleSection(id)) => self.dispatch(Action::ToggleSection(id)),
                None => false,
            },
        }
    }

    /// Drain router and storage notifications. Returns whether anything arrived.
    pub fn drain_notifications(&mut self) -> bool {
        let mut changed = false;
        while let Ok(path) = self.route_rx.try_recv() {
            changed = true;
            self.dispatch(Action::RouteChanged(path));
        }
        let storage_events: Vec<StorageEvent> = match &self.storage_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in storage_events {
            changed = true;
            let effect = self.nav.handle_storage_event(event);
            self.apply_effect(effect);
        }
        changed
    }

    fn dispatch(&mut self, action: Action) -> bool {
        let effect = self.nav.dispatch(action);
        self.apply_effect(effect)
    }

    /// Perform what the core asked for. Returns `true` on quit.
    fn apply_effect(&mut self, effect: Effect) -> bool {
        self.tui.sidebar.sync(&self.nav.rows());
        match effect {
            Effect::Navigate(path) => {
                self.router.navigate(&path);
                false
            }
            Effect::Quit => true,
            // Persistence is handled inside the manager
            Effect::PersistCollapsed(_) | Effect::None => false,
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    match config.state_file.clone() {
        Some(path) => {
            info!("Using state file {}", path.display());
            run_with_store(&config, FileStore::open(path))
        }
        None => {
            info!("Using in-memory state (nothing persists)");
            run_with_store(&config, MemoryStore::new())
        }
    }
}

fn run_with_store<S: KeyValueStore>(config: &ResolvedConfig, store: S) -> std::io::Result<()> {
    let mut shell = Shell::new(config, store);

    let mut terminal = ratatui::init();
    let result = TerminalModeGuard::new().and_then(|_guard| event_loop(&mut terminal, &mut shell));
    ratatui::restore();

    info!(
        "Exiting on {} (collapsed={})",
        shell.router.current_path(),
        shell.nav.state().collapsed
    );
    result
}

fn event_loop<S: KeyValueStore>(
    terminal: &mut DefaultTerminal,
    shell: &mut Shell<S>,
) -> std::io::Result<()> {
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &shell.nav, &shell.router, &mut shell.tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(IDLE_POLL);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if shell.handle_event(event) {
                return Ok(());
            }
        }

        if shell.drain_notifications() {
            needs_redraw = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, ErpNavConfig, resolve};
    use crate::core::storage::COLLAPSED_KEY;
    use crate::test_support::{sample_tree, set_of};

    fn shell_at(route: &str) -> Shell<MemoryStore> {
        let cli = CliOverrides {
            route: Some(route),
            ephemeral: true,
            ..Default::default()
        };
        let mut config = resolve(&ErpNavConfig::default(), &cli);
        config.tree = sample_tree();
        Shell::new(&config, MemoryStore::new())
    }

    #[test]
    fn test_selecting_leaf_navigates_and_reconciles() {
        let mut shell = shell_at("/dashboard");
        shell.tui.sidebar.focus("produtos");
        assert!(!shell.handle_event(TuiEvent::Submit));
        assert_eq!(shell.router.current_path(), "/produtos/lista");
        assert!(shell.drain_notifications());
        assert_eq!(shell.nav.state().active_id, "produtos");
    }

    #[test]
    fn test_section_then_child_via_keyboard() {
        let mut shell = shell_at("/dashboard");
        shell.tui.sidebar.focus("compras");
        shell.handle_event(TuiEvent::Submit);
        assert_eq!(shell.nav.state().expanded_ids, set_of(&["compras"]));

        shell.handle_event(TuiEvent::CursorDown);
        shell.handle_event(TuiEvent::CursorDown);
        assert_eq!(shell.tui.sidebar.cursor_id.as_deref(), Some("recebimento"));
        shell.handle_event(TuiEvent::InputChar(' '));
        shell.drain_notifications();
        assert_eq!(shell.router.current_path(), "/compras/recebimento");
        assert_eq!(shell.nav.state().active_id, "recebimento");
    }

    #[test]
    fn test_tab_collapses_and_persists() {
        let mut shell = shell_at("/compras/pedidos");
        shell.handle_event(TuiEvent::Tab);
        assert!(shell.nav.state().collapsed);
        assert!(shell.nav.state().expanded_ids.is_empty());
        assert_eq!(shell.nav.store().get(COLLAPSED_KEY).as_deref(), Some("true"));
        // Only top-level rows remain on the rail
        assert_eq!(shell.tui.sidebar.visible_rows.len(), 3);
    }

    #[test]
    fn test_prompt_navigates_to_unknown_route_and_back() {
        let mut shell = shell_at("/compras/pedidos");
        shell.handle_event(TuiEvent::InputChar(':'));
        assert!(shell.tui.route_prompt.is_some());
        for c in "relatorios/qualidade".chars() {
            // 'q' typed into the prompt must not quit
            assert!(!shell.handle_event(TuiEvent::InputChar(c)));
        }
        shell.handle_event(TuiEvent::Submit);
        assert!(shell.tui.route_prompt.is_none());
        shell.drain_notifications();
        assert_eq!(shell.router.current_path(), "/relatorios/qualidade");
        // Unknown route keeps the previous selection
        assert_eq!(shell.nav.state().active_id, "pedidos-compra");

        shell.handle_event(TuiEvent::Backspace);
        shell.drain_notifications();
        assert_eq!(shell.router.current_path(), "/compras/pedidos");
    }

    #[test]
    fn test_external_collapse_is_applied() {
        let mut shell = shell_at("/compras/pedidos");
        shell
            .nav
            .store_mut()
            .inject_external(COLLAPSED_KEY, Some("true"));
        assert!(shell.drain_notifications());
        assert!(shell.nav.state().collapsed);
        assert!(shell.nav.state().expanded_ids.is_empty());
    }

    #[test]
    fn test_click_in_same_batch_as_collapse_is_ignored() {
        let mut shell = shell_at("/compras/pedidos");
        let mut terminal =
            ratatui::Terminal::new(ratatui::backend::TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| ui::draw_ui(f, &shell.nav, &shell.router, &mut shell.tui))
            .unwrap();
        let (last_area, last_id) = shell.tui.sidebar.row_areas.last().cloned().unwrap();
        assert_eq!(last_id, "produtos");

        // Both events drain before the next frame
        shell.handle_event(TuiEvent::Tab);
        assert!(!shell.handle_event(TuiEvent::MouseClick(last_area.x, last_area.y)));
        assert_eq!(shell.router.current_path(), "/compras/pedidos");
        assert_eq!(shell.nav.state().active_id, "pedidos-compra");
    }

    #[test]
    fn test_quit_keys() {
        assert!(shell_at("/").handle_event(TuiEvent::InputChar('q')));
        assert!(shell_at("/").handle_event(TuiEvent::Escape));
        assert!(shell_at("/").handle_event(TuiEvent::ForceQuit));
        assert!(!shell_at("/").handle_event(TuiEvent::Resize));
    }
}
