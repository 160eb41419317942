//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: route and breadcrumb of the active entry
//! - `ContentPane`: which screen the route names
//! - `HintBar`: key hints, or the route prompt
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `SidebarState` / `Sidebar`: navigation rows, cursor, mouse hit testing
//! - `RoutePromptState`: path input
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as "props", not by reaching into the
//! navigation manager or the router. The run loop passes what each one needs:
//!
//! ```rust,ignore
//! // Good: Dependencies are explicit
//! TitleBar::new(router.current_path().to_string(), breadcrumb).render(frame, area);
//!
//! // Bad: Hidden dependency on global state
//! title_bar.render(frame, area); // reads from a global router
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── sidebar.rs       (Navigation rows)
//! ├── title_bar.rs     (Top status line)
//! ├── content.rs       (Screen placeholder)
//! ├── hint_bar.rs      (Bottom line)
//! └── route_prompt.rs  (":" path input)
//! ```

pub mod content;
pub mod hint_bar;
pub mod route_prompt;
pub mod sidebar;
mod title_bar;

pub use content::ContentPane;
pub use hint_bar::HintBar;
pub use route_prompt::{PromptEvent, RoutePromptState};
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
pub use title_bar::TitleBar;
