//! # Core Navigation Logic
//!
//! This module contains erpnav's navigation state machine.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • NavTree (menu data)  │
//!                    │  • State (active/open)  │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • render() (rows)      │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │   Router   │      │  Storage   │
//!     │  Adapter   │      │  (paths)   │      │ (KV + watch│
//!     │ (ratatui)  │      │            │      │  events)   │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`nav`]: The `NavTree`: static sections and leaves, plus validation
//! - [`state`]: `NavigationState` and its four operations
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`projection`]: Pure `render()` into display rows
//! - [`manager`]: `NavigationManager`: state + tree + injected store
//! - [`router`]: Current path, history, change notifications
//! - [`storage`]: `KeyValueStore` and its memory/file implementations
//! - [`config`]: TOML config and override resolution

pub mod action;
pub mod config;
pub mod manager;
pub mod nav;
pub mod projection;
pub mod router;
pub mod state;
pub mod storage;
