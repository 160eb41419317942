//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.erpnav/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::nav::{self, NavEntry, NavTree};
use crate::core::storage::FileStore;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ErpNavConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sidebar: SidebarConfig,
    /// Replaces the built-in menu when non-empty.
    #[serde(default)]
    pub navigation: Vec<NavEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub initial_route: Option<String>,
    pub fallback_id: Option<String>,
    pub state_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SidebarConfig {
    pub width: Option<u16>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_INITIAL_ROUTE: &str = "/dashboard";
pub const DEFAULT_SIDEBAR_WIDTH: u16 = 28;
/// Narrowest sidebar that still fits a label next to its chevron.
pub const MIN_SIDEBAR_WIDTH: u16 = 12;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub initial_route: String,
    pub fallback_id: String,
    /// `None` means in-memory storage only.
    pub state_file: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub sidebar_width: u16,
    pub tree: NavTree,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub route: Option<&'a str>,
    pub state_file: Option<&'a Path>,
    pub ephemeral: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.erpnav/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".erpnav").join("config.toml"))
}

/// Load config from `~/.erpnav/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ErpNavConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ErpNavConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ErpNavConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ErpNavConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit file. Unlike `load_config`, a missing file is an error.
pub fn load_config_from(path: &Path) -> Result<ErpNavConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ErpNavConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# erpnav Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# initial_route = "/dashboard"      # Or set ERPNAV_ROUTE, or pass --route
# fallback_id = "dashboard"         # Active entry when the route matches nothing
# state_file = "state.json"         # Relative to ~/.erpnav/ (or ERPNAV_STATE_FILE)
# log_level = "debug"               # "error", "warn", "info", "debug", "trace"

# [sidebar]
# width = 28

# Replace the built-in menu. Sections have children, leaves have a path.
# [[navigation]]
# id = "dashboard"
# label = "Dashboard"
# icon = "◆"
# path = "/dashboard"

# [[navigation]]
# id = "compras"
# label = "Compras"
# icon = "⇩"

# [[navigation.children]]
# id = "recebimento"
# label = "Recebimento"
# path = "/compras/recebimento"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ErpNavConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |name| std::env::var(name).ok())
}

/// `resolve` with an injectable environment lookup.
fn resolve_with_env(
    config: &ErpNavConfig,
    cli: &CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Route: CLI → env → config → default
    let initial_route = cli
        .route
        .map(|s| s.to_string())
        .or_else(|| env("ERPNAV_ROUTE"))
        .or_else(|| config.general.initial_route.clone())
        .unwrap_or_else(|| DEFAULT_INITIAL_ROUTE.to_string());

    let fallback_id = config
        .general
        .fallback_id
        .clone()
        .unwrap_or_else(|| nav::DEFAULT_FALLBACK_ID.to_string());

    // State file: --ephemeral → CLI → env → config (relative to ~/.erpnav/) → default
    let state_file = if cli.ephemeral {
        None
    } else {
        cli.state_file
            .map(Path::to_path_buf)
            .or_else(|| env("ERPNAV_STATE_FILE").map(PathBuf::from))
            .or_else(|| config.general.state_file.as_deref().and_then(resolve_state_file))
            .or_else(FileStore::default_path)
    };

    // Log level: env → config → default
    let log_level = env("ERPNAV_LOG_LEVEL")
        .or_else(|| config.general.log_level.clone())
        .and_then(|raw| match raw.parse::<LevelFilter>() {
            Ok(level) => Some(level),
            Err(_) => {
                warn!("Unknown log level '{}', using default", raw);
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let sidebar_width = config
        .sidebar
        .width
        .unwrap_or(DEFAULT_SIDEBAR_WIDTH)
        .max(MIN_SIDEBAR_WIDTH);

    let tree = if config.navigation.is_empty() {
        nav::default_tree()
    } else {
        NavTree::new(config.navigation.clone())
    };

    ResolvedConfig {
        initial_route,
        fallback_id,
        state_file,
        log_level,
        sidebar_width,
        tree,
    }
}

/// Absolute paths are used as-is; relative ones live under `~/.erpnav/`.
fn resolve_state_file(file: &str) -> Option<PathBuf> {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return Some(path);
    }
    dirs::home_dir().map(|home| home.join(".erpnav").join(path))
}
