//! # Key-Value Storage
//!
//! Small string-to-string store used for UI preferences that outlive a run
//! (today only the sidebar collapse flag).
//!
//! Two implementations:
//! - `MemoryStore`: in-process map, used by tests and `--ephemeral`.
//! - `FileStore`: a JSON object at `~/.erpnav/state.json`. Writes use atomic
//!   rename (write `.tmp`, then `rename()`).
//!
//! Changes made by someone else (another erpnav instance, a user editing the
//! file) are pushed to subscribers as `StorageEvent`s instead of being polled
//! for. A store never reports its own writes back to its subscribers.

use log::{debug, warn};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

/// Storage key holding `"true"` / `"false"` for the sidebar rail mode.
pub const COLLAPSED_KEY: &str = "sidebar.collapsed";

/// A value changed outside this handle. `value` is `None` when the key was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Serialize(serde_json::Error),
    Watch(notify::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::Serialize(e) => write!(f, "storage format error: {e}"),
            StorageError::Watch(e) => write!(f, "storage watch error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Register for changes made by other writers.
    fn subscribe(&mut self) -> Result<Receiver<StorageEvent>, StorageError>;
}

// ============================================================================
// MemoryStore
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    subscribers: Vec<Sender<StorageEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    /// Simulate another writer: store the value and notify subscribers.
    pub fn inject_external(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(v) => self.values.insert(key.to_string(), v.to_string()),
            None => self.values.remove(key),
        };
        let event = StorageEvent {
            key: key.to_string(),
            value: value.map(str::to_string),
        };
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn subscribe(&mut self) -> Result<Receiver<StorageEvent>, StorageError> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        Ok(rx)
    }
}

// ============================================================================
// FileStore
// ============================================================================

/// Cached file contents and the receivers of external changes.
///
/// One lock covers the cache and the file: `set` holds it across the atomic
/// write and a refresh holds it across read, diff and replace, so a refresh
/// always finds the file and the cache in agreement after an own write.
struct Shared {
    values: BTreeMap<String, String>,
    subscribers: Vec<Sender<StorageEvent>>,
}

type SharedState = Arc<Mutex<Shared>>;

pub struct FileStore {
    path: PathBuf,
    shared: SharedState,
    // Started by the first `subscribe`, shared by every subscriber
    watcher: Option<RecommendedWatcher>,
}

impl FileStore {
    /// Returns `~/.erpnav/state.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".erpnav").join("state.json"))
    }

    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_map(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring unreadable state file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        debug!("Opened state file {} ({} keys)", path.display(), values.len());
        Self {
            path,
            shared: Arc::new(Mutex::new(Shared {
                values,
                subscribers: Vec::new(),
            })),
            watcher: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and return the keys that differ from the cache.
    /// The same changes go to every subscriber. The watcher does this on
    /// every file event; callers without a subscription can pull this way.
    pub fn refresh(&self) -> Vec<StorageEvent> {
        refresh_and_publish(&self.path, &self.shared)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.shared).values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut shared = lock(&self.shared);
        let previous = shared.values.insert(key.to_string(), value.to_string());
        let result = atomic_write_json(&self.path, &shared.values);
        if result.is_err() {
            // Cache mirrors the file
            match previous {
                Some(old) => shared.values.insert(key.to_string(), old),
                None => shared.values.remove(key),
            };
        }
        result
    }

    fn subscribe(&mut self) -> Result<Receiver<StorageEvent>, StorageError> {
        let (tx, rx) = mpsc::channel();
        lock(&self.shared).subscribers.push(tx);

        if self.watcher.is_none() {
            match start_watcher(&self.path, &self.shared) {
                Ok(watcher) => self.watcher = Some(watcher),
                Err(e) => {
                    lock(&self.shared).subscribers.pop();
                    return Err(e);
                }
            }
        }
        Ok(rx)
    }
}

fn start_watcher(path: &Path, shared: &SharedState) -> Result<RecommendedWatcher, StorageError> {
    let watched = path.to_path_buf();
    let shared = Arc::clone(shared);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                warn!("State file watcher error: {}", e);
                return;
            }
        };
        if !matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) {
            return;
        }
        if !event.paths.iter().any(|p| p.file_name() == watched.file_name()) {
            return;
        }
        refresh_and_publish(&watched, &shared);
    })
    .map_err(StorageError::Watch)?;

    // Watch the directory: atomic renames replace the file's inode
    let dir = watch_dir(path);
    fs::create_dir_all(&dir)?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(StorageError::Watch)?;
    debug!("Watching {} for external changes", dir.display());
    Ok(watcher)
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn lock(shared: &SharedState) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn refresh_and_publish(path: &Path, shared: &SharedState) -> Vec<StorageEvent> {
    let mut shared = lock(shared);
    let fresh = match read_map(path) {
        Ok(values) => values,
        Err(e) => {
            // Usually a half-written file from a non-atomic writer; the next event retries
            debug!("Skipping state refresh for {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let changes = diff(&shared.values, &fresh);
    shared.values = fresh;
    if !changes.is_empty() {
        debug!("External state changes: {:?}", changes);
        shared
            .subscribers
            .retain(|tx| changes.iter().all(|change| tx.send(change.clone()).is_ok()));
    }
    changes
}

/// Keys whose value in `fresh` differs from `current`, removals last.
fn diff(current: &BTreeMap<String, String>, fresh: &BTreeMap<String, String>) -> Vec<StorageEvent> {
    let mut changes: Vec<StorageEvent> = fresh
        .iter()
        .filter(|(key, value)| current.get(*key) != Some(*value))
        .map(|(key, value)| StorageEvent {
            key: key.clone(),
            value: Some(value.clone()),
        })
        .collect();
    changes.extend(
        current
            .keys()
            .filter(|key| !fresh.contains_key(*key))
            .map(|key| StorageEvent {
                key: key.clone(),
                value: None,
            }),
    );
    changes
}

/// Load the JSON object at `path`. A missing file is an empty map.
fn read_map(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(StorageError::Io(e)),
    };
    serde_json::from_str(&json).map_err(StorageError::Serialize)
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json(path: &Path, data: &BTreeMap<String, String>) -> Result<(), StorageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data).map_err(StorageError::Serialize)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
