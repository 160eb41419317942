//! # Router
//!
//! Source of truth for the current path. Subscribers receive every new path
//! over an `mpsc` channel and the UI loop drains them between frames, the
//! same way background work reports back to the loop.

use log::{debug, info};
use std::sync::mpsc::{self, Receiver, Sender};

pub struct Router {
    current: String,
    history: Vec<String>,
    subscribers: Vec<Sender<String>>,
}

impl Router {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            current: initial_path.into(),
            history: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn current_path(&self) -> &str {
        &self.current
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Register for change notifications. The current path is not replayed.
    pub fn subscribe(&mut self) -> Receiver<String> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Move to `path`. Returns `false` (and notifies nobody) if already there.
    pub fn navigate(&mut self, path: &str) -> bool {
        if path == self.current {
            return false;
        }
        info!("Navigate: {} -> {}", self.current, path);
        let previous = std::mem::replace(&mut self.current, path.to_string());
        self.history.push(previous);
        self.notify();
        true
    }

    /// Return to the previous path, if any.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        info!("Back: {} -> {}", self.current, previous);
        self.current = previous;
        self.notify();
        true
    }

    fn notify(&mut self) {
        let path = self.current.clone();
        // Drop subscribers whose receiver is gone
        self.subscribers.retain(|tx| tx.send(path.clone()).is_ok());
        debug!("Route notified to {} subscriber(s)", self.subscribers.len());
    }
}
