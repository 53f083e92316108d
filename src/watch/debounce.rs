// src/watch/debounce.rs

//! Per-path event admission.
//!
//! Editors and build tools fire several raw events per logical save; the
//! demultiplexer admits the first event for a path and silently drops the
//! rest of the burst. Dropped events do not refresh the timestamp, so the
//! representative that survives is the first in the window, not the last.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Leading-edge, per-path debounce filter.
///
/// The map grows for the watcher's lifetime, which is acceptable for a
/// development tool.
#[derive(Debug)]
pub struct EventDebouncer {
    window: Duration,
    last_admitted: HashMap<PathBuf, Instant>,
}

impl EventDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_admitted: HashMap::new(),
        }
    }

    /// Whether an event for `path` arriving now should be processed.
    ///
    /// Records the admission timestamp before any work happens, so a slow
    /// handler cannot widen the window for its own path.
    pub fn admit(&mut self, path: &Path) -> bool {
        let now = Instant::now();

        if let Some(previous) = self.last_admitted.get(path) {
            if now.duration_since(*previous) <= self.window {
                return false;
            }
        }

        self.last_admitted.insert(path.to_path_buf(), now);
        true
    }
}
