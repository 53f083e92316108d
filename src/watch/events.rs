// src/watch/events.rs

//! The event demultiplexer.
//!
//! A single cooperative loop selects over the OS event stream and the
//! termination signal. All dispatch runs on this task: handlers may block
//! arbitrarily long, and the loop intentionally does not read further events
//! until they return, so compile-then-reload ordering is preserved.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::Event;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

use crate::handler::FsEventKind;
use crate::reload::ReloadScheduler;
use crate::watch::debounce::EventDebouncer;
use crate::watch::dispatch::dispatch_file_event;
use crate::watch::path_utils::file_name;
use crate::watch::registrar::{register_directory, register_tree};
use crate::watch::watcher::WatchShared;

/// The demultiplexer loop state.
///
/// Production code wires this up through
/// [`DevWatcher::start`](crate::watch::DevWatcher::start); tests may
/// construct it directly with their own channels and inject events.
pub struct EventLoop {
    shared: Arc<WatchShared>,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    exit: mpsc::Receiver<()>,
    debouncer: EventDebouncer,
    reload: ReloadScheduler,
}

impl EventLoop {
    pub fn new(
        shared: Arc<WatchShared>,
        events: mpsc::UnboundedReceiver<notify::Result<Event>>,
        exit: mpsc::Receiver<()>,
        debounce_window: Duration,
        reload: ReloadScheduler,
    ) -> Self {
        Self {
            shared,
            events,
            exit,
            debouncer: EventDebouncer::new(debounce_window),
            reload,
        }
    }

    /// Run until the event stream closes or the termination signal fires.
    ///
    /// On exit the OS watcher is released and the reload coordinator is
    /// stopped (performing at most one final, already-elapsed reload).
    pub async fn run(mut self) {
        debug!("event loop started");

        loop {
            tokio::select! {
                maybe = self.events.recv() => match maybe {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(err)) => error!(error = %err, "file watch error"),
                    None => {
                        error!("event stream closed unexpectedly");
                        break;
                    }
                },
                _ = self.exit.recv() => {
                    info!("exit signal received, stopping watcher");
                    break;
                }
            }
        }

        self.shared.release_watcher();
        self.reload.stop().await;
        debug!("event loop finished");
    }

    fn handle_event(&mut self, event: Event) {
        let Some(kind) = FsEventKind::from_notify(&event.kind) else {
            trace!(kind = ?event.kind, "dropping uninteresting event kind");
            return;
        };

        for path in event.paths {
            self.handle_path(path, kind);
        }
    }

    fn handle_path(&mut self, path: PathBuf, kind: FsEventKind) {
        if !self.debouncer.admit(&path) {
            trace!(path = %path.display(), "debounced");
            return;
        }

        let is_delete = kind.is_remove();
        let mut is_dir = false;

        // Deletes skip the stat/ignore gate: there is nothing left to stat,
        // and handlers may need the removal to drop derived state.
        if !is_delete {
            let Ok(metadata) = fs::metadata(&path) else {
                trace!(path = %path.display(), "target vanished before stat");
                return;
            };
            if self.shared.is_ignored(&path) {
                return;
            }
            is_dir = metadata.is_dir();
        }

        let name = match file_name(&path.to_string_lossy()) {
            Ok(name) => name,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "dropping event");
                return;
            }
        };

        if is_dir {
            self.handle_directory(&name, &path, kind);
        } else {
            let outcome = dispatch_file_event(&self.shared, &name, &path, kind, is_delete);
            if outcome.should_reload {
                self.reload.schedule();
            }
        }
    }

    fn handle_directory(&self, name: &str, path: &Path, kind: FsEventKind) {
        self.shared.notify_folder_event(name, path, kind);

        // A create may stand for a whole tree made at once (mkdir -p); only
        // the topmost creation is delivered, so sweep the subtree.
        if kind == FsEventKind::Create && register_directory(&self.shared, path).is_ok() {
            register_tree(&self.shared, path);
        }
    }
}
