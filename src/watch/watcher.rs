// src/watch/watcher.rs

//! Shared watcher state and bootstrap wiring.
//!
//! `WatchShared` is the state visible to the bootstrap task, the event loop
//! and the embedding application: the collaborators from the configuration,
//! the handler list with its lazily built ignore set, the live `notify`
//! watcher, and the set of directories already subscribed.
//!
//! `DevWatcher` bridges the blocking `notify` callback into an unbounded
//! tokio channel, spawns the event loop, performs the initial registration
//! walk and hands back a [`WatcherHandle`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::WatchConfig;
use crate::errors::{Result, WatchError};
use crate::handler::{
    DependencyAnalyzer, FileEventHandler, FolderEventObserver, FsEventKind, ReloadFn,
    UnobservedFilesFn,
};
use crate::reload::ReloadScheduler;
use crate::watch::events::EventLoop;
use crate::watch::ignore::{is_hidden_non_git, IgnoreSet};
use crate::watch::path_utils::normalize_slashes;
use crate::watch::registrar::initial_registration;

struct HandlerState {
    handlers: Vec<Arc<dyn FileEventHandler>>,
    /// Built on first query from the configured source plus the union of
    /// every handler's unobserved-files list. Never narrowed afterwards.
    ignore: Option<IgnoreSet>,
}

/// State shared between the bootstrap task, the event loop and the handle.
pub struct WatchShared {
    app_root_dir: PathBuf,
    source_extension: String,
    folder_events: Option<Arc<dyn FolderEventObserver>>,
    analyzer: Option<Arc<dyn DependencyAnalyzer>>,
    unobserved_files: Option<UnobservedFilesFn>,
    state: RwLock<HandlerState>,
    watcher: Mutex<Option<RecommendedWatcher>>,
    registered: Mutex<HashSet<PathBuf>>,
}

impl WatchShared {
    /// Build the shared state from a configuration.
    ///
    /// `watcher` may be `None` for callers that drive the event loop with
    /// injected events and never register directories.
    pub fn from_config(config: &WatchConfig, watcher: Option<RecommendedWatcher>) -> Arc<Self> {
        Arc::new(Self {
            app_root_dir: config.app_root_dir.clone(),
            source_extension: config.source_extension.clone(),
            folder_events: config.folder_events.clone(),
            analyzer: config.analyzer.clone(),
            unobserved_files: config.unobserved_files.clone(),
            state: RwLock::new(HandlerState {
                handlers: config.handlers.clone(),
                ignore: None,
            }),
            watcher: Mutex::new(watcher),
            registered: Mutex::new(HashSet::new()),
        })
    }

    pub fn app_root_dir(&self) -> &Path {
        &self.app_root_dir
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    pub fn analyzer(&self) -> Option<&Arc<dyn DependencyAnalyzer>> {
        self.analyzer.as_ref()
    }

    /// Whether `path` is excluded from watcher subscription and dispatch.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let norm = normalize_slashes(path);
        self.ensure_ignore_built();

        {
            let state = match self.state.read() {
                Ok(guard) => guard,
                Err(_) => {
                    warn!("handler state lock poisoned; treating path as observed");
                    return false;
                }
            };
            if let Some(ignore) = &state.ignore {
                if ignore.matches(&norm) {
                    return true;
                }
            }
        }

        is_hidden_non_git(&norm)
    }

    /// Build the ignore set if it does not exist yet.
    ///
    /// Initialization completes under the write lock, so concurrent readers
    /// never observe a partially populated set.
    pub fn ensure_ignore_built(&self) {
        {
            match self.state.read() {
                Ok(guard) => {
                    if guard.ignore.is_some() {
                        return;
                    }
                }
                Err(_) => return,
            }
        }

        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("handler state lock poisoned; ignore set not built");
                return;
            }
        };

        if state.ignore.is_none() {
            let mut set = IgnoreSet::new();
            if let Some(source) = &self.unobserved_files {
                set.extend(source());
            }
            for handler in &state.handlers {
                set.extend(handler.unobserved_files());
            }
            state.ignore = Some(set);
        }
    }

    /// Append handlers and merge their unobserved-files tokens.
    ///
    /// Safe to call before or after `initial_registration`: when the ignore
    /// set does not exist yet, the tokens are picked up by the lazy build.
    pub fn add_files_event_handlers(
        &self,
        handlers: impl IntoIterator<Item = Arc<dyn FileEventHandler>>,
    ) {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("handler state lock poisoned; handlers not added");
                return;
            }
        };

        for handler in handlers {
            if let Some(ignore) = &mut state.ignore {
                ignore.extend(handler.unobserved_files());
            }
            state.handlers.push(handler);
        }
    }

    /// Clone of the ordered handler list.
    ///
    /// Dispatch iterates the snapshot with the lock released, so a handler
    /// may call back into `add_files_event_handlers` without deadlocking.
    pub fn handlers_snapshot(&self) -> Vec<Arc<dyn FileEventHandler>> {
        match self.state.read() {
            Ok(guard) => guard.handlers.clone(),
            Err(_) => {
                warn!("handler state lock poisoned; no handlers dispatched");
                Vec::new()
            }
        }
    }

    pub(crate) fn notify_folder_event(&self, name: &str, path: &Path, kind: FsEventKind) {
        if let Some(observer) = &self.folder_events {
            if let Err(err) = observer.on_folder_event(name, path, kind) {
                warn!(path = %path.display(), error = %err, "folder event error");
            }
        }
    }

    pub(crate) fn already_registered(&self, path: &Path) -> bool {
        match self.registered.lock() {
            Ok(guard) => guard.contains(path),
            Err(_) => false,
        }
    }

    pub(crate) fn mark_registered(&self, path: &Path) {
        if let Ok(mut guard) = self.registered.lock() {
            guard.insert(path.to_path_buf());
        }
    }

    /// Number of directories subscribed so far.
    pub fn registered_count(&self) -> usize {
        match self.registered.lock() {
            Ok(guard) => guard.len(),
            Err(_) => 0,
        }
    }

    pub(crate) fn watch_dir(&self, path: &Path) -> Result<()> {
        let mut guard = match self.watcher.lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("watcher lock poisoned");
                return Err(WatchError::WatcherClosed);
            }
        };

        match guard.as_mut() {
            Some(watcher) => watcher
                .watch(path, RecursiveMode::NonRecursive)
                .map_err(|source| WatchError::SubscribeFailed {
                    path: path.to_path_buf(),
                    source,
                }),
            None => Err(WatchError::WatcherClosed),
        }
    }

    /// Drop the underlying OS watcher, releasing its subscriptions.
    pub(crate) fn release_watcher(&self) {
        if let Ok(mut guard) = self.watcher.lock() {
            *guard = None;
        }
    }
}

/// A configured watcher, ready to start.
pub struct DevWatcher {
    shared: Arc<WatchShared>,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    exit_rx: mpsc::Receiver<()>,
    exit_tx: Option<mpsc::Sender<()>>,
    browser_reload: Option<ReloadFn>,
    debounce_window: Duration,
    reload_delay: Duration,
}

impl DevWatcher {
    /// Acquire the OS watcher resource and wire its event stream.
    pub fn new(mut config: WatchConfig) -> Result<Self> {
        let (event_tx, events) = mpsc::unbounded_channel::<notify::Result<Event>>();

        // Closure called synchronously by notify whenever an event arrives.
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                if event_tx.send(res).is_err() {
                    eprintln!("watchreload: event loop gone, dropping filesystem event");
                }
            },
            notify::Config::default(),
        )?;

        let (exit_rx, exit_tx) = match config.exit_rx.take() {
            Some(rx) => (rx, None),
            None => {
                let (tx, rx) = mpsc::channel(1);
                (rx, Some(tx))
            }
        };

        let browser_reload = config.browser_reload.clone();
        let debounce_window = config.debounce_window;
        let reload_delay = config.reload_delay;
        let shared = WatchShared::from_config(&config, Some(watcher));

        Ok(Self {
            shared,
            events,
            exit_rx,
            exit_tx,
            browser_reload,
            debounce_window,
            reload_delay,
        })
    }

    /// Spawn the event loop, walk the root once, and return the live handle.
    ///
    /// Must be called within a tokio runtime. The event loop is running
    /// before the walk starts, so events raced against the initial
    /// registration are not lost.
    pub fn start(self) -> WatcherHandle {
        let reload = ReloadScheduler::new(self.browser_reload.clone(), self.reload_delay);
        let event_loop = EventLoop::new(
            Arc::clone(&self.shared),
            self.events,
            self.exit_rx,
            self.debounce_window,
            reload,
        );
        let join = tokio::spawn(event_loop.run());

        initial_registration(&self.shared);

        info!(root = %self.shared.app_root_dir().display(), "listening for file changes");

        WatcherHandle {
            shared: self.shared,
            join,
            exit_tx: self.exit_tx,
        }
    }
}

/// Handle to a running watcher.
pub struct WatcherHandle {
    shared: Arc<WatchShared>,
    join: JoinHandle<()>,
    exit_tx: Option<mpsc::Sender<()>>,
}

impl WatcherHandle {
    /// Append handlers at runtime, merging their ignore tokens.
    pub fn add_files_event_handlers(
        &self,
        handlers: impl IntoIterator<Item = Arc<dyn FileEventHandler>>,
    ) {
        self.shared.add_files_event_handlers(handlers);
    }

    /// Whether `path` is excluded from watching and dispatch.
    pub fn is_ignored(&self, path: impl AsRef<Path>) -> bool {
        self.shared.is_ignored(path.as_ref())
    }

    pub fn shared(&self) -> &Arc<WatchShared> {
        &self.shared
    }

    /// Signal termination (when the watcher owns the exit channel) and wait
    /// for the event loop to finish.
    pub async fn shutdown(self) {
        if let Some(tx) = &self.exit_tx {
            let _ = tx.send(()).await;
        }
        let _ = self.join.await;
    }

    /// Wait for the event loop without signalling termination. Useful when
    /// the embedding application owns the exit channel.
    pub async fn wait(self) {
        let _ = self.join.await;
    }
}
