// src/config.rs

//! Typed configuration for the watcher.
//!
//! A `WatchConfig` is built once by the embedding application and handed to
//! [`DevWatcher::new`](crate::watch::DevWatcher::new). It is immutable after
//! construction except for the handler list, which can grow through
//! [`add_files_event_handlers`](crate::watch::WatcherHandle::add_files_event_handlers).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::handler::{
    DependencyAnalyzer, FileEventHandler, FolderEventObserver, ReloadFn, UnobservedFilesFn,
};

/// Per-path interval within which duplicate events are dropped.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Interval after the last successful dispatch before the reload fires.
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(50);

/// Dotted extension of the designated source language.
pub const DEFAULT_SOURCE_EXTENSION: &str = ".go";

pub struct WatchConfig {
    /// Absolute path under which all interesting files live; walk root.
    pub app_root_dir: PathBuf,

    /// Ordered handler sequence. Order affects observation order only.
    pub handlers: Vec<Arc<dyn FileEventHandler>>,

    /// Optional observer for directory-level events.
    pub folder_events: Option<Arc<dyn FolderEventObserver>>,

    /// Browser reload callback. Absent means reloads are never attempted.
    pub browser_reload: Option<ReloadFn>,

    /// Ownership oracle for source-language files. Absent means every
    /// matching handler is invoked, as for asset files.
    pub analyzer: Option<Arc<dyn DependencyAnalyzer>>,

    /// Application-level ignore tokens, merged with each handler's
    /// unobserved-files list when the ignore set is first built.
    pub unobserved_files: Option<UnobservedFilesFn>,

    /// Extension whose files go through ownership resolution.
    pub source_extension: String,

    pub debounce_window: Duration,
    pub reload_delay: Duration,

    /// Single-shot termination signal. When not provided, the watcher
    /// creates its own channel and the handle's `shutdown` drives it.
    pub exit_rx: Option<mpsc::Receiver<()>>,
}

impl WatchConfig {
    pub fn new(app_root_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_root_dir: app_root_dir.into(),
            handlers: Vec::new(),
            folder_events: None,
            browser_reload: None,
            analyzer: None,
            unobserved_files: None,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            reload_delay: DEFAULT_RELOAD_DELAY,
            exit_rx: None,
        }
    }

    pub fn with_handler(mut self, handler: Arc<dyn FileEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn with_handlers(
        mut self,
        handlers: impl IntoIterator<Item = Arc<dyn FileEventHandler>>,
    ) -> Self {
        self.handlers.extend(handlers);
        self
    }

    pub fn with_folder_events(mut self, observer: Arc<dyn FolderEventObserver>) -> Self {
        self.folder_events = Some(observer);
        self
    }

    pub fn with_browser_reload(
        mut self,
        reload: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.browser_reload = Some(Arc::new(reload));
        self
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn DependencyAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn with_unobserved_files(
        mut self,
        source: impl Fn() -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.unobserved_files = Some(Arc::new(source));
        self
    }

    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    pub fn with_exit_receiver(mut self, exit_rx: mpsc::Receiver<()>) -> Self {
        self.exit_rx = Some(exit_rx);
        self
    }
}
