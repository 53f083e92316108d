// src/lib.rs

//! `watchreload` — development-time filesystem watcher.
//!
//! Observes an application's source tree, classifies each change by file
//! extension, routes it to the registered build handlers (asset processor,
//! backend builder, WASM compiler, ...) and, when any handler processed the
//! change successfully, requests a single debounced browser reload.
//!
//! ```no_run
//! use std::sync::Arc;
//! use watchreload::{DevWatcher, WatchConfig};
//!
//! # async fn example(css_handler: Arc<dyn watchreload::FileEventHandler>) -> watchreload::Result<()> {
//! let config = WatchConfig::new("/home/user/myapp")
//!     .with_handler(css_handler)
//!     .with_unobserved_files(|| vec![".git".into(), "node_modules".into()])
//!     .with_browser_reload(|| Ok(()));
//!
//! let handle = DevWatcher::new(config)?.start();
//! // ... develop ...
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod handler;
pub mod logging;
pub mod reload;
pub mod watch;

pub use config::WatchConfig;
pub use errors::{Result, WatchError};
pub use handler::{
    DependencyAnalyzer, FileEventHandler, FolderEventObserver, FsEventKind, ReloadFn,
    UnobservedFilesFn,
};
pub use reload::ReloadScheduler;
pub use watch::{DevWatcher, EventLoop, WatchShared, WatcherHandle};
