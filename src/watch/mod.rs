// src/watch/mod.rs

//! File watching core.
//!
//! This module is responsible for:
//! - Deciding which paths are excluded from watching and dispatch (`ignore`).
//! - Subscribing directories to the OS watcher, including trees created at
//!   runtime (`registrar`).
//! - Demultiplexing raw OS events: per-path debounce, directory vs file vs
//!   delete, handler fan-out (`events`, `dispatch`).
//!
//! It does **not** build or compile anything; handlers own that, and the
//! reload coordinator in [`crate::reload`] owns collapsing their successes
//! into a single browser reload.

pub mod debounce;
pub mod dispatch;
pub mod events;
pub mod ignore;
pub mod path_utils;
pub mod registrar;
pub mod watcher;

pub use debounce::EventDebouncer;
pub use dispatch::{dispatch_file_event, DispatchOutcome};
pub use events::EventLoop;
pub use ignore::{is_hidden_non_git, IgnoreSet};
pub use path_utils::{dotted_extension, file_name, normalize_slashes};
pub use registrar::{initial_registration, register_directory, register_tree};
pub use watcher::{DevWatcher, WatchShared, WatcherHandle};
