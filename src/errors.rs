// src/errors.rs

//! Crate-wide error types.
//!
//! The watcher itself never surfaces errors to the embedding application;
//! almost everything here is logged at the point of failure and the event in
//! question is dropped. The enum exists so the drop reasons are typed and
//! testable rather than stringly logged.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("empty path")]
    EmptyPath,

    #[error("path ends with a separator: {0}")]
    TrailingSeparator(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("failed to subscribe {path:?} to the watcher: {source}")]
    SubscribeFailed {
        path: PathBuf,
        source: notify::Error,
    },

    #[error("watcher is closed")]
    WatcherClosed,

    #[error("failed to create watcher: {0}")]
    Init(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchError>;
