#![allow(dead_code)]

//! Scratch project trees for watcher tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};

/// A temporary source tree the watcher can be pointed at.
///
/// Paths handed to `file`/`dir` are relative to the root; parent directories
/// are created as needed.
pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    pub fn new() -> Self {
        // tempfile's default ".tmp" prefix would make the root a hidden
        // directory and trip the hidden-file policy.
        let dir = Builder::new()
            .prefix("watchreload-")
            .tempdir()
            .expect("failed to create temp project");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Create (or overwrite) a file, creating parent directories.
    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories");
        }
        fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Create a directory tree.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).expect("failed to create directory");
        path
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}
