// src/watch/registrar.rs

//! Directory subscription and the initial registration walk.
//!
//! Each directory gets its own non-recursive subscription; the registration
//! set makes `register_directory` idempotent across the initial walk and
//! every later growth walk. Walk errors on individual entries are logged and
//! skipped, never aborting the walk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::handler::FsEventKind;
use crate::watch::dispatch::dispatch_file_event;
use crate::watch::path_utils::file_name;
use crate::watch::watcher::WatchShared;

/// Subscribe `path` to the OS watcher.
///
/// Idempotent: an already-registered directory is not re-subscribed. After a
/// successful subscription the folder observer (if any) is notified with a
/// `create`; an observer failure is logged but does not fail the
/// registration.
pub fn register_directory(shared: &WatchShared, path: &Path) -> Result<()> {
    if shared.already_registered(path) {
        return Ok(());
    }

    if let Err(err) = shared.watch_dir(path) {
        warn!(path = %path.display(), error = %err, "failed to add directory to watcher");
        return Err(err);
    }

    shared.mark_registered(path);
    debug!(path = %path.display(), "directory registered");

    if let Ok(name) = file_name(&path.to_string_lossy()) {
        shared.notify_folder_event(&name, path, FsEventKind::Create);
    }

    Ok(())
}

/// Subscribe every non-excluded descendant directory of `root`.
///
/// Covers atomic creation of nested trees (`create_dir_all`): the OS only
/// delivers the topmost creation, yet all descendants must be watched.
pub fn register_tree(shared: &WatchShared, root: &Path) {
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "failed to read directory");
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(path = %dir.display(), error = %err, "failed to read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            if is_dir && !shared.is_ignored(&path) {
                let _ = register_directory(shared, &path);
                stack.push(path);
            }
        }
    }
}

/// One-shot bootstrap: build the ignore set, subscribe the root tree, and
/// replay a synthetic `create` per existing file to each handler claiming
/// its extension.
///
/// The replay gives handlers that derive state from the current workspace
/// the same event stream they would see under steady-state watching. It
/// never schedules reloads.
pub fn initial_registration(shared: &WatchShared) {
    shared.ensure_ignore_built();

    let root = shared.app_root_dir().to_path_buf();
    info!(root = %root.display(), "registering application root");

    if !shared.is_ignored(&root) {
        let _ = register_directory(shared, &root);
    }

    let mut stack: Vec<PathBuf> = vec![root];

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "failed to read directory");
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(path = %dir.display(), error = %err, "failed to read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            if shared.is_ignored(&path) {
                continue;
            }

            if is_dir {
                let _ = register_directory(shared, &path);
                stack.push(path);
            } else {
                replay_existing_file(shared, &path);
            }
        }
    }
}

fn replay_existing_file(shared: &WatchShared, path: &Path) {
    let name = match file_name(&path.to_string_lossy()) {
        Ok(name) => name,
        Err(_) => return,
    };

    dispatch_file_event(shared, &name, path, FsEventKind::Create, false);
}
