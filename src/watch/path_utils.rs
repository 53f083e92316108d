// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

use crate::errors::WatchError;

/// Render a path with every backslash replaced by a forward slash.
///
/// All ignore matching happens on this normalized form, so token rules
/// behave identically for Windows- and Unix-style event paths.
pub fn normalize_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Return the last path component of `path`.
///
/// Example: `"theme/index.html"` -> `"index.html"`. Accepts both separator
/// styles. Fails on an empty path, a path ending in a separator, or a
/// computed base name that is `.` or a bare separator.
pub fn file_name(path: &str) -> Result<String, WatchError> {
    if path.is_empty() {
        return Err(WatchError::EmptyPath);
    }

    if path.ends_with('/') || path.ends_with('\\') {
        return Err(WatchError::TrailingSeparator(path.to_string()));
    }

    let base = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    if base.is_empty() || base == "." || base == "/" || base == "\\" {
        return Err(WatchError::InvalidPath(path.to_string()));
    }

    Ok(base.to_string())
}

/// Dotted suffix of a base name, e.g. `".css"`. Empty when the name has no
/// dot. A leading-dot name like `".gitignore"` is its own extension.
pub fn dotted_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => name[idx..].to_string(),
        None => String::new(),
    }
}
