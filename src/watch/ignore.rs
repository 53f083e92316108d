// src/watch/ignore.rs

//! Ignore-token matching.
//!
//! The ignore list conflates literal paths, bare base names (`.git`,
//! `node_modules`), prefix directories and extension/suffix tokens
//! (`.exe`, `_worker.js`); a single token set addresses all of them.
//! Matching runs against slash-normalized paths only (see
//! [`normalize_slashes`](super::path_utils::normalize_slashes)).

use std::collections::HashSet;

/// Set of opaque ignore tokens with the four matching modes, evaluated in
/// order:
///
/// 1. the normalized path equals a token exactly;
/// 2. any non-empty `/`-delimited component of the path equals a token;
/// 3. the path starts with a (normalized) token followed by `/`;
/// 4. for tokens beginning with `.` or `_`, the base name ends with the
///    token (extension and suffix tokens like `.log` or `_worker.js`).
#[derive(Debug, Default)]
pub struct IgnoreSet {
    tokens: HashSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens only accumulate; the set is never narrowed.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = String>) {
        self.tokens.extend(tokens);
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether `norm_path` (forward slashes only) is matched by any token.
    pub fn matches(&self, norm_path: &str) -> bool {
        if self.tokens.contains(norm_path) {
            return true;
        }

        for part in norm_path.split('/') {
            if part.is_empty() {
                continue;
            }
            if self.tokens.contains(part) {
                return true;
            }
        }

        let base = norm_path.rsplit('/').next().unwrap_or_default();

        for token in &self.tokens {
            let normalized = token.replace('\\', "/");
            if norm_path.starts_with(&format!("{normalized}/")) {
                return true;
            }
            if (token.starts_with('.') || token.starts_with('_')) && base.ends_with(token.as_str())
            {
                return true;
            }
        }

        false
    }
}

/// Hidden-file policy, applied after all token rules: any base name that
/// starts with `.` is ignored unless it is exactly `.git`.
pub fn is_hidden_non_git(norm_path: &str) -> bool {
    let base = norm_path.rsplit('/').next().unwrap_or_default();
    base.starts_with('.') && base != ".git"
}
