// src/handler.rs

//! Pluggable collaborator interfaces.
//!
//! The watcher itself never builds, compiles or transforms anything; it
//! routes file events to handlers registered by the embedding application
//! and asks an (optional) dependency analyzer who owns a given source file.
//!
//! Handler invocation is synchronous by contract: the event loop does not
//! process further events until a handler returns, so a compile finishes
//! before the reload that follows it is scheduled.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use notify::event::ModifyKind;
use notify::EventKind;

/// Kind of a filesystem event, in the vocabulary handlers see.
///
/// `delete` is accepted as a synonym of `remove` on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsEventKind {
    Create,
    Write,
    Rename,
    Remove,
}

impl FsEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Write => "write",
            Self::Rename => "rename",
            Self::Remove => "remove",
        }
    }

    /// Parse the lowercase wire vocabulary. `"delete"` maps to [`Self::Remove`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Self::Create),
            "write" => Some(Self::Write),
            "rename" => Some(Self::Rename),
            "remove" | "delete" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn is_remove(self) -> bool {
        matches!(self, Self::Remove)
    }

    /// Map a raw `notify` event kind into the handler vocabulary.
    ///
    /// Renames surface as `Modify(Name(..))` in notify; any other
    /// modification is a write. Access and catch-all kinds carry no useful
    /// signal for a build pipeline and are dropped (`None`).
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename),
            EventKind::Modify(_) => Some(Self::Write),
            EventKind::Remove(_) => Some(Self::Remove),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }
}

impl fmt::Display for FsEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A consumer of file events for a declared set of extensions.
///
/// Handlers are registered in order; for a single file event they are
/// invoked strictly sequentially in registration order.
pub trait FileEventHandler: Send + Sync {
    /// Entry-point source file relative to the application root,
    /// e.g. `"app/server/main.go"`. Used only for ownership queries on
    /// source-language files.
    fn main_input_file_relative_path(&self) -> String;

    /// Extensions this handler wants, with leading dot (e.g. `".css"`).
    /// An empty list is permitted; such a handler never receives file events.
    fn supported_extensions(&self) -> Vec<String>;

    /// Ignore tokens merged into the global ignore set at registration time.
    fn unobserved_files(&self) -> Vec<String>;

    /// File-event sink. `name` is the base name, `extension` the dotted
    /// suffix (may be empty), `path` the absolute path.
    fn on_file_event(
        &self,
        name: &str,
        extension: &str,
        path: &Path,
        kind: FsEventKind,
    ) -> Result<()>;
}

/// Optional observer for directory-level events (architecture detection).
pub trait FolderEventObserver: Send + Sync {
    fn on_folder_event(&self, name: &str, path: &Path, kind: FsEventKind) -> Result<()>;
}

/// Answers "does this source file belong to the build rooted at the given
/// entry point?". External collaborator; the watcher only consults it.
pub trait DependencyAnalyzer: Send + Sync {
    fn file_belongs_to(
        &self,
        entry_point: &str,
        path: &Path,
        kind: FsEventKind,
    ) -> Result<bool>;
}

/// Nullary browser-reload callback.
pub type ReloadFn = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Source of ignore tokens from the embedding application.
pub type UnobservedFilesFn = Arc<dyn Fn() -> Vec<String> + Send + Sync>;
