#![allow(dead_code)]

//! Fake collaborators for integration tests.
//!
//! Each fake implements the corresponding production trait and records what
//! it saw into shared state, so tests assert on observed behavior instead of
//! internals.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;

use watchreload::{
    DependencyAnalyzer, FileEventHandler, FolderEventObserver, FsEventKind, ReloadFn,
};

/// One file event as a handler saw it.
#[derive(Debug, Clone)]
pub struct RecordedFileEvent {
    pub name: String,
    pub extension: String,
    pub path: PathBuf,
    pub kind: FsEventKind,
}

/// A configurable `FileEventHandler` that records every invocation.
pub struct RecordingHandler {
    extensions: Vec<String>,
    main_input: String,
    unobserved: Vec<String>,
    fail: bool,
    events: Mutex<Vec<RecordedFileEvent>>,
}

impl RecordingHandler {
    pub fn new(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            main_input: "src/main.go".to_string(),
            unobserved: Vec::new(),
            fail: false,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Make `on_file_event` return an error (still recording the call).
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_main_input(mut self, entry_point: &str) -> Self {
        self.main_input = entry_point.to_string();
        self
    }

    pub fn with_unobserved(mut self, tokens: &[&str]) -> Self {
        self.unobserved = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn events(&self) -> Vec<RecordedFileEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl FileEventHandler for RecordingHandler {
    fn main_input_file_relative_path(&self) -> String {
        self.main_input.clone()
    }

    fn supported_extensions(&self) -> Vec<String> {
        self.extensions.clone()
    }

    fn unobserved_files(&self) -> Vec<String> {
        self.unobserved.clone()
    }

    fn on_file_event(
        &self,
        name: &str,
        extension: &str,
        path: &Path,
        kind: FsEventKind,
    ) -> Result<()> {
        self.events.lock().unwrap().push(RecordedFileEvent {
            name: name.to_string(),
            extension: extension.to_string(),
            path: path.to_path_buf(),
            kind,
        });

        if self.fail {
            Err(anyhow!("compilation failed: syntax error"))
        } else {
            Ok(())
        }
    }
}

/// One folder event as the observer saw it.
#[derive(Debug, Clone)]
pub struct RecordedFolderEvent {
    pub name: String,
    pub path: PathBuf,
    pub kind: FsEventKind,
}

/// A `FolderEventObserver` that records every notification.
#[derive(Default)]
pub struct RecordingFolderObserver {
    fail: bool,
    events: Mutex<Vec<RecordedFolderEvent>>,
}

impl RecordingFolderObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<RecordedFolderEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Notifications for a given folder base name.
    pub fn events_for(&self, name: &str) -> Vec<RecordedFolderEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.name == name)
            .collect()
    }
}

impl FolderEventObserver for RecordingFolderObserver {
    fn on_folder_event(&self, name: &str, path: &Path, kind: FsEventKind) -> Result<()> {
        self.events.lock().unwrap().push(RecordedFolderEvent {
            name: name.to_string(),
            path: path.to_path_buf(),
            kind,
        });

        if self.fail {
            Err(anyhow!("folder observer rejected the event"))
        } else {
            Ok(())
        }
    }
}

enum AnalyzerVerdict {
    Accept,
    Reject,
    Fail,
    /// Accept only for this entry point.
    Owning(String),
}

/// A canned `DependencyAnalyzer`.
pub struct StaticAnalyzer {
    verdict: AnalyzerVerdict,
    calls: AtomicUsize,
}

impl StaticAnalyzer {
    /// Every file belongs to every handler.
    pub fn accepting() -> Self {
        Self {
            verdict: AnalyzerVerdict::Accept,
            calls: AtomicUsize::new(0),
        }
    }

    /// No file belongs to any handler.
    pub fn rejecting() -> Self {
        Self {
            verdict: AnalyzerVerdict::Reject,
            calls: AtomicUsize::new(0),
        }
    }

    /// The analyzer itself errors.
    pub fn failing() -> Self {
        Self {
            verdict: AnalyzerVerdict::Fail,
            calls: AtomicUsize::new(0),
        }
    }

    /// Files belong only to the handler with this entry point.
    pub fn owning(entry_point: &str) -> Self {
        Self {
            verdict: AnalyzerVerdict::Owning(entry_point.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DependencyAnalyzer for StaticAnalyzer {
    fn file_belongs_to(&self, entry_point: &str, _path: &Path, _kind: FsEventKind) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.verdict {
            AnalyzerVerdict::Accept => Ok(true),
            AnalyzerVerdict::Reject => Ok(false),
            AnalyzerVerdict::Fail => Err(anyhow!("module graph unavailable")),
            AnalyzerVerdict::Owning(owner) => Ok(entry_point == owner),
        }
    }
}

/// Counts reload invocations and signals each one through a channel.
pub struct ReloadProbe {
    count: Arc<AtomicUsize>,
    rx: mpsc::UnboundedReceiver<()>,
}

impl ReloadProbe {
    /// Returns the probe and the callback to hand to the configuration.
    pub fn new() -> (Self, ReloadFn) {
        let count = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::unbounded_channel();

        let cb_count = Arc::clone(&count);
        let reload: ReloadFn = Arc::new(move || {
            cb_count.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(());
            Ok(())
        });

        (Self { count, rx }, reload)
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Wait up to `timeout` for the next reload. Returns whether one fired.
    pub async fn wait(&mut self, timeout: Duration) -> bool {
        matches!(
            tokio::time::timeout(timeout, self.rx.recv()).await,
            Ok(Some(()))
        )
    }
}
