#![allow(dead_code)]

//! Test plumbing for driving the watcher.
//!
//! Two ways to exercise the event loop live here: [`LoopHarness`] spawns a
//! loop with no OS watcher behind it and lets the test inject exactly the
//! events it wants, while [`eventually`] supports the real-watcher scenarios
//! where delivery timing is up to the OS. [`init_tracing`] wires the crate's
//! `tracing` diagnostics into the test harness.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing_subscriber::{fmt, EnvFilter};

use watchreload::watch::{EventLoop, WatchShared};
use watchreload::{ReloadFn, ReloadScheduler, WatchConfig};

/// Install a fmt subscriber for the test run.
///
/// Watcher tests assert on observed dispatches and reloads; the `tracing`
/// output is diagnostic only, and `with_test_writer` keeps it attached to
/// the failing test instead of interleaved across the suite. Level comes
/// from `RUST_LOG`, defaulting to `info`. Calling this from every test is
/// fine: later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(true)
        .try_init();
}

/// Poll `condition` every 50 ms until it holds or `timeout` elapses.
///
/// Scenarios that go through a real OS watcher cannot know when an event
/// will be delivered; they wait for the observable effect (a recorded
/// dispatch, a subscription) instead of sleeping a fixed amount.
pub async fn eventually(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(Duration::from_millis(50)).await;
    }
}

/// A directly-driven event loop for dispatch tests.
///
/// Mirrors the production wiring in `DevWatcher::start` but hands the event
/// sender to the test, so scenarios inject exactly the events they want
/// instead of racing the real filesystem.
pub struct LoopHarness {
    pub shared: Arc<WatchShared>,
    events: mpsc::UnboundedSender<notify::Result<Event>>,
    exit: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl LoopHarness {
    /// Spawn an event loop over the configuration, with no OS watcher
    /// behind it. Must be called within a tokio runtime.
    pub fn spawn(config: &WatchConfig, reload: Option<ReloadFn>) -> Self {
        let shared = WatchShared::from_config(config, None);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (exit_tx, exit_rx) = mpsc::channel(1);

        let scheduler = ReloadScheduler::new(reload, config.reload_delay);
        let event_loop = EventLoop::new(
            Arc::clone(&shared),
            event_rx,
            exit_rx,
            config.debounce_window,
            scheduler,
        );
        let join = tokio::spawn(event_loop.run());

        Self {
            shared,
            events: event_tx,
            exit: exit_tx,
            join,
        }
    }

    pub fn send_create(&self, path: &Path) {
        self.send(EventKind::Create(CreateKind::File), path);
    }

    pub fn send_write(&self, path: &Path) {
        self.send(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            path,
        );
    }

    pub fn send_remove(&self, path: &Path) {
        self.send(EventKind::Remove(RemoveKind::File), path);
    }

    fn send(&self, kind: EventKind, path: &Path) {
        self.events
            .send(Ok(Event::new(kind).add_path(path.to_path_buf())))
            .expect("event loop is gone");
    }

    /// Give the loop time to drain everything sent so far, then stop it.
    pub async fn finish(self) {
        settle().await;
        let _ = self.exit.send(()).await;
        let _ = self.join.await;
    }
}

/// Long enough for injected events and the 50 ms reload delay to play out.
pub async fn settle() {
    sleep(Duration::from_millis(250)).await;
}
