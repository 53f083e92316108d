// src/reload.rs

//! Debounced, single-fire browser reload scheduling.
//!
//! A burst of successful dispatches collapses into exactly one reload: every
//! `schedule()` call resets a deadline, and a dedicated waiter task invokes
//! the callback once the deadline elapses without a newer `schedule()`.
//!
//! `stop()` terminates the waiter. If the deadline had already elapsed but
//! the tick was not yet consumed, one final reload is performed; a timer
//! stopped while still pending fires nothing.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::handler::ReloadFn;

enum ReloadCmd {
    Schedule,
    Stop,
}

/// Timer-debounced reload coordinator.
///
/// Constructed with `None` when the configuration carries no reload
/// callback; `schedule()` is then a no-op.
pub struct ReloadScheduler {
    tx: Option<mpsc::UnboundedSender<ReloadCmd>>,
    task: Option<JoinHandle<()>>,
}

impl ReloadScheduler {
    /// Spawn the waiter task. Must be called within a tokio runtime.
    pub fn new(reload: Option<ReloadFn>, delay: Duration) -> Self {
        match reload {
            None => Self {
                tx: None,
                task: None,
            },
            Some(reload) => {
                let (tx, rx) = mpsc::unbounded_channel();
                let task = tokio::spawn(run_waiter(rx, reload, delay));
                Self {
                    tx: Some(tx),
                    task: Some(task),
                }
            }
        }
    }

    /// Arm (or re-arm) the reload timer.
    ///
    /// The reload fires no earlier than the configured delay after the last
    /// `schedule()` call in a burst.
    pub fn schedule(&self) {
        if let Some(tx) = &self.tx {
            // Send failure means the waiter already exited; nothing to reload.
            let _ = tx.send(ReloadCmd::Schedule);
        }
    }

    /// Stop the coordinator and wait for the waiter task to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(ReloadCmd::Stop);
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

async fn run_waiter(mut rx: mpsc::UnboundedReceiver<ReloadCmd>, reload: ReloadFn, delay: Duration) {
    // None = idle, Some = armed with a deadline.
    let mut deadline: Option<Instant> = None;

    loop {
        match deadline {
            None => match rx.recv().await {
                Some(ReloadCmd::Schedule) => deadline = Some(Instant::now() + delay),
                Some(ReloadCmd::Stop) | None => return,
            },
            Some(at) => {
                tokio::select! {
                    cmd = rx.recv() => match cmd {
                        Some(ReloadCmd::Schedule) => deadline = Some(Instant::now() + delay),
                        Some(ReloadCmd::Stop) | None => {
                            // An elapsed-but-unconsumed tick still owes the
                            // caller its reload; an armed timer does not.
                            if Instant::now() >= at {
                                fire(&reload);
                            }
                            return;
                        }
                    },
                    _ = sleep_until(at) => {
                        fire(&reload);
                        deadline = None;
                    }
                }
            }
        }
    }
}

fn fire(reload: &ReloadFn) {
    debug!("triggering browser reload");
    if let Err(err) = reload() {
        warn!(error = %err, "browser reload failed");
    }
}
