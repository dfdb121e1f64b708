//! # Periodic connection monitor.
//!
//! [`Monitor`] owns the background poll task: probe the device at a fixed
//! interval and feed each observation into the shared [`StateCell`]. The
//! cell raises a `StateChanged` notification exactly when the believed
//! connected value flips — a failed or unchanged poll leaves state alone and
//! the loop keeps running.
//!
//! ## Rules
//! - The first poll runs **immediately** on `start()` (no initial delay).
//! - A failed poll leaves state unchanged and the loop keeps running: a
//!   panic escaping the probe is caught, not allowed to kill the poll task.
//! - `start()` is idempotent while a poll task is running.
//! - `stop()` is synchronous, idempotent, a no-op before `start()`, and safe
//!   to call from a subscriber callback triggered by the monitor itself: it
//!   cancels and aborts without ever joining the poll task.
//! - Dropping the monitor releases the poll task the same way.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::device::Probe;
use crate::events::{Bus, Event, EventKind};
use crate::monitor::{ConnectionState, StateCell};

/// Handle pair for the running poll task; released as a unit on stop.
struct PollTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Periodic background prober feeding the shared [`StateCell`].
pub struct Monitor {
    cell: Arc<StateCell>,
    probe: Arc<dyn Probe>,
    interval: Duration,
    bus: Bus,
    poll: Mutex<Option<PollTask>>,
}

impl Monitor {
    /// Creates a monitor polling `probe` every `interval`.
    ///
    /// The interval is clamped to a 1ms minimum so a zero config value cannot
    /// turn the poll loop into a busy spin.
    pub fn new(cell: Arc<StateCell>, probe: Arc<dyn Probe>, interval: Duration, bus: Bus) -> Self {
        Self {
            cell,
            probe,
            interval: interval.max(Duration::from_millis(1)),
            bus,
            poll: Mutex::new(None),
        }
    }

    /// Returns the current believed state.
    pub fn state(&self) -> ConnectionState {
        self.cell.load()
    }

    /// Starts periodic polling. No-op if already running.
    ///
    /// The spawned task probes immediately, then waits `interval` between
    /// polls, exiting promptly when the token is cancelled.
    pub fn start(&self) {
        let mut guard = self.poll.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            return;
        }

        let token = CancellationToken::new();
        let task_token = token.clone();
        let cell = Arc::clone(&self.cell);
        let probe = Arc::clone(&self.probe);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            loop {
                // A panicking probe must not kill the poll loop; the failed
                // poll leaves state unchanged.
                match AssertUnwindSafe(probe.observe()).catch_unwind().await {
                    Ok(connected) => cell.observe(connected),
                    Err(_) => warn!("probe panicked during periodic poll"),
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = task_token.cancelled() => break,
                }
            }
        });

        *guard = Some(PollTask { token, handle });
        self.bus.publish(Event::new(EventKind::MonitorStarted));
    }

    /// Stops periodic polling and releases the timer task.
    ///
    /// Cancels the token and aborts the task without awaiting it, so calling
    /// this from within an event handler raised by the monitor cannot
    /// deadlock. Idempotent; a no-op before `start()`.
    pub fn stop(&self) {
        let task = self
            .poll
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            task.token.cancel();
            task.handle.abort();
            self.bus.publish(Event::new(EventKind::MonitorStopped));
        }
    }

    /// True while a poll task is running.
    pub fn is_running(&self) -> bool {
        self.poll
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}
