//! # Runtime events emitted by the state cell, monitor and reconciler.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **State events**: the believed connection state flipped.
//! - **Connect lifecycle**: progress of one `connect()` sequence (attempts,
//!   activation failures, stability loss, backoff, terminal outcome).
//! - **Housekeeping**: monitor start/stop, subscriber overflow/panic.
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! the new state, attempt numbers and backoff delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. State flips are decided inside a single atomic update site
//! ([`StateCell`](crate::StateCell)), so two consecutive `StateChanged`
//! events never carry the same connected value.
//!
//! ## Example
//! ```rust
//! use relink::{ConnectionState, Event, EventKind};
//!
//! let ev = Event::new(EventKind::StateChanged).with_state(ConnectionState::Connected);
//!
//! assert_eq!(ev.kind, EventKind::StateChanged);
//! assert_eq!(ev.state, Some(ConnectionState::Connected));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::monitor::ConnectionState;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === State events ===
    /// The believed connected/disconnected value flipped.
    ///
    /// Sets:
    /// - `state`: the new state (`Connected` or `Disconnected`)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    StateChanged,

    // === Connect lifecycle events ===
    /// A connect sequence was requested.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ConnectRequested,

    /// An activation attempt is starting.
    ///
    /// Sets:
    /// - `attempt`: attempt number (1-based)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AttemptStarting,

    /// Every activation strategy reported "no effect" for this attempt.
    ///
    /// Sets:
    /// - `attempt`: attempt number
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ActivationFailed,

    /// A positive probe turned out to be transient: the device dropped
    /// before the stability hold elapsed. The attempt is consumed.
    ///
    /// Sets:
    /// - `attempt`: attempt number
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    StabilityLost,

    /// Next attempt scheduled after a delay.
    ///
    /// Sets:
    /// - `attempt`: the attempt that just failed
    /// - `delay_ms`: delay before the next attempt (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    BackoffScheduled,

    /// A connect sequence finished with a terminal outcome.
    ///
    /// Sets:
    /// - `reason`: outcome label (e.g. "success", "connection_failed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ConnectFinished,

    // === Housekeeping events ===
    /// Periodic monitoring started.
    MonitorStarted,

    /// Periodic monitoring stopped and its timer released.
    MonitorStopped,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: panic info/message
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// New believed state (only for `StateChanged`).
    pub state: Option<ConnectionState>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Backoff delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (outcome labels, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            state: None,
            attempt: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches the new believed state.
    #[inline]
    pub fn with_state(mut self, state: ConnectionState) -> Self {
        self.state = Some(state);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} panic={info}"))
    }

    /// True for `StateChanged` events carrying `Connected`.
    #[inline]
    pub fn is_connected_flip(&self) -> bool {
        self.kind == EventKind::StateChanged && self.state == Some(ConnectionState::Connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::StateChanged);
        let b = Event::new(EventKind::StateChanged);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_is_clamped_to_u32_millis() {
        let ev = Event::new(EventKind::BackoffScheduled)
            .with_delay(Duration::from_secs(u64::MAX / 1_000_000));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }
}
