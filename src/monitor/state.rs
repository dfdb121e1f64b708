//! # Believed connection state.
//!
//! [`StateCell`] owns the single authoritative [`ConnectionState`] instance.
//! Every mutation goes through one atomic swap, and the decision whether to
//! publish a [`EventKind::StateChanged`] notification is taken from that same
//! swap — there is no observable gap between updating the state and deciding
//! to notify, so stale or duplicate notifications cannot be emitted.
//!
//! ## Rules
//! - A notification fires **iff the boolean connected value flips**, not on
//!   every store. `Disconnected → Connecting` is silent; `Connecting →
//!   Connected` notifies.
//! - The monitor's periodic poll and an in-flight connect sequence may race
//!   on the cell; both observe the same external reality, so last-write-wins.
//! - A negative *observation* does not clobber the `Connecting` marker; only
//!   the reconciler moves the state out of `Connecting`.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::events::{Bus, Event, EventKind};

/// Believed state of the connection to the target device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// The device is not active.
    Disconnected,
    /// A connect sequence is in flight; the device is not active yet.
    Connecting,
    /// The device is active.
    Connected,
}

impl ConnectionState {
    /// True only for [`ConnectionState::Connected`].
    #[inline]
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            2 => ConnectionState::Connected,
            1 => ConnectionState::Connecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Single update site for the believed connection state.
///
/// Shared (via `Arc`) between the [`Monitor`](crate::Monitor) and the
/// [`Reconciler`](crate::Reconciler). Publishes `StateChanged` on the bus
/// exactly when the connected value flips.
#[derive(Debug)]
pub struct StateCell {
    state: AtomicU8,
    bus: Bus,
}

impl StateCell {
    /// Creates a cell starting at [`ConnectionState::Disconnected`].
    pub fn new(bus: Bus) -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Disconnected.as_u8()),
            bus,
        }
    }

    /// Returns the current believed state.
    pub fn load(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// True iff the current state is `Connected`.
    pub fn is_connected(&self) -> bool {
        self.load().is_connected()
    }

    /// Stores `next`, publishing `StateChanged` iff the connected value flips.
    ///
    /// The flip decision comes from the swap itself, so concurrent stores
    /// cannot emit two notifications for the same value.
    pub fn store(&self, next: ConnectionState) {
        let prev = ConnectionState::from_u8(self.state.swap(next.as_u8(), Ordering::SeqCst));
        if prev.is_connected() != next.is_connected() {
            self.bus
                .publish(Event::new(EventKind::StateChanged).with_state(next));
        }
    }

    /// Feeds a raw boolean observation into the cell.
    ///
    /// `true` stores `Connected`. `false` stores `Disconnected`, except while
    /// the cell reads `Connecting`: the in-flight connect sequence owns that
    /// transition, and a periodic poll observing "not yet connected" must not
    /// erase the marker.
    pub fn observe(&self, connected: bool) {
        if connected {
            self.store(ConnectionState::Connected);
        } else if self.load() != ConnectionState::Connecting {
            self.store(ConnectionState::Disconnected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    fn flips(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<ConnectionState> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::StateChanged {
                out.push(ev.state.expect("StateChanged carries a state"));
            }
        }
        out
    }

    #[tokio::test]
    async fn test_notification_fires_iff_connected_value_flips() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let cell = StateCell::new(bus);

        // Repeated identical observations: no duplicate notifications.
        cell.observe(false);
        cell.observe(false);
        cell.observe(true);
        cell.observe(true);
        cell.observe(false);

        assert_eq!(
            flips(&mut rx),
            vec![ConnectionState::Connected, ConnectionState::Disconnected]
        );
    }

    #[tokio::test]
    async fn test_connecting_transitions_are_silent() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let cell = StateCell::new(bus);

        cell.store(ConnectionState::Connecting);
        assert!(flips(&mut rx).is_empty());

        cell.store(ConnectionState::Connected);
        assert_eq!(flips(&mut rx), vec![ConnectionState::Connected]);

        // Connected → Connecting counts as a disconnect flip.
        cell.store(ConnectionState::Connecting);
        assert_eq!(flips(&mut rx), vec![ConnectionState::Connecting]);
    }

    #[tokio::test]
    async fn test_negative_observation_preserves_connecting_marker() {
        let bus = Bus::new(64);
        let cell = StateCell::new(bus);

        cell.store(ConnectionState::Connecting);
        cell.observe(false);
        assert_eq!(cell.load(), ConnectionState::Connecting);

        cell.observe(true);
        assert_eq!(cell.load(), ConnectionState::Connected);
    }
}
