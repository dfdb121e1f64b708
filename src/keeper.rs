//! # Keeper: the engine facade.
//!
//! [`Keeper`] owns the wiring between the pieces: it builds the shared
//! [`StateCell`], the [`Monitor`], the [`Reconciler`] and the
//! [`SubscriberSet`], and runs the listener task that forwards bus events to
//! subscribers.
//!
//! ## Architecture
//! ```text
//! Keeper
//!   ├── StateCell ─────────────┐
//!   ├── Monitor ── observe ──► │ (shared believed state)
//!   ├── Reconciler ── store ──►┘
//!   │       ▲
//!   │   connect() — guarded by an in-flight flag
//!   │
//!   └── listener task: Bus ──► SubscriberSet ──► user subscribers
//! ```
//!
//! ## Rules
//! - One connect sequence per keeper: a second `connect()` while one is in
//!   flight returns [`ConnectInFlight`] instead of queuing.
//! - The in-flight flag is released even when the connect future is dropped
//!   mid-sequence (RAII guard).
//! - `shutdown()` stops the monitor, closes the listener and drains the
//!   subscriber queues before returning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::activate::Activate;
use crate::config::Config;
use crate::device::Probe;
use crate::error::ConnectInFlight;
use crate::events::{Bus, Event};
use crate::monitor::{ConnectionState, Monitor, StateCell};
use crate::reconcile::{ConnectOutcome, Reconciler};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Resets the in-flight flag when the connect future completes or is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Builder for [`Keeper`].
///
/// Probe and activator are mandatory; subscribers are optional.
pub struct KeeperBuilder {
    config: Config,
    probe: Arc<dyn Probe>,
    activator: Arc<dyn Activate>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl KeeperBuilder {
    /// Adds one event subscriber.
    #[must_use]
    pub fn with_subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(sub);
        self
    }

    /// Adds multiple event subscribers.
    #[must_use]
    pub fn with_subscribers(mut self, subs: impl IntoIterator<Item = Arc<dyn Subscribe>>) -> Self {
        self.subscribers.extend(subs);
        self
    }

    /// Wires the components together and spawns the listener task.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn build(self) -> Keeper {
        let bus = Bus::new(self.config.bus_capacity());
        let cell = Arc::new(StateCell::new(bus.clone()));

        let monitor = Monitor::new(
            Arc::clone(&cell),
            Arc::clone(&self.probe),
            self.config.monitor_interval(),
            bus.clone(),
        );
        let reconciler = Reconciler::new(
            Arc::clone(&cell),
            self.probe,
            self.activator,
            self.config.retry,
            bus.clone(),
        );

        let set = SubscriberSet::new(self.subscribers, bus.clone());
        let token = CancellationToken::new();
        let listener = spawn_listener(bus.clone(), set, token.clone());

        Keeper {
            cell,
            monitor,
            reconciler,
            bus,
            in_flight: AtomicBool::new(false),
            listener_token: token,
            listener,
        }
    }
}

/// Forwards bus events to the subscriber set until cancelled, then drains.
fn spawn_listener(bus: Bus, set: SubscriberSet, token: CancellationToken) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
            }
        }
        // Cancellation raced the bus: forward what was already published.
        loop {
            match rx.try_recv() {
                Ok(ev) => set.emit(&ev),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        set.shutdown().await;
    })
}

/// Facade over the connection engine.
///
/// ## Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use relink::{Activate, Config, Keeper, Probe};
///
/// # async fn demo(probe: Arc<dyn Probe>, activator: Arc<dyn Activate>) {
/// let keeper = Keeper::builder(Config::default(), probe, activator).build();
///
/// keeper.start_monitoring();
/// let outcome = keeper.connect().await;
/// println!("connect: {outcome:?}");
///
/// keeper.shutdown().await;
/// # }
/// ```
pub struct Keeper {
    cell: Arc<StateCell>,
    monitor: Monitor,
    reconciler: Reconciler,
    bus: Bus,
    in_flight: AtomicBool,
    listener_token: CancellationToken,
    listener: JoinHandle<()>,
}

impl Keeper {
    /// Starts building a keeper over the given probe and activator.
    #[must_use]
    pub fn builder(
        config: Config,
        probe: Arc<dyn Probe>,
        activator: Arc<dyn Activate>,
    ) -> KeeperBuilder {
        KeeperBuilder {
            config,
            probe,
            activator,
            subscribers: Vec::new(),
        }
    }

    /// Returns the current believed connection state.
    pub fn state(&self) -> ConnectionState {
        self.cell.load()
    }

    /// Subscribes directly to the raw event stream.
    ///
    /// Most consumers should implement [`Subscribe`] instead; this exists for
    /// ad-hoc inspection and tests.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs one connect sequence to a terminal outcome.
    ///
    /// Returns [`ConnectInFlight`] without touching the device if another
    /// sequence is already running on this keeper.
    pub async fn connect(&self) -> Result<ConnectOutcome, ConnectInFlight> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ConnectInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);
        Ok(self.reconciler.connect().await)
    }

    /// Starts the background connection monitor. Idempotent.
    pub fn start_monitoring(&self) {
        self.monitor.start();
    }

    /// Stops the background connection monitor. Idempotent; safe from within
    /// a subscriber callback.
    pub fn stop_monitoring(&self) {
        self.monitor.stop();
    }

    /// True while the background monitor is polling.
    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_running()
    }

    /// Shuts the engine down: stops the monitor, closes the listener and
    /// drains subscriber queues.
    ///
    /// A connect sequence still in flight is not awaited; drop or await it
    /// before shutting down if its outcome matters.
    pub async fn shutdown(self) {
        self.monitor.stop();
        self.listener_token.cancel();
        let _ = self.listener.await;
    }
}
