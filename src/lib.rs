//! # relink
//!
//! **Relink** keeps an unreliable external Bluetooth audio device connected.
//!
//! The device can only be reached through indirect, fallible side-channels:
//! audio-endpoint enumeration for *observing* it and a handful of racy
//! activation mechanisms for *connecting* it. Relink layers a reconciliation
//! engine on top: determine believed state, drive a bounded-retry connect
//! sequence with stability verification, and publish state transitions to
//! observers — without blocking the caller and without leaking OS handles.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐                  ┌─────────────────────────────┐
//!     │ Presentation │ ── connect() ──► │  Keeper (facade)            │
//!     │  (tray/UI,   │ ◄─ StateChanged ─│  - in-flight connect guard  │
//!     │   external)  │                  │  - Bus → SubscriberSet wire │
//!     └──────────────┘                  └──────┬───────────────┬──────┘
//!                                              ▼               ▼
//!                                   ┌──────────────┐   ┌──────────────┐
//!                                   │  Reconciler  │   │   Monitor    │
//!                                   │ (retry loop, │   │ (periodic    │
//!                                   │  hold check) │   │  poll task)  │
//!                                   └──┬───────┬───┘   └──────┬───────┘
//!                                      │       │              │
//!                             activate │       │ observe      │ observe
//!                                      ▼       ▼              ▼
//!                          ┌──────────────┐  ┌───────────────────────────┐
//!                          │ActivatorChain│  │ Probe (EndpointProbe)     │
//!                          │ channel ─►   │  │  EndpointSource capability│
//!                          │ topology ─►  │  └───────────────────────────┘
//!                          │ surface      │
//!                          └──────────────┘
//!
//! Shared state:
//!   StateCell (single update site) ── flip ──► Bus ──► SubscriberSet
//!                                                      ┌────┼────┐
//!                                                      ▼    ▼    ▼
//!                                                    sub1 sub2 subN
//! ```
//!
//! ## Connect sequence
//! ```text
//! connect():
//!   ├─► probe ── connected? ──► AlreadyConnected
//!   ├─► state = Connecting
//!   └─► for attempt in 1..=max_attempts {
//!         ├─► activate()            (failures are "no effect", never fatal)
//!         │     └─ target missing ──► DeviceNotFound
//!         ├─► poll at poll_interval for up to wait_budget
//!         │     └─ first positive ──► state = Connected (observers see it)
//!         ├─► stability hold: keep polling for stability_hold
//!         │     ├─ drop observed ──► StabilityLost, state = Disconnected,
//!         │     │                    backoff, next attempt
//!         │     └─ hold clean    ──► Success
//!         └─► budget exhausted   ──► backoff, next attempt
//!       }
//!       all attempts consumed ──► ConnectionFailed
//!
//! A panic escaping the guards above is caught and returned as Fault —
//! a result value, never a crash.
//! ```
//!
//! ## Features
//! | Area            | Description                                          | Key types / traits                               |
//! |-----------------|------------------------------------------------------|--------------------------------------------------|
//! | **Probing**     | Side-effect-free device observation.                 | [`Probe`], [`EndpointProbe`], [`EndpointSource`] |
//! | **Activation**  | Side-effecting connect strategies, tried in order.   | [`Activate`], [`ActivatorChain`]                 |
//! | **Monitoring**  | Periodic background polling with flip notifications. | [`Monitor`], [`StateCell`]                       |
//! | **Reconciling** | Bounded-retry connect with stability verification.   | [`Reconciler`], [`ConnectOutcome`]               |
//! | **Policies**    | Retry budgets and backoff between attempts.          | [`RetryPolicy`], [`BackoffPolicy`]               |
//! | **Observers**   | Event fan-out with isolation per subscriber.         | [`Subscribe`], [`SubscriberSet`], [`Bus`]        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.

mod activate;
mod config;
mod device;
mod error;
mod events;
mod keeper;
mod monitor;
mod policies;
mod reconcile;
mod startup;
mod subscribers;

// ---- Public re-exports ----

pub use activate::{
    Activate, Activation, ActivatorChain, ChannelActivator, Connector, ControlChannel,
    LabelMatcher, SettingsSurface, SurfaceActivator, Topology, TopologyActivator,
};
pub use config::Config;
pub use device::{AudioEndpoint, EndpointProbe, EndpointSource, EndpointState, Probe, TargetDevice};
pub use error::{ActivateError, ConnectInFlight, ProbeError};
pub use events::{Bus, Event, EventKind};
pub use keeper::{Keeper, KeeperBuilder};
pub use monitor::{ConnectionState, Monitor, StateCell};
pub use policies::{BackoffPolicy, JitterPolicy, RetryPolicy};
pub use reconcile::{ConnectOutcome, Reconciler};
pub use startup::{AutoStart, FileAutoStart};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
