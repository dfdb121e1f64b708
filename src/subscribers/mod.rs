//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait — the extension point the
//! presentation layer (tray icon, notifications) plugs into — and the
//! [`SubscriberSet`] fan-out that delivers events to each subscriber on its
//! own worker with a bounded queue.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   StateCell/Monitor/Reconciler ── publish ──► Bus ──► keeper listener
//!                                                            │
//!                                                      SubscriberSet
//!                                                  ┌─────────┼─────────┐
//!                                                  ▼         ▼         ▼
//!                                               tray UI   metrics   custom
//! ```
//!
//! A subscriber that needs a particular execution context (a UI dispatcher,
//! say) marshals from its worker onto that context itself; the engine never
//! blocks on a subscriber.

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
