//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the state cell, monitor and
//! reconciler.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `StateCell` (state flips), `Monitor` (start/stop),
//!   `Reconciler` (attempt lifecycle), `SubscriberSet` workers
//!   (overflow/panic).
//! - **Consumers**: the `Keeper` listener, which fans events out to the
//!   `SubscriberSet`.
//!
//! The presentation layer never touches the bus directly; it implements
//! [`Subscribe`](crate::Subscribe) and marshals onto its own execution
//! context from there.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
