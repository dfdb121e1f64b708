//! # Connection reconciliation.
//!
//! The core of the engine: compare desired state (connected) against
//! observed state and take bounded corrective action.
//!
//! - [`ConnectOutcome`] - terminal result of one connect sequence
//! - [`Reconciler`] - the bounded-retry connect state machine

mod outcome;
mod reconciler;

pub use outcome::ConnectOutcome;
pub use reconciler::Reconciler;
