//! Retry and backoff policies.
//!
//! This module groups the knobs that control **how hard** the reconciler
//! tries and **how long** it waits between consumed attempts.
//!
//! ## Contents
//! - [`RetryPolicy`] attempt budget, verification polling and stability hold
//! - [`BackoffPolicy`] how inter-attempt delays evolve (first / factor / max)
//! - [`JitterPolicy`]  optional randomization of those delays
//!
//! ## Quick wiring
//! ```text
//! RetryPolicy { max_attempts, wait_budget, poll_interval, stability_hold, backoff }
//!      └─► reconcile::Reconciler uses:
//!           - max_attempts to bound the activation loop
//!           - wait_budget / poll_interval to verify after activation
//!           - stability_hold to reject transient positives
//!           - backoff.next(attempt) to delay the next attempt
//! ```
//!
//! ## Defaults
//! Mirror the known-good values for the target hardware: 3 attempts, 10s
//! wait budget, 1s polling, 4s stability hold, constant 2s backoff.

mod backoff;
mod retry;

pub use backoff::{BackoffPolicy, JitterPolicy};
pub use retry::RetryPolicy;
