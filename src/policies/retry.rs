//! # Retry policy for the connect sequence.
//!
//! [`RetryPolicy`] bundles the per-`connect()` budgets: how many activation
//! attempts to make, how long to poll for a first positive probe after each
//! activation, how often to poll, and how long a positive result must hold
//! before it is trusted.
//!
//! ## Invariants
//! - `max_attempts ≥ 1`
//! - `poll_interval > 0`
//! - `stability_hold > 0` (a single probe success is never trusted)
//!
//! All fields are public for flexibility; the accessors clamp to the
//! invariants so a zero in a hand-built policy cannot produce an unbounded
//! or spinning loop. The reconciler only reads through the accessors.

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// Budgets for one bounded-retry connect sequence. Immutable in use.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Maximum number of activation attempts (min 1, clamped).
    pub max_attempts: u32,
    /// How long to wait for a first positive probe after each activation.
    pub wait_budget: Duration,
    /// Interval between verification probes (min 1ms, clamped).
    pub poll_interval: Duration,
    /// How long a positive probe must persist before being accepted
    /// (clamped to at least one poll interval).
    pub stability_hold: Duration,
    /// Delay between consumed attempts.
    pub backoff: BackoffPolicy,
}

impl Default for RetryPolicy {
    /// Returns the budgets observed to work for the target hardware:
    /// - `max_attempts = 3`
    /// - `wait_budget = 10s`
    /// - `poll_interval = 1s`
    /// - `stability_hold = 4s`
    /// - constant 2s backoff between attempts
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait_budget: Duration::from_secs(10),
            poll_interval: Duration::from_secs(1),
            stability_hold: Duration::from_secs(4),
            backoff: BackoffPolicy::default(),
        }
    }
}

impl RetryPolicy {
    /// Attempt budget, clamped to a minimum of 1.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Verification poll interval, clamped to a minimum of 1ms.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.poll_interval.max(Duration::from_millis(1))
    }

    /// Stability hold, clamped to at least one poll interval.
    #[inline]
    pub fn hold(&self) -> Duration {
        self.stability_hold.max(self.interval())
    }
}
