//! # Engine configuration.
//!
//! Provides [`Config`] — tuning knobs for the keeper, monitor, and
//! reconciler.
//!
//! ## Defaults
//! | Field              | Default | Meaning                                  |
//! |--------------------|---------|------------------------------------------|
//! | `monitor_interval` | 2s      | period of the background connectivity poll |
//! | `bus_capacity`     | 1024    | event bus ring size                      |
//! | `retry`            | see [`RetryPolicy`] | connect-sequence retry policy |
//!
//! Accessors clamp raw field values to safe minimums so that a zeroed or
//! hand-edited config cannot produce a busy-loop poll or a zero-capacity bus.

use std::time::Duration;

use crate::policies::RetryPolicy;

/// Engine configuration.
///
/// Construct with [`Config::default`] and adjust fields, or build one from
/// your own settings layer. Values are validated through the clamping
/// accessors at the point of use, never at construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Background poll period for the connection monitor.
    ///
    /// Clamped to a minimum of 1ms by [`Config::monitor_interval`].
    pub monitor_interval: Duration,

    /// Capacity of the broadcast event bus.
    ///
    /// Clamped to a minimum of 1 by [`Config::bus_capacity`]. Slow readers
    /// lag and lose the oldest events rather than blocking publishers.
    pub bus_capacity: usize,

    /// Retry policy for the connect sequence.
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor_interval: Duration::from_secs(2),
            bus_capacity: 1024,
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    /// Monitor poll period, clamped to ≥ 1ms.
    #[must_use]
    pub fn monitor_interval(&self) -> Duration {
        self.monitor_interval.max(Duration::from_millis(1))
    }

    /// Event bus capacity, clamped to ≥ 1.
    #[must_use]
    pub fn bus_capacity(&self) -> usize {
        self.bus_capacity.max(1)
    }
}
