//! # Terminal outcome of a connect sequence.
//!
//! Produced once per [`Reconciler::connect`](crate::Reconciler::connect)
//! invocation; immutable; consumed by the caller to decide user feedback.
//! The engine itself takes no user-visible action on failure — presentation
//! is someone else's job.

/// Result of one bounded-retry connect sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A positive probe survived the full stability hold.
    Success,
    /// The device was already connected; no activation was attempted.
    AlreadyConnected,
    /// No activation mechanism could find the device at all.
    DeviceNotFound,
    /// Every attempt was consumed without a stable connection.
    ConnectionFailed,
    /// A fault escaped all internal guards. Returned as a value — never
    /// allowed to crash the host process.
    Fault,
}

impl ConnectOutcome {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConnectOutcome::Success => "success",
            ConnectOutcome::AlreadyConnected => "already_connected",
            ConnectOutcome::DeviceNotFound => "device_not_found",
            ConnectOutcome::ConnectionFailed => "connection_failed",
            ConnectOutcome::Fault => "fault",
        }
    }

    /// True when the sequence left the device connected.
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            ConnectOutcome::Success | ConnectOutcome::AlreadyConnected
        )
    }
}
