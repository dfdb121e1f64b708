//! Error types used at the relink device boundaries.
//!
//! This module defines the error enums raised by capability implementations:
//!
//! - [`ProbeError`] — failures while enumerating audio endpoints.
//! - [`ActivateError`] — failures inside an activation mechanism.
//!
//! Neither type propagates into the reconciler: the probe collapses its
//! errors to "not connected" and activation strategies collapse theirs to
//! "no effect". The enums exist so capability implementations have a typed
//! seam, and so subscribers/logs get stable labels via `as_label()`.
//!
//! [`ConnectInFlight`] is different: it is the rejection returned by
//! [`Keeper::connect`](crate::Keeper::connect) when a connect sequence is
//! already running.

use thiserror::Error;

/// # Errors produced while observing the device.
///
/// Raised by [`EndpointSource`](crate::EndpointSource) implementations.
/// [`EndpointProbe`](crate::EndpointProbe) collapses every variant to a
/// `false` observation; nothing here reaches the reconciler.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The endpoint enumeration backend could not be reached or initialized.
    #[error("endpoint enumeration unavailable: {reason}")]
    Unavailable {
        /// Backend-specific detail.
        reason: String,
    },

    /// Enumeration started but failed partway through.
    #[error("endpoint enumeration failed: {reason}")]
    Enumeration {
        /// Backend-specific detail.
        reason: String,
    },
}

impl ProbeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProbeError::Unavailable { .. } => "probe_unavailable",
            ProbeError::Enumeration { .. } => "probe_enumeration",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProbeError::Unavailable { reason } => format!("unavailable: {reason}"),
            ProbeError::Enumeration { reason } => format!("enumeration: {reason}"),
        }
    }
}

/// # Errors produced inside an activation mechanism.
///
/// Raised by the [`ControlChannel`](crate::ControlChannel),
/// [`Topology`](crate::Topology) and [`SettingsSurface`](crate::SettingsSurface)
/// capabilities. Each activation strategy collapses these to
/// [`Activation::NoEffect`](crate::Activation::NoEffect) — a failed strategy
/// falls through to the next one, it never aborts the attempt loop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ActivateError {
    /// The device control channel rejected or dropped the command.
    #[error("control channel error: {reason}")]
    Channel {
        /// Driver-specific detail.
        reason: String,
    },

    /// Walking the device topology graph failed.
    #[error("topology walk error: {reason}")]
    Topology {
        /// Driver-specific detail.
        reason: String,
    },

    /// Driving the external settings surface failed (window/element not
    /// found, script error, helper process failure).
    #[error("settings surface error: {reason}")]
    Surface {
        /// Automation-specific detail.
        reason: String,
    },
}

impl ActivateError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActivateError::Channel { .. } => "activate_channel",
            ActivateError::Topology { .. } => "activate_topology",
            ActivateError::Surface { .. } => "activate_surface",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActivateError::Channel { reason } => format!("channel: {reason}"),
            ActivateError::Topology { reason } => format!("topology: {reason}"),
            ActivateError::Surface { reason } => format!("surface: {reason}"),
        }
    }
}

/// Rejection returned when a connect sequence is already in flight.
///
/// Only one connect sequence may run at a time; the
/// [`Keeper`](crate::Keeper) guards against double-invocation and returns
/// this instead of starting a second sequence.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("a connect sequence is already in flight")]
pub struct ConnectInFlight;
