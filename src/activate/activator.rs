//! # Activation trait and outcome.
//!
//! [`Activate`] is implemented by every connection-triggering strategy and
//! by the composite [`ActivatorChain`](crate::ActivatorChain). Activation is
//! slow (seconds) and inherently unreliable; its outcome is a hint, not a
//! guarantee — only probing decides whether the device actually connected.

use async_trait::async_trait;

/// What an activation attempt reported about itself.
///
/// This classifies the *attempt*, not the connection: a `Triggered` outcome
/// still requires probe verification, and a `NoEffect` outcome does not
/// preclude the device connecting on its own a moment later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The mechanism believes it issued a connect action.
    Triggered,
    /// The mechanism ran but had no observable effect (including internal
    /// failures, which are deliberately not distinguished).
    NoEffect,
    /// The target device was not found where this mechanism looks for it.
    TargetMissing,
}

/// # Side-effecting action intended to cause the device to connect.
///
/// ### Contract
/// - May take multiple seconds and may retry internally.
/// - **Never fails to the caller**: internal errors collapse to
///   [`Activation::NoEffect`] (logged by the implementation).
/// - Side effects are isolated per call; any artifacts created (helper
///   processes, temp scripts, open surfaces) are cleaned up on every exit
///   path, including failure.
#[async_trait]
pub trait Activate: Send + Sync + 'static {
    /// Returns a short stable strategy name for logs and events.
    fn name(&self) -> &'static str;

    /// Attempts to bring the target device active.
    async fn activate(&self) -> Activation;
}
