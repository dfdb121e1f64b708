//! # Probe trait.
//!
//! [`Probe`] answers "is the target device currently active?". It is the
//! single observation seam shared by the monitor's periodic poll and the
//! reconciler's verification polls.

use async_trait::async_trait;

/// # Side-effect-free observation of current device state.
///
/// ### Contract
/// - **Never fails to the caller**: internal failures (enumeration errors,
///   missing driver) collapse to `false`.
/// - **No side effects**: observing must not change device or OS state.
/// - **No held resources**: every per-call resource is acquired and released
///   within one `observe()` call, even on partial failure.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use relink::Probe;
///
/// struct AlwaysOff;
///
/// #[async_trait]
/// impl Probe for AlwaysOff {
///     async fn observe(&self) -> bool {
///         false
///     }
/// }
/// ```
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// Returns `true` iff the target device is currently active.
    async fn observe(&self) -> bool;
}
