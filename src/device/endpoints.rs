//! # Audio-endpoint probe.
//!
//! [`EndpointProbe`] implements [`Probe`] on top of an [`EndpointSource`]
//! capability: "enumerate render-capable audio endpoints, return
//! (id, friendly name, state) per entry". The probe filters for active
//! endpoints whose friendly name matches the [`TargetDevice`].
//!
//! ## Rules
//! - The source is invoked **fresh on every observation**; no enumeration
//!   handle survives across calls (nothing to leak if the process exits
//!   mid-poll).
//! - Enumeration errors collapse to a `false` observation and are logged at
//!   `warn` — they never reach the reconciler.
//! - Endpoints that are not [`EndpointState::Active`] are ignored even when
//!   their name matches; a suspended endpoint is not a connection.

use async_trait::async_trait;
use tracing::warn;

use crate::device::{Probe, TargetDevice};
use crate::error::ProbeError;

/// Activity state of an enumerated audio endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// The endpoint is present and rendering-capable right now.
    Active,
    /// The endpoint exists but is disabled, unplugged or otherwise inactive.
    Inactive,
}

/// One enumerated render-capable audio endpoint.
#[derive(Debug, Clone)]
pub struct AudioEndpoint {
    /// Backend-specific endpoint identifier.
    pub id: String,
    /// Human-readable name shown to the user.
    pub friendly_name: String,
    /// Current activity state.
    pub state: EndpointState,
}

/// # Capability: enumerate render-capable audio endpoints.
///
/// Implementations wrap the OS audio subsystem. They must acquire and
/// release every per-call resource (enumerator, device handles, property
/// stores) within one `endpoints()` call, releasing them on all exit paths.
#[async_trait]
pub trait EndpointSource: Send + Sync + 'static {
    /// Enumerates render-capable endpoints, including inactive ones.
    async fn endpoints(&self) -> Result<Vec<AudioEndpoint>, ProbeError>;
}

/// [`Probe`] over an [`EndpointSource`].
///
/// The device is considered connected iff the source reports an **active**
/// endpoint whose friendly name contains the target substring,
/// case-insensitively.
pub struct EndpointProbe<S> {
    source: S,
    target: TargetDevice,
}

impl<S: EndpointSource> EndpointProbe<S> {
    /// Creates a probe matching `target` against endpoints from `source`.
    pub fn new(source: S, target: TargetDevice) -> Self {
        Self { source, target }
    }

    /// Returns the target descriptor this probe matches against.
    pub fn target(&self) -> &TargetDevice {
        &self.target
    }
}

#[async_trait]
impl<S: EndpointSource> Probe for EndpointProbe<S> {
    async fn observe(&self) -> bool {
        match self.source.endpoints().await {
            Ok(endpoints) => endpoints
                .iter()
                .filter(|e| e.state == EndpointState::Active)
                .any(|e| self.target.matches(&e.friendly_name)),
            Err(err) => {
                warn!(error = %err, label = err.as_label(), "endpoint probe collapsed to false");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Result<Vec<AudioEndpoint>, ProbeError>);

    #[async_trait]
    impl EndpointSource for FixedSource {
        async fn endpoints(&self) -> Result<Vec<AudioEndpoint>, ProbeError> {
            match &self.0 {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(ProbeError::Enumeration {
                    reason: e.as_message(),
                }),
            }
        }
    }

    fn endpoint(name: &str, state: EndpointState) -> AudioEndpoint {
        AudioEndpoint {
            id: format!("id-{name}"),
            friendly_name: name.to_string(),
            state,
        }
    }

    #[tokio::test]
    async fn test_active_matching_endpoint_observes_true() {
        let probe = EndpointProbe::new(
            FixedSource(Ok(vec![
                endpoint("Speakers (Realtek Audio)", EndpointState::Active),
                endpoint("Headphones (WH-1000XM5 Stereo)", EndpointState::Active),
            ])),
            TargetDevice::new("wh-1000xm5"),
        );
        assert!(probe.observe().await);
    }

    #[tokio::test]
    async fn test_inactive_matching_endpoint_observes_false() {
        let probe = EndpointProbe::new(
            FixedSource(Ok(vec![endpoint(
                "Headphones (WH-1000XM5 Stereo)",
                EndpointState::Inactive,
            )])),
            TargetDevice::new("WH-1000XM5"),
        );
        assert!(!probe.observe().await);
    }

    #[tokio::test]
    async fn test_enumeration_error_collapses_to_false() {
        let probe = EndpointProbe::new(
            FixedSource(Err(ProbeError::Unavailable {
                reason: "no audio service".into(),
            })),
            TargetDevice::new("WH-1000XM5"),
        );
        assert!(!probe.observe().await);
    }

    #[tokio::test]
    async fn test_no_endpoints_observes_false() {
        let probe = EndpointProbe::new(FixedSource(Ok(vec![])), TargetDevice::new("WH-1000XM5"));
        assert!(!probe.observe().await);
    }
}
