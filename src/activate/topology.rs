//! # Topology-walk activation.
//!
//! Second strategy in the chain: enumerate the target device's
//! sub-connectors, find ones that are not yet connected, and issue the
//! reconnect command against the connected peer when one exists. Useful when
//! the device is half-attached — some profiles up, the audio sink down.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::activate::{Activate, Activation};
use crate::device::TargetDevice;
use crate::error::ActivateError;

/// One sub-connector in the device topology graph.
#[derive(Debug, Clone)]
pub struct Connector {
    /// Backend-specific connector identifier.
    pub id: String,
    /// Whether this connector is currently attached.
    pub connected: bool,
    /// Identifier of the connected peer connector, when the backend exposes
    /// one to command through.
    pub peer: Option<String>,
}

/// # Capability: walk the device topology graph.
#[async_trait]
pub trait Topology: Send + Sync + 'static {
    /// Lists `target`'s sub-connectors; empty when the device is unknown.
    async fn connectors(&self, target: &TargetDevice) -> Result<Vec<Connector>, ActivateError>;

    /// Issues the reconnect command through the given peer connector.
    async fn reconnect_peer(&self, peer: &str) -> Result<bool, ActivateError>;
}

/// Strategy: reconnect unattached connectors through their connected peer.
pub struct TopologyActivator<T> {
    topology: T,
    target: TargetDevice,
}

impl<T: Topology> TopologyActivator<T> {
    /// Creates the strategy over a topology capability.
    pub fn new(topology: T, target: TargetDevice) -> Self {
        Self { topology, target }
    }
}

#[async_trait]
impl<T: Topology> Activate for TopologyActivator<T> {
    fn name(&self) -> &'static str {
        "topology"
    }

    async fn activate(&self) -> Activation {
        let connectors = match self.topology.connectors(&self.target).await {
            Ok(c) => c,
            Err(err) => {
                warn!(error = %err, label = err.as_label(), "topology walk failed");
                return Activation::NoEffect;
            }
        };

        if connectors.is_empty() {
            return Activation::TargetMissing;
        }

        let mut triggered = false;
        for connector in connectors.iter().filter(|c| !c.connected) {
            let Some(peer) = connector.peer.as_deref() else {
                continue;
            };
            match self.topology.reconnect_peer(peer).await {
                Ok(true) => {
                    debug!(connector = %connector.id, peer, "reconnect issued via peer");
                    triggered = true;
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(error = %err, connector = %connector.id, "peer reconnect failed");
                }
            }
        }

        if triggered {
            Activation::Triggered
        } else {
            Activation::NoEffect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted {
        connectors: Result<Vec<Connector>, ()>,
        accepted_peers: Vec<&'static str>,
        issued: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Topology for Scripted {
        async fn connectors(&self, _t: &TargetDevice) -> Result<Vec<Connector>, ActivateError> {
            self.connectors.clone().map_err(|_| ActivateError::Topology {
                reason: "graph unavailable".into(),
            })
        }

        async fn reconnect_peer(&self, peer: &str) -> Result<bool, ActivateError> {
            self.issued.lock().unwrap().push(peer.to_string());
            Ok(self.accepted_peers.contains(&peer))
        }
    }

    fn connector(id: &str, connected: bool, peer: Option<&str>) -> Connector {
        Connector {
            id: id.into(),
            connected,
            peer: peer.map(Into::into),
        }
    }

    #[tokio::test]
    async fn test_unattached_connector_with_peer_triggers() {
        let topo = Scripted {
            connectors: Ok(vec![
                connector("a2dp", false, Some("peer-a2dp")),
                connector("hfp", true, Some("peer-hfp")),
            ]),
            accepted_peers: vec!["peer-a2dp"],
            issued: Mutex::new(Vec::new()),
        };
        let strategy = TopologyActivator::new(topo, TargetDevice::new("WH-1000XM5"));
        assert_eq!(strategy.activate().await, Activation::Triggered);
    }

    #[tokio::test]
    async fn test_attached_connectors_are_skipped() {
        let topo = Scripted {
            connectors: Ok(vec![connector("a2dp", true, Some("peer-a2dp"))]),
            accepted_peers: vec!["peer-a2dp"],
            issued: Mutex::new(Vec::new()),
        };
        let strategy = TopologyActivator::new(topo, TargetDevice::new("WH-1000XM5"));
        assert_eq!(strategy.activate().await, Activation::NoEffect);
    }

    #[tokio::test]
    async fn test_empty_graph_is_target_missing() {
        let topo = Scripted {
            connectors: Ok(vec![]),
            accepted_peers: vec![],
            issued: Mutex::new(Vec::new()),
        };
        let strategy = TopologyActivator::new(topo, TargetDevice::new("WH-1000XM5"));
        assert_eq!(strategy.activate().await, Activation::TargetMissing);
    }

    #[tokio::test]
    async fn test_walk_error_collapses_to_no_effect() {
        let topo = Scripted {
            connectors: Err(()),
            accepted_peers: vec![],
            issued: Mutex::new(Vec::new()),
        };
        let strategy = TopologyActivator::new(topo, TargetDevice::new("WH-1000XM5"));
        assert_eq!(strategy.activate().await, Activation::NoEffect);
    }
}
