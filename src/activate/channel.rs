//! # Direct control-channel activation.
//!
//! The fastest strategy: issue a vendor reconnect command straight at the
//! device's control channel. Near-instant when supported, and known to fail
//! silently when not — which is why it sits first in the chain and why a
//! `Triggered` outcome still gets probe-verified.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::activate::{Activate, Activation};
use crate::device::TargetDevice;
use crate::error::ActivateError;

/// # Capability: send a vendor property command to the device control channel.
///
/// Implementations wrap the driver-level plumbing. `Ok(true)` means the
/// command was accepted, `Ok(false)` means the channel exists but the
/// command was not accepted (unsupported, device busy), and `Err` covers
/// channel-level failures.
#[async_trait]
pub trait ControlChannel: Send + Sync + 'static {
    /// True iff a control channel for `target` exists at all.
    async fn is_present(&self, target: &TargetDevice) -> Result<bool, ActivateError>;

    /// Issues the reconnect command against `target`'s control channel.
    async fn send_reconnect(&self, target: &TargetDevice) -> Result<bool, ActivateError>;
}

/// Strategy: direct vendor reconnect command.
pub struct ChannelActivator<C> {
    channel: C,
    target: TargetDevice,
}

impl<C: ControlChannel> ChannelActivator<C> {
    /// Creates the strategy over a control-channel capability.
    pub fn new(channel: C, target: TargetDevice) -> Self {
        Self { channel, target }
    }
}

#[async_trait]
impl<C: ControlChannel> Activate for ChannelActivator<C> {
    fn name(&self) -> &'static str {
        "channel"
    }

    async fn activate(&self) -> Activation {
        match self.channel.is_present(&self.target).await {
            Ok(false) => return Activation::TargetMissing,
            Ok(true) => {}
            Err(err) => {
                warn!(error = %err, "control channel presence check failed");
                return Activation::NoEffect;
            }
        }

        match self.channel.send_reconnect(&self.target).await {
            Ok(true) => Activation::Triggered,
            Ok(false) => {
                debug!(target = %self.target, "reconnect command not accepted");
                Activation::NoEffect
            }
            Err(err) => {
                warn!(error = %err, label = err.as_label(), "reconnect command failed");
                Activation::NoEffect
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted {
        present: Result<bool, ()>,
        reconnect: Mutex<Vec<Result<bool, ()>>>,
    }

    #[async_trait]
    impl ControlChannel for Scripted {
        async fn is_present(&self, _target: &TargetDevice) -> Result<bool, ActivateError> {
            self.present.map_err(|_| ActivateError::Channel {
                reason: "radio off".into(),
            })
        }

        async fn send_reconnect(&self, _target: &TargetDevice) -> Result<bool, ActivateError> {
            self.reconnect
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Ok(false))
                .map_err(|_| ActivateError::Channel {
                    reason: "command dropped".into(),
                })
        }
    }

    fn target() -> TargetDevice {
        TargetDevice::new("WH-1000XM5")
    }

    #[tokio::test]
    async fn test_accepted_command_triggers() {
        let strategy = ChannelActivator::new(
            Scripted {
                present: Ok(true),
                reconnect: Mutex::new(vec![Ok(true)]),
            },
            target(),
        );
        assert_eq!(strategy.activate().await, Activation::Triggered);
    }

    #[tokio::test]
    async fn test_absent_device_is_target_missing() {
        let strategy = ChannelActivator::new(
            Scripted {
                present: Ok(false),
                reconnect: Mutex::new(vec![]),
            },
            target(),
        );
        assert_eq!(strategy.activate().await, Activation::TargetMissing);
    }

    #[tokio::test]
    async fn test_channel_errors_collapse_to_no_effect() {
        let strategy = ChannelActivator::new(
            Scripted {
                present: Ok(true),
                reconnect: Mutex::new(vec![Err(())]),
            },
            target(),
        );
        assert_eq!(strategy.activate().await, Activation::NoEffect);

        let strategy = ChannelActivator::new(
            Scripted {
                present: Err(()),
                reconnect: Mutex::new(vec![]),
            },
            target(),
        );
        assert_eq!(strategy.activate().await, Activation::NoEffect);
    }
}
