//! # Composite activator: strategies tried in priority order.
//!
//! [`ActivatorChain`] walks its strategies until one reports
//! [`Activation::Triggered`] or all are exhausted.
//!
//! ## Rules
//! - First `Triggered` wins; later strategies are not invoked.
//! - `NoEffect` falls through to the next strategy.
//! - `TargetMissing` from **every** strategy means the device is not present
//!   anywhere the mechanisms can see; the chain reports `TargetMissing` so
//!   the reconciler can stop retrying a device that is not there.
//! - An empty chain reports `NoEffect`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::activate::{Activate, Activation};

/// Tries a prioritized list of activation strategies until one triggers.
pub struct ActivatorChain {
    strategies: Vec<Arc<dyn Activate>>,
}

impl ActivatorChain {
    /// Creates a chain over `strategies`, tried front to back.
    pub fn new(strategies: Vec<Arc<dyn Activate>>) -> Self {
        Self { strategies }
    }
}

#[async_trait]
impl Activate for ActivatorChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn activate(&self) -> Activation {
        let mut all_missing = !self.strategies.is_empty();

        for strategy in &self.strategies {
            let outcome = strategy.activate().await;
            debug!(strategy = strategy.name(), ?outcome, "activation strategy finished");
            match outcome {
                Activation::Triggered => return Activation::Triggered,
                Activation::TargetMissing => {}
                Activation::NoEffect => all_missing = false,
            }
        }

        if all_missing {
            Activation::TargetMissing
        } else {
            Activation::NoEffect
        }
    }
}
