//! # Device observation.
//!
//! This module provides the probe side of the engine:
//! - [`TargetDevice`] - immutable descriptor of the device to match
//! - [`Probe`] - trait answering "is the target currently active?"
//! - [`EndpointProbe`] - probe over an audio-endpoint enumeration capability
//! - [`EndpointSource`], [`AudioEndpoint`], [`EndpointState`] - that capability
//!
//! Probing is a pure query: no side effects, no held handles, and internal
//! failures collapse to a `false` observation.

mod endpoints;
mod probe;
mod target;

pub use endpoints::{AudioEndpoint, EndpointProbe, EndpointSource, EndpointState};
pub use probe::Probe;
pub use target::TargetDevice;
