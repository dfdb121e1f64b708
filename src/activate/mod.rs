//! # Device activation strategies.
//!
//! Activation is the side-effecting half of reconciliation: best-effort
//! actions intended to cause the external device to connect. Mechanisms are
//! interchangeable and unreliable, so they are modeled as a polymorphic
//! strategy set tried in priority order:
//!
//! 1. [`ChannelActivator`] - direct vendor reconnect command (fast, may fail
//!    silently if unsupported)
//! 2. [`TopologyActivator`] - walk the device topology, reconnect through a
//!    connected peer
//! 3. [`SurfaceActivator`] - script-drive the OS settings surface (slowest,
//!    raciest, most decision-point-heavy)
//!
//! ## Rules
//! - A strategy's failure is **"no effect"**, never an error: control falls
//!   through to the next strategy, or back to the retry loop.
//! - Each strategy isolates its side effects per attempt; the surface
//!   strategy cleans up its artifacts on every exit path.
//! - The OS-concrete mechanisms stay behind capability traits
//!   ([`ControlChannel`], [`Topology`], [`SettingsSurface`]); this crate
//!   ships the decision logic, not the bindings.

mod activator;
mod chain;
mod channel;
mod surface;
mod topology;

pub use activator::{Activate, Activation};
pub use chain::ActivatorChain;
pub use channel::{ChannelActivator, ControlChannel};
pub use surface::{LabelMatcher, SettingsSurface, SurfaceActivator};
pub use topology::{Connector, Topology, TopologyActivator};
