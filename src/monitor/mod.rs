//! # Believed connection state and periodic monitoring.
//!
//! - [`ConnectionState`], [`StateCell`] - the single authoritative state
//!   instance and its atomic update site
//! - [`Monitor`] - the periodic background poll task
//!
//! The cell is shared by reference between the monitor and the reconciler;
//! both feed observations of the same external reality into it and
//! last-write-wins is acceptable. Notifications are decided inside the
//! cell's swap, so observers never see a duplicate flip.

mod monitor;
mod state;

pub use monitor::Monitor;
pub use state::{ConnectionState, StateCell};
