//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [state] connected
//! [connect-requested]
//! [attempt] n=1
//! [activation-failed] attempt=1
//! [stability-lost] attempt=2
//! [backoff] after_attempt=2 delay_ms=2000
//! [connect-finished] outcome=success
//! [monitor-started]
//! [monitor-stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::monitor::ConnectionState;
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Intended for development and
/// demonstration — implement a custom [`Subscribe`] for structured logging
/// or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::StateChanged => {
                let state = match e.state {
                    Some(ConnectionState::Connected) => "connected",
                    Some(ConnectionState::Connecting) => "connecting",
                    _ => "disconnected",
                };
                println!("[state] {state}");
            }
            EventKind::ConnectRequested => println!("[connect-requested]"),
            EventKind::AttemptStarting => {
                println!("[attempt] n={:?}", e.attempt);
            }
            EventKind::ActivationFailed => {
                println!("[activation-failed] attempt={:?}", e.attempt);
            }
            EventKind::StabilityLost => {
                println!("[stability-lost] attempt={:?}", e.attempt);
            }
            EventKind::BackoffScheduled => {
                println!(
                    "[backoff] after_attempt={:?} delay_ms={:?}",
                    e.attempt, e.delay_ms
                );
            }
            EventKind::ConnectFinished => {
                println!("[connect-finished] outcome={:?}", e.reason);
            }
            EventKind::MonitorStarted => println!("[monitor-started]"),
            EventKind::MonitorStopped => println!("[monitor-stopped]"),
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] {:?}", e.reason);
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] {:?}", e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
