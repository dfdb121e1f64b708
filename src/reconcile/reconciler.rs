//! # Reconciler: the bounded-retry connect state machine.
//!
//! One `connect()` call walks this machine:
//!
//! ```text
//! Idle ─► Probing ─► AlreadyConnected
//!             │
//!             ▼
//!         Activating ─► Verifying ─► Stable ────────► Success
//!             ▲             │  │
//!             │             │  └─ Unstable (drop during hold)
//!             │             └──── Timeout (budget exhausted)
//!             │                       │
//!             └───── backoff ◄────────┘   (next attempt, if any left)
//!                                         └─► attempts exhausted ─► ConnectionFailed
//! ```
//!
//! ## Rules
//! - The first positive probe flips the shared state to `Connected`
//!   **immediately**, before the stability hold: observers see progress even
//!   if the hold later rejects the connection as transient.
//! - The hold exists because the device is known to report "connected"
//!   transiently before dropping; only a sustained positive window counts.
//! - A failed activation never aborts the loop; it is an attempt like any
//!   other, because the device may connect on its own while we poll.
//! - The whole sequence runs under `catch_unwind`: a panic escaping the
//!   guards becomes [`ConnectOutcome::Fault`], a value — never a crash.
//! - Attempts are sequential within one call and run to completion; there is
//!   no mid-attempt cancellation, which is acceptable because the loop is
//!   bounded (`attempts × (wait_budget + hold)` plus backoff).
//!
//! ## Re-entrancy
//! The reconciler is **not** internally re-entrant. Only one `connect()`
//! may be in flight per device; callers guard double-invocation (the
//! [`Keeper`](crate::Keeper) does this with an in-flight flag).

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;
use tracing::warn;

use crate::activate::{Activate, Activation};
use crate::device::Probe;
use crate::events::{Bus, Event, EventKind};
use crate::monitor::{ConnectionState, StateCell};
use crate::policies::RetryPolicy;
use crate::reconcile::ConnectOutcome;

/// Drives bounded-attempt connect sequences against the shared state cell.
pub struct Reconciler {
    cell: Arc<StateCell>,
    probe: Arc<dyn Probe>,
    activator: Arc<dyn Activate>,
    policy: RetryPolicy,
    bus: Bus,
}

impl Reconciler {
    /// Creates a reconciler over the shared cell, probe and activator.
    pub fn new(
        cell: Arc<StateCell>,
        probe: Arc<dyn Probe>,
        activator: Arc<dyn Activate>,
        policy: RetryPolicy,
        bus: Bus,
    ) -> Self {
        Self {
            cell,
            probe,
            activator,
            policy,
            bus,
        }
    }

    /// Returns the retry policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs one bounded-retry connect sequence to a terminal outcome.
    ///
    /// Never panics through to the caller: a fault escaping the internal
    /// guards resets the state to `Disconnected` and is returned as
    /// [`ConnectOutcome::Fault`].
    pub async fn connect(&self) -> ConnectOutcome {
        self.bus.publish(Event::new(EventKind::ConnectRequested));

        let outcome = match AssertUnwindSafe(self.run()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                let info = panic_info(panic.as_ref());
                warn!(panic = %info, "connect sequence faulted");
                self.cell.store(ConnectionState::Disconnected);
                ConnectOutcome::Fault
            }
        };

        self.bus.publish(
            Event::new(EventKind::ConnectFinished).with_reason(outcome.as_label()),
        );
        outcome
    }

    /// The state machine proper. Faults are handled by `connect()`.
    async fn run(&self) -> ConnectOutcome {
        if self.probe.observe().await {
            self.cell.store(ConnectionState::Connected);
            return ConnectOutcome::AlreadyConnected;
        }

        self.cell.store(ConnectionState::Connecting);

        let attempts = self.policy.attempts();
        for attempt in 1..=attempts {
            self.bus
                .publish(Event::new(EventKind::AttemptStarting).with_attempt(attempt));

            match self.activator.activate().await {
                Activation::Triggered => {}
                Activation::NoEffect => {
                    // Keep polling anyway: the device may come up on its own.
                    self.bus
                        .publish(Event::new(EventKind::ActivationFailed).with_attempt(attempt));
                }
                Activation::TargetMissing => {
                    self.cell.store(ConnectionState::Disconnected);
                    return ConnectOutcome::DeviceNotFound;
                }
            }

            if self.verify(attempt).await {
                return ConnectOutcome::Success;
            }

            if attempt < attempts {
                let delay = self.policy.backoff.next(attempt - 1);
                self.bus.publish(
                    Event::new(EventKind::BackoffScheduled)
                        .with_attempt(attempt)
                        .with_delay(delay),
                );
                time::sleep(delay).await;
            }
        }

        self.cell.store(ConnectionState::Disconnected);
        ConnectOutcome::ConnectionFailed
    }

    /// Polls for a first positive probe within the wait budget, then runs
    /// the stability hold. Returns `true` only for a held, stable positive.
    async fn verify(&self, attempt: u32) -> bool {
        let interval = self.policy.interval();
        let mut waited = Duration::ZERO;

        while waited < self.policy.wait_budget {
            time::sleep(interval).await;
            waited += interval;

            if self.probe.observe().await {
                // Flip now so observers see progress; the hold may still
                // reject this as transient.
                self.cell.store(ConnectionState::Connected);
                return self.hold(attempt).await;
            }
        }
        false
    }

    /// Keeps polling for the stability window. Any negative probe means the
    /// positive was transient: the attempt is consumed, not the sequence.
    async fn hold(&self, attempt: u32) -> bool {
        let interval = self.policy.interval();
        let mut held = Duration::ZERO;

        while held < self.policy.hold() {
            time::sleep(interval).await;
            held += interval;

            if !self.probe.observe().await {
                self.bus
                    .publish(Event::new(EventKind::StabilityLost).with_attempt(attempt));
                self.cell.store(ConnectionState::Disconnected);
                return false;
            }
        }
        true
    }
}

fn panic_info(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Probe returning a scripted sequence, then repeating the last value.
    struct ScriptedProbe {
        script: Mutex<Vec<bool>>,
        calls: AtomicUsize,
    }

    impl ScriptedProbe {
        fn arc(mut script: Vec<bool>) -> Arc<Self> {
            script.reverse();
            Arc::new(Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Probe for ScriptedProbe {
        async fn observe(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop().unwrap()
            } else {
                *script.last().unwrap_or(&false)
            }
        }
    }

    struct FixedActivator {
        outcome: Activation,
        calls: AtomicUsize,
    }

    impl FixedActivator {
        fn arc(outcome: Activation) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Activate for FixedActivator {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn activate(&self) -> Activation {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    struct PanickingActivator;

    #[async_trait]
    impl Activate for PanickingActivator {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn activate(&self) -> Activation {
            panic!("automation runtime went away");
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::default() // 3 attempts, 10s budget, 1s poll, 4s hold, 2s backoff
    }

    fn rig(
        script: Vec<bool>,
        activator: Arc<dyn Activate>,
    ) -> (Reconciler, Arc<ScriptedProbe>, Bus) {
        let bus = Bus::new(256);
        let cell = Arc::new(StateCell::new(bus.clone()));
        let probe = ScriptedProbe::arc(script);
        let rec = Reconciler::new(cell, probe.clone(), activator, policy(), bus.clone());
        (rec, probe, bus)
    }

    fn state_flips(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<ConnectionState> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::StateChanged {
                out.push(ev.state.unwrap());
            }
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_connected_skips_activation() {
        let activator = FixedActivator::arc(Activation::Triggered);
        let (rec, _probe, _bus) = rig(vec![true], activator.clone());

        assert_eq!(rec.connect().await, ConnectOutcome::AlreadyConnected);
        assert_eq!(activator.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_never_positive_exhausts_all_attempts() {
        let activator = FixedActivator::arc(Activation::Triggered);
        let (rec, _probe, bus) = rig(vec![false], activator.clone());
        let mut rx = bus.subscribe();

        assert_eq!(rec.connect().await, ConnectOutcome::ConnectionFailed);
        assert_eq!(activator.calls(), 3);
        // State stayed effectively disconnected throughout: no flips at all.
        assert!(state_flips(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stable_connection_on_second_attempt() {
        // Initial probe false; attempt 1 sees 10 negatives (budget burned);
        // attempt 2 sees 4 negatives, a positive, then a clean 4-probe hold.
        let mut script = vec![false];
        script.extend([false; 10]);
        script.extend([false, false, false, false, true]);
        script.extend([true; 4]);

        let activator = FixedActivator::arc(Activation::Triggered);
        let (rec, probe, bus) = rig(script, activator.clone());
        let mut rx = bus.subscribe();

        assert_eq!(rec.connect().await, ConnectOutcome::Success);
        assert_eq!(activator.calls(), 2);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1 + 10 + 5 + 4);
        // Exactly one Disconnected→Connected transition.
        assert_eq!(state_flips(&mut rx), vec![ConnectionState::Connected]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_positive_consumes_attempt() {
        // Every attempt: first verification probe positive, first hold probe
        // negative. All three attempts consumed, bounded oscillation.
        let script = vec![false, true, false, true, false, true, false];
        let activator = FixedActivator::arc(Activation::Triggered);
        let (rec, _probe, bus) = rig(script, activator.clone());
        let mut rx = bus.subscribe();

        assert_eq!(rec.connect().await, ConnectOutcome::ConnectionFailed);
        assert_eq!(activator.calls(), 3);

        let mut flips = Vec::new();
        let mut stability_losses = 0;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::StateChanged => flips.push(ev.state.unwrap()),
                EventKind::StabilityLost => stability_losses += 1,
                _ => {}
            }
        }

        // Observers see Connected/Disconnected oscillation, one pair per
        // attempt, never more than max_attempts cycles.
        assert_eq!(
            flips,
            vec![
                ConnectionState::Connected,
                ConnectionState::Disconnected,
                ConnectionState::Connected,
                ConnectionState::Disconnected,
                ConnectionState::Connected,
                ConnectionState::Disconnected,
            ]
        );
        assert_eq!(stability_losses, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_target_missing_is_device_not_found() {
        let activator = FixedActivator::arc(Activation::TargetMissing);
        let (rec, _probe, _bus) = rig(vec![false], activator.clone());

        assert_eq!(rec.connect().await, ConnectOutcome::DeviceNotFound);
        // No point burning the remaining attempts on an absent device.
        assert_eq!(activator.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_effect_activation_still_verifies() {
        // Activation reports no effect but the device connects by itself.
        let mut script = vec![false, true];
        script.extend([true; 4]);
        let activator = FixedActivator::arc(Activation::NoEffect);
        let (rec, _probe, bus) = rig(script, activator.clone());
        let mut rx = bus.subscribe();

        assert_eq!(rec.connect().await, ConnectOutcome::Success);
        assert_eq!(activator.calls(), 1);

        let mut saw_activation_failed = false;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::ActivationFailed {
                saw_activation_failed = true;
            }
        }
        assert!(saw_activation_failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_becomes_fault_not_crash() {
        let (rec, _probe, bus) = rig(vec![false], Arc::new(PanickingActivator));
        let mut rx = bus.subscribe();

        assert_eq!(rec.connect().await, ConnectOutcome::Fault);

        // The cell was reset; the sequence reported its terminal outcome.
        let mut finished = None;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::ConnectFinished {
                finished = ev.reason.clone();
            }
        }
        assert_eq!(finished.as_deref(), Some("fault"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_scheduled_between_attempts() {
        let activator = FixedActivator::arc(Activation::Triggered);
        let (rec, _probe, bus) = rig(vec![false], activator);
        let mut rx = bus.subscribe();

        assert_eq!(rec.connect().await, ConnectOutcome::ConnectionFailed);

        let delays: Vec<_> = {
            let mut v = Vec::new();
            while let Ok(ev) = rx.try_recv() {
                if ev.kind == EventKind::BackoffScheduled {
                    v.push(ev.delay_ms.unwrap());
                }
            }
            v
        };
        // Two backoffs for three attempts, constant 2s each.
        assert_eq!(delays, vec![2_000, 2_000]);
    }
}
