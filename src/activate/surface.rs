//! # Settings-surface activation (scripted UI fallback).
//!
//! Last-resort strategy: open the OS device-management surface, locate the
//! UI element belonging to the target device, and invoke its "connect"
//! action. This depends on window enumeration and localized label text, so
//! it is the raciest mechanism in the chain — the policy is up to 3
//! independent scripted tries with a delay between them before giving up.
//!
//! ## Rules
//! - The surface is **closed on every exit path**, including failure; the
//!   capability implementation owns cleanup of its own artifacts (temp
//!   scripts, helper processes) per call.
//! - Connect-button labels vary by locale and OS revision. Matching is a
//!   configurable [`LabelMatcher`] (exact names plus prefixes), not a
//!   hard-coded literal; no assumption is made that any built-in locale
//!   list is complete.
//! - When **every** scripted try finds the surface but not the device entry,
//!   the strategy reports `TargetMissing`; script errors report `NoEffect`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::activate::{Activate, Activation};
use crate::device::TargetDevice;
use crate::error::ActivateError;

/// Configurable matcher for connect-action labels on the settings surface.
///
/// A label matches when it equals one of `exact` or starts with one of
/// `prefixes`, case-insensitively. Both lists are caller-extendable; the
/// defaults cover the locales this has been exercised against.
#[derive(Clone, Debug)]
pub struct LabelMatcher {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl Default for LabelMatcher {
    fn default() -> Self {
        Self {
            exact: vec!["connect".into()],
            prefixes: vec!["połącz".into(), "polacz".into(), "verbind".into()],
        }
    }
}

impl LabelMatcher {
    /// Creates a matcher from explicit label sets.
    pub fn new(exact: Vec<String>, prefixes: Vec<String>) -> Self {
        Self { exact, prefixes }
    }

    /// Returns a matcher with an additional exact label.
    pub fn with_exact(mut self, label: impl Into<String>) -> Self {
        self.exact.push(label.into());
        self
    }

    /// Returns a matcher with an additional label prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// True iff `label` names a connect action under this matcher.
    pub fn matches(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        self.exact.iter().any(|e| label == e.to_lowercase())
            || self
                .prefixes
                .iter()
                .any(|p| label.starts_with(&p.to_lowercase()))
    }
}

/// # Capability: open the OS settings surface and script-drive it.
///
/// Implementations own the automation plumbing (window lookup, element
/// walking, invoking patterns) **and the cleanup of every artifact they
/// create** — temp script files, spawned helper processes — on every exit
/// path of each call.
#[async_trait]
pub trait SettingsSurface: Send + Sync + 'static {
    /// Opens the device-management surface. Idempotent if already open.
    async fn open(&self) -> Result<(), ActivateError>;

    /// Locates `target`'s entry and invokes the connect action whose label
    /// satisfies `matcher`. `Ok(true)` means an action was invoked,
    /// `Ok(false)` means the device entry or action was not found.
    async fn invoke_connect(
        &self,
        target: &TargetDevice,
        matcher: &LabelMatcher,
    ) -> Result<bool, ActivateError>;

    /// Closes the surface and reaps anything it spawned. Must tolerate the
    /// surface already being gone.
    async fn close(&self);
}

/// Strategy: scripted automation of the OS settings surface.
pub struct SurfaceActivator<S> {
    surface: S,
    target: TargetDevice,
    matcher: LabelMatcher,
    /// Wait after opening the surface before the first scripted try.
    settle: Duration,
    /// Independent scripted tries per activation.
    tries: u32,
    /// Delay between scripted tries.
    retry_delay: Duration,
}

impl<S: SettingsSurface> SurfaceActivator<S> {
    /// Creates the strategy with the known-good pacing: 5s settle after
    /// opening, 3 scripted tries, 1s apart.
    pub fn new(surface: S, target: TargetDevice, matcher: LabelMatcher) -> Self {
        Self {
            surface,
            target,
            matcher,
            settle: Duration::from_secs(5),
            tries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }

    /// Overrides the pacing (settle delay, try count, inter-try delay).
    pub fn with_pacing(mut self, settle: Duration, tries: u32, retry_delay: Duration) -> Self {
        self.settle = settle;
        self.tries = tries.max(1);
        self.retry_delay = retry_delay;
        self
    }

    async fn drive(&self) -> Activation {
        tokio::time::sleep(self.settle).await;

        let tries = self.tries.max(1);
        let mut absent = 0;
        for t in 1..=tries {
            match self.surface.invoke_connect(&self.target, &self.matcher).await {
                Ok(true) => {
                    debug!(try_no = t, "connect action invoked on settings surface");
                    return Activation::Triggered;
                }
                Ok(false) => {
                    debug!(try_no = t, "target entry or connect action not found");
                    absent += 1;
                }
                Err(err) => {
                    warn!(error = %err, try_no = t, "scripted connect try failed");
                }
            }
            if t < tries {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        // Every try found the surface but not the device entry: the target
        // is missing where this mechanism looks. Script errors stay NoEffect.
        if absent == tries {
            Activation::TargetMissing
        } else {
            Activation::NoEffect
        }
    }
}

#[async_trait]
impl<S: SettingsSurface> Activate for SurfaceActivator<S> {
    fn name(&self) -> &'static str {
        "surface"
    }

    async fn activate(&self) -> Activation {
        if let Err(err) = self.surface.open().await {
            warn!(error = %err, label = err.as_label(), "could not open settings surface");
            return Activation::NoEffect;
        }

        // The surface must come down whatever drive() decided.
        let outcome = self.drive().await;
        self.surface.close().await;
        outcome
    }
}
