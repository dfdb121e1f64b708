//! # Target device descriptor.
//!
//! [`TargetDevice`] is an immutable value holding the display-name substring
//! used to recognize the device in probe results. Set at construction, never
//! mutated.

use std::fmt;
use std::sync::Arc;

/// Immutable descriptor of the device this engine reconciles.
///
/// Matching rule: a device matches iff its human-readable name **contains**
/// this substring, compared case-insensitively. A substring is used on
/// purpose: endpoint names wrap the product name in driver-specific noise
/// ("Headphones (WH-1000XM5 Stereo)").
///
/// ## Example
/// ```rust
/// use relink::TargetDevice;
///
/// let target = TargetDevice::new("WH-1000XM5");
/// assert!(target.matches("Headphones (wh-1000xm5 Stereo)"));
/// assert!(!target.matches("Speakers (Realtek Audio)"));
/// ```
#[derive(Clone, Debug)]
pub struct TargetDevice {
    name: Arc<str>,
}

impl TargetDevice {
    /// Creates a descriptor from the display-name substring to match.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the display-name substring.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True iff `candidate` contains the target substring, case-insensitively.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate
            .to_lowercase()
            .contains(&self.name.to_lowercase())
    }
}

impl fmt::Display for TargetDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
