#![forbid(unsafe_code)]

//! Release decision: what happens when a drag ends.
//!
//! The outcome is binary. Either the panel closes, or it snaps back to its
//! default height. There is no intermediate resting state.
//!
//! Rules, in order:
//!
//! 1. **Close** when `current < default × close_fraction`, or when the release
//!    velocity (positive = downward) exceeds `close_velocity`.
//! 2. **Snap back** to `default` otherwise.
//!
//! [`decide`] is pure and total: every input, including NaN, yields exactly
//! one outcome.

/// Thresholds for [`decide`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseThresholds {
    pub close_fraction: f64,
    /// Points per second, downward.
    pub close_velocity: f64,
}

/// Outcome of a release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseDecision {
    /// Dismiss the container without restoring its height.
    Close,
    /// Animate to the contained default height.
    SnapBack(f64),
}

impl ReleaseDecision {
    #[inline]
    #[must_use]
    pub fn is_close(&self) -> bool {
        matches!(self, Self::Close)
    }
}

/// Classify a release.
#[must_use]
pub fn decide(
    current_height: f64,
    default_height: f64,
    velocity_y: f64,
    thresholds: ReleaseThresholds,
) -> ReleaseDecision {
    let close_height = default_height * thresholds.close_fraction;
    if current_height < close_height || velocity_y > thresholds.close_velocity {
        ReleaseDecision::Close
    } else {
        ReleaseDecision::SnapBack(default_height)
    }
}
