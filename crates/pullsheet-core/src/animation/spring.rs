#![forbid(unsafe_code)]

//! Damped spring over container heights.
//!
//! Classical damped harmonic oscillator:
//!
//!   a = -stiffness × (height - target) - damping × velocity
//!
//! with `damping = 2 × ratio × √stiffness`, so the damping ratio reads the
//! usual way (1.0 critical, below 1.0 a visible settle-bounce).
//!
//! # Integration
//!
//! Semi-implicit Euler. Any `dt` is subdivided into steps of at most 4ms so
//! large frame gaps stay stable.
//!
//! # Invariants
//!
//! 1. Once at rest the height equals the target exactly and velocity is 0.
//! 2. A spring at rest stays at rest until [`retarget`](HeightSpring::retarget).
//! 3. Stiffness is at least 1.0 and damping is never negative.

use std::time::Duration;

const MAX_STEP_SECS: f64 = 0.004;

/// Height delta (points) below which the spring may settle.
const REST_DISTANCE: f64 = 0.1;

/// Speed (points/sec) below which the spring may settle.
const REST_SPEED: f64 = 1.0;

const MIN_STIFFNESS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct HeightSpring {
    height: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl HeightSpring {
    /// Spring from `from` toward `to`, initially still.
    #[must_use]
    pub fn new(from: f64, to: f64, stiffness: f64, damping_ratio: f64) -> Self {
        let stiffness = stiffness.max(MIN_STIFFNESS);
        let damping = 2.0 * damping_ratio.max(0.0) * stiffness.sqrt();
        let mut spring = Self {
            height: from,
            velocity: 0.0,
            target: to,
            stiffness,
            damping,
            at_rest: false,
        };
        spring.settle_if_close();
        spring
    }

    /// Start with `velocity` points/sec.
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        if velocity.is_finite() && velocity != 0.0 {
            self.velocity = velocity;
            self.at_rest = false;
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Move the target, keeping the current height and velocity.
    pub fn retarget(&mut self, target: f64) {
        if (self.target - target).abs() > f64::EPSILON {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Advance by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            let acceleration = -self.stiffness * (self.height - self.target) - self.damping * self.velocity;
            self.velocity += acceleration * step;
            self.height += self.velocity * step;
            remaining -= step;
        }
        self.settle_if_close();
    }

    fn settle_if_close(&mut self) {
        if (self.height - self.target).abs() < REST_DISTANCE && self.velocity.abs() < REST_SPEED {
            self.height = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn run(spring: &mut HeightSpring, frames: usize) {
        for _ in 0..frames {
            spring.advance(FRAME);
        }
    }

    #[test]
    fn converges_to_target() {
        let mut spring = HeightSpring::new(0.0, 400.0, 400.0, 0.8);
        run(&mut spring, 120);
        assert!(spring.is_at_rest());
        assert_eq!(spring.height(), 400.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn settles_within_half_a_second() {
        let mut spring = HeightSpring::new(300.0, 500.0, 400.0, 0.8);
        run(&mut spring, 40);
        assert!((spring.height() - 500.0).abs() < 2.0, "h={}", spring.height());
    }

    #[test]
    fn underdamped_overshoots() {
        let mut spring = HeightSpring::new(0.0, 100.0, 400.0, 0.3);
        let mut peak = 0.0f64;
        for _ in 0..60 {
            spring.advance(FRAME);
            peak = peak.max(spring.height());
        }
        assert!(peak > 100.0, "peak={peak}");
    }

    #[test]
    fn critical_damping_does_not_overshoot() {
        let mut spring = HeightSpring::new(0.0, 100.0, 400.0, 1.0);
        for _ in 0..120 {
            spring.advance(FRAME);
            assert!(spring.height() <= 100.0 + REST_DISTANCE);
        }
    }

    #[test]
    fn starting_at_target_is_at_rest() {
        let spring = HeightSpring::new(250.0, 250.0, 400.0, 0.8);
        assert!(spring.is_at_rest());
    }

    #[test]
    fn initial_velocity_wakes_resting_spring() {
        let spring = HeightSpring::new(250.0, 250.0, 400.0, 0.8).with_velocity(500.0);
        assert!(!spring.is_at_rest());
    }

    #[test]
    fn retarget_wakes_and_redirects() {
        let mut spring = HeightSpring::new(0.0, 100.0, 400.0, 1.0);
        run(&mut spring, 120);
        spring.retarget(50.0);
        assert!(!spring.is_at_rest());
        run(&mut spring, 120);
        assert_eq!(spring.height(), 50.0);
    }

    #[test]
    fn huge_dt_is_stable() {
        let mut spring = HeightSpring::new(0.0, 300.0, 5000.0, 0.8);
        spring.advance(Duration::from_secs(2));
        assert!(spring.height().is_finite());
        assert!(spring.is_at_rest());
    }

    #[test]
    fn stiffness_is_floored() {
        let mut spring = HeightSpring::new(0.0, 10.0, 0.0, 1.0);
        spring.advance(Duration::from_secs(30));
        assert!(spring.is_at_rest());
    }
}
