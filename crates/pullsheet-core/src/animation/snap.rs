#![forbid(unsafe_code)]

//! Reference snap-back driver for hosts without a native spring animation.
//!
//! A host that receives [`ContainerHost::did_request_snap_back`] starts a
//! [`SnapAnimator`], ticks it once per display frame, and hands every
//! [`SnapFrame`] to [`DragController::apply_snap_frame`].
//!
//! Starting a new snap always replaces the running one, so there is never
//! more than one animation writing the container height.
//!
//! [`ContainerHost::did_request_snap_back`]: crate::controller::ContainerHost::did_request_snap_back
//! [`DragController::apply_snap_frame`]: crate::controller::DragController::apply_snap_frame

use std::time::Duration;

use web_time::Instant;

use super::spring::HeightSpring;
use crate::config::SheetConfig;
use crate::controller::AnimationToken;

/// One rendered frame of a snap-back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapFrame {
    pub token: AnimationToken,
    pub height: f64,
    pub finished: bool,
}

#[derive(Debug, Clone)]
struct Running {
    token: AnimationToken,
    spring: HeightSpring,
    last_frame: Option<Instant>,
}

impl Running {
    fn frame(&self) -> SnapFrame {
        SnapFrame {
            token: self.token,
            height: self.spring.height(),
            finished: self.spring.is_at_rest(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapAnimator {
    stiffness: f64,
    damping_ratio: f64,
    /// Initial speed as a multiple of the travel distance per second.
    initial_velocity: f64,
    running: Option<Running>,
}

impl SnapAnimator {
    #[must_use]
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            stiffness: config.snap_stiffness,
            damping_ratio: config.snap_damping_ratio,
            initial_velocity: config.snap_initial_velocity,
            running: None,
        }
    }

    /// Begin animating from `from` to `to`, replacing any running snap.
    pub fn start(&mut self, from: f64, to: f64, token: AnimationToken) {
        let distance = to - from;
        let spring = HeightSpring::new(from, to, self.stiffness, self.damping_ratio)
            .with_velocity(distance * self.initial_velocity);
        if let Some(previous) = self.running.as_ref() {
            tracing::trace!(
                target: "pullsheet.animation",
                replaced = previous.token.get(),
                token = token.get(),
                "snap replaced"
            );
        }
        self.running = Some(Running {
            token,
            spring,
            last_frame: None,
        });
    }

    /// Drop the running snap without completing it.
    pub fn stop(&mut self) -> Option<AnimationToken> {
        self.running.take().map(|r| r.token)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<AnimationToken> {
        self.running.as_ref().map(|r| r.token)
    }

    /// Advance by `dt` and return the resulting frame.
    pub fn tick(&mut self, dt: Duration) -> Option<SnapFrame> {
        let running = self.running.as_mut()?;
        running.spring.advance(dt);
        let frame = running.frame();
        self.retire_if_finished(frame);
        Some(frame)
    }

    /// Advance to wall-clock `now`. The first frame after `start` only
    /// records the timestamp.
    pub fn frame_at(&mut self, now: Instant) -> Option<SnapFrame> {
        let running = self.running.as_mut()?;
        if let Some(last) = running.last_frame {
            running.spring.advance(now.saturating_duration_since(last));
        }
        running.last_frame = Some(now);
        let frame = running.frame();
        self.retire_if_finished(frame);
        Some(frame)
    }

    fn retire_if_finished(&mut self, frame: SnapFrame) {
        if frame.finished {
            self.running = None;
        }
    }
}
