#![forbid(unsafe_code)]

//! Drag controller: the height state machine of the pullable container.
//!
//! [`DragController`] owns the live height of the draggable surface and the
//! interaction phase. Drag sources feed it through [`DragSink`]; the host
//! receives height updates, snap-back requests, and close requests through
//! [`ContainerHost`].
//!
//! # State Machine
//!
//! ```text
//!            on_drag_begin              on_drag_end (snap back)
//!   Idle ─────────────────▶ Dragging ─────────────────────────▶ Animating
//!    ▲                         │                                    │
//!    │                         │ on_drag_end (close)                │
//!    │                         ▼                                    │
//!    │                       Closed ◀──────── close() ──────────────┤
//!    └──────────────── animation_did_complete(token) ───────────────┘
//! ```
//!
//! `set_default_position` and `update_insets` from `Idle` also enter
//! `Animating` when the default height moved away from the live height.
//!
//! # Invariants
//!
//! 1. `0 ≤ current_height ≤ maximum_available_height()` after every
//!    accepted call, as long as the host's answer does not change between
//!    calls.
//! 2. While `Idle`, `current_height == default_height`.
//! 3. At most one source is active; events from any other source are
//!    rejected without touching state.
//! 4. During a drag every change is a direct assignment. Animations are only
//!    ever requested from the host, with a fresh [`AnimationToken`] that
//!    supersedes any earlier one.
//! 5. A content-height push while dragging is recorded and applied by the
//!    release that ends the drag.
//! 6. `Closed` is terminal.
//!
//! # Failure Modes
//!
//! Out-of-phase events, events from an inactive source, and stale animation
//! completions return [`DragRejected`] and are otherwise ignored. None of
//! them can panic or corrupt state.

use crate::animation::SnapFrame;
use crate::config::SheetConfig;
use crate::error::DragRejected;
use crate::geometry::{HeightBounds, Insets};
use crate::release::{self, ReleaseDecision, ReleaseThresholds};
use crate::source::{DragSink, SourceId};

/// Heights closer than this are treated as equal.
const HEIGHT_EPSILON: f64 = 1e-6;

/// Interaction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
    Animating,
    Closed,
}

/// Identifies one snap-back request. Only the most recent token completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationToken(pub(crate) u64);

impl AnimationToken {
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The presenting surface, as seen by the controller.
///
/// It doubles as the geometry provider: [`query_available_height`] is asked
/// on every height computation and never cached.
///
/// [`query_available_height`]: ContainerHost::query_available_height
pub trait ContainerHost {
    /// Host bounds minus the host's own chrome, before the controller's
    /// insets are taken off.
    fn query_available_height(&self) -> f64;

    /// Apply `height` directly, without animation.
    fn did_update_height(&mut self, height: f64);

    /// Animate to `target_height`, then call
    /// [`DragController::animation_did_complete`] with `token`. A newer
    /// request replaces any animation still running.
    fn did_request_snap_back(&mut self, target_height: f64, token: AnimationToken);

    /// Run the dismiss transition and tear the container down.
    fn did_request_close(&mut self);
}

/// Height state machine for one presented container.
#[derive(Debug)]
pub struct DragController<H> {
    host: H,
    config: SheetConfig,
    thresholds: ReleaseThresholds,
    insets: Insets,
    current_height: f64,
    default_height: f64,
    /// Content height last pushed through `set_default_position`, unclamped.
    content_height: f64,
    phase: Phase,
    drag_origin: f64,
    active_source: Option<SourceId>,
    animation: Option<(AnimationToken, f64)>,
    next_token: u64,
}

impl<H: ContainerHost> DragController<H> {
    /// Create a controller for a freshly presented container at height zero.
    pub fn new(host: H, config: SheetConfig) -> Self {
        let config = config.validated();
        Self {
            host,
            thresholds: config.release_thresholds(),
            config,
            insets: Insets::default(),
            current_height: 0.0,
            default_height: 0.0,
            content_height: 0.0,
            phase: Phase::Idle,
            drag_origin: 0.0,
            active_source: None,
            animation: None,
            next_token: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn current_height(&self) -> f64 {
        self.current_height
    }

    #[inline]
    #[must_use]
    pub fn default_height(&self) -> f64 {
        self.default_height
    }

    #[inline]
    #[must_use]
    pub fn insets(&self) -> Insets {
        self.insets
    }

    #[inline]
    #[must_use]
    pub fn active_source(&self) -> Option<SourceId> {
        self.active_source
    }

    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    /// Token of the snap-back the host is expected to complete, if any.
    #[must_use]
    pub fn pending_animation(&self) -> Option<AnimationToken> {
        self.animation.map(|(token, _)| token)
    }

    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Current bounds, computed from the host's answer right now.
    #[must_use]
    pub fn bounds(&self) -> HeightBounds {
        HeightBounds::new(self.host.query_available_height(), self.insets)
    }

    /// `available − insets.top − insets.bottom`, never negative.
    #[must_use]
    pub fn maximum_available_height(&self) -> f64 {
        self.bounds().max()
    }

    // -----------------------------------------------------------------------
    // Host → controller
    // -----------------------------------------------------------------------

    /// Layout or safe area changed.
    ///
    /// Unchanged values are a no-op. Otherwise the live height is pulled
    /// down to the new maximum and the default height is recomputed. Idle:
    /// a default that moved away from the live height is animated to.
    /// Animating: the running snap-back is retargeted. Dragging: the drag
    /// origin is kept, so later changes keep tracking the finger.
    pub fn update_insets(&mut self, top: f64, bottom: f64) -> Result<(), DragRejected> {
        self.ensure_open()?;
        let insets = Insets::new(top, bottom);
        if insets == self.insets {
            return Ok(());
        }
        self.insets = insets;

        let bounds = self.bounds();
        self.default_height = bounds.clamp(self.content_height);
        tracing::debug!(
            target: "pullsheet.controller",
            top = insets.top,
            bottom = insets.bottom,
            max = bounds.max(),
            "insets updated"
        );

        let clamped = bounds.clamp(self.current_height);
        let shrunk = (clamped - self.current_height).abs() > HEIGHT_EPSILON;
        self.current_height = clamped;

        match self.phase {
            Phase::Idle => {
                if shrunk {
                    self.host.did_update_height(clamped);
                }
                if (self.current_height - self.default_height).abs() > HEIGHT_EPSILON {
                    self.start_snap_back(self.default_height);
                }
            }
            Phase::Dragging => {
                if shrunk {
                    self.host.did_update_height(clamped);
                }
            }
            Phase::Animating => self.retarget_snap_back(),
            Phase::Closed => {}
        }
        Ok(())
    }

    /// Content grew or shrank.
    ///
    /// Recomputes `default_height = min(content_height, max)`. Idle: the host
    /// is asked to animate there. Animating: the running snap-back is
    /// retargeted unless it already heads there. Dragging: recorded only;
    /// the release applies it.
    pub fn set_default_position(&mut self, content_height: f64) -> Result<(), DragRejected> {
        self.ensure_open()?;
        self.content_height = content_height;
        self.default_height = self.bounds().clamp(content_height);

        match self.phase {
            Phase::Idle => {
                if (self.current_height - self.default_height).abs() > HEIGHT_EPSILON {
                    self.start_snap_back(self.default_height);
                }
            }
            Phase::Animating => self.retarget_snap_back(),
            Phase::Dragging => {
                tracing::debug!(
                    target: "pullsheet.controller",
                    default = self.default_height,
                    "default height deferred until release"
                );
            }
            Phase::Closed => {}
        }
        Ok(())
    }

    /// The host's snap-back animation produced an intermediate frame.
    pub fn animation_did_progress(
        &mut self,
        token: AnimationToken,
        height: f64,
    ) -> Result<(), DragRejected> {
        self.ensure_current_animation(token)?;
        self.current_height = self.bounds().clamp(height);
        Ok(())
    }

    /// The host finished the snap-back identified by `token`.
    pub fn animation_did_complete(&mut self, token: AnimationToken) -> Result<(), DragRejected> {
        self.ensure_current_animation(token)?;
        let Some((_, target)) = self.animation.take() else {
            return Err(DragRejected::StaleAnimation { token });
        };
        self.current_height = self.bounds().clamp(target);
        self.phase = Phase::Idle;
        tracing::debug!(
            target: "pullsheet.controller",
            height = self.current_height,
            "snap back complete"
        );
        Ok(())
    }

    /// Feed one frame from a [`SnapAnimator`](crate::animation::SnapAnimator).
    pub fn apply_snap_frame(&mut self, frame: SnapFrame) -> Result<(), DragRejected> {
        self.animation_did_progress(frame.token, frame.height)?;
        if frame.finished {
            self.animation_did_complete(frame.token)?;
        }
        Ok(())
    }

    /// Dismiss the container regardless of the current phase.
    pub fn close(&mut self) -> Result<(), DragRejected> {
        self.ensure_open()?;
        self.enter_closed();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_open(&self) -> Result<(), DragRejected> {
        if self.phase == Phase::Closed {
            return Err(reject(DragRejected::Closed));
        }
        Ok(())
    }

    fn ensure_active(&self, source: SourceId) -> Result<(), DragRejected> {
        self.ensure_open()?;
        if self.phase != Phase::Dragging {
            return Err(reject(DragRejected::OutOfPhase {
                expected: Phase::Dragging,
                actual: self.phase,
            }));
        }
        if self.active_source != Some(source) {
            return Err(reject(DragRejected::InactiveSource {
                from: source,
                active: self.active_source,
            }));
        }
        Ok(())
    }

    fn ensure_current_animation(&self, token: AnimationToken) -> Result<(), DragRejected> {
        self.ensure_open()?;
        if self.phase != Phase::Animating {
            return Err(reject(DragRejected::OutOfPhase {
                expected: Phase::Animating,
                actual: self.phase,
            }));
        }
        match self.animation {
            Some((current, _)) if current == token => Ok(()),
            _ => Err(reject(DragRejected::StaleAnimation { token })),
        }
    }

    fn start_snap_back(&mut self, target: f64) {
        let token = AnimationToken(self.next_token);
        self.next_token += 1;
        self.animation = Some((token, target));
        self.phase = Phase::Animating;
        tracing::debug!(
            target: "pullsheet.controller",
            from = self.current_height,
            to = target,
            token = token.0,
            "snap back requested"
        );
        self.host.did_request_snap_back(target, token);
    }

    /// Point the running snap-back at the current default, if it moved.
    fn retarget_snap_back(&mut self) {
        let target = self.animation.map(|(_, target)| target);
        if target.is_some_and(|t| (t - self.default_height).abs() <= HEIGHT_EPSILON) {
            return;
        }
        self.start_snap_back(self.default_height);
    }

    fn enter_closed(&mut self) {
        self.phase = Phase::Closed;
        self.active_source = None;
        self.animation = None;
        tracing::debug!(
            target: "pullsheet.controller",
            height = self.current_height,
            "close requested"
        );
        self.host.did_request_close();
    }
}

impl<H: ContainerHost> DragSink for DragController<H> {
    fn on_drag_begin(&mut self, source: SourceId) -> Result<(), DragRejected> {
        self.ensure_open()?;
        if self.phase == Phase::Dragging {
            return Err(reject(DragRejected::InactiveSource {
                from: source,
                active: self.active_source,
            }));
        }
        if self.phase != Phase::Idle {
            return Err(reject(DragRejected::OutOfPhase {
                expected: Phase::Idle,
                actual: self.phase,
            }));
        }

        self.drag_origin = self.current_height;
        self.phase = Phase::Dragging;
        self.active_source = Some(source);
        tracing::debug!(
            target: "pullsheet.controller",
            source = ?source,
            origin = self.drag_origin,
            "drag began"
        );
        Ok(())
    }

    fn on_drag_change(
        &mut self,
        source: SourceId,
        translation_y: f64,
        velocity_y: f64,
    ) -> Result<(), DragRejected> {
        self.ensure_active(source)?;
        let height = self.bounds().clamp(self.drag_origin - translation_y);
        self.current_height = height;
        tracing::trace!(
            target: "pullsheet.controller",
            source = ?source,
            height,
            velocity = velocity_y,
            "drag changed"
        );
        self.host.did_update_height(height);
        Ok(())
    }

    fn on_drag_end(&mut self, source: SourceId, velocity_y: f64) -> Result<(), DragRejected> {
        self.ensure_active(source)?;
        self.active_source = None;

        let decision = release::decide(
            self.current_height,
            self.default_height,
            velocity_y,
            self.thresholds,
        );
        tracing::debug!(
            target: "pullsheet.controller",
            source = ?source,
            height = self.current_height,
            default = self.default_height,
            velocity = velocity_y,
            decision = ?decision,
            "drag ended"
        );
        match decision {
            ReleaseDecision::Close => self.enter_closed(),
            ReleaseDecision::SnapBack(target) => self.start_snap_back(target),
        }
        Ok(())
    }
}

fn reject(err: DragRejected) -> DragRejected {
    tracing::trace!(target: "pullsheet.controller", %err, "event dropped");
    err
}
