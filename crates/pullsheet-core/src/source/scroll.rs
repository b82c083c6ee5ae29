#![forbid(unsafe_code)]

//! Drag inferred from an inner scroll view pulled past its top edge.
//!
//! # State Machine
//!
//! ```text
//!   idle ──will_begin_dragging──▶ touching ──offset < 0, begin granted──▶ active
//!    ▲                              │                                       │
//!    └──────── did_end_dragging ────┴────────── did_end_dragging ───────────┘
//! ```
//!
//! While `touching` with a non-negative offset the inner view scrolls natively
//! and the sink is never called. The first negative sample asks the sink to
//! begin; from then on every sample's offset is moved into the accumulated
//! translation and the view's offset is pinned back to zero with bounce
//! disabled, so only the container moves.
//!
//! # Invariants
//!
//! 1. At most one `on_drag_begin` per touch.
//! 2. Bounce is disabled exactly while active and restored on deactivation.
//! 3. Direction reversal never deactivates; only end-of-touch or cancel do.
//! 4. Accumulated translation is floored at zero: reversing lifts the panel
//!    back toward where the pull started, never past it.
//!
//! # Velocity
//!
//! [`ScrollSample::velocity_y`] uses the scroll view's convention (positive
//! while the offset grows, i.e. the finger moves up). It is negated before
//! reaching the sink, whose convention is positive-downward.

use super::{DragSink, DragSource, SourceId};

/// Handle to the inner scroll view.
pub trait ScrollSurface {
    fn set_bounces(&mut self, bounces: bool);
    fn set_content_offset_y(&mut self, offset_y: f64);
    fn set_scroll_enabled(&mut self, enabled: bool);
}

/// One scroll notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub offset_y: f64,
    pub velocity_y: f64,
}

impl ScrollSample {
    #[must_use]
    pub const fn new(offset_y: f64, velocity_y: f64) -> Self {
        Self {
            offset_y,
            velocity_y,
        }
    }
}

/// Scroll-coupled drag source. Owns the handle to the inner scroll surface.
#[derive(Debug)]
pub struct ScrollCoupledSource<S> {
    surface: S,
    touching: bool,
    /// Set when the sink refused us (or we were cancelled) during this touch.
    declined: bool,
    active: bool,
    translation: f64,
}

impl<S: ScrollSurface> ScrollCoupledSource<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            touching: false,
            declined: false,
            active: false,
            translation: 0.0,
        }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Translation accumulated during the current activation.
    #[must_use]
    pub fn translation(&self) -> f64 {
        self.translation
    }

    /// The user put a finger on the scroll view.
    pub fn will_begin_dragging(&mut self) {
        self.touching = true;
        self.declined = false;
    }

    /// The scroll view's offset changed.
    pub fn did_scroll<K>(&mut self, sample: ScrollSample, sink: &mut K)
    where
        K: DragSink + ?Sized,
    {
        if !self.touching || self.declined {
            return;
        }

        if !self.active {
            if sample.offset_y.is_nan() || sample.offset_y >= 0.0 {
                return;
            }
            if let Err(err) = sink.on_drag_begin(SourceId::Scroll) {
                tracing::trace!(target: "pullsheet.source", %err, "scroll pull not granted");
                self.declined = true;
                return;
            }
            self.active = true;
            self.translation = 0.0;
            self.surface.set_bounces(false);
            tracing::trace!(target: "pullsheet.source", "scroll pull activated");
        }

        if sample.offset_y.is_finite() {
            self.translation = (self.translation - sample.offset_y).max(0.0);
        }
        self.surface.set_content_offset_y(0.0);

        if let Err(err) = sink.on_drag_change(SourceId::Scroll, self.translation, -sample.velocity_y)
        {
            tracing::trace!(target: "pullsheet.source", %err, "scroll pull revoked");
            self.deactivate();
            self.declined = true;
        }
    }

    /// The finger left the scroll view. `velocity_y` uses the scroll view's
    /// convention.
    pub fn did_end_dragging<K>(&mut self, velocity_y: f64, sink: &mut K)
    where
        K: DragSink + ?Sized,
    {
        self.touching = false;
        self.declined = false;
        if self.active {
            self.deactivate();
            let _ = sink.on_drag_end(SourceId::Scroll, -velocity_y);
        }
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.translation = 0.0;
        self.surface.set_bounces(true);
    }
}

impl<S: ScrollSurface> DragSource for ScrollCoupledSource<S> {
    fn id(&self) -> SourceId {
        SourceId::Scroll
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn cancel(&mut self, sink: &mut dyn DragSink) {
        if !self.active {
            return;
        }
        self.deactivate();
        // Stay out of the rest of this touch.
        self.declined = self.touching;
        let _ = sink.on_drag_end(SourceId::Scroll, 0.0);
    }
}
