#![forbid(unsafe_code)]

//! Host-side orchestration of one presented pullable container.
//!
//! [`PullableContainer`] wires the pieces together the way a presenting
//! screen does: it owns the [`DragController`], both drag sources and the
//! content, turns layout passes into inset updates, turns content-height
//! pushes into cancel-then-resize, and runs the content's close lifecycle.
//!
//! # Close lifecycle
//!
//! ```text
//!   Presented ──controller closes──▶ Closing ──dismiss_transition_did_finish──▶ Closed
//!                 (will_be_closed)                      (was_closed)
//! ```

use crate::animation::SnapFrame;
use crate::config::SheetConfig;
use crate::controller::{AnimationToken, ContainerHost, DragController};
use crate::error::DragRejected;
use crate::source::{
    DragSource, PointerDragSource, PointerPhase, ScrollCoupledSource, ScrollSample, ScrollSurface,
};

/// What the container presents.
pub trait SheetContent {
    /// Natural height of the content, unclamped.
    fn content_height(&self) -> f64;

    /// The container is about to be dismissed.
    fn will_be_closed(&mut self) {}

    /// The dismiss transition finished.
    fn was_closed(&mut self) {}
}

/// Where the container is in its close lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Presented,
    Closing,
    Closed,
}

/// A presented pullable container.
#[derive(Debug)]
pub struct PullableContainer<H, S, C> {
    controller: DragController<H>,
    pointer: PointerDragSource,
    scroll: ScrollCoupledSource<S>,
    content: C,
    cached_available_height: Option<f64>,
    scroll_enabled: Option<bool>,
    lifecycle: Lifecycle,
}

impl<H, S, C> PullableContainer<H, S, C>
where
    H: ContainerHost,
    S: ScrollSurface,
    C: SheetContent,
{
    pub fn new(host: H, scroll_surface: S, content: C, config: SheetConfig) -> Self {
        Self {
            controller: DragController::new(host, config),
            pointer: PointerDragSource::new(),
            scroll: ScrollCoupledSource::new(scroll_surface),
            content,
            cached_available_height: None,
            scroll_enabled: None,
            lifecycle: Lifecycle::Presented,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &DragController<H> {
        &self.controller
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.controller.host_mut()
    }

    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    #[must_use]
    pub fn scroll_surface(&self) -> &S {
        self.scroll.surface()
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether the inner scroll view currently scrolls (content overflows).
    #[must_use]
    pub fn is_scroll_enabled(&self) -> bool {
        self.scroll_enabled.unwrap_or(false)
    }

    // -----------------------------------------------------------------------
    // Host lifecycle
    // -----------------------------------------------------------------------

    /// A layout pass finished.
    ///
    /// Only a change in the host's available height does any work: the
    /// header becomes the top inset and the container is resized to its
    /// content.
    pub fn view_did_layout(&mut self, header_height: f64) {
        let available = self.controller.host().query_available_height();
        if self.cached_available_height == Some(available) {
            return;
        }
        self.cached_available_height = Some(available);
        tracing::debug!(
            target: "pullsheet.container",
            available,
            header_height,
            "layout changed"
        );

        let bottom = self.controller.insets().bottom;
        if self.controller.update_insets(header_height, bottom).is_err() {
            return;
        }
        self.update_container_height(self.content.content_height());
    }

    /// The safe area changed.
    pub fn safe_area_did_change(&mut self, bottom: f64) {
        let top = self.controller.insets().top;
        let _ = self.controller.update_insets(top, bottom);
    }

    /// The content reports a new natural height. Any drag in flight is
    /// force-ended first.
    pub fn content_height_did_change(&mut self) {
        if self.controller.is_closed() {
            return;
        }
        self.cancel_drags();
        self.update_container_height(self.content.content_height());
        self.sync_lifecycle();
    }

    /// The user tapped the dimmed backdrop.
    pub fn dimming_tapped(&mut self) {
        self.cancel_drags();
        let _ = self.controller.close();
        self.sync_lifecycle();
    }

    /// The host's dismiss transition completed.
    pub fn dismiss_transition_did_finish(&mut self) {
        if self.lifecycle == Lifecycle::Closing {
            self.lifecycle = Lifecycle::Closed;
            self.content.was_closed();
        }
    }

    pub fn animation_did_complete(&mut self, token: AnimationToken) -> Result<(), DragRejected> {
        self.controller.animation_did_complete(token)
    }

    pub fn apply_snap_frame(&mut self, frame: SnapFrame) -> Result<(), DragRejected> {
        self.controller.apply_snap_frame(frame)
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn handle_pointer(&mut self, phase: PointerPhase) {
        self.pointer.handle(phase, &mut self.controller);
        self.sync_lifecycle();
    }

    pub fn scroll_will_begin_dragging(&mut self) {
        self.scroll.will_begin_dragging();
    }

    pub fn scroll_did_scroll(&mut self, sample: ScrollSample) {
        self.scroll.did_scroll(sample, &mut self.controller);
        self.sync_lifecycle();
    }

    pub fn scroll_did_end_dragging(&mut self, velocity_y: f64) {
        self.scroll.did_end_dragging(velocity_y, &mut self.controller);
        self.sync_lifecycle();
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn cancel_drags(&mut self) {
        let sources: [&mut dyn DragSource; 2] = [&mut self.pointer, &mut self.scroll];
        for source in sources {
            if source.is_active() {
                tracing::debug!(
                    target: "pullsheet.container",
                    source = ?source.id(),
                    "cancelling drag"
                );
                source.cancel(&mut self.controller);
            }
        }
    }

    fn update_container_height(&mut self, content_height: f64) {
        if self.controller.set_default_position(content_height).is_err() {
            return;
        }
        let bounds = self.controller.bounds();
        let enabled = bounds.is_saturated_by(bounds.clamp(content_height));
        if self.scroll_enabled != Some(enabled) {
            self.scroll_enabled = Some(enabled);
            self.scroll.surface_mut().set_scroll_enabled(enabled);
        }
    }

    fn sync_lifecycle(&mut self) {
        if self.lifecycle == Lifecycle::Presented && self.controller.is_closed() {
            self.lifecycle = Lifecycle::Closing;
            tracing::debug!(target: "pullsheet.container", "container closing");
            self.content.will_be_closed();
        }
    }
}
