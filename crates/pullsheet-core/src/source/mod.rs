#![forbid(unsafe_code)]

//! Drag sources: normalized input feeding the drag controller.
//!
//! Two variants exist and they are mutually exclusive at runtime:
//!
//! - [`PointerDragSource`]: a direct finger/pointer drag on the panel.
//! - [`ScrollCoupledSource`]: a pull past the top edge of an inner scrollable
//!   region.
//!
//! Both speak the same contract to a [`DragSink`] (the controller): one
//! `begin`, any number of `change`, one `end`. The sink decides which source
//! wins when both try to begin; a source whose begin was rejected stays
//! silent until its next gesture.
//!
//! # Conventions
//!
//! `translation_y` is cumulative since the drag began and positive downward,
//! so a positive translation lowers the panel. `velocity_y` is in points per
//! second, positive downward.

pub mod pointer;
pub mod scroll;

pub use pointer::{PointerDragSource, PointerPhase};
pub use scroll::{ScrollCoupledSource, ScrollSample, ScrollSurface};

use crate::error::DragRejected;

/// Identity of a drag source, carried on every inbound drag call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Pointer,
    Scroll,
}

/// Receiver of normalized drag events.
pub trait DragSink {
    /// Ask to become the active source. `Err` means another source (or the
    /// phase) won and this gesture must not feed further events.
    fn on_drag_begin(&mut self, source: SourceId) -> Result<(), DragRejected>;

    fn on_drag_change(
        &mut self,
        source: SourceId,
        translation_y: f64,
        velocity_y: f64,
    ) -> Result<(), DragRejected>;

    fn on_drag_end(&mut self, source: SourceId, velocity_y: f64) -> Result<(), DragRejected>;
}

/// Interface shared by both source variants.
pub trait DragSource {
    fn id(&self) -> SourceId;

    /// Whether this source currently owns the drag.
    fn is_active(&self) -> bool;

    /// Abort the current drag, synthesizing a zero-velocity end so the sink
    /// always leaves its dragging state. No-op when inactive.
    fn cancel(&mut self, sink: &mut dyn DragSink);
}
