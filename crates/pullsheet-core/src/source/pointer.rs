#![forbid(unsafe_code)]

//! Direct pointer/finger drag on the panel.
//!
//! Maps recognizer phases 1:1 onto the sink contract. `Cancelled` from the
//! platform and [`DragSource::cancel`] from the host both end the drag with
//! zero velocity.

use super::{DragSink, DragSource, SourceId};

/// Phases delivered by a continuous pan recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerPhase {
    Began,
    Changed { translation_y: f64, velocity_y: f64 },
    Ended { velocity_y: f64 },
    Cancelled,
}

/// Pointer-drag source.
#[derive(Debug, Default)]
pub struct PointerDragSource {
    active: bool,
}

impl PointerDragSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one recognizer phase.
    pub fn handle<K>(&mut self, phase: PointerPhase, sink: &mut K)
    where
        K: DragSink + ?Sized,
    {
        match phase {
            PointerPhase::Began => {
                if self.active {
                    // A second Began without an end: the old gesture is gone.
                    self.finish(sink, 0.0);
                }
                self.active = sink.on_drag_begin(SourceId::Pointer).is_ok();
                if !self.active {
                    tracing::trace!(target: "pullsheet.source", "pointer drag not granted");
                }
            }
            PointerPhase::Changed {
                translation_y,
                velocity_y,
            } => {
                if !self.active {
                    return;
                }
                if let Err(err) = sink.on_drag_change(SourceId::Pointer, translation_y, velocity_y)
                {
                    tracing::trace!(target: "pullsheet.source", %err, "pointer drag revoked");
                    self.active = false;
                }
            }
            PointerPhase::Ended { velocity_y } => self.finish(sink, velocity_y),
            PointerPhase::Cancelled => self.finish(sink, 0.0),
        }
    }

    fn finish<K>(&mut self, sink: &mut K, velocity_y: f64)
    where
        K: DragSink + ?Sized,
    {
        if !self.active {
            return;
        }
        self.active = false;
        let _ = sink.on_drag_end(SourceId::Pointer, velocity_y);
    }
}

impl DragSource for PointerDragSource {
    fn id(&self) -> SourceId {
        SourceId::Pointer
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn cancel(&mut self, sink: &mut dyn DragSink) {
        self.finish(sink, 0.0);
    }
}
