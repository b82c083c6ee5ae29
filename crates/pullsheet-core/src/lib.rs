#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Pullsheet: interaction engine for pullable bottom-sheet containers.
//!
//! # Role
//! A pullable container is a panel anchored to the bottom of its host that
//! sizes itself to its content, can be dragged down directly or by pulling an
//! inner scroll view past its top, and on release either snaps back to its
//! natural height or dismisses itself.
//!
//! # Primary responsibilities
//! - **DragController**: the height state machine; single source of truth for
//!   the live height, the interaction phase, and which drag source owns it.
//! - **Drag sources**: [`PointerDragSource`] and [`ScrollCoupledSource`]
//!   normalize raw input into one begin/change/end contract.
//! - **Release decision**: [`release::decide`], a pure close-or-snap rule.
//! - **PullableContainer**: host-side wiring of layout passes, content
//!   height pushes, and the close lifecycle.
//!
//! # How it fits in a host
//! The host implements [`ContainerHost`] (apply heights, run animations, run
//! the dismiss transition) and [`ScrollSurface`] (the inner scroll view), and
//! forwards its platform callbacks into [`PullableContainer`]. Hosts without
//! a native spring can drive snap-backs with [`SnapAnimator`].

pub mod animation;
pub mod config;
pub mod container;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod release;
pub mod source;

pub use animation::{HeightSpring, SnapAnimator, SnapFrame};
pub use config::SheetConfig;
pub use container::{Lifecycle, PullableContainer, SheetContent};
pub use controller::{AnimationToken, ContainerHost, DragController, Phase};
pub use error::{ConfigError, DragRejected};
pub use geometry::{HeightBounds, Insets};
pub use release::{ReleaseDecision, ReleaseThresholds};
pub use source::{
    DragSink, DragSource, PointerDragSource, PointerPhase, ScrollCoupledSource, ScrollSample,
    ScrollSurface, SourceId,
};
