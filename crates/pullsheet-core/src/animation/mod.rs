#![forbid(unsafe_code)]

//! Snap-back animation for hosts that need one.

pub mod snap;
pub mod spring;

pub use snap::{SnapAnimator, SnapFrame};
pub use spring::HeightSpring;
