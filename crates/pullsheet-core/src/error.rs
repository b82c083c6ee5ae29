#![forbid(unsafe_code)]

//! Error types.
//!
//! Nothing in the interaction engine is a recoverable I/O failure. A
//! [`DragRejected`] only tells the caller why an input was dropped; state is
//! untouched whenever one is returned.

use thiserror::Error;

use crate::controller::{AnimationToken, Phase};
use crate::source::SourceId;

/// Why the controller ignored an inbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DragRejected {
    #[error("event requires phase {expected:?}, controller is {actual:?}")]
    OutOfPhase { expected: Phase, actual: Phase },

    #[error("{from:?} is not the active drag source (active: {active:?})")]
    InactiveSource {
        from: SourceId,
        active: Option<SourceId>,
    },

    #[error("animation {token:?} is not the one in flight")]
    StaleAnimation { token: AnimationToken },

    #[error("container already closed")]
    Closed,
}

/// Failure to load a [`SheetConfig`](crate::config::SheetConfig) document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-file")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
