#![forbid(unsafe_code)]

//! Vertical geometry for the pullable container.
//!
//! All values are in host points. Only the vertical axis matters here: the
//! container is a bottom sheet whose height grows upward from the bottom edge.

/// Vertical chrome that the draggable surface must leave free.
///
/// `top` is the height of the fixed header the content area starts below;
/// `bottom` is the safe-area bottom inset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub bottom: f64,
}

impl Insets {
    /// Create insets from explicit values. Negative or non-finite input is
    /// treated as zero.
    #[must_use]
    pub fn new(top: f64, bottom: f64) -> Self {
        Self {
            top: sanitize(top),
            bottom: sanitize(bottom),
        }
    }

    /// Sum of top and bottom.
    #[inline]
    #[must_use]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }

    /// Copy with a different top inset.
    #[must_use]
    pub fn with_top(self, top: f64) -> Self {
        Self::new(top, self.bottom)
    }

    /// Copy with a different bottom inset.
    #[must_use]
    pub fn with_bottom(self, bottom: f64) -> Self {
        Self::new(self.top, bottom)
    }
}

impl From<(f64, f64)> for Insets {
    fn from((top, bottom): (f64, f64)) -> Self {
        Self::new(top, bottom)
    }
}

/// Height limits for one evaluation.
///
/// Built fresh from the host's available height and the current insets each
/// time it is needed; never cached across events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBounds {
    max: f64,
}

impl HeightBounds {
    /// Bounds for a host reporting `available` points with `insets` reserved.
    #[must_use]
    pub fn new(available: f64, insets: Insets) -> Self {
        Self {
            max: sanitize(sanitize(available) - insets.vertical_sum()),
        }
    }

    /// The maximum height the surface may take.
    #[inline]
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp a proposed height into `[0, max]`. NaN collapses to zero.
    #[must_use]
    pub fn clamp(&self, height: f64) -> f64 {
        if height.is_nan() {
            return 0.0;
        }
        height.clamp(0.0, self.max)
    }

    /// Whether `height` needs the whole available area (content overflows).
    #[inline]
    #[must_use]
    pub fn is_saturated_by(&self, height: f64) -> bool {
        height >= self.max
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
