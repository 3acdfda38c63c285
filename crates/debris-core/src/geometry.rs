#![forbid(unsafe_code)]

//! Viewport geometry in CSS pixels.

/// Width and height of the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Fallback used before the host reports a real size.
    pub const FALLBACK: Viewport = Viewport {
        width: 1920.0,
        height: 1080.0,
    };

    /// Create a viewport. Non-finite or negative extents become 0.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let extent = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: extent(width),
            height: extent(height),
        }
    }

    /// Whether the width is below `breakpoint`.
    #[must_use]
    pub fn is_small(&self, breakpoint: f64) -> bool {
        self.width < breakpoint
    }

    /// Whether either extent is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// This viewport, or [`Viewport::FALLBACK`] if empty.
    #[must_use]
    pub fn or_fallback(self) -> Self {
        if self.is_empty() { Self::FALLBACK } else { self }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Symmetric bounding box `[-half_width, half_width] × [-half_height, half_height]`
/// centred on the tracked region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Half extent along x.
    pub half_width: f64,
    /// Half extent along y.
    pub half_height: f64,
}

impl Bounds {
    /// Clamp a point into the box.
    #[must_use]
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            crate::sanitize(x, -self.half_width, self.half_width, 0.0),
            crate::sanitize(y, -self.half_height, self.half_height, 0.0),
        )
    }

    /// Whether a point lies inside the box (edges included).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.abs() <= self.half_width && y.abs() <= self.half_height
    }
}
