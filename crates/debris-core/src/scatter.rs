#![forbid(unsafe_code)]

//! Scatter rules: how a group's terminal offset becomes its resting place.
//!
//! At capture time a debris group's raw terminal `(x, y)` is scaled down,
//! pushed toward a quadrant of the viewport, and clamped into a box that is
//! a multiple of the base bounds:
//!
//! ```text
//! x' = clamp(x · x_factor + w · x_ratio, ±max_x · x_bound)
//! y' = clamp(y · y_factor + h · y_ratio, ±max_y · y_bound)
//! max_x = w · width_ratio,  max_y = h · height_ratio
//! ```
//!
//! The per-family tables alternate quadrants by index so debris spreads out
//! instead of collapsing onto one point. Only `x` and `y` are adjusted;
//! every other channel keeps its terminal value.

use crate::geometry::{Bounds, Viewport};
use crate::transform::Transform;

/// Base debris box as fractions of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScatterBounds {
    /// `max_x = width × width_ratio`.
    pub width_ratio: f64,
    /// `max_y = height × height_ratio`.
    pub height_ratio: f64,
}

impl ScatterBounds {
    /// Base half extents for `viewport`.
    #[must_use]
    pub fn resolve(&self, viewport: Viewport) -> Bounds {
        Bounds {
            half_width: viewport.width * self.width_ratio,
            half_height: viewport.height * self.height_ratio,
        }
    }
}

impl Default for ScatterBounds {
    fn default() -> Self {
        Self {
            width_ratio: 0.35,
            height_ratio: 0.4,
        }
    }
}

/// Per-group scatter coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterRule {
    pub x_factor: f64,
    pub y_factor: f64,
    /// Horizontal push as a fraction of viewport width.
    pub x_ratio: f64,
    /// Vertical push as a fraction of viewport height.
    pub y_ratio: f64,
    /// Multiplier on the base `max_x`.
    pub x_bound: f64,
    /// Multiplier on the base `max_y`.
    pub y_bound: f64,
}

impl ScatterRule {
    /// Main debris: even indices left, the first two up.
    #[must_use]
    pub fn primary(index: usize) -> Self {
        Self {
            x_factor: 0.6,
            y_factor: 0.6,
            x_ratio: if index % 2 == 0 { -0.3 } else { 0.3 },
            y_ratio: if index < 2 { -0.25 } else { 0.25 },
            x_bound: 1.0,
            y_bound: 1.0,
        }
    }

    /// Secondary debris: tighter pull, smaller box.
    #[must_use]
    pub fn secondary(index: usize) -> Self {
        Self {
            x_factor: 0.5,
            y_factor: 0.5,
            x_ratio: if index % 2 == 0 { -0.2 } else { 0.2 },
            y_ratio: if index < 2 { -0.15 } else { 0.15 },
            x_bound: 0.8,
            y_bound: 0.7,
        }
    }

    /// Side debris: pushed toward the left/right edges.
    #[must_use]
    pub fn side(index: usize) -> Self {
        Self {
            x_factor: 0.7,
            y_factor: 0.6,
            x_ratio: if index < 2 { -0.4 } else { 0.4 },
            y_ratio: if index % 2 == 0 { -0.2 } else { 0.2 },
            x_bound: 1.2,
            y_bound: 0.6,
        }
    }

    /// Box this rule clamps into.
    #[must_use]
    pub fn bounds(&self, viewport: Viewport, base: &ScatterBounds) -> Bounds {
        let b = base.resolve(viewport);
        Bounds {
            half_width: b.half_width * self.x_bound,
            half_height: b.half_height * self.y_bound,
        }
    }

    /// Resting transform for a terminal transform.
    #[must_use]
    pub fn apply(&self, terminal: &Transform, viewport: Viewport, base: &ScatterBounds) -> Transform {
        let bounds = self.bounds(viewport, base);
        let (x, y) = bounds.clamp(
            terminal.x * self.x_factor + viewport.width * self.x_ratio,
            terminal.y * self.y_factor + viewport.height * self.y_ratio,
        );
        Transform { x, y, ..*terminal }
    }
}
