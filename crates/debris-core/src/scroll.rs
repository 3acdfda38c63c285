#![forbid(unsafe_code)]

//! Viewport-relative scroll progress of a tracked region.
//!
//! A [`ScrollRange`] names two intersections between an edge of the tracked
//! element and an edge of the viewport, e.g. "element start meets viewport
//! end" and "element end meets viewport start". Progress is 0 at the first
//! intersection, 1 at the second, and linear in scroll position between.
//!
//! With the element's top at `top` (viewport coordinates) and height `h`,
//! the signed distance to an intersection `(e, v)` is
//! `top + e·h − v·vh`. Scrolling moves both distances by the same amount, so
//! `progress = d_start / (d_start − d_end)`.
//!
//! # Failure Modes
//!
//! - Degenerate range (both intersections coincide): progress is 0.
//! - NaN / infinite metrics: progress is 0. Out-of-range ratios clamp.

/// An edge (or midpoint) of a box, as a fraction of its extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Edge {
    /// Leading edge (0%).
    Start,
    /// Midpoint (50%).
    Center,
    /// Trailing edge (100%).
    End,
}

impl Edge {
    /// Fraction of the box extent.
    #[must_use]
    pub fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

/// "Element edge meets viewport edge".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    /// Edge of the tracked element.
    pub element: Edge,
    /// Edge of the viewport.
    pub viewport: Edge,
}

impl Intersection {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    fn distance(&self, m: &RegionMetrics) -> f64 {
        m.top + self.element.fraction() * m.height - self.viewport.fraction() * m.viewport_height
    }
}

/// The scroll interval over which progress runs from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollRange {
    /// Where progress is 0.
    pub start: Intersection,
    /// Where progress is 1.
    pub end: Intersection,
}

impl ScrollRange {
    /// Full pass: from the element entering at the bottom to leaving at the top.
    pub const FULL_PASS: ScrollRange = ScrollRange {
        start: Intersection::new(Edge::Start, Edge::End),
        end: Intersection::new(Edge::End, Edge::Start),
    };

    /// Raw progress in `[0, 1]` for the current layout.
    #[must_use]
    pub fn progress(&self, metrics: &RegionMetrics) -> f64 {
        let d_start = self.start.distance(metrics);
        let d_end = self.end.distance(metrics);
        let span = d_start - d_end;
        if !span.is_finite() || span.abs() < f64::EPSILON {
            return 0.0;
        }
        crate::unit(d_start / span)
    }
}

impl Default for ScrollRange {
    fn default() -> Self {
        Self::FULL_PASS
    }
}

/// Layout of the tracked region at one scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionMetrics {
    /// Element top edge in viewport coordinates (negative once scrolled past).
    pub top: f64,
    /// Element height.
    pub height: f64,
    /// Viewport height.
    pub viewport_height: f64,
}

impl RegionMetrics {
    /// Metrics for an element at document offset `region_top` while the
    /// document is scrolled to `scroll_y`.
    #[must_use]
    pub fn at_scroll(region_top: f64, height: f64, viewport_height: f64, scroll_y: f64) -> Self {
        Self {
            top: region_top - scroll_y,
            height,
            viewport_height,
        }
    }
}

/// Document scroll offset at which `range` reports `progress`.
///
/// Inverse of [`ScrollRange::progress`] for hosts and tests that want to
/// script a progress value. Returns `None` for a degenerate range.
#[must_use]
pub fn scroll_for_progress(
    range: &ScrollRange,
    region_top: f64,
    height: f64,
    viewport_height: f64,
    progress: f64,
) -> Option<f64> {
    let at_zero = RegionMetrics::at_scroll(region_top, height, viewport_height, 0.0);
    let d_start = range.start.distance(&at_zero);
    let d_end = range.end.distance(&at_zero);
    let span = d_start - d_end;
    if !span.is_finite() || span.abs() < f64::EPSILON {
        return None;
    }
    // d_start(s) = d_start - s, and progress = d_start(s) / span.
    Some(d_start - progress * span)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f64 = 1000.0;
    const H: f64 = 2000.0;
    const TOP: f64 = 1500.0;

    fn progress_at(scroll_y: f64) -> f64 {
        ScrollRange::FULL_PASS.progress(&RegionMetrics::at_scroll(TOP, H, VH, scroll_y))
    }

    #[test]
    fn full_pass_endpoints() {
        // Element start meets viewport end when scroll_y = TOP - VH.
        assert_eq!(progress_at(TOP - VH), 0.0);
        // Element end meets viewport start when scroll_y = TOP + H.
        assert_eq!(progress_at(TOP + H), 1.0);
    }

    #[test]
    fn linear_between_endpoints() {
        let start = TOP - VH;
        let end = TOP + H;
        let mid = progress_at((start + end) / 2.0);
        assert!((mid - 0.5).abs() < 1e-12);
    }

    #[test]
    fn clamps_outside_range() {
        assert_eq!(progress_at(-10_000.0), 0.0);
        assert_eq!(progress_at(1e9), 1.0);
    }

    #[test]
    fn degenerate_and_nan_metrics_are_zero() {
        let range = ScrollRange {
            start: Intersection::new(Edge::Start, Edge::Start),
            end: Intersection::new(Edge::Start, Edge::Start),
        };
        assert_eq!(range.progress(&RegionMetrics::at_scroll(TOP, H, VH, 0.0)), 0.0);
        let nan = RegionMetrics {
            top: f64::NAN,
            height: H,
            viewport_height: VH,
        };
        assert_eq!(ScrollRange::FULL_PASS.progress(&nan), 0.0);
    }

    #[test]
    fn center_range() {
        let range = ScrollRange {
            start: Intersection::new(Edge::Start, Edge::Center),
            end: Intersection::new(Edge::End, Edge::Center),
        };
        // Element start at viewport center.
        let m = RegionMetrics::at_scroll(TOP, H, VH, TOP - VH / 2.0);
        assert_eq!(range.progress(&m), 0.0);
    }

    #[test]
    fn inverse_round_trips() {
        for p in [0.0, 0.25, 0.59, 0.61, 1.0] {
            let y = scroll_for_progress(&ScrollRange::FULL_PASS, TOP, H, VH, p).unwrap();
            assert!((progress_at(y) - p).abs() < 1e-12, "p={p}");
        }
    }
}
