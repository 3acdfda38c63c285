#![forbid(unsafe_code)]

//! Simulated page: a scroll host that counts lock traffic, plus the layout
//! of one tracked region inside a scrollable document.

use std::cell::Cell;

use debris_core::geometry::Viewport;
use debris_core::scroll::{scroll_for_progress, RegionMetrics, ScrollRange};
use debris_runtime::ScrollHost;

/// A [`ScrollHost`] that records every toggle of the scroll flag.
#[derive(Debug)]
pub struct SimHost {
    enabled: Cell<bool>,
    disables: Cell<u32>,
    enables: Cell<u32>,
}

impl SimHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: Cell::new(true),
            disables: Cell::new(0),
            enables: Cell::new(0),
        }
    }

    #[must_use]
    pub fn scroll_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Times scrolling was disabled (lock acquisitions).
    #[must_use]
    pub fn disables(&self) -> u32 {
        self.disables.get()
    }

    /// Times scrolling was re-enabled (lock releases).
    #[must_use]
    pub fn enables(&self) -> u32 {
        self.enables.get()
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollHost for SimHost {
    fn set_scroll_enabled(&self, enabled: bool) {
        if enabled {
            self.enables.set(self.enables.get() + 1);
        } else {
            self.disables.set(self.disables.get() + 1);
        }
        self.enabled.set(enabled);
    }
}

/// Document layout around the tracked hero region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimPage {
    /// Region offset from the document top.
    pub region_top: f64,
    /// Region height.
    pub region_height: f64,
    pub viewport: Viewport,
    pub range: ScrollRange,
}

impl SimPage {
    /// A 300vh hero at the top of the document.
    #[must_use]
    pub fn hero(viewport: Viewport) -> Self {
        Self {
            region_top: 0.0,
            region_height: viewport.height * 3.0,
            viewport,
            range: ScrollRange::default(),
        }
    }

    /// Document scroll offset where the region reports `progress`.
    #[must_use]
    pub fn scroll_y(&self, progress: f64) -> f64 {
        scroll_for_progress(
            &self.range,
            self.region_top,
            self.region_height,
            self.viewport.height,
            progress,
        )
        .unwrap_or(0.0)
    }

    /// Layout sample at the scroll offset for `progress`.
    #[must_use]
    pub fn metrics_at(&self, progress: f64) -> RegionMetrics {
        RegionMetrics::at_scroll(
            self.region_top,
            self.region_height,
            self.viewport.height,
            self.scroll_y(progress),
        )
    }

    /// Same page after a resize. The region keeps its 300vh height.
    #[must_use]
    pub fn resized(&self, viewport: Viewport) -> Self {
        Self {
            region_height: viewport.height * 3.0,
            viewport,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_counts_toggles() {
        let host = SimHost::new();
        assert!(host.scroll_enabled());
        host.set_scroll_enabled(false);
        assert!(!host.scroll_enabled());
        host.set_scroll_enabled(true);
        assert_eq!((host.disables(), host.enables()), (1, 1));
    }

    #[test]
    fn page_metrics_round_trip() {
        let page = SimPage::hero(Viewport::new(1440.0, 900.0));
        for p in [0.0, 0.4, 0.6, 1.0] {
            let got = page.range.progress(&page.metrics_at(p));
            assert!((got - p).abs() < 1e-9);
        }
        let resized = page.resized(Viewport::new(600.0, 800.0));
        assert_eq!(resized.region_height, 2400.0);
    }
}
