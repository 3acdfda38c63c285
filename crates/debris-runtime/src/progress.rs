#![forbid(unsafe_code)]

//! Progress Source: smoothed scroll progress of the tracked region.
//!
//! Raw progress comes from [`ScrollRange::progress`] and is clamped to
//! `[0, 1]`. It then drives a critically damped [`Spring`], whose position
//! is the published signal. The first sample snaps the spring so a page
//! that loads mid-scroll does not animate from zero.
//!
//! The source never decides phase transitions; it only reports values.

use std::time::Duration;

use debris_core::animation::spring::{Spring, SpringConfig};
use debris_core::animation::Animation;
use debris_core::scroll::{RegionMetrics, ScrollRange};
use tracing::trace;

/// Spring-smoothed viewport progress.
#[derive(Debug, Clone)]
pub struct ProgressSource {
    range: ScrollRange,
    spring: Spring,
    raw: f64,
    primed: bool,
}

impl ProgressSource {
    #[must_use]
    pub fn new(range: ScrollRange, spring: SpringConfig) -> Self {
        Self {
            range,
            spring: Spring::new(0.0, spring),
            raw: 0.0,
            primed: false,
        }
    }

    /// Feed one layout sample. Returns the clamped raw progress.
    pub fn sample(&mut self, metrics: &RegionMetrics) -> f64 {
        self.sample_raw(self.range.progress(metrics))
    }

    /// Feed a raw progress value directly. NaN becomes 0; out-of-range clamps.
    pub fn sample_raw(&mut self, raw: f64) -> f64 {
        let raw = debris_core::unit(raw);
        self.raw = raw;
        if self.primed {
            self.spring.set_target(raw);
        } else {
            self.spring.snap_to(raw);
            self.primed = true;
        }
        trace!(target: "debris.progress", raw, smoothed = self.value(), "sample");
        raw
    }

    /// Advance the smoothing filter.
    pub fn advance(&mut self, dt: Duration) {
        self.spring.tick(dt);
    }

    /// Smoothed progress in `[0, 1]`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.spring.value()
    }

    /// Last clamped raw sample.
    #[must_use]
    pub fn raw(&self) -> f64 {
        self.raw
    }

    /// Whether at least one sample has arrived.
    #[must_use]
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Whether the smoothed value has caught up with the raw value.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.spring.is_at_rest()
    }

    #[must_use]
    pub fn range(&self) -> &ScrollRange {
        &self.range
    }
}
