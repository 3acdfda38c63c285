#![forbid(unsafe_code)]

//! Damped spring used as the progress smoothing filter.
//!
//! Raw scroll ratios arrive in bursts: a fast trackpad flick can move the
//! tracked region by a large fraction of its range between two frames. The
//! spring turns that step input into a continuous signal:
//!
//!   a = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): pull toward the target. Clamped to at least 0.1.
//! - **damping** (c): velocity drag. At `c = 2√k` the filter is critically
//!   damped and never overshoots a step input, which is what the progress
//!   source wants. [`SpringConfig::critical`] builds that configuration.
//! - **rest_delta**: distance to target below which (together with a small
//!   velocity) the spring snaps onto the target and stops integrating.
//!
//! # Integration
//!
//! Semi-implicit Euler, sub-stepped at 4 ms so that a long frame (tab
//! switch, debugger pause) cannot destabilize a stiff spring.
//!
//! # Invariants
//!
//! 1. [`Animation::value`] is the position clamped to `[0, 1]`.
//! 2. A resting spring stays at rest until [`Spring::set_target`] moves the
//!    target by more than `rest_delta`, or [`Spring::snap_to`] is called.
//! 3. Non-finite targets are ignored.

use std::time::Duration;

use super::Animation;

const MAX_STEP_SECS: f64 = 0.004;
const MIN_STIFFNESS: f64 = 0.1;
const REST_SPEED: f64 = 0.01;

/// Spring tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringConfig {
    /// Restoring force strength.
    pub stiffness: f64,
    /// Velocity drag.
    pub damping: f64,
    /// Distance to target treated as "arrived".
    pub rest_delta: f64,
}

impl SpringConfig {
    /// Critically damped configuration for `stiffness`.
    #[must_use]
    pub fn critical(stiffness: f64) -> Self {
        let k = stiffness.max(MIN_STIFFNESS);
        Self {
            stiffness: k,
            damping: 2.0 * k.sqrt(),
            rest_delta: 0.001,
        }
    }

    /// Damping ratio `c / 2√k`; 1.0 is critical.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * self.stiffness.max(MIN_STIFFNESS).sqrt())
    }
}

impl Default for SpringConfig {
    /// Stiffness 120 with critical damping.
    fn default() -> Self {
        Self::critical(120.0)
    }
}

/// A damped spring chasing a movable target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    rest_delta: f64,
    at_rest: bool,
}

impl Spring {
    /// A spring resting at `initial`.
    #[must_use]
    pub fn new(initial: f64, config: SpringConfig) -> Self {
        let initial = if initial.is_finite() { initial } else { 0.0 };
        Self {
            position: initial,
            velocity: 0.0,
            target: initial,
            initial,
            stiffness: config.stiffness.max(MIN_STIFFNESS),
            damping: config.damping.max(0.0),
            rest_delta: config.rest_delta.abs(),
            at_rest: true,
        }
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity in units per second.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the spring has settled.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Move the target. A resting spring within `rest_delta` of the new
    /// target lands on it directly; anything else wakes the spring.
    pub fn set_target(&mut self, target: f64) {
        if !target.is_finite() {
            return;
        }
        self.target = target;
        if self.at_rest && (self.position - target).abs() <= self.rest_delta {
            self.position = target;
        } else {
            self.at_rest = false;
        }
    }

    /// Jump to `value` with zero velocity, skipping the animation.
    pub fn snap_to(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    fn step(&mut self, dt: f64) {
        let acceleration =
            -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Integrate forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            self.step(step);
            remaining -= step;
        }
        if (self.position - self.target).abs() < self.rest_delta
            && self.velocity.abs() < REST_SPEED
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        crate::unit(self.position)
    }

    fn reset(&mut self) {
        self.snap_to(self.initial);
    }
}
