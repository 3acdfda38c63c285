#![forbid(unsafe_code)]

//! Animation primitives and easing curves.
//!
//! # Invariants
//!
//! 1. Every easing function maps `[0, 1]` into `[0, 1]`, is monotone
//!    non-decreasing, and returns exactly `0.0` at `t = 0` and exactly `1.0`
//!    at `t = 1`. Inputs outside the unit interval (and NaN) are clamped
//!    first.
//! 2. [`Animation::value`] is always finite.
//! 3. [`Animation::tick`] with `Duration::ZERO` never changes observable state.

pub mod keyframes;
pub mod spring;
pub mod tween;

use std::time::Duration;

/// A time-driven value source.
///
/// Implementors advance only through [`tick`](Animation::tick); nothing reads
/// a wall clock.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its terminal state.
    fn is_complete(&self) -> bool;

    /// Current output value.
    fn value(&self) -> f64;

    /// Return to the initial state.
    fn reset(&mut self);
}

/// Plain easing function signature.
pub type EasingFn = fn(f64) -> f64;

#[inline]
fn clamp_t(t: f64) -> f64 {
    crate::unit(t)
}

/// Identity easing.
#[must_use]
pub fn linear(t: f64) -> f64 {
    clamp_t(t)
}

/// Quadratic ease-in.
#[must_use]
pub fn ease_in(t: f64) -> f64 {
    let t = clamp_t(t);
    t * t
}

/// Quadratic ease-out.
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let t = clamp_t(t);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out.
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = clamp_t(t);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = clamp_t(t);
    1.0 - (1.0 - t).powi(3)
}

/// Exponential ease-out: fast start, long soft landing.
///
/// The raw curve `1 - 2^(-10t)` never reaches 1, so `t = 1` is pinned.
#[must_use]
pub fn ease_out_expo(t: f64) -> f64 {
    let t = clamp_t(t);
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2f64.powf(-10.0 * t)
    }
}

/// Named easing curve, usable from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    /// No easing.
    #[default]
    Linear,
    /// Quadratic ease-in.
    EaseIn,
    /// Quadratic ease-out.
    EaseOut,
    /// Quadratic ease-in-out.
    EaseInOut,
    /// Cubic ease-out.
    EaseOutCubic,
    /// Exponential ease-out.
    EaseOutExpo,
}

impl Easing {
    /// All variants, in declaration order.
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseOutCubic,
        Easing::EaseOutExpo,
    ];

    /// The function behind this curve.
    #[must_use]
    pub fn as_fn(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
            Self::EaseOutCubic => ease_out_cubic,
            Self::EaseOutExpo => ease_out_expo,
        }
    }

    /// Evaluate the curve at `t`.
    #[inline]
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        (self.as_fn())(t)
    }
}
