#![forbid(unsafe_code)]

//! Fixed-duration eased interpolation between two values.
//!
//! A [`Tween`] is the time source for autonomous playback: once started it
//! moves from `from` to `to` over a fixed duration, shaped by an [`Easing`].
//!
//! # Invariants
//!
//! 1. `value()` equals `from` while idle and `to` exactly once finished.
//! 2. While playing, `value()` is `from + (to - from) × ease(elapsed / duration)`;
//!    with a monotone easing and `to ≥ from` it never decreases.
//! 3. `tick()` only advances in [`PlaybackState::Playing`].
//! 4. A cancelled tween never advances again; only [`Animation::reset`]
//!    returns it to idle.
//!
//! # Failure Modes
//!
//! - Zero duration: clamped to 1ns, so the first non-zero tick finishes.
//! - Non-finite endpoints: replaced with 0.0.

use std::time::Duration;

use super::{Animation, Easing};

/// Playback state of a [`Tween`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not yet started.
    Idle,
    /// Advancing on every tick.
    Playing,
    /// Reached `to`.
    Finished,
    /// Stopped before finishing; frozen at the last value.
    Cancelled,
}

/// Eased interpolation from `from` to `to` over `duration`.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
    state: PlaybackState,
}

impl Tween {
    /// Create an idle tween.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            from: finite(from),
            to: finite(to),
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            elapsed: Duration::ZERO,
            easing: Easing::Linear,
            state: PlaybackState::Idle,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Begin playback from the start. No-op unless idle.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Idle {
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop playback where it is.
    pub fn cancel(&mut self) {
        if self.state == PlaybackState::Playing || self.state == PlaybackState::Idle {
            self.state = PlaybackState::Cancelled;
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Start value.
    #[inline]
    #[must_use]
    pub fn from(&self) -> f64 {
        self.from
    }

    /// End value.
    #[inline]
    #[must_use]
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Time advanced so far, capped at the duration.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total duration.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear time fraction in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
        if self.elapsed >= self.duration {
            self.state = PlaybackState::Finished;
        }
    }

    fn is_complete(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    fn value(&self) -> f64 {
        match self.state {
            PlaybackState::Idle => self.from,
            PlaybackState::Finished => self.to,
            PlaybackState::Playing | PlaybackState::Cancelled => {
                self.from + (self.to - self.from) * self.easing.apply(self.fraction())
            }
        }
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.state = PlaybackState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn idle_holds_from() {
        let mut tween = Tween::new(0.61, 1.0, Duration::from_secs(5));
        tween.tick(FRAME);
        assert_eq!(tween.state(), PlaybackState::Idle);
        assert_eq!(tween.value(), 0.61);
    }

    #[test]
    fn finishes_exactly_on_target() {
        let mut tween = Tween::new(0.61, 1.0, Duration::from_secs(5)).easing(Easing::EaseOutExpo);
        tween.play();
        for _ in 0..400 {
            tween.tick(FRAME);
        }
        assert!(tween.is_complete());
        assert_eq!(tween.value(), 1.0);
        assert_eq!(tween.elapsed(), tween.duration());
    }

    #[test]
    fn playing_values_never_decrease() {
        let mut tween = Tween::new(0.2, 1.0, Duration::from_millis(500)).easing(Easing::EaseOutExpo);
        tween.play();
        let mut prev = tween.value();
        while !tween.is_complete() {
            tween.tick(Duration::from_millis(7));
            let v = tween.value();
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn cancel_freezes_value() {
        let mut tween = Tween::new(0.0, 1.0, Duration::from_secs(1));
        tween.play();
        tween.tick(Duration::from_millis(250));
        tween.cancel();
        let frozen = tween.value();
        tween.tick(Duration::from_secs(2));
        assert_eq!(tween.state(), PlaybackState::Cancelled);
        assert_eq!(tween.value(), frozen);
        tween.play();
        assert_eq!(tween.state(), PlaybackState::Cancelled);
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let mut tween = Tween::new(0.0, 1.0, Duration::ZERO);
        tween.play();
        tween.tick(Duration::from_nanos(1));
        assert!(tween.is_complete());
    }

    #[test]
    fn non_finite_endpoints_replaced() {
        let tween = Tween::new(f64::NAN, f64::INFINITY, FRAME);
        assert_eq!(tween.from(), 0.0);
        assert_eq!(tween.to(), 0.0);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut tween = Tween::new(0.0, 1.0, FRAME);
        tween.play();
        tween.tick(FRAME);
        tween.reset();
        assert_eq!(tween.state(), PlaybackState::Idle);
        assert_eq!(tween.fraction(), 0.0);
    }
}
