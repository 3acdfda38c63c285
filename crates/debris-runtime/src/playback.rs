#![forbid(unsafe_code)]

//! Playback Driver: the autonomous half of the handoff.
//!
//! A single eased [`Tween`] from the committed start value to 1.0. The
//! driver is the only writer of combined progress while the engine is
//! `PLAYING`. Completion is reported once, on the frame that reaches the
//! end. After [`cancel`](PlaybackDriver::cancel) or dispose, `advance`
//! returns `None` and nothing else is written.

use std::time::Duration;

use debris_core::animation::tween::{PlaybackState, Tween};
use debris_core::animation::{Animation, Easing};
use tracing::{debug, trace};

use crate::cancellation::{CancellationSource, CancellationToken};
use crate::Dispose;

/// One written playback value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackFrame {
    /// Combined progress for this frame.
    pub value: f64,
    /// `true` on the single frame that reached 1.0.
    pub just_completed: bool,
}

/// Fixed-duration eased playback to 1.0.
#[derive(Debug)]
pub struct PlaybackDriver {
    tween: Tween,
    cancel: CancellationSource,
    completion_reported: bool,
    frames: u64,
}

impl PlaybackDriver {
    /// Start playing from `start` immediately.
    #[must_use]
    pub fn start(start: f64, duration: Duration, easing: Easing) -> Self {
        let start = debris_core::unit(start);
        let mut tween = Tween::new(start, 1.0, duration).easing(easing);
        tween.play();
        debug!(
            target: "debris.playback",
            start,
            duration_ms = duration.as_millis() as u64,
            ?easing,
            "playback started"
        );
        Self {
            tween,
            cancel: CancellationSource::new(),
            completion_reported: false,
            frames: 0,
        }
    }

    /// Advance by `dt` and return the value to write, if any.
    ///
    /// Returns `None` once cancelled, and on every call after the
    /// completing frame.
    pub fn advance(&mut self, dt: Duration) -> Option<PlaybackFrame> {
        if self.cancel.is_cancelled() || self.completion_reported {
            return None;
        }
        self.tween.tick(dt);
        self.frames += 1;
        let value = self.tween.value();
        let just_completed = self.tween.is_complete();
        if just_completed {
            self.completion_reported = true;
            debug!(target: "debris.playback", frames = self.frames, "playback completed");
        } else {
            trace!(target: "debris.playback", value, "playback frame");
        }
        Some(PlaybackFrame {
            value,
            just_completed,
        })
    }

    /// Stop without completing. Returns `false` if already stopped.
    pub fn cancel(&mut self) -> bool {
        if !self.cancel.cancel() {
            return false;
        }
        if !self.tween.is_complete() {
            self.tween.cancel();
            debug!(
                target: "debris.playback",
                value = self.tween.value(),
                "playback cancelled"
            );
        }
        true
    }

    /// Token that observes this driver's cancellation.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel.token()
    }

    /// Last written value (the start value before the first frame).
    #[must_use]
    pub fn value(&self) -> f64 {
        self.tween.value()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion_reported
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tween.state() == PlaybackState::Playing && !self.cancel.is_cancelled()
    }

    #[must_use]
    pub fn start_value(&self) -> f64 {
        self.tween.from()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.tween.elapsed()
    }

    /// Frames written so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Dispose for PlaybackDriver {
    fn dispose(&mut self) {
        self.cancel();
    }

    fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.dispose();
    }
}
