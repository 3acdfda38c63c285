#![forbid(unsafe_code)]

//! Host frame timestamps to per-frame deltas.

use std::time::Duration;

use web_time::Instant;

/// Converts animation-frame timestamps into capped deltas.
///
/// The first frame yields zero, as does a timestamp that moves backwards.
/// Deltas above `max_dt` (background tab, debugger pause) are capped, so a
/// long stall advances the animation by at most one capped step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_dt: Duration,
}

impl FrameClock {
    #[must_use]
    pub fn new(max_dt: Duration) -> Self {
        Self { last: None, max_dt }
    }

    /// Delta since the previous frame.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let dt = match self.last {
            Some(last) => now.checked_duration_since(last).unwrap_or(Duration::ZERO),
            None => Duration::ZERO,
        };
        if self.last.is_none_or(|last| now >= last) {
            self.last = Some(now);
        }
        dt.min(self.max_dt)
    }

    /// Cap applied to every delta.
    #[must_use]
    pub fn max_dt(&self) -> Duration {
        self.max_dt
    }

    /// Forget the previous timestamp.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
