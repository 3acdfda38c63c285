#![forbid(unsafe_code)]

//! Completion Coordinator: the single downstream side effect.
//!
//! Polled once per frame. It arms when the debris is frozen and combined
//! progress has reached the completion threshold, then counts frame time
//! down through the settle delay and emits exactly one
//! [`NavigationRequest`]. Cancelling (teardown) clears a pending countdown;
//! a cancelled or fired coordinator never emits again.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::cancellation::{CancellationSource, CancellationToken};
use crate::content::NavigationTarget;
use crate::Dispose;

/// How the host should scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// The fire-once navigation side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationRequest {
    pub target: NavigationTarget,
    pub behavior: ScrollBehavior,
}

impl fmt::Display for NavigationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.target, self.behavior)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Armed { remaining: Duration },
    Fired,
    Cancelled,
}

/// Fires one navigation request after the debris settles.
#[derive(Debug)]
pub struct CompletionCoordinator {
    threshold: f64,
    delay: Duration,
    target: NavigationTarget,
    state: State,
    timer: CancellationSource,
}

impl CompletionCoordinator {
    #[must_use]
    pub fn new(threshold: f64, delay: Duration, target: NavigationTarget) -> Self {
        Self {
            threshold: debris_core::unit(threshold),
            delay,
            target,
            state: State::Idle,
            timer: CancellationSource::new(),
        }
    }

    /// Replace the navigation target. Ignored once fired.
    pub fn set_target(&mut self, target: NavigationTarget) {
        if self.state != State::Fired {
            self.target = target;
        }
    }

    /// One frame of polling. Returns the request on the frame it fires.
    pub fn poll(&mut self, progress: f64, frozen: bool, dt: Duration) -> Option<NavigationRequest> {
        if self.timer.is_cancelled() {
            return None;
        }
        match self.state {
            State::Idle => {
                if !(frozen && progress >= self.threshold) {
                    return None;
                }
                debug!(
                    target: "debris.coordinator",
                    progress,
                    delay_ms = self.delay.as_millis() as u64,
                    "completion armed"
                );
                self.state = State::Armed {
                    remaining: self.delay,
                };
                if self.delay.is_zero() {
                    return Some(self.fire());
                }
                None
            }
            State::Armed { remaining } => {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    Some(self.fire())
                } else {
                    self.state = State::Armed { remaining };
                    None
                }
            }
            State::Fired | State::Cancelled => None,
        }
    }

    fn fire(&mut self) -> NavigationRequest {
        self.state = State::Fired;
        let request = NavigationRequest {
            target: self.target.clone(),
            behavior: ScrollBehavior::Smooth,
        };
        info!(target: "debris.coordinator", destination = %request.target, "navigation requested");
        request
    }

    /// Clear a pending countdown. Returns `false` if there was nothing to stop.
    pub fn cancel(&mut self) -> bool {
        if !self.timer.cancel() {
            return false;
        }
        if let State::Armed { remaining } = self.state {
            debug!(
                target: "debris.coordinator",
                remaining_ms = remaining.as_millis() as u64,
                "pending navigation cancelled"
            );
        }
        if self.state != State::Fired {
            self.state = State::Cancelled;
        }
        true
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self.state, State::Armed { .. })
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.state == State::Fired
    }

    /// Time left before firing, while armed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        match self.state {
            State::Armed { remaining } => Some(remaining),
            _ => None,
        }
    }

    #[must_use]
    pub fn target(&self) -> &NavigationTarget {
        &self.target
    }

    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.timer.token()
    }
}

impl Dispose for CompletionCoordinator {
    fn dispose(&mut self) {
        self.cancel();
    }

    fn is_disposed(&self) -> bool {
        self.timer.is_cancelled()
    }
}

impl Drop for CompletionCoordinator {
    fn drop(&mut self) {
        self.dispose();
    }
}
