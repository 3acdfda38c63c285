#![forbid(unsafe_code)]

//! Handoff Controller: the one-shot phase machine.
//!
//! # States
//!
//! ```text
//!  LIVE ──crossing──▶ COMMITTED ──begin_playback──▶ PLAYING ──freeze──▶ FROZEN
//! ```
//!
//! - `LIVE`: every progress sample is compared with the previous one. The
//!   first observed rise from below the threshold to at-or-above it commits.
//! - `COMMITTED` / `PLAYING` / `FROZEN`: samples are ignored. There is no
//!   path back to `LIVE`.
//!
//! The controller only decides; the engine performs the side effects of
//! each transition (lock, playback, capture) in order.
//!
//! # Invariants
//!
//! 1. At most one [`Commit`] is ever returned per controller.
//! 2. The very first sample never commits, whatever its value.
//! 3. While disabled, samples are not recorded; re-enabling starts over
//!    with no previous sample, so the first-sample rule applies again.

use std::fmt;

use tracing::{debug, info};

use crate::config::DeepLinkPolicy;
use crate::motion::DisableReason;

/// Engine phase. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnginePhase {
    /// Scroll-reactive.
    Live,
    /// Threshold crossed; playback not yet started.
    Committed,
    /// Playback driver owns progress.
    Playing,
    /// Debris captured. Terminal.
    Frozen,
}

impl EnginePhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::Committed => "COMMITTED",
            Self::Playing => "PLAYING",
            Self::Frozen => "FROZEN",
        }
    }

    /// Whether live progress still drives the parameter graph.
    #[must_use]
    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

impl fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The irreversible decision to leave `LIVE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Commit {
    /// Progress at the moment of crossing; playback starts here.
    pub start: f64,
}

/// Watches progress for the rising threshold crossing.
#[derive(Debug, Clone)]
pub struct HandoffController {
    threshold: f64,
    policy: DeepLinkPolicy,
    phase: EnginePhase,
    previous: Option<f64>,
    armed: bool,
    disabled: Option<DisableReason>,
    start: Option<f64>,
}

impl HandoffController {
    #[must_use]
    pub fn new(threshold: f64, policy: DeepLinkPolicy) -> Self {
        Self {
            threshold: debris_core::unit(threshold),
            policy,
            phase: EnginePhase::Live,
            previous: None,
            armed: false,
            disabled: None,
            start: None,
        }
    }

    /// Feed one smoothed progress sample. Returns `Some` exactly once.
    pub fn observe(&mut self, progress: f64) -> Option<Commit> {
        if !self.phase.is_live() || self.disabled.is_some() {
            return None;
        }
        let current = debris_core::unit(progress);
        let Some(previous) = self.previous.replace(current) else {
            if current >= self.threshold {
                self.armed = self.policy == DeepLinkPolicy::ArmOnIncrease;
                debug!(
                    target: "debris.handoff",
                    progress = current,
                    armed = self.armed,
                    "first sample already past threshold"
                );
            }
            return None;
        };

        let crossed = previous < self.threshold && current >= self.threshold;
        let armed_rise = self.armed && current > previous && current >= self.threshold;
        if !(crossed || armed_rise) {
            return None;
        }

        self.phase = EnginePhase::Committed;
        self.start = Some(current);
        self.armed = false;
        info!(
            target: "debris.handoff",
            previous,
            start = current,
            threshold = self.threshold,
            "handoff committed"
        );
        Some(Commit { start: current })
    }

    /// `COMMITTED → PLAYING`. Returns `false` from any other phase.
    pub fn begin_playback(&mut self) -> bool {
        self.advance(EnginePhase::Committed, EnginePhase::Playing)
    }

    /// `PLAYING → FROZEN`. Returns `false` from any other phase.
    pub fn freeze(&mut self) -> bool {
        self.advance(EnginePhase::Playing, EnginePhase::Frozen)
    }

    fn advance(&mut self, from: EnginePhase, to: EnginePhase) -> bool {
        if self.phase != from {
            return false;
        }
        self.phase = to;
        debug!(target: "debris.handoff", %from, %to, "phase transition");
        true
    }

    /// Enable or disable the controller. Only effective while `LIVE`.
    ///
    /// Returns `true` when the disabled state actually changed.
    pub fn set_disabled(&mut self, reason: Option<DisableReason>) -> bool {
        if !self.phase.is_live() || self.disabled == reason {
            return false;
        }
        self.disabled = reason;
        match reason {
            Some(reason) => {
                debug!(target: "debris.handoff", %reason, "handoff disabled");
            }
            None => {
                self.previous = None;
                self.armed = false;
                debug!(target: "debris.handoff", "handoff re-enabled");
            }
        }
        true
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    #[must_use]
    pub fn disabled_reason(&self) -> Option<DisableReason> {
        self.disabled
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.is_some()
    }

    /// Whether a landing past the threshold is waiting for a rise.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Playback start value, once committed.
    #[must_use]
    pub fn start_value(&self) -> Option<f64> {
        self.start
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn policy(&self) -> DeepLinkPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> HandoffController {
        HandoffController::new(0.6, DeepLinkPolicy::RequireCrossing)
    }

    #[test]
    fn rising_crossing_commits_once() {
        let mut c = controller();
        assert_eq!(c.observe(0.0), None);
        assert_eq!(c.observe(0.59), None);
        assert_eq!(c.observe(0.61), Some(Commit { start: 0.61 }));
        assert_eq!(c.phase(), EnginePhase::Committed);
        assert_eq!(c.observe(0.2), None);
        assert_eq!(c.observe(0.9), None);
        assert_eq!(c.start_value(), Some(0.61));
    }

    #[test]
    fn exact_threshold_counts_as_crossing() {
        let mut c = controller();
        c.observe(0.5);
        assert_eq!(c.observe(0.6), Some(Commit { start: 0.6 }));
    }

    #[test]
    fn first_sample_never_commits() {
        let mut c = controller();
        assert_eq!(c.observe(0.9), None);
        assert!(!c.is_armed());
        // Further rises above the threshold are not crossings.
        assert_eq!(c.observe(0.95), None);
        assert_eq!(c.observe(0.4), None);
        assert!(c.observe(0.7).is_some());
    }

    #[test]
    fn arm_on_increase_commits_on_first_rise() {
        let mut c = HandoffController::new(0.6, DeepLinkPolicy::ArmOnIncrease);
        assert_eq!(c.observe(0.8), None);
        assert!(c.is_armed());
        assert_eq!(c.observe(0.8), None);
        assert_eq!(c.observe(0.75), None);
        assert_eq!(c.observe(0.76), Some(Commit { start: 0.76 }));
        assert!(!c.is_armed());
    }

    #[test]
    fn nan_is_treated_as_zero() {
        let mut c = controller();
        c.observe(f64::NAN);
        assert_eq!(c.observe(0.7), Some(Commit { start: 0.7 }));
    }

    #[test]
    fn transitions_are_ordered() {
        let mut c = controller();
        assert!(!c.begin_playback());
        assert!(!c.freeze());
        c.observe(0.0);
        c.observe(1.0);
        assert!(!c.freeze());
        assert!(c.begin_playback());
        assert!(!c.begin_playback());
        assert!(c.freeze());
        assert!(!c.freeze());
        assert_eq!(c.phase(), EnginePhase::Frozen);
    }

    #[test]
    fn disabled_controller_stays_live() {
        let mut c = controller();
        assert!(c.set_disabled(Some(DisableReason::ReducedMotion)));
        assert!(!c.set_disabled(Some(DisableReason::ReducedMotion)));
        c.observe(0.0);
        assert_eq!(c.observe(1.0), None);
        assert_eq!(c.phase(), EnginePhase::Live);
    }

    #[test]
    fn re_enable_forgets_previous_sample() {
        let mut c = controller();
        c.observe(0.3);
        c.set_disabled(Some(DisableReason::SmallViewport));
        assert!(c.set_disabled(None));
        // First sample after re-enable cannot commit.
        assert_eq!(c.observe(0.9), None);
        c.observe(0.5);
        assert!(c.observe(0.65).is_some());
    }

    #[test]
    fn disable_after_commit_is_ignored() {
        let mut c = controller();
        c.observe(0.0);
        c.observe(0.7);
        assert!(!c.set_disabled(Some(DisableReason::SmallViewport)));
        assert_eq!(c.disabled_reason(), None);
        assert!(c.begin_playback());
    }

    #[test]
    fn phase_display() {
        assert_eq!(EnginePhase::Frozen.to_string(), "FROZEN");
        assert!(EnginePhase::Live < EnginePhase::Committed);
    }
}
