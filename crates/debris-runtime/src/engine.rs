#![forbid(unsafe_code)]

//! The handoff engine: host events in, parameter values and events out.
//!
//! [`HandoffEngine`] owns one instance of every component and runs them in
//! a fixed order inside each host callback:
//!
//! ```text
//! on_scroll ──▶ ProgressSource ──▶ HandoffController ──▶ ParameterGraph
//!                                       │ commit
//!                                       ▼
//! advance ────▶ PlaybackDriver ──▶ ParameterGraph ──▶ SnapshotStore ──▶ CompletionCoordinator
//! ```
//!
//! Every entry point returns the [`EngineEvent`]s it caused, in order.
//! After [`teardown`](HandoffEngine::teardown) every entry point is a no-op
//! returning no events.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use debris_core::scene::presets::hero_explosion;
//! use debris_runtime::{EngineConfig, HandoffEngine, MotionPreferences, ScrollHost};
//!
//! struct Page;
//! impl ScrollHost for Page {
//!     fn set_scroll_enabled(&self, _enabled: bool) {}
//! }
//!
//! let mut engine = HandoffEngine::new(
//!     EngineConfig::default(),
//!     hero_explosion().unwrap(),
//!     Rc::new(Page),
//!     MotionPreferences::default(),
//! )
//! .unwrap();
//! engine.on_progress(0.2);
//! engine.advance(Duration::from_millis(16));
//! assert!(engine.phase().is_live());
//! ```

use std::rc::Rc;
use std::time::Duration;

use debris_core::geometry::Viewport;
use debris_core::graph::ParameterValues;
use debris_core::scene::Scene;
use debris_core::scroll::RegionMetrics;
use debris_core::transform::Transform;
use tracing::{debug, debug_span, info, trace};
use web_time::Instant;

use crate::cancellation::{CancellationSource, CancellationToken};
use crate::clock::FrameClock;
use crate::config::{ConfigError, EngineConfig};
use crate::content::NavigationTarget;
use crate::controller::{Commit, EnginePhase, HandoffController};
use crate::coordinator::{CompletionCoordinator, NavigationRequest};
use crate::motion::{DisableReason, MotionPreferences};
use crate::playback::PlaybackDriver;
use crate::progress::ProgressSource;
use crate::scroll_lock::{HostInput, ScrollHost, ScrollLockManager};
use crate::snapshot::{CaptureOutcome, SnapshotStore};
use crate::Dispose;

/// Lifecycle notification returned from engine entry points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum EngineEvent {
    /// `LIVE → COMMITTED`; playback starts at `start`.
    Committed { start: f64 },
    ScrollLockAcquired,
    PlaybackCompleted,
    /// Debris captured; `groups` entries in the snapshot.
    Frozen { groups: usize },
    ScrollLockReleased,
    NavigationRequested { request: NavigationRequest },
    /// The handoff was switched off while `LIVE`.
    HandoffDisabled { reason: DisableReason },
    Disposed,
}

impl EngineEvent {
    /// Stable snake_case name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Committed { .. } => "committed",
            Self::ScrollLockAcquired => "scroll_lock_acquired",
            Self::PlaybackCompleted => "playback_completed",
            Self::Frozen { .. } => "frozen",
            Self::ScrollLockReleased => "scroll_lock_released",
            Self::NavigationRequested { .. } => "navigation_requested",
            Self::HandoffDisabled { .. } => "handoff_disabled",
            Self::Disposed => "disposed",
        }
    }
}

/// Per-instance counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineStats {
    /// Progress samples received.
    pub samples: u64,
    /// Samples dropped because the engine had left `LIVE`.
    pub ignored_samples: u64,
    /// Frames advanced.
    pub frames: u64,
    pub commits: u64,
    pub lock_acquires: u64,
    pub lock_releases: u64,
    pub captures: u64,
    pub navigation_requests: u64,
}

/// One scroll-coupled handoff, from mount to teardown.
pub struct HandoffEngine {
    config: EngineConfig,
    scene: Scene,
    progress: ProgressSource,
    controller: HandoffController,
    lock: ScrollLockManager,
    playback: Option<PlaybackDriver>,
    snapshot: SnapshotStore,
    coordinator: CompletionCoordinator,
    clock: FrameClock,
    prefs: MotionPreferences,
    values: ParameterValues,
    combined: f64,
    stats: EngineStats,
    liveness: CancellationSource,
}

impl HandoffEngine {
    /// Mount an engine. Fails only on an invalid `config`.
    pub fn new(
        config: EngineConfig,
        scene: Scene,
        host: Rc<dyn ScrollHost>,
        prefs: MotionPreferences,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let mut controller = HandoffController::new(config.threshold, config.deep_link);
        controller.set_disabled(prefs.disable_reason(config.small_viewport_px));
        let values = scene.evaluate(0.0);
        debug!(
            target: "debris.engine",
            params = scene.graph().len(),
            groups = scene.groups().len(),
            disabled = ?controller.disabled_reason(),
            "engine mounted"
        );
        Ok(Self {
            progress: ProgressSource::new(config.scroll_range, config.spring),
            coordinator: CompletionCoordinator::new(
                config.completion_threshold,
                config.settle_delay(),
                NavigationTarget::default(),
            ),
            clock: FrameClock::new(config.max_frame()),
            lock: ScrollLockManager::new(host),
            controller,
            playback: None,
            snapshot: SnapshotStore::new(),
            prefs,
            values,
            combined: 0.0,
            stats: EngineStats::default(),
            liveness: CancellationSource::new(),
            scene,
            config,
        })
    }

    /// Where to navigate once the debris settles.
    pub fn set_navigation_target(&mut self, target: NavigationTarget) {
        self.coordinator.set_target(target);
    }

    /// A layout sample of the tracked region.
    pub fn on_scroll(&mut self, metrics: RegionMetrics) -> Vec<EngineEvent> {
        let raw = self.progress.range().progress(&metrics);
        self.on_progress(raw)
    }

    /// A raw progress sample, already mapped through the scroll range.
    pub fn on_progress(&mut self, raw: f64) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.liveness.is_cancelled() {
            return events;
        }
        self.stats.samples += 1;
        if !self.controller.phase().is_live() {
            self.stats.ignored_samples += 1;
            debug!(
                target: "debris.engine",
                phase = %self.controller.phase(),
                raw,
                "sample ignored after commit"
            );
            return events;
        }
        self.progress.sample_raw(raw);
        self.step_live(&mut events);
        events
    }

    /// A display-refresh callback at host time `now`.
    pub fn on_frame(&mut self, now: Instant) -> Vec<EngineEvent> {
        if self.liveness.is_cancelled() {
            return Vec::new();
        }
        let dt = self.clock.tick(now);
        self.advance(dt)
    }

    /// Advance every time-driven component by `dt` (capped at `max_frame`).
    pub fn advance(&mut self, dt: Duration) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.liveness.is_cancelled() {
            return events;
        }
        let dt = dt.min(self.config.max_frame());
        let _span = debug_span!(
            "debris.engine.frame",
            phase = %self.controller.phase(),
            dt_us = dt.as_micros() as u64
        )
        .entered();
        self.stats.frames += 1;

        match self.controller.phase() {
            // Until the first layout sample there is no observation to make.
            EnginePhase::Live if self.progress.is_primed() => {
                self.progress.advance(dt);
                self.step_live(&mut events);
            }
            EnginePhase::Live => {}
            EnginePhase::Committed | EnginePhase::Playing => self.step_playback(dt, &mut events),
            EnginePhase::Frozen => {}
        }

        let frozen = self.controller.phase() == EnginePhase::Frozen;
        if let Some(request) = self.coordinator.poll(self.combined, frozen, dt) {
            self.stats.navigation_requests += 1;
            events.push(EngineEvent::NavigationRequested { request });
        }
        trace!(target: "debris.engine", progress = self.combined, "frame");
        events
    }

    fn step_live(&mut self, events: &mut Vec<EngineEvent>) {
        let smoothed = self.progress.value();
        match self.controller.observe(smoothed) {
            Some(commit) => self.commit(commit, events),
            None => {
                self.combined = smoothed;
                self.scene.graph().evaluate_into(smoothed, &mut self.values);
            }
        }
    }

    fn commit(&mut self, commit: Commit, events: &mut Vec<EngineEvent>) {
        self.stats.commits += 1;
        self.combined = commit.start;
        self.scene.graph().evaluate_into(commit.start, &mut self.values);
        events.push(EngineEvent::Committed {
            start: commit.start,
        });
        if self.lock.acquire() {
            self.stats.lock_acquires += 1;
            events.push(EngineEvent::ScrollLockAcquired);
        }
        self.playback = Some(PlaybackDriver::start(
            commit.start,
            self.config.playback_duration(),
            self.config.playback_easing,
        ));
        self.controller.begin_playback();
    }

    fn step_playback(&mut self, dt: Duration, events: &mut Vec<EngineEvent>) {
        let Some(frame) = self.playback.as_mut().and_then(|driver| driver.advance(dt)) else {
            return;
        };
        self.combined = frame.value;
        self.scene.graph().evaluate_into(frame.value, &mut self.values);
        if frame.just_completed {
            events.push(EngineEvent::PlaybackCompleted);
            self.freeze(events);
        }
    }

    fn freeze(&mut self, events: &mut Vec<EngineEvent>) {
        if self.controller.phase() == EnginePhase::Frozen {
            return;
        }
        let outcome = self.snapshot.capture(
            &self.scene,
            &self.values,
            self.prefs.viewport,
            &self.config.bounds,
        );
        if !self.controller.freeze() {
            return;
        }
        if let CaptureOutcome::Captured { groups } = outcome {
            self.stats.captures += 1;
            info!(target: "debris.engine", groups, "debris frozen");
            events.push(EngineEvent::Frozen { groups });
        }
        self.release_lock(events);
    }

    fn release_lock(&mut self, events: &mut Vec<EngineEvent>) {
        if self.lock.release() {
            self.stats.lock_releases += 1;
            events.push(EngineEvent::ScrollLockReleased);
        }
    }

    /// The viewport changed size.
    pub fn on_resize(&mut self, viewport: Viewport) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.liveness.is_cancelled() {
            return events;
        }
        self.prefs.viewport = viewport;
        self.refresh_disabled(&mut events);
        events
    }

    /// The reduced-motion preference changed.
    pub fn set_reduced_motion(&mut self, reduced: bool) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.liveness.is_cancelled() {
            return events;
        }
        self.prefs.reduced_motion = reduced;
        self.refresh_disabled(&mut events);
        events
    }

    fn refresh_disabled(&mut self, events: &mut Vec<EngineEvent>) {
        let reason = self.prefs.disable_reason(self.config.small_viewport_px);
        if self.controller.set_disabled(reason) {
            if let Some(reason) = reason {
                events.push(EngineEvent::HandoffDisabled { reason });
            }
        }
    }

    /// Whether the host's capture-phase handler should cancel `input`.
    #[must_use]
    pub fn suppresses_input(&self, input: &HostInput) -> bool {
        self.lock.suppresses(input)
    }

    /// Stop playback, clear the pending navigation, release the scroll
    /// lock. Safe to call in any phase and more than once.
    pub fn teardown(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if !self.liveness.cancel() {
            return events;
        }
        if let Some(driver) = self.playback.as_mut() {
            driver.dispose();
        }
        self.coordinator.dispose();
        self.release_lock(&mut events);
        self.lock.dispose();
        info!(
            target: "debris.engine",
            phase = %self.controller.phase(),
            frames = self.stats.frames,
            "engine disposed"
        );
        events.push(EngineEvent::Disposed);
        events
    }

    /// Combined progress: smoothed scroll progress while `LIVE`, playback
    /// progress afterwards.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.combined
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.controller.phase()
    }

    /// Current parameter values. Held fixed once frozen.
    #[must_use]
    pub fn values(&self) -> &ParameterValues {
        &self.values
    }

    /// Transform to paint for `group`: the frozen rest transform when one
    /// was captured, otherwise the live one.
    #[must_use]
    pub fn transform(&self, group: &str) -> Option<Transform> {
        self.snapshot
            .rest(group)
            .or_else(|| self.scene.transform(group, &self.values))
    }

    /// Value of a named parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<f64> {
        self.scene
            .graph()
            .lookup(name)
            .and_then(|id| self.values.get(id))
    }

    #[must_use]
    pub fn snapshot(&self) -> &SnapshotStore {
        &self.snapshot
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn preferences(&self) -> MotionPreferences {
        self.prefs
    }

    #[must_use]
    pub fn disabled_reason(&self) -> Option<DisableReason> {
        self.controller.disabled_reason()
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.lock.is_held()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(PlaybackDriver::is_running)
    }

    /// Token cancelled by teardown; host closures check it before calling in.
    #[must_use]
    pub fn liveness(&self) -> CancellationToken {
        self.liveness.token()
    }
}

impl std::fmt::Debug for HandoffEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffEngine")
            .field("phase", &self.controller.phase())
            .field("progress", &self.combined)
            .field("locked", &self.lock.is_held())
            .field("stats", &self.stats)
            .field("disposed", &self.liveness.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Dispose for HandoffEngine {
    fn dispose(&mut self) {
        self.teardown();
    }

    fn is_disposed(&self) -> bool {
        self.liveness.is_cancelled()
    }
}

impl Drop for HandoffEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
