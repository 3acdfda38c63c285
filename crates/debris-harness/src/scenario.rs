#![forbid(unsafe_code)]

//! Built-in scripted scenarios and the runner that replays them.
//!
//! Every scenario is a list of [`Step`]s replayed against a fresh
//! [`HandoffEngine`] mounted on a [`SimHost`]. Frames are driven through
//! [`HandoffEngine::on_frame`] with timestamps from a [`VirtualClock`], so a
//! run exercises the same frame-clock path a browser host would.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use debris_core::geometry::Viewport;
use debris_core::scene::presets::hero_explosion;
use debris_runtime::{
    ContentMap, DeepLinkPolicy, DisableReason, EngineConfig, EngineEvent, EnginePhase,
    HandoffEngine, HeroAssets, HostInput, MotionPreferences, ScrollKey,
};
use tracing::{debug, info};

use crate::determinism::{debris_digest, VirtualClock};
use crate::error::{HarnessError, Result};
use crate::report::{RunSummary, ScenarioReport, TimelineEntry};
use crate::sim_host::{SimHost, SimPage};

/// Desktop viewport every scenario mounts with.
pub const DESKTOP: Viewport = Viewport {
    width: 1440.0,
    height: 900.0,
};

/// Anchor of the region after the hero.
pub const NEXT_REGION: &str = "#tech-showcase";

/// One scripted host action.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Scroll so the region reports this raw progress.
    Scroll(f64),
    /// Run frames for this many virtual milliseconds.
    Wait(u64),
    Resize(Viewport),
    ReducedMotion(bool),
    /// Offer an input to the capture-phase handler.
    Input(HostInput),
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Scroll steadily down through the threshold.
    Rise,
    /// Bounce across the threshold many times.
    Oscillate,
    /// Mount already past the threshold.
    DeepLink,
    /// Unmount while playback is running.
    TeardownMidPlay,
    /// Mount with reduced motion requested.
    ReducedMotion,
    /// Shrink the viewport below the breakpoint before the threshold.
    SmallViewport,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::Rise,
        Scenario::Oscillate,
        Scenario::DeepLink,
        Scenario::TeardownMidPlay,
        Scenario::ReducedMotion,
        Scenario::SmallViewport,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Rise => "rise",
            Self::Oscillate => "oscillate",
            Self::DeepLink => "deep-link",
            Self::TeardownMidPlay => "teardown-mid-play",
            Self::ReducedMotion => "reduced-motion",
            Self::SmallViewport => "small-viewport",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Rise => "scroll down through the threshold; play, freeze and navigate once",
            Self::Oscillate => "scroll back and forth across the threshold; commit once",
            Self::DeepLink => "mount past the threshold, keep scrolling down",
            Self::TeardownMidPlay => "unmount two seconds into playback",
            Self::ReducedMotion => {
                "mount with reduced motion, toggle it off and on at the bottom; nothing plays"
            }
            Self::SmallViewport => "shrink below the breakpoint before the threshold",
        }
    }

    /// Mount-time motion preferences.
    #[must_use]
    pub fn preferences(self) -> MotionPreferences {
        MotionPreferences::new(DESKTOP).with_reduced_motion(self == Self::ReducedMotion)
    }

    /// The scripted host actions.
    #[must_use]
    pub fn steps(self) -> Vec<Step> {
        use Step::{Input, ReducedMotion, Resize, Scroll, Teardown, Wait};
        match self {
            Self::Rise => vec![
                Scroll(0.0),
                Wait(200),
                Scroll(0.3),
                Wait(300),
                Scroll(0.59),
                Wait(500),
                Scroll(0.65),
                Wait(500),
                Input(HostInput::Wheel { delta_y: 120.0 }),
                Input(HostInput::Key(ScrollKey::PageDown)),
                Input(HostInput::Other),
                Scroll(0.2),
                Wait(6000),
            ],
            Self::Oscillate => {
                let mut steps = vec![Scroll(0.0), Wait(100)];
                for _ in 0..10 {
                    steps.extend([Scroll(0.7), Wait(400), Scroll(0.4), Wait(400)]);
                }
                steps.push(Wait(6000));
                steps
            }
            Self::DeepLink => vec![
                Scroll(0.8),
                Wait(300),
                Scroll(0.9),
                Wait(300),
                Scroll(1.0),
                Wait(6000),
            ],
            Self::TeardownMidPlay => vec![
                Scroll(0.0),
                Wait(100),
                Scroll(0.8),
                Wait(2000),
                Teardown,
                Wait(5000),
            ],
            Self::ReducedMotion => vec![
                Scroll(0.0),
                Wait(100),
                Scroll(0.5),
                Wait(500),
                Scroll(1.0),
                Wait(6000),
                ReducedMotion(false),
                Wait(500),
                ReducedMotion(true),
                Wait(100),
            ],
            Self::SmallViewport => vec![
                Scroll(0.0),
                Wait(100),
                Scroll(0.4),
                Wait(300),
                Resize(Viewport::new(600.0, 800.0)),
                Scroll(0.8),
                Wait(500),
                Scroll(1.0),
                Wait(6000),
            ],
        }
    }

    /// What a run under `config` must produce.
    #[must_use]
    pub fn expectations(self, config: &EngineConfig) -> Expectations {
        let completes = Expectations {
            final_phase: EnginePhase::Frozen,
            commits: 1,
            navigations: 1,
            disabled: None,
            min_suppressed: 0,
            digest: true,
        };
        let stays_live = Expectations {
            final_phase: EnginePhase::Live,
            commits: 0,
            navigations: 0,
            disabled: None,
            min_suppressed: 0,
            digest: false,
        };
        match self {
            Self::Rise => Expectations {
                min_suppressed: 2,
                ..completes
            },
            Self::Oscillate => completes,
            Self::DeepLink => match config.deep_link {
                DeepLinkPolicy::RequireCrossing => stays_live,
                DeepLinkPolicy::ArmOnIncrease => completes,
            },
            Self::TeardownMidPlay => Expectations {
                final_phase: EnginePhase::Playing,
                commits: 1,
                ..stays_live
            },
            Self::ReducedMotion => Expectations {
                disabled: Some(DisableReason::ReducedMotion),
                ..stays_live
            },
            Self::SmallViewport => Expectations {
                disabled: Some(DisableReason::SmallViewport),
                ..stays_live
            },
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| HarnessError::UnknownScenario { name: s.to_owned() })
    }
}

/// Required outcome of a scenario run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expectations {
    pub final_phase: EnginePhase,
    pub commits: u64,
    pub navigations: usize,
    pub disabled: Option<DisableReason>,
    pub min_suppressed: usize,
    /// Whether frozen debris must be present.
    pub digest: bool,
}

impl Expectations {
    /// Every mismatch between `report` and these expectations, plus any
    /// ordering or balance violation. Empty means the run passed.
    #[must_use]
    pub fn check(&self, report: &ScenarioReport, config: &EngineConfig) -> Vec<String> {
        let s = &report.summary;
        let mut failures = Vec::new();
        if s.final_phase != self.final_phase {
            failures.push(format!(
                "final phase {} (expected {})",
                s.final_phase, self.final_phase
            ));
        }
        if s.stats.commits != self.commits {
            failures.push(format!("{} commits (expected {})", s.stats.commits, self.commits));
        }
        if s.navigations != self.navigations {
            failures.push(format!(
                "{} navigation requests (expected {})",
                s.navigations, self.navigations
            ));
        }
        if s.disabled_reason != self.disabled {
            failures.push(format!(
                "disabled reason {:?} (expected {:?})",
                s.disabled_reason, self.disabled
            ));
        }
        if s.suppressed_inputs < self.min_suppressed {
            failures.push(format!(
                "{} inputs suppressed (expected at least {})",
                s.suppressed_inputs, self.min_suppressed
            ));
        }
        if s.debris_digest.is_some() != self.digest {
            failures.push(format!("debris digest present: {}", s.debris_digest.is_some()));
        }
        if s.lock_acquires != s.lock_releases || !s.scroll_enabled {
            failures.push(format!(
                "scroll lock unbalanced: {} acquires, {} releases",
                s.lock_acquires, s.lock_releases
            ));
        }
        for entry in &report.timeline {
            if let EngineEvent::Committed { start } = entry.event {
                if start < config.threshold {
                    failures.push(format!("committed at {start} below threshold"));
                }
            }
        }
        if let (Some(&frozen), Some(&navigated)) = (
            report.when("frozen").first(),
            report.when("navigation_requested").first(),
        ) {
            if navigated < frozen + config.settle_delay_ms {
                failures.push(format!(
                    "navigation at {navigated} ms less than {} ms after freeze at {frozen} ms",
                    config.settle_delay_ms
                ));
            }
        } else if self.navigations > 0 && report.when("frozen").is_empty() {
            failures.push("navigation without a preceding freeze".to_owned());
        }
        failures
    }
}

/// Run options shared by every scenario.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: EngineConfig,
    /// Virtual frame interval.
    pub step: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            step: Duration::from_millis(16),
        }
    }
}

struct Runner {
    engine: HandoffEngine,
    host: Rc<SimHost>,
    page: SimPage,
    clock: VirtualClock,
    timeline: Vec<TimelineEntry>,
    suppressed: usize,
}

impl Runner {
    fn record(&mut self, events: Vec<EngineEvent>) {
        let at_ms = self.clock.now_ms();
        self.timeline
            .extend(events.into_iter().map(|event| TimelineEntry { at_ms, event }));
    }

    fn apply(&mut self, step: &Step) {
        debug!(target: "debris.harness", at_ms = self.clock.now_ms(), ?step, "step");
        let events = match *step {
            Step::Scroll(progress) => self.engine.on_scroll(self.page.metrics_at(progress)),
            Step::Wait(ms) => {
                let step_ms = self.clock.step().as_millis().max(1) as u64;
                for _ in 0..ms.div_ceil(step_ms) {
                    let now = self.clock.tick();
                    let events = self.engine.on_frame(now);
                    self.record(events);
                }
                Vec::new()
            }
            Step::Resize(viewport) => {
                self.page = self.page.resized(viewport);
                self.engine.on_resize(viewport)
            }
            Step::ReducedMotion(reduced) => self.engine.set_reduced_motion(reduced),
            Step::Input(input) => {
                if self.engine.suppresses_input(&input) {
                    self.suppressed += 1;
                }
                Vec::new()
            }
            Step::Teardown => self.engine.teardown(),
        };
        self.record(events);
    }
}

/// Replay `scenario` and return its report. Expectations are not checked.
pub fn run(scenario: Scenario, options: &RunOptions) -> Result<ScenarioReport> {
    if options.step.is_zero() {
        return Err(HarnessError::invalid("frame step must be positive"));
    }
    let host = Rc::new(SimHost::new());
    let prefs = scenario.preferences();
    let mut engine = HandoffEngine::new(
        options.config.clone(),
        hero_explosion()?,
        host.clone(),
        prefs,
    )?;
    let content = ContentMap::new().with("hero.next_region", NEXT_REGION);
    engine.set_navigation_target(HeroAssets::resolve(&content).navigation);

    info!(
        target: "debris.harness",
        scenario = scenario.name(),
        step_ms = options.step.as_millis() as u64,
        "scenario started"
    );

    let clock = VirtualClock::new(options.step);
    let mut runner = Runner {
        page: SimPage {
            range: options.config.scroll_range,
            ..SimPage::hero(prefs.viewport)
        },
        engine,
        host,
        timeline: Vec::new(),
        suppressed: 0,
        clock,
    };
    // Prime the frame clock so the first scripted frame has a real delta.
    let primed = runner.engine.on_frame(runner.clock.now());
    runner.record(primed);

    for step in scenario.steps() {
        runner.apply(&step);
    }

    let final_phase = runner.engine.phase();
    let final_progress = runner.engine.progress();
    let disabled_reason = runner.engine.disabled_reason();
    let debris_digest =
        (!runner.engine.snapshot().is_empty()).then(|| debris_digest(runner.engine.snapshot()));
    let closing = runner.engine.teardown();
    runner.record(closing);

    let stats = runner.engine.stats();
    let navigations = runner
        .timeline
        .iter()
        .filter(|entry| matches!(entry.event, EngineEvent::NavigationRequested { .. }))
        .count();
    let report = ScenarioReport {
        summary: RunSummary {
            scenario: scenario.name().to_owned(),
            step_ms: options.step.as_millis() as u64,
            frames: stats.frames,
            virtual_ms: runner.clock.now_ms(),
            final_phase,
            final_progress,
            disabled_reason,
            lock_acquires: runner.host.disables(),
            lock_releases: runner.host.enables(),
            scroll_enabled: runner.host.scroll_enabled(),
            navigations,
            suppressed_inputs: runner.suppressed,
            stats,
            debris_digest,
        },
        timeline: runner.timeline,
    };
    info!(
        target: "debris.harness",
        scenario = scenario.name(),
        phase = %final_phase,
        frames = stats.frames,
        navigations,
        "scenario finished"
    );
    Ok(report)
}

/// Replay `scenario` and fail unless it meets its expectations.
pub fn run_checked(scenario: Scenario, options: &RunOptions) -> Result<ScenarioReport> {
    let report = run(scenario, options)?;
    let failures = scenario
        .expectations(&options.config)
        .check(&report, &options.config);
    if failures.is_empty() {
        Ok(report)
    } else {
        Err(HarnessError::Expectation {
            scenario: scenario.name().to_owned(),
            failures,
        })
    }
}
