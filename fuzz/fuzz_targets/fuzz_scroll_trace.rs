#![no_main]

use std::rc::Rc;
use std::time::Duration;

use arbitrary::Arbitrary;
use debris_core::geometry::Viewport;
use debris_core::scene::presets::hero_explosion;
use debris_runtime::{
    DeepLinkPolicy, EngineConfig, EnginePhase, HandoffEngine, MotionPreferences, ScrollHost,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Progress(f64),
    Frame(u16),
    Resize(f32, f32),
    ReducedMotion(bool),
    Teardown,
}

#[derive(Debug, Arbitrary)]
struct Trace {
    arm_on_increase: bool,
    ops: Vec<Op>,
}

struct Host;

impl ScrollHost for Host {
    fn set_scroll_enabled(&self, _enabled: bool) {}
}

fuzz_target!(|trace: Trace| {
    if trace.ops.len() > 4096 {
        return;
    }
    let config = EngineConfig {
        deep_link: if trace.arm_on_increase {
            DeepLinkPolicy::ArmOnIncrease
        } else {
            DeepLinkPolicy::RequireCrossing
        },
        ..EngineConfig::default()
    };
    let Ok(scene) = hero_explosion() else {
        return;
    };
    let prefs = MotionPreferences::new(Viewport::new(1440.0, 900.0));
    let Ok(mut engine) = HandoffEngine::new(config, scene, Rc::new(Host), prefs) else {
        return;
    };

    let mut previous = engine.phase();
    let mut last_progress = engine.progress();
    for op in trace.ops {
        match op {
            Op::Progress(raw) => {
                engine.on_progress(raw);
            }
            Op::Frame(ms) => {
                engine.advance(Duration::from_millis(u64::from(ms)));
            }
            Op::Resize(w, h) => {
                engine.on_resize(Viewport::new(f64::from(w), f64::from(h)));
            }
            Op::ReducedMotion(reduced) => {
                engine.set_reduced_motion(reduced);
            }
            Op::Teardown => {
                engine.teardown();
            }
        }

        // Progress stays finite and in range; phases never go backwards.
        let progress = engine.progress();
        assert!((0.0..=1.0).contains(&progress), "progress {progress}");
        let phase = engine.phase();
        assert!(phase >= previous, "{previous} -> {phase}");
        if phase != EnginePhase::Live && previous != EnginePhase::Live {
            assert!(progress >= last_progress, "playback went backwards");
        }
        assert!(engine.stats().commits <= 1);
        assert!(engine.stats().navigation_requests <= 1);
        previous = phase;
        last_progress = progress;
    }
    engine.teardown();
    assert!(!engine.is_scroll_locked());
});
