//! Every built-in scenario meets its expectations, and runs are
//! reproducible down to the bit.

use std::time::Duration;

use debris_harness::{run, run_checked, RunOptions, Scenario};
use debris_runtime::{DeepLinkPolicy, EngineConfig, EnginePhase};
use proptest::prelude::*;

fn with_step(ms: u64) -> RunOptions {
    RunOptions {
        step: Duration::from_millis(ms),
        ..RunOptions::default()
    }
}

#[test]
fn all_scenarios_pass_at_default_step() {
    for scenario in Scenario::ALL {
        if let Err(err) = run_checked(scenario, &RunOptions::default()) {
            panic!("{scenario}: {err}");
        }
    }
}

#[test]
fn rise_timeline_is_ordered() {
    let report = run_checked(Scenario::Rise, &RunOptions::default()).unwrap();
    let names: Vec<&str> = report
        .timeline
        .iter()
        .map(|entry| entry.event.name())
        .collect();
    assert_eq!(
        names,
        vec![
            "committed",
            "scroll_lock_acquired",
            "playback_completed",
            "frozen",
            "scroll_lock_released",
            "navigation_requested",
            "disposed",
        ]
    );
    let committed = report.when("committed")[0];
    let frozen = report.when("frozen")[0];
    let navigated = report.when("navigation_requested")[0];
    assert!((5000..5032).contains(&(frozen - committed)), "{}", frozen - committed);
    assert!((300..332).contains(&(navigated - frozen)), "{}", navigated - frozen);
    assert_eq!(report.summary.final_progress, 1.0);
    assert_eq!(report.summary.stats.ignored_samples, 1);
}

#[test]
fn same_run_same_report() {
    let a = run(Scenario::Oscillate, &RunOptions::default()).unwrap();
    let b = run(Scenario::Oscillate, &RunOptions::default()).unwrap();
    assert_eq!(a, b);
    assert!(a.summary.debris_digest.is_some());
}

#[test]
fn frozen_debris_does_not_depend_on_the_path() {
    let rise = run(Scenario::Rise, &RunOptions::default()).unwrap();
    let coarse = run(Scenario::Rise, &with_step(33)).unwrap();
    let deep_link = run(
        Scenario::DeepLink,
        &RunOptions {
            config: EngineConfig {
                deep_link: DeepLinkPolicy::ArmOnIncrease,
                ..EngineConfig::default()
            },
            ..RunOptions::default()
        },
    )
    .unwrap();
    let digest = rise.summary.debris_digest.clone().unwrap();
    assert_eq!(coarse.summary.debris_digest.as_deref(), Some(digest.as_str()));
    assert_eq!(deep_link.summary.debris_digest.as_deref(), Some(digest.as_str()));
}

#[test]
fn teardown_mid_play_never_navigates() {
    let report = run_checked(Scenario::TeardownMidPlay, &RunOptions::default()).unwrap();
    assert_eq!(report.summary.final_phase, EnginePhase::Playing);
    assert!(report.when("playback_completed").is_empty());
    assert_eq!(report.summary.lock_acquires, 1);
    assert_eq!(report.summary.lock_releases, 1);
    assert_eq!(report.when("disposed").len(), 1);
}

#[test]
fn small_viewport_reports_the_disable() {
    let report = run_checked(Scenario::SmallViewport, &RunOptions::default()).unwrap();
    assert_eq!(report.when("handoff_disabled").len(), 1);
    assert_eq!(report.summary.lock_acquires, 0);
}

#[test]
fn reduced_motion_toggle_at_the_bottom_does_not_play() {
    let report = run_checked(Scenario::ReducedMotion, &RunOptions::default()).unwrap();
    assert_eq!(report.when("handoff_disabled").len(), 1);
    assert!(report.when("committed").is_empty());
    assert!(report.summary.final_progress > 0.99);
}

#[test]
fn jsonl_ends_with_summary() {
    let report = run(Scenario::Rise, &RunOptions::default()).unwrap();
    let text = report.to_jsonl().unwrap();
    let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
    assert_eq!(last["type"], "summary");
    assert_eq!(last["final_phase"], "frozen");
    assert_eq!(text.lines().count(), report.timeline.len() + 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn scenarios_pass_at_any_frame_rate(step in 4u64..=40, pick in 0usize..Scenario::ALL.len()) {
        let scenario = Scenario::ALL[pick];
        let result = run_checked(scenario, &with_step(step));
        prop_assert!(result.is_ok(), "{} @ {}ms: {:?}", scenario, step, result.err());
    }
}
