//! The engine's lifecycle transitions are logged with stable targets,
//! levels and fields.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use debris_core::scene::presets::hero_explosion;
use debris_runtime::{EngineConfig, HandoffEngine, MotionPreferences, ScrollHost};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// Tracing capture infrastructure

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<String>>>,
}

impl Capture {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn spans(&self) -> Vec<String> {
        self.spans.lock().unwrap().clone()
    }

    fn messages(&self, target: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.target == target)
            .filter_map(|e| e.fields.get("message").cloned())
            .collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans
            .lock()
            .unwrap()
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing<F: FnOnce()>(f: F) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

struct Page;

impl ScrollHost for Page {
    fn set_scroll_enabled(&self, _enabled: bool) {}
}

fn full_run() {
    let mut engine = HandoffEngine::new(
        EngineConfig::default(),
        hero_explosion().unwrap(),
        Rc::new(Page),
        MotionPreferences::default(),
    )
    .unwrap();
    engine.on_progress(0.0);
    engine.on_progress(0.9);
    for _ in 0..600 {
        engine.advance(Duration::from_millis(16));
    }
    engine.teardown();
}

#[test]
fn commit_is_logged_at_info_with_start() {
    let capture = with_captured_tracing(full_run);
    let commits: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.target == "debris.handoff" && e.level == tracing::Level::INFO)
        .collect();
    assert_eq!(commits.len(), 1);
    let start: f64 = commits[0].fields["start"].parse().unwrap();
    assert!((0.6..=0.9).contains(&start));
    assert!(commits[0].fields.contains_key("threshold"));
}

#[test]
fn lifecycle_targets_are_present() {
    let capture = with_captured_tracing(full_run);
    assert_eq!(
        capture.messages("debris.lock"),
        vec!["scroll lock acquired", "scroll lock released"]
    );
    assert!(capture.messages("debris.playback").contains(&"playback completed".to_string()));
    assert!(capture.messages("debris.snapshot").contains(&"debris captured".to_string()));
    assert!(capture.messages("debris.engine").contains(&"debris frozen".to_string()));
    assert_eq!(
        capture.messages("debris.coordinator"),
        vec!["completion armed", "navigation requested"]
    );
    assert!(capture.messages("debris.engine").contains(&"engine disposed".to_string()));
}

#[test]
fn navigation_event_carries_destination() {
    let capture = with_captured_tracing(full_run);
    let nav = capture
        .events()
        .into_iter()
        .find(|e| e.fields.get("message").is_some_and(|m| m == "navigation requested"))
        .unwrap();
    assert_eq!(nav.level, tracing::Level::INFO);
    assert_eq!(nav.fields["destination"], "next-viewport");
}

#[test]
fn frames_run_inside_engine_span() {
    let capture = with_captured_tracing(full_run);
    let frames = capture
        .spans()
        .iter()
        .filter(|name| *name == "debris.engine.frame")
        .count();
    assert_eq!(frames, 600);
}
