#![forbid(unsafe_code)]

//! Serializable outcome of one scenario run.

use debris_runtime::{DisableReason, EngineEvent, EnginePhase, EngineStats};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// An engine event stamped with the virtual time it was emitted at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: EngineEvent,
}

/// Everything a run produced except the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub step_ms: u64,
    pub frames: u64,
    pub virtual_ms: u64,
    pub final_phase: EnginePhase,
    pub final_progress: f64,
    pub disabled_reason: Option<DisableReason>,
    /// Times the host saw scrolling disabled.
    pub lock_acquires: u32,
    /// Times the host saw scrolling re-enabled.
    pub lock_releases: u32,
    pub scroll_enabled: bool,
    pub navigations: usize,
    /// Scripted inputs the engine asked the host to cancel.
    pub suppressed_inputs: usize,
    pub stats: EngineStats,
    /// `blake3:<hex>` of the frozen debris, when anything was captured.
    pub debris_digest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    #[serde(flatten)]
    pub summary: RunSummary,
    pub timeline: Vec<TimelineEntry>,
}

impl ScenarioReport {
    /// Virtual timestamps of every event called `name`.
    #[must_use]
    pub fn when(&self, name: &str) -> Vec<u64> {
        self.timeline
            .iter()
            .filter(|entry| entry.event.name() == name)
            .map(|entry| entry.at_ms)
            .collect()
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One `event` line per timeline entry followed by a `summary` line.
    pub fn to_jsonl(&self) -> Result<String> {
        let mut out = String::new();
        for entry in &self.timeline {
            let line = tagged(serde_json::to_value(entry)?, "event", &self.summary.scenario);
            out.push_str(&serde_json::to_string(&line)?);
            out.push('\n');
        }
        let summary = tagged(
            serde_json::to_value(&self.summary)?,
            "summary",
            &self.summary.scenario,
        );
        out.push_str(&serde_json::to_string(&summary)?);
        out.push('\n');
        Ok(out)
    }
}

fn tagged(mut value: Value, kind: &str, scenario: &str) -> Value {
    if let Value::Object(map) = &mut value {
        map.insert("type".to_owned(), Value::from(kind));
        map.insert("scenario".to_owned(), Value::from(scenario));
    }
    value
}
