#![forbid(unsafe_code)]

//! Debris Harness
//!
//! Deterministic replay of scripted host behaviour against the handoff
//! engine. A [`SimHost`] stands in for the page's scroll flag, a
//! [`VirtualClock`] supplies frame timestamps, and each built-in
//! [`Scenario`] produces a [`ScenarioReport`]: the timeline of engine events
//! at virtual times, final phase, lock counters and a blake3 digest of the
//! frozen debris.
//!
//! # Usage
//!
//! ```text
//! debris-harness list
//! debris-harness run rise --step-ms 16 --jsonl
//! RUST_LOG=debris=debug debris-harness --log-json run deep-link --config engine.toml
//! ```
//!
//! Exit codes: `0` pass, `1` I/O or serialization failure, `2` usage or
//! config error, `3` the scenario did not meet its expectations.

pub mod cli;
pub mod determinism;
pub mod error;
pub mod report;
pub mod scenario;
pub mod sim_host;

pub use determinism::{debris_digest, VirtualClock};
pub use error::{HarnessError, Result};
pub use report::{RunSummary, ScenarioReport, TimelineEntry};
pub use scenario::{run, run_checked, Expectations, RunOptions, Scenario, Step};
pub use sim_host::{SimHost, SimPage};
