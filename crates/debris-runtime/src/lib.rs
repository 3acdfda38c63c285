#![forbid(unsafe_code)]

//! Debris Runtime
//!
//! The scroll-coupled, one-shot handoff engine. A tracked page region feeds
//! a smoothed progress signal; when that signal rises through a threshold
//! the engine irrevocably detaches from scroll input, locks scrolling, plays
//! the rest of the animation on a clock, freezes the scattered debris and
//! asks the host to navigate to the next region exactly once.
//!
//! # Key Components
//!
//! - [`ProgressSource`] - spring-smoothed scroll progress of the tracked region
//! - [`HandoffController`] - the `LIVE → COMMITTED → PLAYING → FROZEN` phase machine
//! - [`ScrollLockManager`] - single owner of the host's scroll-enabled flag
//! - [`PlaybackDriver`] - fixed-duration eased playback to 1.0
//! - [`SnapshotStore`] - write-once debris capture
//! - [`CompletionCoordinator`] - fire-once navigation after a settle delay
//! - [`HandoffEngine`] - wires the above to host scroll, resize and frame events
//!
//! # Role in debris
//! `debris-runtime` is the orchestrator. It consumes host events, drives the
//! pure math in `debris-core`, and reports every lifecycle transition as an
//! [`EngineEvent`] and a `tracing` event.
//!
//! # Concurrency model
//! Single-threaded and cooperative: every entry point runs to completion
//! inside one host callback. Shared handles use `Rc`/`Cell`, so engine types
//! are `!Send`.

pub mod cancellation;
pub mod clock;
pub mod config;
pub mod content;
pub mod controller;
pub mod coordinator;
pub mod engine;
pub mod motion;
pub mod playback;
pub mod progress;
pub mod scroll_lock;
pub mod snapshot;

pub use cancellation::{CancellationSource, CancellationToken};
pub use clock::FrameClock;
pub use config::{ConfigError, DeepLinkPolicy, EngineConfig};
pub use content::{ContentMap, ContentSource, HeroAssets, NavigationTarget};
pub use controller::{Commit, EnginePhase, HandoffController};
pub use coordinator::{CompletionCoordinator, NavigationRequest, ScrollBehavior};
pub use engine::{EngineEvent, EngineStats, HandoffEngine};
pub use motion::{DisableReason, MotionPreferences};
pub use playback::{PlaybackDriver, PlaybackFrame};
pub use progress::ProgressSource;
pub use scroll_lock::{HostInput, ScrollHost, ScrollKey, ScrollLock, ScrollLockManager};
pub use snapshot::{CaptureOutcome, DebrisEntry, SnapshotStore};

/// Idempotent teardown.
///
/// Every component that owns a timer, a running animation or a host
/// resource implements this. Calling [`dispose`](Dispose::dispose) twice is
/// a no-op, and implementors also dispose on `Drop`.
pub trait Dispose {
    /// Stop all work and release held resources.
    fn dispose(&mut self);

    /// Whether [`dispose`](Dispose::dispose) has run.
    fn is_disposed(&self) -> bool;
}
