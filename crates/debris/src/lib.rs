#![forbid(unsafe_code)]

//! Debris public facade.
//!
//! Re-exports the types a host needs to mount the scroll handoff, a prelude
//! for day-to-day use, and a unified [`Error`] with a graceful-degradation
//! mapping.
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use debris::prelude::*;
//!
//! struct Page;
//! impl ScrollHost for Page {
//!     fn set_scroll_enabled(&self, _enabled: bool) {}
//! }
//!
//! let prefs = MotionPreferences::new(Viewport::new(1440.0, 900.0));
//! let mut engine = debris::mount_hero(EngineConfig::default(), Rc::new(Page), prefs)?;
//! engine.on_progress(0.0);
//! engine.on_progress(0.9);
//! for _ in 0..30 {
//!     engine.advance(Duration::from_millis(16));
//! }
//! assert_eq!(engine.phase(), EnginePhase::Playing);
//! # Ok::<(), debris::Error>(())
//! ```

use std::rc::Rc;

pub mod error;

pub use error::{DegradationAction, Error, Result};

pub use debris_core::animation::spring::SpringConfig;
pub use debris_core::scene::presets::hero_explosion;
pub use debris_core::{Easing, Edge, Intersection, RegionMetrics, Scene, ScrollRange, Transform, Viewport};
pub use debris_runtime::{
    ContentMap, ContentSource, DeepLinkPolicy, DisableReason, Dispose, EngineConfig, EngineEvent,
    EnginePhase, EngineStats, HandoffEngine, HeroAssets, HostInput, MotionPreferences,
    NavigationRequest, NavigationTarget, ScrollBehavior, ScrollHost, ScrollKey,
};

/// Mount a handoff engine on the built-in hero scene.
pub fn mount_hero(
    config: EngineConfig,
    host: Rc<dyn ScrollHost>,
    prefs: MotionPreferences,
) -> Result<HandoffEngine> {
    let scene = hero_explosion()?;
    Ok(HandoffEngine::new(config, scene, host, prefs)?)
}

/// [`mount_hero`], retrying with the default config when `config` is
/// rejected. Scene errors still surface so the host can skip the handoff.
pub fn mount_hero_or_default(
    config: EngineConfig,
    host: Rc<dyn ScrollHost>,
    prefs: MotionPreferences,
) -> Result<HandoffEngine> {
    match mount_hero(config, Rc::clone(&host), prefs) {
        Err(err) if err.degradation() == DegradationAction::UseDefaults => {
            mount_hero(EngineConfig::default(), host, prefs)
        }
        other => other,
    }
}

pub mod prelude {
    pub use crate::{
        DegradationAction, EngineConfig, EngineEvent, EnginePhase, Error, HandoffEngine,
        HostInput, MotionPreferences, NavigationTarget, Result, ScrollHost, Viewport,
    };

    pub use crate::{core, runtime};
}

pub use debris_core as core;
pub use debris_runtime as runtime;
