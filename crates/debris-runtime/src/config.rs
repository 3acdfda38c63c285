#![forbid(unsafe_code)]

//! Policy-as-data configuration for the handoff engine.
//!
//! Every tunable number of the engine lives in [`EngineConfig`], which can be
//! loaded from TOML or JSON with the `config-files` feature.
//!
//! # Loading
//!
//! ```toml
//! # debris.toml
//! threshold = 0.6
//! playback_ms = 5000
//! playback_easing = "ease_out_expo"
//! deep_link = "require_crossing"
//!
//! [spring]
//! stiffness = 120.0
//! damping = 21.9
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("debris.toml")?;
//! let config = EngineConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `EngineConfig::default()` is the shipped tuning: commit at 0.6, five
//! seconds of exponential ease-out, navigation 300 ms after the debris
//! freezes.

#[cfg(feature = "config-files")]
use std::path::Path;
use std::time::Duration;

use debris_core::animation::spring::SpringConfig;
use debris_core::animation::Easing;
use debris_core::scatter::ScatterBounds;
use debris_core::scroll::ScrollRange;

/// What to do when the first observed sample is already past the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeepLinkPolicy {
    /// Commit only on an observed `previous < threshold <= current`.
    #[default]
    RequireCrossing,
    /// A landing past the threshold arms the controller; the first strictly
    /// increasing sample at or above the threshold then commits.
    ArmOnIncrease,
}

/// Engine tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Commit threshold on smoothed progress.
    pub threshold: f64,
    /// First-sample behaviour.
    pub deep_link: DeepLinkPolicy,
    /// Playback duration in milliseconds.
    pub playback_ms: u64,
    /// Playback easing.
    pub playback_easing: Easing,
    /// Progress at which the completion coordinator arms.
    pub completion_threshold: f64,
    /// Delay between arming and the navigation request, in milliseconds.
    pub settle_delay_ms: u64,
    /// Progress smoothing filter.
    pub spring: SpringConfig,
    /// Scroll interval mapped onto progress `[0, 1]`.
    pub scroll_range: ScrollRange,
    /// Viewports narrower than this disable the handoff.
    pub small_viewport_px: f64,
    /// Cap on a single frame delta, in milliseconds.
    pub max_frame_ms: u64,
    /// Base debris bounding box.
    pub bounds: ScatterBounds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            deep_link: DeepLinkPolicy::RequireCrossing,
            playback_ms: 5000,
            playback_easing: Easing::EaseOutExpo,
            completion_threshold: 0.995,
            settle_delay_ms: 300,
            spring: SpringConfig::default(),
            scroll_range: ScrollRange::default(),
            small_viewport_px: 768.0,
            max_frame_ms: 100,
            bounds: ScatterBounds::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn playback_duration(&self) -> Duration {
        Duration::from_millis(self.playback_ms)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn max_frame(&self) -> Duration {
        Duration::from_millis(self.max_frame_ms)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            errors.push(format!("threshold must be in (0, 1), got {}", self.threshold));
        }
        if !(self.completion_threshold > self.threshold && self.completion_threshold <= 1.0) {
            errors.push(format!(
                "completion_threshold must be in (threshold, 1], got {}",
                self.completion_threshold
            ));
        }
        if self.playback_ms == 0 {
            errors.push("playback_ms must be > 0".into());
        }
        if self.max_frame_ms == 0 {
            errors.push("max_frame_ms must be > 0".into());
        }

        let spring = &self.spring;
        if !(spring.stiffness.is_finite() && spring.stiffness > 0.0) {
            errors.push(format!("spring.stiffness must be > 0, got {}", spring.stiffness));
        }
        if !(spring.damping.is_finite() && spring.damping >= 0.0) {
            errors.push(format!("spring.damping must be >= 0, got {}", spring.damping));
        }
        if !(spring.rest_delta.is_finite() && spring.rest_delta > 0.0) {
            errors.push(format!("spring.rest_delta must be > 0, got {}", spring.rest_delta));
        }

        if self.scroll_range.start == self.scroll_range.end {
            errors.push("scroll_range start and end must differ".into());
        }
        if !(self.small_viewport_px.is_finite() && self.small_viewport_px >= 0.0) {
            errors.push(format!(
                "small_viewport_px must be >= 0, got {}",
                self.small_viewport_px
            ));
        }
        for (name, ratio) in [
            ("bounds.width_ratio", self.bounds.width_ratio),
            ("bounds.height_ratio", self.bounds.height_ratio),
        ] {
            if !(ratio.is_finite() && ratio > 0.0) {
                errors.push(format!("{name} must be > 0, got {ratio}"));
            }
        }

        errors
    }

    /// `self` if valid, otherwise [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)?.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load a file, choosing the format by extension (`.json`, else TOML).
    #[cfg(feature = "config-files")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Serialize to a pretty TOML string.
    #[cfg(feature = "config-files")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Configuration loading or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-files")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
