#![forbid(unsafe_code)]

//! Host conditions under which the handoff is switched off.

use std::fmt;

use debris_core::geometry::Viewport;

/// Why the handoff controller is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DisableReason {
    /// The user asked for reduced motion.
    ReducedMotion,
    /// The viewport is narrower than the configured breakpoint.
    SmallViewport,
}

impl DisableReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReducedMotion => "reduced_motion",
            Self::SmallViewport => "small_viewport",
        }
    }
}

impl fmt::Display for DisableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accessibility and layout inputs from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionPreferences {
    /// `prefers-reduced-motion: reduce`.
    pub reduced_motion: bool,
    /// Current viewport.
    pub viewport: Viewport,
}

impl MotionPreferences {
    /// Full motion at `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            reduced_motion: false,
            viewport,
        }
    }

    #[must_use]
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Reason the handoff must stay off, if any. Reduced motion wins.
    #[must_use]
    pub fn disable_reason(&self, small_viewport_px: f64) -> Option<DisableReason> {
        if self.reduced_motion {
            Some(DisableReason::ReducedMotion)
        } else if self.viewport.is_small(small_viewport_px) {
            Some(DisableReason::SmallViewport)
        } else {
            None
        }
    }
}

impl Default for MotionPreferences {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
