#![forbid(unsafe_code)]

//! Unified error and graceful degradation.
//!
//! Every failure a host can hit while mounting the handoff maps to a
//! [`DegradationAction`]. The handoff is decoration: the fallback for any
//! recoverable error is a page that keeps scrolling with the scene driven
//! by scroll alone, never a broken page.

use std::fmt;

use debris_core::{GraphError, KeyframeError};
use debris_runtime::ConfigError;

/// Top-level error type for debris hosts.
#[derive(Debug)]
pub enum Error {
    /// A keyframe track was rejected.
    Keyframe(KeyframeError),
    /// The parameter graph or scene could not be built.
    Graph(GraphError),
    /// Engine configuration failed to load or validate.
    Config(ConfigError),
    /// Raw I/O error outside config loading.
    Io(std::io::Error),
}

/// Standard result type for debris APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// What the host should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Mount nothing; the scene stays scroll-driven forever.
    DisableHandoff,
    /// Retry with `EngineConfig::default()`.
    UseDefaults,
    /// Unrecoverable host failure.
    Abort,
}

impl Error {
    /// Determine the graceful degradation action for this error.
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Keyframe(_) | Self::Graph(_) => DegradationAction::DisableHandoff,
            Self::Config(_) => DegradationAction::UseDefaults,
            Self::Io(_) => DegradationAction::Abort,
        }
    }

    /// Error type label for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Keyframe(_) => "keyframe",
            Self::Graph(_) => "graph",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }

    /// Whether the page can carry on without aborting.
    pub fn is_recoverable(&self) -> bool {
        self.degradation() != DegradationAction::Abort
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyframe(err) => write!(f, "keyframes: {err}"),
            Self::Graph(err) => write!(f, "scene: {err}"),
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Keyframe(err) => Some(err),
            Self::Graph(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<KeyframeError> for Error {
    fn from(err: KeyframeError) -> Self {
        Self::Keyframe(err)
    }
}

impl From<GraphError> for Error {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for DegradationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisableHandoff => write!(f, "disable_handoff"),
            Self::UseDefaults => write!(f, "use_defaults"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use super::*;

    #[test]
    fn keyframe_errors_disable_the_handoff() {
        let err = Error::from(KeyframeError::Empty);
        assert_eq!(err.degradation(), DegradationAction::DisableHandoff);
        assert_eq!(err.error_type(), "keyframe");
        assert!(err.is_recoverable());
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn graph_errors_disable_the_handoff() {
        let err = Error::from(GraphError::DuplicateName("video.scale".into()));
        assert_eq!(err.degradation(), DegradationAction::DisableHandoff);
        assert!(format!("{err}").contains("video.scale"));
    }

    #[test]
    fn config_errors_fall_back_to_defaults() {
        let err = Error::from(ConfigError::Validation(vec!["threshold".into()]));
        assert_eq!(err.degradation(), DegradationAction::UseDefaults);
        assert!(format!("{err}").starts_with("config: "));
    }

    #[test]
    fn io_aborts() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(err.degradation(), DegradationAction::Abort);
        assert!(!err.is_recoverable());
        assert_eq!(err.error_type(), "io");
    }

    #[test]
    fn degradation_display() {
        assert_eq!(DegradationAction::DisableHandoff.to_string(), "disable_handoff");
        assert_eq!(DegradationAction::UseDefaults.to_string(), "use_defaults");
        assert_eq!(DegradationAction::Abort.to_string(), "abort");
    }
}
