use debris_core::GraphError;
use debris_runtime::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("scene error: {0}")]
    Scene(#[from] GraphError),

    #[error("unknown scenario: {name} (try `debris-harness list`)")]
    UnknownScenario { name: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("scenario {scenario} failed: {}", .failures.join("; "))]
    Expectation {
        scenario: String,
        failures: Vec<String>,
    },
}

impl HarnessError {
    /// Process exit code: 2 for usage and config problems, 3 for a scenario
    /// whose outcome did not match its expectations, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownScenario { .. } | Self::InvalidArgument { .. } | Self::Config(_) => 2,
            Self::Expectation { .. } => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
