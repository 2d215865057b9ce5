use thiserror::Error;

/// Custom error type for hostwatch
#[derive(Error, Debug)]
pub enum HostwatchError {
    #[error("{tool} not installed{hint}")]
    ToolUnavailable { tool: String, hint: String },

    #[error("{tool} command failed: {reason}")]
    ExecutionFailed { tool: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No data found: {0}")]
    ParseYieldedEmpty(String),

    #[error("Delivery to {destination} failed: {reason}")]
    DeliveryFailed { destination: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for hostwatch
pub type Result<T> = std::result::Result<T, HostwatchError>;

impl HostwatchError {
    /// Create a tool-unavailable error with an optional install hint
    pub fn tool_unavailable<S: Into<String>>(tool: S, hint: Option<&str>) -> Self {
        HostwatchError::ToolUnavailable {
            tool: tool.into(),
            hint: hint.map(|h| format!(" - {}", h)).unwrap_or_default(),
        }
    }

    pub fn execution_failed<S: Into<String>, R: Into<String>>(tool: S, reason: R) -> Self {
        HostwatchError::ExecutionFailed {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        HostwatchError::Parse(msg.into())
    }

    pub fn empty<S: Into<String>>(msg: S) -> Self {
        HostwatchError::ParseYieldedEmpty(msg.into())
    }

    pub fn delivery_failed<S: Into<String>, R: Into<String>>(destination: S, reason: R) -> Self {
        HostwatchError::DeliveryFailed {
            destination: destination.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        HostwatchError::Config(msg.into())
    }

    /// True for failures that abort a poll cycle (tool missing or crashed)
    pub fn aborts_cycle(&self) -> bool {
        matches!(
            self,
            HostwatchError::ToolUnavailable { .. } | HostwatchError::ExecutionFailed { .. }
        )
    }
}
