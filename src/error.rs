//! # Client Error Types
//!
//! Unified error handling for the job client, the result shaper and the
//! lifecycle state machine.

use thiserror::Error;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised by client setup, the HTTP transport and payload rendering
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

/// Structural validation failures produced while shaping a raw payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapingError {
    #[error("payload is absent")]
    MissingPayload,

    #[error("incomplete data: missing `{field}`")]
    IncompleteData { field: String },

    #[error("optimized order index {index} is out of range for {stop_count} stops")]
    IndexOutOfRange { index: i64, stop_count: usize },

    #[error("optimized order repeats index {index}")]
    DuplicateIndex { index: usize },

    #[error("malformed `{field}`: {reason}")]
    Malformed { field: String, reason: String },
}

impl ShapingError {
    pub fn incomplete(field: impl Into<String>) -> Self {
        Self::IncompleteData {
            field: field.into(),
        }
    }

    pub fn malformed(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

/// Lifecycle state machine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Invalid transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ShapingError::IndexOutOfRange {
            index: 5,
            stop_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "optimized order index 5 is out of range for 3 stops"
        );

        let err = ShapingError::incomplete("optimization_result.summary");
        assert_eq!(
            err.to_string(),
            "incomplete data: missing `optimization_result.summary`"
        );
    }

    #[test]
    fn test_conversions() {
        let err: ClientError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ClientError::SerializationError(_)));

        let err = ClientError::config_error("polling.poll_interval_ms must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Configuration error: polling.poll_interval_ms must be greater than zero"
        );
    }
}
