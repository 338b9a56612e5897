//! Error types for the simulation core.
//!
//! Configuration and degenerate-input failures are fatal for a run; they are
//! propagated with `?` up to `Population::simulate`, which aborts. Population
//! collapse is not an error and never goes through this type.

use thiserror::Error;

/// Main error type for core simulation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Unrecognized or inconsistent configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input that makes a computation undefined (e.g. all-zero profiles)
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Argument outside the domain of an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Pop requested from an empty event queue
    #[error("Event queue is empty")]
    EmptyQueue,
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a new degenerate-input error.
    #[must_use]
    pub fn degenerate<S: Into<String>>(msg: S) -> Self {
        Self::DegenerateInput(msg.into())
    }

    /// Creates a new invalid-argument error.
    #[must_use]
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::degenerate("profiles sum to zero");
        assert_eq!(err.to_string(), "Degenerate input: profiles sum to zero");
    }

    #[test]
    fn test_empty_queue_display() {
        assert_eq!(SimError::EmptyQueue.to_string(), "Event queue is empty");
    }

    #[test]
    fn test_into_anyhow() {
        let err: anyhow::Error = SimError::configuration("bad model").into();
        assert!(err.to_string().contains("bad model"));
    }
}
