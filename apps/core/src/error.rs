use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, corrupt or mutually inconsistent startup artifacts. Fatal.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The model could not produce an output of the expected shape.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents failures talking to the session actor.
    #[error("Actor error: {0}")]
    Actor(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error must stop the application from serving turns.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::Io(_) | AppError::Actor(_) | AppError::Internal(_)
        )
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Turn exceeded its time budget: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Validation(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Validation errors: {}", err))
    }
}

impl From<which::Error> for AppError {
    fn from(err: which::Error) -> Self {
        AppError::Config(format!("Command not found: {}", err))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::Config(format!("Invalid number: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_errors_are_recoverable() {
        assert!(!AppError::Timeout("slow".into()).is_fatal());
        assert!(!AppError::Inference("bad shape".into()).is_fatal());
        assert!(!AppError::Validation("bad url".into()).is_fatal());
    }

    #[test]
    fn test_startup_and_actor_errors_are_fatal() {
        assert!(AppError::Config("missing".into()).is_fatal());
        assert!(AppError::Actor("gone".into()).is_fatal());
        assert!(AppError::Internal("bug".into()).is_fatal());
    }
}
