//! Error types for askdb sessions
//!
//! Only the variants here are process-visible; tool-level failures are
//! absorbed into the session transcript as observations (see
//! [`crate::tools::ToolError`]).

use thiserror::Error;

/// Result type alias for askdb operations
pub type AskdbResult<T> = Result<T, AskdbError>;

/// Session-fatal error type for askdb
#[derive(Error, Debug, Clone)]
pub enum AskdbError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database unreachable or unopenable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Model client errors
    #[error("Model error: {0}")]
    Llm(String),

    /// Model or database unresponsive
    #[error("Timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Round cap exhausted without a final answer
    #[error("No answer produced within {rounds} rounds")]
    NoAnswer { rounds: u32 },

    /// Repeated forbidden-statement attempts
    #[error("Session aborted after {attempts} forbidden statement attempts")]
    PolicyViolation { attempts: u32 },

    /// Session was cancelled between rounds
    #[error("Session was cancelled")]
    Cancelled,

    /// Transcript or loop bookkeeping errors
    #[error("Session error: {0}")]
    Session(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(String),
}

impl AskdbError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a new model error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create a new session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    /// Create a new timeout error
    pub const fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// Whether this error names a condition worth retrying at the HTTP layer
    pub fn is_retryable(&self) -> bool {
        match self {
            AskdbError::Http(_) | AskdbError::Timeout { .. } => true,
            AskdbError::Llm(message) => {
                // Provider-side throttling and transient upstream failures
                ["429", "502", "503", "504", "overloaded", "rate limit"]
                    .iter()
                    .any(|needle| message.contains(needle))
            }
            _ => false,
        }
    }
}

impl From<crate::db::DbError> for AskdbError {
    fn from(error: crate::db::DbError) -> Self {
        match error {
            crate::db::DbError::Connection(message) => Self::Connection(message),
            other => Self::Session(other.to_string()),
        }
    }
}

impl From<std::io::Error> for AskdbError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AskdbError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<reqwest::Error> for AskdbError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(AskdbError::Http("connection reset".into()).is_retryable());
        assert!(AskdbError::timeout(30).is_retryable());
        assert!(AskdbError::llm("API error (status 429): slow down").is_retryable());
        assert!(AskdbError::llm("upstream overloaded").is_retryable());

        assert!(!AskdbError::llm("API error (status 401): bad key").is_retryable());
        assert!(!AskdbError::config("missing model").is_retryable());
        assert!(!AskdbError::Cancelled.is_retryable());
    }

    #[test]
    fn display_names_the_kind() {
        let err = AskdbError::NoAnswer { rounds: 10 };
        assert_eq!(err.to_string(), "No answer produced within 10 rounds");

        let err = AskdbError::PolicyViolation { attempts: 3 };
        assert!(err.to_string().contains("forbidden statement"));
    }
}
