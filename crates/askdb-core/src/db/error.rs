//! Error types for database operations

use thiserror::Error;

/// Error type for schema inspection and query execution
#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// Database unreachable, unopenable, or the connection lock failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Named table does not exist in the database
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Statement failed to compile or run
    #[error("Query error: {0}")]
    Query(String),

    /// Statement was classified as mutating and rejected before execution
    #[error("Forbidden statement: {0}")]
    ForbiddenStatement(String),
}

impl DbError {
    /// Create a new connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a new query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::SqliteFailure(code, message) => {
                if code.code == rusqlite::ErrorCode::CannotOpen {
                    Self::Connection(message.unwrap_or_else(|| code.to_string()))
                } else {
                    Self::Query(message.unwrap_or_else(|| code.to_string()))
                }
            }
            other => Self::Query(other.to_string()),
        }
    }
}
