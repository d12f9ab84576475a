//! Error types for tool invocation

use crate::db::DbError;
use serde::{Deserialize, Serialize};

/// Error type for tool invocation.
///
/// These never escape the registry boundary; `invoke` folds them into an
/// [`crate::tools::Observation`] so the reasoning loop sees typed values
/// instead of propagating failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    /// Requested tool name is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments do not satisfy the declared input schema
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Tool execution exceeded its timeout
    #[error("Tool execution timed out")]
    Timeout,

    /// Database-level failure, carrying its own taxonomy
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Discriminant attached to error observations so the loop can react by
/// kind without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationErrorKind {
    UnknownTool,
    InvalidArguments,
    Timeout,
    Connection,
    UnknownTable,
    Query,
    ForbiddenStatement,
}

impl ToolError {
    /// The observation discriminant for this error
    pub fn kind(&self) -> ObservationErrorKind {
        match self {
            ToolError::UnknownTool(_) => ObservationErrorKind::UnknownTool,
            ToolError::InvalidArguments(_) => ObservationErrorKind::InvalidArguments,
            ToolError::Timeout => ObservationErrorKind::Timeout,
            ToolError::Db(DbError::Connection(_)) => ObservationErrorKind::Connection,
            ToolError::Db(DbError::UnknownTable(_)) => ObservationErrorKind::UnknownTable,
            ToolError::Db(DbError::Query(_)) => ObservationErrorKind::Query,
            ToolError::Db(DbError::ForbiddenStatement(_)) => {
                ObservationErrorKind::ForbiddenStatement
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_map_to_their_own_kinds() {
        let err: ToolError = DbError::UnknownTable("Foo".into()).into();
        assert_eq!(err.kind(), ObservationErrorKind::UnknownTable);

        let err: ToolError = DbError::ForbiddenStatement("delete".into()).into();
        assert_eq!(err.kind(), ObservationErrorKind::ForbiddenStatement);

        let err: ToolError = DbError::query("syntax error").into();
        assert_eq!(err.kind(), ObservationErrorKind::Query);
    }

    #[test]
    fn forbidden_is_distinct_from_query() {
        let forbidden: ToolError = DbError::ForbiddenStatement("drop".into()).into();
        let query: ToolError = DbError::query("no such column").into();
        assert_ne!(forbidden.kind(), query.kind());
    }
}
