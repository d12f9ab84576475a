//! Query validation tool

use crate::db::QueryExecutor;
use crate::tools::error::ToolError;
use crate::tools::tool::Tool;
use crate::tools::types::{Observation, ToolCall, ToolParameter, ToolSchema};
use async_trait::async_trait;

/// Dry-run check for a query: compiles it without executing anything
pub struct ValidateQueryTool {
    executor: QueryExecutor,
}

impl ValidateQueryTool {
    /// Create a new validate-query tool
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for ValidateQueryTool {
    fn name(&self) -> &str {
        "validate_query"
    }

    fn description(&self) -> &str {
        "Check that a SQL query is valid before executing it. \
         Compiles the query without running it and never returns rows."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("query", "The SQL query to check")],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<Observation, ToolError> {
        let query = call
            .get_string("query")
            .ok_or_else(|| ToolError::InvalidArguments("missing 'query'".to_string()))?;

        self.executor.validate(&query)?;
        Ok(Observation::success(&call.id, self.name(), "Query is valid."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;
    use crate::tools::error::ObservationErrorKind;
    use std::collections::HashMap;

    fn call_for(query: &str) -> ToolCall {
        let mut args = HashMap::new();
        args.insert("query".to_string(), serde_json::json!(query));
        ToolCall::new("c1", "validate_query", args)
    }

    #[tokio::test]
    async fn valid_query_passes_without_rows() {
        let (db, _dir) = fixtures::chinook();
        let tool = ValidateQueryTool::new(QueryExecutor::new(db, 5));

        let obs = tool
            .execute(&call_for("SELECT Name FROM Artist"))
            .await
            .unwrap();
        assert!(obs.success);
        assert_eq!(obs.output.as_deref(), Some("Query is valid."));
    }

    #[tokio::test]
    async fn shares_the_executor_error_taxonomy() {
        let (db, _dir) = fixtures::chinook();
        let tool = ValidateQueryTool::new(QueryExecutor::new(db, 5));

        let err = tool
            .execute(&call_for("SELECT * FROM NoSuchTable"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ObservationErrorKind::Query);

        let err = tool
            .execute(&call_for("DROP TABLE Artist"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ObservationErrorKind::ForbiddenStatement);
    }
}
