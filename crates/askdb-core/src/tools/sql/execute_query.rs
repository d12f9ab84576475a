//! Query execution tool

use crate::db::QueryExecutor;
use crate::tools::error::ToolError;
use crate::tools::tool::Tool;
use crate::tools::types::{Observation, ToolCall, ToolParameter, ToolSchema};
use async_trait::async_trait;
use tracing::debug;

/// Runs one read-only query and returns the (capped) result rows
pub struct ExecuteQueryTool {
    executor: QueryExecutor,
}

impl ExecuteQueryTool {
    /// Create a new execute-query tool
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for ExecuteQueryTool {
    fn name(&self) -> &str {
        "execute_query"
    }

    fn description(&self) -> &str {
        "Execute a read-only SQL query and return the resulting rows. \
         Mutating statements are rejected. Results are capped at the \
         configured row limit."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("query", "The SQL query to execute")],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<Observation, ToolError> {
        let query = call
            .get_string("query")
            .ok_or_else(|| ToolError::InvalidArguments("missing 'query'".to_string()))?;

        let output = self.executor.execute(&query)?;
        debug!(rows = output.row_count(), truncated = output.truncated, "query executed");
        Ok(Observation::success(&call.id, self.name(), output.render()))
    }
}
