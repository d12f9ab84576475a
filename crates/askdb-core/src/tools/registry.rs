//! Fixed tool registry
//!
//! Registration happens once at session setup; `invoke` is the single entry
//! point the reasoning loop uses and it never lets a failure escape as
//! anything other than an error observation.

use super::error::ToolError;
use super::sql::{DescribeTableTool, ExecuteQueryTool, ListTablesTool, ValidateQueryTool};
use super::tool::Tool;
use super::types::{Observation, ToolCall, ToolSchema};
use crate::config::AgentConfig;
use crate::db::{QueryExecutor, SchemaInspector, SqlDatabase};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Fixed mapping from tool name to invocation function
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    tool_timeout: Duration,
}

impl ToolRegistry {
    /// Create an empty registry with the given per-call timeout
    pub fn new(tool_timeout: Duration) -> Self {
        Self {
            tools: Vec::new(),
            tool_timeout,
        }
    }

    /// Build the standard four-tool registry over a database
    pub fn for_database(db: SqlDatabase, config: &AgentConfig) -> Self {
        let inspector = SchemaInspector::new(db.clone(), config.sample_rows);
        let executor = QueryExecutor::new(db, config.top_k);

        let mut registry = Self::new(config.tool_timeout());
        registry.register(Arc::new(ListTablesTool::new(inspector.clone())));
        registry.register(Arc::new(DescribeTableTool::new(inspector)));
        registry.register(Arc::new(ValidateQueryTool::new(executor.clone())));
        registry.register(Arc::new(ExecuteQueryTool::new(executor)));
        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All registered tool names, in registration order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Schemas for all registered tools, in registration order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Invoke a tool call and return the observation.
    ///
    /// Unknown names, schema violations, delegate failures, and timeouts
    /// all come back as error observations; nothing raises past this
    /// boundary.
    pub async fn invoke(&self, call: &ToolCall) -> Observation {
        let started = Instant::now();
        debug!(tool = %call.name, call_id = %call.id, "invoking tool");

        let Some(tool) = self.get(&call.name) else {
            warn!(tool = %call.name, "unknown tool requested");
            let err = ToolError::UnknownTool(call.name.clone());
            return Observation::from_error(&call.id, &call.name, &err);
        };

        if let Err(err) = tool.validate(call) {
            return Observation::from_error(&call.id, &call.name, &err)
                .with_execution_time(started.elapsed().as_millis() as u64);
        }

        let observation = match timeout(self.tool_timeout, tool.execute(call)).await {
            Ok(Ok(observation)) => observation,
            Ok(Err(err)) => Observation::from_error(&call.id, &call.name, &err),
            Err(_) => {
                warn!(tool = %call.name, "tool invocation timed out");
                Observation::from_error(&call.id, &call.name, &ToolError::Timeout)
            }
        };

        observation.with_execution_time(started.elapsed().as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;
    use crate::tools::error::ObservationErrorKind;
    use std::collections::HashMap;

    fn registry() -> (ToolRegistry, tempfile::TempDir) {
        let (db, dir) = fixtures::chinook();
        (
            ToolRegistry::for_database(db, &AgentConfig::default()),
            dir,
        )
    }

    #[test]
    fn registers_exactly_the_four_tools() {
        let (registry, _dir) = registry();
        assert_eq!(
            registry.tool_names(),
            vec![
                "list_tables",
                "describe_table",
                "validate_query",
                "execute_query"
            ]
        );
        assert_eq!(registry.schemas().len(), 4);
    }

    #[tokio::test]
    async fn invoke_routes_to_the_named_tool() {
        let (registry, _dir) = registry();
        let call = ToolCall::new("c1", "list_tables", HashMap::new());

        let obs = registry.invoke(&call).await;
        assert!(obs.success);
        assert!(obs.output.unwrap().contains("Genre"));
        assert!(obs.execution_time_ms.is_some());
    }

    #[tokio::test]
    async fn unknown_tool_becomes_an_observation() {
        let (registry, _dir) = registry();
        let call = ToolCall::new("c1", "drop_everything", HashMap::new());

        let obs = registry.invoke(&call).await;
        assert!(!obs.success);
        assert_eq!(obs.error_kind, Some(ObservationErrorKind::UnknownTool));
    }

    #[tokio::test]
    async fn schema_violation_becomes_an_observation() {
        let (registry, _dir) = registry();
        // describe_table requires table_name
        let call = ToolCall::new("c1", "describe_table", HashMap::new());

        let obs = registry.invoke(&call).await;
        assert!(!obs.success);
        assert_eq!(obs.error_kind, Some(ObservationErrorKind::InvalidArguments));
    }

    #[tokio::test]
    async fn delegate_errors_are_captured_not_raised() {
        let (registry, _dir) = registry();
        let mut args = HashMap::new();
        args.insert("query".to_string(), serde_json::json!("DELETE FROM Customer"));
        let call = ToolCall::new("c1", "execute_query", args);

        let obs = registry.invoke(&call).await;
        assert!(!obs.success);
        assert_eq!(obs.error_kind, Some(ObservationErrorKind::ForbiddenStatement));
    }
}
