//! Table description tool

use crate::db::SchemaInspector;
use crate::tools::error::ToolError;
use crate::tools::tool::Tool;
use crate::tools::types::{Observation, ToolCall, ToolParameter, ToolSchema};
use async_trait::async_trait;

/// Describes the columns and sample rows of one table
pub struct DescribeTableTool {
    inspector: SchemaInspector,
}

impl DescribeTableTool {
    /// Create a new describe-table tool
    pub fn new(inspector: SchemaInspector) -> Self {
        Self { inspector }
    }
}

#[async_trait]
impl Tool for DescribeTableTool {
    fn name(&self) -> &str {
        "describe_table"
    }

    fn description(&self) -> &str {
        "Show the columns, types, and a few sample rows of a table. \
         Use list_tables first to find valid table names."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string(
                "table_name",
                "Name of the table to describe",
            )],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<Observation, ToolError> {
        let table_name = call
            .get_string("table_name")
            .ok_or_else(|| ToolError::InvalidArguments("missing 'table_name'".to_string()))?;

        let info = self.inspector.describe_table(&table_name)?;
        Ok(Observation::success(&call.id, self.name(), info.render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;
    use crate::tools::error::ObservationErrorKind;
    use std::collections::HashMap;

    fn call_for(table: &str) -> ToolCall {
        let mut args = HashMap::new();
        args.insert("table_name".to_string(), serde_json::json!(table));
        ToolCall::new("c1", "describe_table", args)
    }

    #[tokio::test]
    async fn describes_a_known_table() {
        let (db, _dir) = fixtures::chinook();
        let tool = DescribeTableTool::new(SchemaInspector::new(db, 3));

        let obs = tool.execute(&call_for("Genre")).await.unwrap();
        assert!(obs.success);
        let text = obs.output.unwrap();
        assert!(text.contains("Table Genre:"));
        assert!(text.contains("Name TEXT"));
    }

    #[tokio::test]
    async fn unknown_table_surfaces_typed_error() {
        let (db, _dir) = fixtures::chinook();
        let tool = DescribeTableTool::new(SchemaInspector::new(db, 3));

        let err = tool.execute(&call_for("NoSuchTable")).await.unwrap_err();
        assert_eq!(err.kind(), ObservationErrorKind::UnknownTable);
    }

    #[test]
    fn validate_rejects_missing_table_name() {
        let (db, _dir) = fixtures::chinook();
        let tool = DescribeTableTool::new(SchemaInspector::new(db, 3));
        let call = ToolCall::new("c1", "describe_table", HashMap::new());

        let err = tool.validate(&call).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
