//! Table listing tool

use crate::db::SchemaInspector;
use crate::tools::error::ToolError;
use crate::tools::tool::Tool;
use crate::tools::types::{Observation, ToolCall, ToolSchema};
use async_trait::async_trait;

/// Lists the queryable tables in the database
pub struct ListTablesTool {
    inspector: SchemaInspector,
}

impl ListTablesTool {
    /// Create a new list-tables tool
    pub fn new(inspector: SchemaInspector) -> Self {
        Self { inspector }
    }
}

#[async_trait]
impl Tool for ListTablesTool {
    fn name(&self) -> &str {
        "list_tables"
    }

    fn description(&self) -> &str {
        "List the tables available in the database. Call this first to see what can be queried."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(self.name(), self.description(), vec![])
    }

    async fn execute(&self, call: &ToolCall) -> Result<Observation, ToolError> {
        let tables = self.inspector.list_tables()?;
        Ok(Observation::success(
            &call.id,
            self.name(),
            format!("Tables: {}", tables.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;
    use std::collections::HashMap;

    #[tokio::test]
    async fn lists_fixture_tables() {
        let (db, _dir) = fixtures::chinook();
        let tool = ListTablesTool::new(SchemaInspector::new(db, 3));
        let call = ToolCall::new("c1", "list_tables", HashMap::new());

        let obs = tool.execute(&call).await.unwrap();
        assert!(obs.success);
        assert_eq!(obs.output.as_deref(), Some("Tables: Artist, Customer, Genre"));
    }

    #[test]
    fn schema_has_no_parameters() {
        let (db, _dir) = fixtures::chinook();
        let tool = ListTablesTool::new(SchemaInspector::new(db, 3));
        let schema = tool.schema();
        assert_eq!(schema.name, "list_tables");
        assert!(schema.parameters["required"].as_array().unwrap().is_empty());
    }
}
