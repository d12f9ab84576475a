//! Tool-related type definitions

use super::error::{ObservationErrorKind, ToolError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tool call proposed by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Arguments to pass to the tool
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new<S: Into<String>>(
        id: S,
        name: S,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Get a typed argument value
    pub fn get_argument<T>(&self, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.arguments
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_argument::<String>(key)
    }
}

/// The structured result of one tool invocation, success or typed error,
/// fed back into the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Tool call ID this observation answers
    pub call_id: String,
    /// Name of the tool that was invoked
    pub tool_name: String,
    /// Whether the invocation succeeded
    pub success: bool,
    /// Output text (present on success)
    pub output: Option<String>,
    /// Error message (present on failure)
    pub error: Option<String>,
    /// Error discriminant (present on failure)
    pub error_kind: Option<ObservationErrorKind>,
    /// Invocation duration in milliseconds
    pub execution_time_ms: Option<u64>,
}

impl Observation {
    /// Create a successful observation
    pub fn success(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            error_kind: None,
            execution_time_ms: None,
        }
    }

    /// Create an observation from a tool error
    pub fn from_error(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        error: &ToolError,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            execution_time_ms: None,
        }
    }

    /// Attach the invocation duration
    pub fn with_execution_time(mut self, time_ms: u64) -> Self {
        self.execution_time_ms = Some(time_ms);
        self
    }

    /// The text handed back to the model for this observation
    pub fn render(&self) -> String {
        if self.success {
            self.output.clone().unwrap_or_default()
        } else {
            format!("Error: {}", self.error.clone().unwrap_or_default())
        }
    }
}

/// Parameter definition for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Parameter type (string, number, boolean)
    pub param_type: String,
    /// Whether this parameter is required
    pub required: bool,
}

impl ToolParameter {
    /// Create a required string parameter
    pub fn string<S: Into<String>>(name: S, description: S) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: "string".to_string(),
            required: true,
        }
    }

    /// Make the parameter optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Declared input schema for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON schema for the input parameters
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    /// Build a schema from typed parameters
    pub fn new<S: Into<String>>(name: S, description: S, parameters: Vec<ToolParameter>) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in parameters {
            if param.required {
                required.push(param.name.clone());
            }
            properties.insert(
                param.name,
                serde_json::json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
        }

        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }

    /// Check arguments against the declared schema.
    ///
    /// Verifies required parameters are present, no undeclared parameters
    /// were passed, and declared scalar types match.
    pub fn check_arguments(
        &self,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> Result<(), String> {
        let properties = self.parameters["properties"]
            .as_object()
            .cloned()
            .unwrap_or_default();

        if let Some(required) = self.parameters["required"].as_array() {
            for key in required.iter().filter_map(|v| v.as_str()) {
                if !arguments.contains_key(key) {
                    return Err(format!("missing required parameter '{key}'"));
                }
            }
        }

        for (key, value) in arguments {
            let Some(declared) = properties.get(key) else {
                return Err(format!("unexpected parameter '{key}'"));
            };
            let matches = match declared["type"].as_str() {
                Some("string") => value.is_string(),
                Some("number") => value.is_number(),
                Some("boolean") => value.is_boolean(),
                _ => true,
            };
            if !matches {
                return Err(format!(
                    "parameter '{key}' has wrong type (expected {})",
                    declared["type"].as_str().unwrap_or("unknown")
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> ToolSchema {
        ToolSchema::new(
            "execute_query",
            "Run a query",
            vec![ToolParameter::string("query", "The SQL to run")],
        )
    }

    #[test]
    fn schema_declares_required_parameters() {
        let schema = sample_schema();
        assert_eq!(schema.parameters["required"][0], "query");
        assert_eq!(
            schema.parameters["properties"]["query"]["type"],
            serde_json::json!("string")
        );
    }

    #[test]
    fn check_arguments_accepts_valid_input() {
        let schema = sample_schema();
        let mut args = HashMap::new();
        args.insert("query".to_string(), serde_json::json!("SELECT 1"));
        assert!(schema.check_arguments(&args).is_ok());
    }

    #[test]
    fn check_arguments_rejects_missing_required() {
        let schema = sample_schema();
        let err = schema.check_arguments(&HashMap::new()).unwrap_err();
        assert!(err.contains("missing required parameter 'query'"));
    }

    #[test]
    fn check_arguments_rejects_undeclared_and_mistyped() {
        let schema = sample_schema();

        let mut args = HashMap::new();
        args.insert("query".to_string(), serde_json::json!("SELECT 1"));
        args.insert("extra".to_string(), serde_json::json!(true));
        assert!(schema.check_arguments(&args).unwrap_err().contains("unexpected"));

        let mut args = HashMap::new();
        args.insert("query".to_string(), serde_json::json!(42));
        assert!(schema.check_arguments(&args).unwrap_err().contains("wrong type"));
    }

    #[test]
    fn observation_render_prefixes_errors() {
        let obs = Observation::success("c1", "list_tables", "Artist, Genre");
        assert_eq!(obs.render(), "Artist, Genre");

        let err = ToolError::UnknownTool("mystery".into());
        let obs = Observation::from_error("c2", "mystery", &err);
        assert_eq!(obs.render(), "Error: Unknown tool: mystery");
        assert_eq!(obs.error_kind, Some(ObservationErrorKind::UnknownTool));
    }
}
