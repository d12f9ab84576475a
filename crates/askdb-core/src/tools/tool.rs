//! Core Tool trait definition

use super::error::ToolError;
use super::types::{Observation, ToolCall, ToolSchema};
use async_trait::async_trait;

/// A named, schema-declared capability callable by the reasoning loop.
///
/// The set of tools is fixed when the registry is built; each tool declares
/// an input schema used for validation before execution.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name (e.g., "execute_query")
    fn name(&self) -> &str;

    /// The tool's description, shown to the model
    fn description(&self) -> &str;

    /// The tool's input schema
    fn schema(&self) -> ToolSchema;

    /// Validate the call arguments against the declared schema.
    ///
    /// The default implementation checks the declared schema; tools with
    /// extra constraints override and call it first.
    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        self.schema()
            .check_arguments(&call.arguments)
            .map_err(ToolError::InvalidArguments)
    }

    /// Execute the tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] on failure; the registry converts it into an
    /// error observation rather than letting it propagate.
    async fn execute(&self, call: &ToolCall) -> Result<Observation, ToolError>;
}
