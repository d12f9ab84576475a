//! Tool system: trait, typed calls and observations, and the fixed registry

mod error;
mod registry;
mod sql;
mod tool;
mod types;

pub use error::{ObservationErrorKind, ToolError};
pub use registry::ToolRegistry;
pub use sql::{DescribeTableTool, ExecuteQueryTool, ListTablesTool, ValidateQueryTool};
pub use tool::Tool;
pub use types::{Observation, ToolCall, ToolParameter, ToolSchema};
