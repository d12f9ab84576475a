//! The four database tools exposed to the reasoning loop

mod describe_table;
mod execute_query;
mod list_tables;
mod validate_query;

pub use describe_table::DescribeTableTool;
pub use execute_query::ExecuteQueryTool;
pub use list_tables::ListTablesTool;
pub use validate_query::ValidateQueryTool;
