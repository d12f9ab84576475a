//! Database access: shared connection, schema inspection, read-only execution
//!
//! The database is opened read-only and shared between sessions through a
//! mutex. All writes are rejected by [`guard`] before a statement ever
//! reaches the connection.

mod error;
mod executor;
mod guard;
mod inspector;

pub use error::DbError;
pub use executor::QueryExecutor;
pub use guard::ensure_read_only;
pub use inspector::{ColumnInfo, SchemaInspector, TableInfo};

use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Shared handle to a SQLite database file.
///
/// Cloning is cheap; all clones share one connection behind a mutex, which
/// is sufficient for the short read statements this system issues.
#[derive(Clone)]
pub struct SqlDatabase {
    connection: Arc<Mutex<Connection>>,
    path: String,
}

impl std::fmt::Debug for SqlDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlDatabase")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqlDatabase {
    /// Open a database file read-only.
    ///
    /// The file must already exist; a missing or unopenable file is a
    /// [`DbError::Connection`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref().to_string_lossy().to_string();
        info!(path = %path, "opening database read-only");

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| DbError::connection(format!("failed to open {path}: {e}")))?;

        conn.busy_timeout(std::time::Duration::from_secs(30))
            .map_err(|e| DbError::connection(format!("failed to set busy timeout: {e}")))?;

        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// SQL dialect spoken by this database
    pub fn dialect(&self) -> &'static str {
        "sqlite"
    }

    /// Path the database was opened from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run a closure with the locked connection.
    ///
    /// A poisoned lock is reported as a connection error rather than a
    /// panic crossing the tool boundary.
    pub(crate) fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DbError>,
    ) -> Result<T, DbError> {
        let conn = self
            .connection
            .lock()
            .map_err(|e| DbError::connection(format!("failed to acquire connection lock: {e}")))?;
        f(&conn)
    }
}

/// Result of one read-only query execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutput {
    /// Column names, in select order
    pub columns: Vec<String>,
    /// Rows of scalar values, at most `top_k` of them
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Whether rows were dropped to satisfy the row cap
    pub truncated: bool,
}

impl QueryOutput {
    /// Number of rows returned
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render as plain text for a tool observation
    pub fn render(&self) -> String {
        if self.columns.is_empty() {
            return "(no columns)".to_string();
        }

        let mut out = self.columns.join(" | ");
        for row in &self.rows {
            out.push('\n');
            let cells: Vec<String> = row.iter().map(render_value).collect();
            out.push_str(&cells.join(" | "));
        }
        if self.rows.is_empty() {
            out.push_str("\n(no rows)");
        }
        if self.truncated {
            out.push_str(&format!("\n(result truncated to {} rows)", self.rows.len()));
        }
        out
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert one SQLite cell to a JSON scalar
pub(crate) fn value_ref_to_json(value: rusqlite::types::ValueRef<'_>) -> serde_json::Value {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).to_string()),
        ValueRef::Blob(b) => serde_json::Value::String(format!("<{} byte blob>", b.len())),
    }
}

/// Quote an identifier for interpolation into introspection statements
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_file_is_connection_error() {
        let err = SqlDatabase::open("/nonexistent/never.db").unwrap_err();
        assert!(matches!(err, DbError::Connection(_)));
    }

    #[test]
    fn dialect_is_sqlite() {
        let (db, _dir) = fixtures::chinook();
        assert_eq!(db.dialect(), "sqlite");
    }

    #[test]
    fn render_marks_truncation_and_nulls() {
        let output = QueryOutput {
            columns: vec!["Id".to_string(), "Name".to_string()],
            rows: vec![
                vec![serde_json::json!(1), serde_json::json!("Rock")],
                vec![serde_json::json!(2), serde_json::Value::Null],
            ],
            truncated: true,
        };

        let text = output.render();
        assert!(text.starts_with("Id | Name"));
        assert!(text.contains("2 | NULL"));
        assert!(text.contains("truncated to 2 rows"));
    }

    #[test]
    fn quote_ident_escapes_embedded_quotes() {
        assert_eq!(quote_ident("Genre"), "\"Genre\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
