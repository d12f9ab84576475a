//! Read-only query execution

use super::{ensure_read_only, value_ref_to_json, DbError, QueryOutput, SqlDatabase};
use tracing::debug;

/// Executes single read statements against the shared database.
///
/// The executor holds no mutable state across calls; every invocation
/// classifies, prepares, runs, and truncates independently, so one executor
/// may serve concurrent sessions.
#[derive(Clone)]
pub struct QueryExecutor {
    db: SqlDatabase,
    top_k: usize,
}

impl QueryExecutor {
    /// Create an executor capped at `top_k` rows per execution
    pub fn new(db: SqlDatabase, top_k: usize) -> Self {
        Self { db, top_k }
    }

    /// Run one read-only statement.
    ///
    /// Mutating statements are rejected with
    /// [`DbError::ForbiddenStatement`] before the database is contacted.
    /// Results are truncated to the configured row cap and flagged when rows
    /// were dropped.
    pub fn execute(&self, sql: &str) -> Result<QueryOutput, DbError> {
        ensure_read_only(sql)?;
        debug!(sql, "executing query");

        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let column_names: Vec<String> =
                stmt.column_names().iter().map(|s| s.to_string()).collect();
            let column_count = column_names.len();

            let mut rows = Vec::new();
            let mut truncated = false;
            let mut raw_rows = stmt.query([])?;
            while let Some(row) = raw_rows.next()? {
                if rows.len() == self.top_k {
                    truncated = true;
                    break;
                }
                let mut cells = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    cells.push(value_ref_to_json(row.get_ref(i)?));
                }
                rows.push(cells);
            }

            Ok(QueryOutput {
                columns: column_names,
                rows,
                truncated,
            })
        })
    }

    /// Dry-run check: classify, then compile without executing.
    ///
    /// Shares the error taxonomy of [`Self::execute`] but never returns rows.
    pub fn validate(&self, sql: &str) -> Result<(), DbError> {
        ensure_read_only(sql)?;
        debug!(sql, "validating query");

        self.db.with_connection(|conn| {
            conn.prepare(sql)?;
            Ok(())
        })
    }
}
