//! Schema inspection

use super::{quote_ident, value_ref_to_json, DbError, QueryOutput, SqlDatabase};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One column of a table description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Declared SQL type
    pub data_type: String,
    /// Whether the column carries NOT NULL
    pub not_null: bool,
    /// Whether the column is part of the primary key
    pub primary_key: bool,
}

/// Description of one table: columns plus a few sample rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    /// Canonical table name as stored in the catalog
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<ColumnInfo>,
    /// Up to `sample_rows` rows of example data
    pub sample: QueryOutput,
}

impl TableInfo {
    /// Render as plain text for a tool observation
    pub fn render(&self) -> String {
        let mut out = format!("Table {}:\n", self.name);
        for column in &self.columns {
            out.push_str(&format!("  {} {}", column.name, column.data_type));
            if column.primary_key {
                out.push_str(" PRIMARY KEY");
            }
            if column.not_null {
                out.push_str(" NOT NULL");
            }
            out.push('\n');
        }
        out.push_str("Sample rows:\n");
        out.push_str(&self.sample.render());
        out
    }
}

/// Read-only view over the database catalog.
///
/// `list_tables` has no side effects and is idempotent on an unchanged
/// database; `describe_table` verifies the name against the catalog before
/// issuing any statement against the table itself.
#[derive(Clone)]
pub struct SchemaInspector {
    db: SqlDatabase,
    sample_rows: usize,
}

impl SchemaInspector {
    /// Create an inspector that shows `sample_rows` rows per description
    pub fn new(db: SqlDatabase, sample_rows: usize) -> Self {
        Self { db, sample_rows }
    }

    /// List user table names, sorted, with SQLite internals excluded
    pub fn list_tables(&self) -> Result<Vec<String>, DbError> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            debug!(count = names.len(), "listed tables");
            Ok(names)
        })
    }

    /// Describe one table: columns and up to `sample_rows` sample rows.
    ///
    /// Fails with [`DbError::UnknownTable`] when the name is not in
    /// [`Self::list_tables`]; no statement touches the table in that case.
    pub fn describe_table(&self, name: &str) -> Result<TableInfo, DbError> {
        let tables = self.list_tables()?;
        let canonical = tables
            .iter()
            .find(|t| t.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| DbError::UnknownTable(name.to_string()))?;

        self.db.with_connection(|conn| {
            let mut stmt =
                conn.prepare(&format!("PRAGMA table_info({})", quote_ident(&canonical)))?;
            let columns = stmt
                .query_map([], |row| {
                    Ok(ColumnInfo {
                        name: row.get(1)?,
                        data_type: row.get(2)?,
                        not_null: row.get::<_, i64>(3)? != 0,
                        primary_key: row.get::<_, i64>(5)? != 0,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let mut stmt = conn.prepare(&format!(
                "SELECT * FROM {} LIMIT {}",
                quote_ident(&canonical),
                self.sample_rows
            ))?;
            let column_names: Vec<String> =
                stmt.column_names().iter().map(|s| s.to_string()).collect();
            let column_count = column_names.len();

            let mut rows = Vec::new();
            let mut raw_rows = stmt.query([])?;
            while let Some(row) = raw_rows.next()? {
                let mut cells = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    cells.push(value_ref_to_json(row.get_ref(i)?));
                }
                rows.push(cells);
            }

            Ok(TableInfo {
                name: canonical.clone(),
                columns,
                sample: QueryOutput {
                    columns: column_names,
                    rows,
                    truncated: false,
                },
            })
        })
    }
}
