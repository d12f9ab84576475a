//! Read-only statement guard
//!
//! Classification happens on the raw statement text, before anything is
//! prepared or executed: leading whitespace and SQL comments are stripped,
//! then the first keyword is matched case-insensitively against the set of
//! mutating statement heads.

use super::DbError;

/// Statement heads that are rejected without touching the database.
///
/// The list covers DML/DDL plus the SQLite-specific routes to modify state
/// (`replace`, `vacuum`, `attach`/`detach`, `pragma`, transaction control).
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "drop", "alter", "create", "truncate", "replace", "vacuum",
    "attach", "detach", "reindex", "pragma", "begin", "commit", "rollback", "savepoint", "release",
];

/// Reject mutating statements.
///
/// Returns [`DbError::ForbiddenStatement`] naming the offending keyword, or
/// `Ok(())` for statements that may be handed to the executor. An empty
/// statement (or one that is all comments) is a [`DbError::Query`].
pub fn ensure_read_only(sql: &str) -> Result<(), DbError> {
    let body = strip_leading_trivia(sql);
    let keyword = leading_keyword(body);

    if keyword.is_empty() {
        return Err(DbError::query("empty statement"));
    }

    let lowered = keyword.to_ascii_lowercase();
    if FORBIDDEN_KEYWORDS.contains(&lowered.as_str()) {
        return Err(DbError::ForbiddenStatement(lowered));
    }

    Ok(())
}

/// Strip leading whitespace, `--` line comments, and `/* */` block comments.
fn strip_leading_trivia(mut sql: &str) -> &str {
    loop {
        sql = sql.trim_start();
        if let Some(rest) = sql.strip_prefix("--") {
            sql = rest.split_once('\n').map(|(_, tail)| tail).unwrap_or("");
        } else if let Some(rest) = sql.strip_prefix("/*") {
            // An unterminated block comment leaves nothing executable
            sql = rest.split_once("*/").map(|(_, tail)| tail).unwrap_or("");
        } else {
            return sql;
        }
    }
}

fn leading_keyword(sql: &str) -> &str {
    let end = sql
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric() && *c != '_')
        .map(|(i, _)| i)
        .unwrap_or(sql.len());
    &sql[..end]
}
