//! Database seam: one async `query` that returns column names and rows.
//!
//! [`MySqlDatabase`] talks to a real server through `mysql_async`; [`ScriptedDatabase`] answers
//! from canned results and records every statement (tests, demos). Schema inspection and query
//! execution are both written against [`Database`] so they run unchanged on either.

mod mysql;
mod scripted;

pub use mysql::MySqlDatabase;
pub use scripted::ScriptedDatabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Rows returned by one statement, in server order, with their column names.
///
/// Column names are present even when `rows` is empty. Statements without a result set
/// (INSERT, UPDATE, ...) have no columns and report `affected_rows`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    #[serde(default)]
    pub affected_rows: u64,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows,
            affected_rows: 0,
        }
    }

    /// Convenience for tests and fixtures: string column names, rows of JSON values.
    pub fn from_rows<C, R>(columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator<Item = Vec<Value>>,
    {
        Self::new(
            columns.into_iter().map(Into::into).collect(),
            rows.into_iter().collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text of cell `col` in `row`; non-string scalars are formatted, NULL is `None`.
    pub fn text(&self, row: usize, col: usize) -> Option<String> {
        match self.rows.get(row)?.get(col)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Non-NULL texts of column `col`, top to bottom.
    pub fn column_text(&self, col: usize) -> Vec<String> {
        (0..self.rows.len())
            .filter_map(|row| self.text(row, col))
            .collect()
    }
}

/// A connection (or pool) able to run one SQL statement.
#[async_trait]
pub trait Database: Send + Sync {
    /// Runs `sql` exactly as given and returns its first result set.
    ///
    /// Fails with [`Error::Connect`] when no connection can be obtained and with
    /// [`Error::Database`] when the server rejects the statement.
    async fn query(&self, sql: &str) -> Result<ResultSet, Error>;
}

/// Quotes `s` as a MySQL string literal (single quotes, backslash-escaped).
pub(crate) fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
