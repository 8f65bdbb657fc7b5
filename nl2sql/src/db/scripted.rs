//! In-memory [`Database`] that answers from canned results.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Database, ResultSet};
use crate::error::Error;
use crate::schema::{SchemaDescription, COLUMNS_QUERY_MARKER};

enum Reply {
    Rows(ResultSet),
    Fail(String),
}

/// Scripted database for tests and demos.
///
/// Each rule pairs a case-insensitive substring with a reply. The most recently added rule whose
/// substring occurs in the statement wins; statements matching no rule return an empty result.
/// Every statement is recorded, including those that fail.
pub struct ScriptedDatabase {
    rules: Vec<(String, Reply)>,
    unreachable: Option<String>,
    executed: Mutex<Vec<String>>,
}

impl Default for ScriptedDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDatabase {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            unreachable: None,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Answers statements containing `needle` with `result`.
    pub fn with_result(mut self, needle: impl Into<String>, result: ResultSet) -> Self {
        self.rules.push((needle.into().to_lowercase(), Reply::Rows(result)));
        self
    }

    /// Fails statements containing `needle` with a server error carrying `message`.
    pub fn with_error(mut self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules
            .push((needle.into().to_lowercase(), Reply::Fail(message.into())));
        self
    }

    /// Answers schema inspection with the tables and columns of `schema`.
    pub fn with_schema(self, schema: &SchemaDescription) -> Self {
        let rows = schema
            .tables
            .iter()
            .flat_map(|t| {
                t.columns.iter().map(move |c| {
                    vec![
                        Value::String(t.name.clone()),
                        Value::String(c.name.clone()),
                        Value::String(c.data_type.clone()),
                    ]
                })
            })
            .collect::<Vec<_>>();
        self.with_result(
            COLUMNS_QUERY_MARKER,
            ResultSet::from_rows(["TABLE_NAME", "COLUMN_NAME", "COLUMN_TYPE"], rows),
        )
    }

    /// Every statement fails with a connection error, as if the server were down.
    pub fn unreachable(mut self, message: impl Into<String>) -> Self {
        self.unreachable = Some(message.into());
        self
    }

    /// Statements received so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Database for ScriptedDatabase {
    async fn query(&self, sql: &str) -> Result<ResultSet, Error> {
        if let Ok(mut log) = self.executed.lock() {
            log.push(sql.to_string());
        }
        if let Some(msg) = &self.unreachable {
            return Err(Error::Connect(msg.clone()));
        }
        let lowered = sql.to_lowercase();
        let reply = self
            .rules
            .iter()
            .rev()
            .find(|(needle, _)| lowered.contains(needle.as_str()))
            .map(|(_, reply)| reply);
        match reply {
            Some(Reply::Rows(rs)) => Ok(rs.clone()),
            Some(Reply::Fail(msg)) => Err(Error::Database(msg.clone())),
            None => Ok(ResultSet::default()),
        }
    }
}
