//! # HTTP protocol
//!
//! JSON bodies exchanged with the HTTP API. Requests carry a single `query` field (natural
//! language for `/generate_sql/` and `/ask/`, SQL for `/execute_sql/`); every error body is
//! `{"detail": "..."}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pipeline::Answer;
use crate::present::Table;
use crate::schema::ColumnSchema;

// -----------------------------------------------------------------------------
// Requests (client → server)
// -----------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

// -----------------------------------------------------------------------------
// Responses (server → client)
// -----------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabasesResponse {
    pub databases: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}

/// Column names only; types are available from `/schema/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsResponse {
    pub columns: Vec<String>,
}

impl ColumnsResponse {
    pub fn from_columns(columns: Vec<ColumnSchema>) -> Self {
        Self {
            columns: columns.into_iter().map(|c| c.name).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub sql_query: String,
}

/// Rows twice over: positional (`rows`) and keyed by column (`results`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub results: Vec<Map<String, Value>>,
}

impl From<Table> for ExecuteResponse {
    fn from(table: Table) -> Self {
        let results = table.to_records();
        Self {
            columns: table.columns,
            rows: table.rows,
            results,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub sql_query: String,
    #[serde(flatten)]
    pub result: ExecuteResponse,
}

impl From<Answer> for AskResponse {
    fn from(answer: Answer) -> Self {
        Self {
            sql_query: answer.sql_query,
            result: answer.table.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
