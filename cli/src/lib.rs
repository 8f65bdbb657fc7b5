//! Terminal output for the `nl2sql` binary.
//!
//! Text mode prints the SQL (for `ask`/`generate`) and an aligned grid; `--json` prints the same
//! bodies the HTTP API returns, one JSON document per command.

use nl2sql::{Answer, AskResponse, ExecuteResponse, SchemaDescription, Table};
use serde_json::Value;

/// Joins positional words into the request text (`nl2sql ask top 5 customers`).
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}

/// SQL line, blank line, result grid.
pub fn format_answer(answer: &Answer) -> String {
    format!("{}\n\n{}", answer.sql_query, answer.table.render_text())
}

pub fn answer_json(answer: &Answer) -> Result<Value, serde_json::Error> {
    serde_json::to_value(AskResponse::from(answer.clone()))
}

pub fn table_json(table: &Table) -> Result<Value, serde_json::Error> {
    serde_json::to_value(ExecuteResponse::from(table.clone()))
}

/// Schema as printed by `nl2sql schema`: database name, then one line per table.
pub fn format_schema(database: &str, schema: &SchemaDescription) -> String {
    format!("Database: {}\n{}\n", database, schema)
}
