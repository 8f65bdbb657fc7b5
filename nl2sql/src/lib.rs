//! # nl2sql
//!
//! Natural-language questions answered from a MySQL database. A request flows through
//! **inspect schema → compose prompt → generate SQL → execute → present**, one step after the
//! other, with no state kept between requests.
//!
//! ## Main modules
//!
//! - [`schema`]: [`SchemaInspector`], [`SchemaDescription`]; explorer listings.
//! - [`prompt`]: [`compose_prompt`], [`GENERATION_RULES`].
//! - [`llm`]: [`LlmClient`] trait, [`GeminiClient`], [`MockLlm`], [`clean_sql_output`].
//! - [`policy`]: [`SqlPolicy`] and the read-only statement check.
//! - [`db`]: [`Database`] seam, [`MySqlDatabase`], [`ScriptedDatabase`], [`ResultSet`].
//! - [`executor`]: [`QueryExecutor`].
//! - [`present`]: [`Table`] (JSON records, text grid).
//! - [`pipeline`]: [`Pipeline`] with `generate`, `execute`, `ask`.
//! - [`protocol`]: HTTP request/response bodies.
//!
//! Settings come from the workspace `config` crate, re-exported here as [`config`].

pub mod db;
pub mod error;
pub mod executor;
pub mod llm;
pub mod pipeline;
pub mod policy;
pub mod present;
pub mod prompt;
pub mod protocol;
pub mod schema;
mod sql_scan;

pub use env_config as config;

pub use db::{Database, MySqlDatabase, ResultSet, ScriptedDatabase};
pub use error::{Error, ErrorKind};
pub use executor::QueryExecutor;
pub use llm::{clean_sql_output, GeminiClient, LlmClient, MockLlm};
pub use pipeline::{Answer, Pipeline};
pub use policy::SqlPolicy;
pub use present::Table;
pub use prompt::{compose_prompt, Prompt, GENERATION_RULES};
pub use protocol::{
    AskResponse, ColumnsResponse, DatabasesResponse, ErrorResponse, ExecuteResponse,
    GenerateResponse, QueryRequest, StatusResponse, TablesResponse,
};
pub use schema::{ColumnSchema, SchemaDescription, SchemaInspector, TableSchema};
