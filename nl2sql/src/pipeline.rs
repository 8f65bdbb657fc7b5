//! Request pipeline: inspect schema, compose prompt, generate SQL, execute, present.
//!
//! Steps run strictly in order and the first failure ends the request. Nothing is cached
//! between requests: the schema is read again for every generation.

use std::sync::Arc;

use env_config::Settings;
use tracing::{debug, info};

use crate::db::Database;
use crate::error::Error;
use crate::executor::QueryExecutor;
use crate::llm::{clean_sql_output, LlmClient};
use crate::present::Table;
use crate::prompt::compose_prompt;
use crate::schema::{ColumnSchema, SchemaDescription, SchemaInspector};

/// Generated SQL with the rows it produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Answer {
    pub sql_query: String,
    pub table: Table,
}

pub struct Pipeline {
    inspector: SchemaInspector,
    llm: Arc<dyn LlmClient>,
    executor: QueryExecutor,
}

impl Pipeline {
    pub fn new(inspector: SchemaInspector, llm: Arc<dyn LlmClient>, executor: QueryExecutor) -> Self {
        Self {
            inspector,
            llm,
            executor,
        }
    }

    /// Wires inspector and executor over one shared `db`, using the database name, schema
    /// limits and statement policy from `settings`.
    pub fn from_settings(
        settings: &Settings,
        db: Arc<dyn Database>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        let inspector = SchemaInspector::new(
            db.clone(),
            settings.database.database.clone(),
            settings.schema_limits,
        );
        let executor = QueryExecutor::new(db, settings.sql_policy);
        Self::new(inspector, llm, executor)
    }

    pub fn inspector(&self) -> &SchemaInspector {
        &self.inspector
    }

    pub async fn schema(&self) -> Result<SchemaDescription, Error> {
        self.inspector.inspect().await
    }

    pub async fn list_databases(&self) -> Result<Vec<String>, Error> {
        self.inspector.list_databases().await
    }

    pub async fn list_tables(&self, database: &str) -> Result<Vec<String>, Error> {
        self.inspector.list_tables(database).await
    }

    pub async fn list_columns(&self, database: &str, table: &str) -> Result<Vec<ColumnSchema>, Error> {
        self.inspector.list_columns(database, table).await
    }

    /// Natural language to cleaned SQL. Fails with [`Error::EmptyGeneration`] when cleanup
    /// leaves nothing.
    pub async fn generate(&self, user_text: &str) -> Result<String, Error> {
        let schema = self.inspector.inspect().await?;
        let prompt = compose_prompt(user_text, &schema);
        debug!(model = self.llm.model(), prompt = %prompt, "prompt composed");

        let raw = self.llm.generate(&prompt).await?;
        let sql = clean_sql_output(&raw);
        if sql.is_empty() {
            return Err(Error::EmptyGeneration);
        }
        info!(sql = %sql, "sql generated");
        Ok(sql)
    }

    /// Runs `sql` as given (subject to the statement policy).
    pub async fn execute(&self, sql: &str) -> Result<Table, Error> {
        let rs = self.executor.execute(sql).await?;
        Ok(Table::from_result_set(rs))
    }

    /// Generate, then execute.
    pub async fn ask(&self, user_text: &str) -> Result<Answer, Error> {
        let sql_query = self.generate(user_text).await?;
        let table = self.execute(&sql_query).await?;
        info!(rows = table.rows.len(), "query answered");
        Ok(Answer { sql_query, table })
    }
}
