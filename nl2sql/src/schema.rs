//! Schema inspection: tables and columns of the connected database.
//!
//! [`SchemaInspector::inspect`] produces the [`SchemaDescription`] embedded in every prompt. It is
//! rebuilt on each call from `information_schema`; nothing is cached. The `list_*` operations back
//! the explorer endpoints.

use std::fmt;
use std::sync::Arc;

use env_config::SchemaLimits;
use serde::{Deserialize, Serialize};

use crate::db::{quote_literal, Database};
use crate::error::Error;

/// Substring identifying column-metadata queries (used by scripted databases to answer them).
pub const COLUMNS_QUERY_MARKER: &str = "information_schema.COLUMNS";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// Ordered tables, each with ordered columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescription {
    pub tables: Vec<TableSchema>,
}

impl SchemaDescription {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Groups `(table, column, type)` triples into tables. Consecutive rows of the same table
    /// are merged, so input must be ordered by table.
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String)>,
    {
        let mut tables: Vec<TableSchema> = Vec::new();
        for (table, column, data_type) in triples {
            match tables.last_mut() {
                Some(last) if last.name == table => {
                    last.columns.push(ColumnSchema::new(column, data_type))
                }
                _ => tables.push(TableSchema::new(
                    table,
                    vec![ColumnSchema::new(column, data_type)],
                )),
            }
        }
        Self { tables }
    }

    /// Keeps the first `max_tables` tables and the first `max_columns` columns of each.
    pub fn limited(mut self, limits: SchemaLimits) -> Self {
        if let Some(n) = limits.max_tables {
            self.tables.truncate(n);
        }
        if let Some(n) = limits.max_columns {
            for t in &mut self.tables {
                t.columns.truncate(n);
            }
        }
        self
    }
}

/// One line per table: `name: col TYPE, col TYPE`.
impl fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tables.is_empty() {
            return f.write_str("(no tables)");
        }
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: ", table.name)?;
            for (j, col) in table.columns.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} {}", col.name, col.data_type)?;
            }
        }
        Ok(())
    }
}

/// Reads table and column metadata through a [`Database`].
pub struct SchemaInspector {
    db: Arc<dyn Database>,
    database: String,
    limits: SchemaLimits,
}

impl SchemaInspector {
    /// `database` is the schema described to the model (normally `MYSQL_DATABASE`).
    pub fn new(db: Arc<dyn Database>, database: impl Into<String>, limits: SchemaLimits) -> Self {
        Self {
            db,
            database: database.into(),
            limits,
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Current schema of the configured database. One query, no retry.
    pub async fn inspect(&self) -> Result<SchemaDescription, Error> {
        let sql = format!(
            "SELECT TABLE_NAME, COLUMN_NAME, COLUMN_TYPE FROM {} \
             WHERE TABLE_SCHEMA = {} ORDER BY TABLE_NAME, ORDINAL_POSITION",
            COLUMNS_QUERY_MARKER,
            quote_literal(&self.database)
        );
        let rs = self.db.query(&sql).await?;
        let triples = (0..rs.rows.len()).filter_map(|i| {
            Some((rs.text(i, 0)?, rs.text(i, 1)?, rs.text(i, 2).unwrap_or_default()))
        });
        let schema = SchemaDescription::from_triples(triples).limited(self.limits);
        tracing::debug!(
            database = %self.database,
            tables = schema.tables.len(),
            "schema inspected"
        );
        Ok(schema)
    }

    pub async fn list_databases(&self) -> Result<Vec<String>, Error> {
        let rs = self.db.query("SHOW DATABASES").await?;
        Ok(rs.column_text(0))
    }

    /// Base tables and views of `database`, by name.
    pub async fn list_tables(&self, database: &str) -> Result<Vec<String>, Error> {
        let sql = format!(
            "SELECT TABLE_NAME FROM information_schema.TABLES \
             WHERE TABLE_SCHEMA = {} ORDER BY TABLE_NAME",
            quote_literal(database)
        );
        let rs = self.db.query(&sql).await?;
        Ok(rs.column_text(0))
    }

    /// Columns of `database`.`table` in ordinal order.
    pub async fn list_columns(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnSchema>, Error> {
        let sql = format!(
            "SELECT TABLE_NAME, COLUMN_NAME, COLUMN_TYPE FROM {} \
             WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {} ORDER BY ORDINAL_POSITION",
            COLUMNS_QUERY_MARKER,
            quote_literal(database),
            quote_literal(table)
        );
        let rs = self.db.query(&sql).await?;
        Ok((0..rs.rows.len())
            .filter_map(|i| {
                Some(ColumnSchema::new(
                    rs.text(i, 1)?,
                    rs.text(i, 2).unwrap_or_default(),
                ))
            })
            .collect())
    }
}
