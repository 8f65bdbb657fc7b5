//! MySQL implementation of [`Database`] over a `mysql_async` pool.

use async_trait::async_trait;
use env_config::DatabaseSettings;
use mysql_async::{consts::ColumnType, prelude::*, Opts, OptsBuilder, Pool};
use serde_json::{Number, Value};

use super::{Database, ResultSet};
use crate::error::Error;

/// Pooled MySQL connection built from [`DatabaseSettings`].
///
/// Every [`Database::query`] checks a connection out of the pool, runs the statement with the
/// text protocol and returns the connection. Nothing is retried.
pub struct MySqlDatabase {
    pool: Pool,
    database: String,
}

impl MySqlDatabase {
    /// Creates the pool without touching the network. The first query opens a connection.
    /// Must be called inside a Tokio runtime (the pool spawns its recycler task).
    pub fn new(settings: &DatabaseSettings) -> Self {
        let opts: Opts = OptsBuilder::default()
            .ip_or_hostname(settings.host.clone())
            .tcp_port(settings.port)
            .user(Some(settings.user.clone()))
            .pass(Some(settings.password.clone()))
            .db_name(Some(settings.database.clone()))
            .into();
        Self {
            pool: Pool::new(opts),
            database: settings.database.clone(),
        }
    }

    /// Creates the pool and checks that one connection can be opened.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, Error> {
        tracing::info!(
            host = %settings.host,
            port = settings.port,
            database = %settings.database,
            "connecting to MySQL"
        );
        let db = Self::new(settings);
        let conn = db
            .pool
            .get_conn()
            .await
            .map_err(|e| Error::Connect(e.to_string()))?;
        drop(conn);
        tracing::info!(database = %db.database, "MySQL connection established");
        Ok(db)
    }

    /// Name of the database selected at connect time.
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Closes every pooled connection.
    pub async fn disconnect(self) -> Result<(), Error> {
        self.pool.disconnect().await?;
        Ok(())
    }
}

#[async_trait]
impl Database for MySqlDatabase {
    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str) -> Result<ResultSet, Error> {
        let start = std::time::Instant::now();
        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| Error::Connect(e.to_string()))?;

        let mut result = conn.query_iter(sql).await?;
        let affected_rows = result.affected_rows();
        let columns: Vec<(String, ColumnType)> = result
            .columns_ref()
            .iter()
            .map(|c| (c.name_str().into_owned(), c.column_type()))
            .collect();
        let raw_rows: Vec<mysql_async::Row> = result.collect().await?;
        // Only the first result set is returned; the rest are drained so the connection is clean.
        result.drop_result().await?;
        drop(conn);

        let rows = raw_rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(idx, (_, col_type))| {
                        let raw: mysql_async::Value = row.get(idx).unwrap_or(mysql_async::Value::NULL);
                        mysql_value_to_json(raw, *col_type)
                    })
                    .collect()
            })
            .collect::<Vec<Vec<Value>>>();

        tracing::debug!(
            row_count = rows.len(),
            affected_rows,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "statement executed"
        );
        Ok(ResultSet {
            columns: columns.into_iter().map(|(name, _)| name).collect(),
            rows,
            affected_rows,
        })
    }
}

fn float_to_json(f: f64) -> Value {
    Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(f.to_string()))
}

/// Converts a text-protocol value, using the column type to recover numbers from byte strings.
fn mysql_value_to_json(val: mysql_async::Value, col_type: ColumnType) -> Value {
    use mysql_async::Value as My;
    match val {
        My::NULL => Value::Null,
        My::Bytes(bytes) => {
            let s = String::from_utf8_lossy(&bytes).into_owned();
            match col_type {
                ColumnType::MYSQL_TYPE_TINY
                | ColumnType::MYSQL_TYPE_SHORT
                | ColumnType::MYSQL_TYPE_LONG
                | ColumnType::MYSQL_TYPE_LONGLONG
                | ColumnType::MYSQL_TYPE_INT24
                | ColumnType::MYSQL_TYPE_YEAR => {
                    if let Ok(i) = s.parse::<i64>() {
                        Value::from(i)
                    } else if let Ok(u) = s.parse::<u64>() {
                        Value::from(u)
                    } else {
                        Value::String(s)
                    }
                }
                ColumnType::MYSQL_TYPE_FLOAT
                | ColumnType::MYSQL_TYPE_DOUBLE
                | ColumnType::MYSQL_TYPE_DECIMAL
                | ColumnType::MYSQL_TYPE_NEWDECIMAL => match s.parse::<f64>() {
                    Ok(f) if f.is_finite() => float_to_json(f),
                    _ => Value::String(s),
                },
                _ => Value::String(s),
            }
        }
        My::Int(i) => Value::from(i),
        My::UInt(u) => Value::from(u),
        My::Float(f) => float_to_json(f as f64),
        My::Double(d) => float_to_json(d),
        My::Date(year, month, day, hour, min, sec, micro) => {
            let date = format!("{:04}-{:02}-{:02}", year, month, day);
            let s = if hour == 0 && min == 0 && sec == 0 && micro == 0 {
                date
            } else if micro == 0 {
                format!("{} {:02}:{:02}:{:02}", date, hour, min, sec)
            } else {
                format!("{} {:02}:{:02}:{:02}.{:06}", date, hour, min, sec, micro)
            };
            Value::String(s)
        }
        My::Time(negative, days, hours, mins, secs, micros) => {
            let total_hours = days * 24 + hours as u32;
            let sign = if negative { "-" } else { "" };
            let s = if micros == 0 {
                format!("{}{:02}:{:02}:{:02}", sign, total_hours, mins, secs)
            } else {
                format!(
                    "{}{:02}:{:02}:{:02}.{:06}",
                    sign, total_hours, mins, secs, micros
                )
            };
            Value::String(s)
        }
    }
}
