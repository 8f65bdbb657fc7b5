//! Runs SQL against the database after the statement policy allows it.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::db::{Database, ResultSet};
use crate::error::Error;
use crate::policy::{self, SqlPolicy};

pub struct QueryExecutor {
    db: Arc<dyn Database>,
    policy: SqlPolicy,
}

impl QueryExecutor {
    pub fn new(db: Arc<dyn Database>, policy: SqlPolicy) -> Self {
        Self { db, policy }
    }

    pub fn policy(&self) -> SqlPolicy {
        self.policy
    }

    /// Executes `sql` exactly as given (no rewriting, no retry).
    ///
    /// Rejected statements never reach the database.
    pub async fn execute(&self, sql: &str) -> Result<ResultSet, Error> {
        if let Err(e) = policy::check(self.policy, sql) {
            warn!(error = %e, "statement rejected");
            return Err(e);
        }
        let rs = self.db.query(sql).await?;
        debug!(
            columns = rs.columns.len(),
            rows = rs.rows.len(),
            affected = rs.affected_rows,
            "statement executed"
        );
        Ok(rs)
    }
}
