//! Raw SQL execution.
//!
//! [`RawSql`] runs a hand-written statement through a [`DbExecutor`] and hands
//! back the rows (or affected-row count) unchanged. Nothing in the statement
//! is escaped or rewritten; use driver placeholders for untrusted values.
//!
//! # Examples
//!
//! ```ignore
//! use pdo_rs_db::query::raw::RawSql;
//!
//! let rows = RawSql::new("SELECT * FROM `user`", vec![]).fetch_all(&db).await?;
//! let n = RawSql::new("DELETE FROM `user` WHERE `id` = ?", vec![7.into()])
//!     .execute(&db)
//!     .await?;
//! ```

use pdo_rs_core::PdoResult;

use crate::executor::DbExecutor;
use crate::query::row::Row;
use crate::value::Value;

/// A raw SQL statement with optional driver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSql {
    sql: String,
    params: Vec<Value>,
}

impl RawSql {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Runs the statement as a query and returns every row.
    pub async fn fetch_all(&self, db: &dyn DbExecutor) -> PdoResult<Vec<Row>> {
        tracing::trace!(sql = %self.sql, "raw query");
        db.query(&self.sql, &self.params).await
    }

    /// Runs the statement as a query and returns the first row, if any.
    pub async fn fetch_one(&self, db: &dyn DbExecutor) -> PdoResult<Option<Row>> {
        Ok(self.fetch_all(db).await?.into_iter().next())
    }

    /// Runs the statement (INSERT, UPDATE, DELETE, DDL) and returns the number
    /// of affected rows.
    pub async fn execute(&self, db: &dyn DbExecutor) -> PdoResult<u64> {
        tracing::trace!(sql = %self.sql, "raw execute");
        db.execute_sql(&self.sql, &self.params).await
    }

    /// Runs several statements in order and returns the total affected rows.
    /// Stops at the first failure.
    pub async fn execute_many(statements: &[Self], db: &dyn DbExecutor) -> PdoResult<u64> {
        let mut total = 0u64;
        for stmt in statements {
            total += stmt.execute(db).await?;
        }
        Ok(total)
    }
}
