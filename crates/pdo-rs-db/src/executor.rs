//! Database executor trait.
//!
//! [`DbExecutor`] is the minimal async interface the query builder needs to
//! run compiled SQL. Backends in `pdo-rs-db-backends` implement it, and so do
//! the in-memory test doubles in `pdo-rs-test`. Keeping the trait here lets the
//! compilers and the builder live without any driver dependency.

use pdo_rs_core::PdoResult;

use crate::query::row::Row;
use crate::value::Value;

/// Minimal async database executor.
///
/// Statements built by this crate inline their values, so `params` is empty
/// for them; it is there for raw statements that use driver placeholders.
#[async_trait::async_trait]
pub trait DbExecutor: Send + Sync {
    /// Runs a statement that does not return rows and returns the number of
    /// rows affected.
    async fn execute_sql(&self, sql: &str, params: &[Value]) -> PdoResult<u64>;

    /// Runs a query and returns all result rows in driver order.
    async fn query(&self, sql: &str, params: &[Value]) -> PdoResult<Vec<Row>>;
}

#[async_trait::async_trait]
impl<T: DbExecutor + ?Sized> DbExecutor for Box<T> {
    async fn execute_sql(&self, sql: &str, params: &[Value]) -> PdoResult<u64> {
        (**self).execute_sql(sql, params).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> PdoResult<Vec<Row>> {
        (**self).query(sql, params).await
    }
}
