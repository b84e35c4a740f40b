//! A database-free executor.
//!
//! [`RecordingExecutor`] answers every query with the same canned rows (or a
//! canned error) and remembers each statement it was given. Use it to assert
//! on the exact SQL a builder produces without opening a database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use pdo_rs_core::{PdoError, PdoResult};
use pdo_rs_db::value::Value;
use pdo_rs_db::{DbExecutor, Row};

use crate::assert_queries::CountsQueries;

/// Records SQL and returns canned results.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    rows: Vec<Row>,
    affected: u64,
    failure: Option<String>,
    statements: Mutex<Vec<(String, Vec<Value>)>>,
    count: AtomicUsize,
}

impl RecordingExecutor {
    /// An executor that returns no rows and affects no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor whose queries all return `rows`.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Sets the affected-row count returned by `execute_sql`.
    pub fn affecting(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    /// An executor whose every call fails with a `DatabaseError`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Returns every statement received, oldest first.
    pub fn statements(&self) -> Vec<String> {
        self.lock().iter().map(|(sql, _)| sql.clone()).collect()
    }

    /// Returns every statement with its parameters.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.lock().clone()
    }

    pub fn last_sql(&self) -> Option<String> {
        self.lock().last().map(|(sql, _)| sql.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, Vec<Value>)>> {
        self.statements.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, sql: &str, params: &[Value]) -> PdoResult<()> {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.lock().push((sql.to_string(), params.to_vec()));
        match &self.failure {
            Some(message) => Err(PdoError::DatabaseError(message.clone())),
            None => Ok(()),
        }
    }
}

impl CountsQueries for RecordingExecutor {
    fn query_count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    fn reset_query_count(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

#[async_trait::async_trait]
impl DbExecutor for RecordingExecutor {
    async fn execute_sql(&self, sql: &str, params: &[Value]) -> PdoResult<u64> {
        self.record(sql, params)?;
        Ok(self.affected)
    }

    async fn query(&self, sql: &str, params: &[Value]) -> PdoResult<Vec<Row>> {
        self.record(sql, params)?;
        Ok(self.rows.clone())
    }
}
