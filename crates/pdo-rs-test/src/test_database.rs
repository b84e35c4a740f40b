//! An in-memory SQLite database for tests.
//!
//! [`TestDatabase`] wraps a fresh [`SqliteBackend`] and implements
//! [`DbExecutor`], so builders and raw statements run against it directly.
//! Every statement is counted and logged, which is what
//! [`assert_num_queries`](crate::assert_num_queries) reads.
//!
//! ```rust,no_run
//! use pdo_rs_db::QueryBuilder;
//! use pdo_rs_db::Value;
//! use pdo_rs_test::TestDatabase;
//!
//! async fn example() {
//!     let db = TestDatabase::new();
//!     db.setup_table("user", &[("id", "INTEGER PRIMARY KEY"), ("name", "TEXT")])
//!         .await
//!         .unwrap();
//!     db.insert("user", &[("name", Value::from("Ann"))]).await.unwrap();
//!     let rows = QueryBuilder::new().table("user").select(&db).await.unwrap();
//!     assert_eq!(rows.len(), 1);
//! }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use pdo_rs_core::PdoResult;
use pdo_rs_db::value::{quote_ident, Value};
use pdo_rs_db::{DbExecutor, Row};
use pdo_rs_db_backends::{DatabaseBackend, SqliteBackend};

use crate::assert_queries::CountsQueries;

/// A counting, logging, in-memory SQLite executor.
///
/// Clones share the same database, counter, and log.
#[derive(Clone)]
pub struct TestDatabase {
    backend: Arc<SqliteBackend>,
    query_count: Arc<AtomicUsize>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl TestDatabase {
    /// Creates a new, empty in-memory database.
    ///
    /// # Panics
    ///
    /// Panics if SQLite cannot open an in-memory database.
    pub fn new() -> Self {
        let backend = SqliteBackend::memory().expect("Failed to create in-memory SQLite database");
        Self {
            backend: Arc::new(backend),
            query_count: Arc::new(AtomicUsize::new(0)),
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates `table` with the given `(column, definition)` pairs.
    pub async fn setup_table(&self, table: &str, columns: &[(&str, &str)]) -> PdoResult<()> {
        let body = columns
            .iter()
            .map(|(column, definition)| format!("{} {definition}", quote_ident(column)))
            .collect::<Vec<_>>()
            .join(", ");
        self.execute_raw(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({body})",
            quote_ident(table)
        ))
        .await?;
        Ok(())
    }

    /// Inserts one row using driver placeholders.
    pub async fn insert(&self, table: &str, values: &[(&str, Value)]) -> PdoResult<u64> {
        let columns = values
            .iter()
            .map(|(column, _)| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; values.len()].join(", ");
        let params: Vec<Value> = values.iter().map(|(_, v)| v.clone()).collect();
        self.execute_sql(
            &format!(
                "INSERT INTO {} ({columns}) VALUES ({placeholders})",
                quote_ident(table)
            ),
            &params,
        )
        .await
    }

    /// Drops every user table.
    pub async fn teardown(&self) -> PdoResult<()> {
        let rows = self
            .backend
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                &[],
            )
            .await?;
        for row in &rows {
            let table: String = row.get("name")?;
            self.backend
                .execute_sql(&format!("DROP TABLE IF EXISTS {}", quote_ident(&table)), &[])
                .await?;
        }
        Ok(())
    }

    /// Executes a statement with no parameters. Counted and logged.
    pub async fn execute_raw(&self, sql: &str) -> PdoResult<u64> {
        self.execute_sql(sql, &[]).await
    }

    /// Returns every statement run through this handle, oldest first.
    pub fn executed_sql(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the last statement the backend ran.
    pub fn last_sql(&self) -> Option<String> {
        self.backend.last_sql()
    }

    /// Clears the statement log. The counter is left alone.
    pub fn clear_log(&self) {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns the wrapped backend, e.g. for transaction control.
    pub fn backend(&self) -> &SqliteBackend {
        &self.backend
    }

    fn track(&self, sql: &str) {
        self.query_count.fetch_add(1, Ordering::Relaxed);
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sql.to_string());
        tracing::trace!(sql, "test database statement");
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl CountsQueries for TestDatabase {
    fn query_count(&self) -> usize {
        self.query_count.load(Ordering::Relaxed)
    }

    fn reset_query_count(&self) {
        self.query_count.store(0, Ordering::Relaxed);
    }
}

#[async_trait::async_trait]
impl DbExecutor for TestDatabase {
    async fn execute_sql(&self, sql: &str, params: &[Value]) -> PdoResult<u64> {
        self.track(sql);
        self.backend.execute_sql(sql, params).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> PdoResult<Vec<Row>> {
        self.track(sql);
        self.backend.query(sql, params).await
    }
}
