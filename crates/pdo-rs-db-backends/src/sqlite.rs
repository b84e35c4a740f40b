//! SQLite database backend using `rusqlite`.
//!
//! [`SqliteBackend`] keeps one `rusqlite::Connection` behind a
//! `tokio::sync::Mutex` and runs every statement inside
//! `tokio::task::spawn_blocking`. Pass `:memory:` for an in-memory database.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pdo_rs_core::{PdoError, PdoResult};
use pdo_rs_db::value::Value;
use pdo_rs_db::{DbExecutor, Row};
use rusqlite::types::ValueRef;
use tokio::sync::Mutex;

use crate::base::{DatabaseBackend, SessionState, Transaction};

/// A SQLite database backend.
pub struct SqliteBackend {
    path: PathBuf,
    conn: Arc<Mutex<rusqlite::Connection>>,
    state: Arc<SessionState>,
}

impl SqliteBackend {
    /// Opens a SQLite database at the given path.
    ///
    /// `:memory:` opens an in-memory database. File databases are switched to
    /// WAL journaling; foreign keys are enforced on both.
    pub fn open(path: impl Into<PathBuf>) -> PdoResult<Self> {
        let path = path.into();
        let in_memory = path.as_os_str() == ":memory:";
        let conn = if in_memory {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open(&path)
        }
        .map_err(|e| PdoError::OperationalError(format!("SQLite open failed: {e}")))?;

        let pragmas = if in_memory {
            "PRAGMA foreign_keys=ON;"
        } else {
            "PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;"
        };
        conn.execute_batch(pragmas)
            .map_err(|e| PdoError::OperationalError(format!("Failed to set pragmas: {e}")))?;

        tracing::info!(vendor = "sqlite", path = %path.display(), "opened database");
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
            state: Arc::new(SessionState::default()),
        })
    }

    /// Opens an in-memory database.
    pub fn memory() -> PdoResult<Self> {
        Self::open(":memory:")
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bind_params(stmt: &mut rusqlite::Statement<'_>, params: &[Value]) -> PdoResult<()> {
        for (i, param) in params.iter().enumerate() {
            let idx = i + 1;
            match param {
                Value::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null),
                Value::Bool(b) => stmt.raw_bind_parameter(idx, b),
                Value::Int(v) => stmt.raw_bind_parameter(idx, v),
                Value::Float(v) => stmt.raw_bind_parameter(idx, v),
                Value::String(s) => stmt.raw_bind_parameter(idx, s.as_str()),
            }
            .map_err(|e| PdoError::DatabaseError(format!("Bind error: {e}")))?;
        }
        Ok(())
    }

    fn convert_row(sqlite_row: &rusqlite::Row<'_>, column_names: &[String]) -> PdoResult<Row> {
        let mut values = Vec::with_capacity(column_names.len());
        for idx in 0..column_names.len() {
            let value = match sqlite_row
                .get_ref(idx)
                .map_err(|e| PdoError::DatabaseError(e.to_string()))?
            {
                ValueRef::Null => Value::Null,
                ValueRef::Integer(v) => Value::Int(v),
                ValueRef::Real(v) => Value::Float(v),
                ValueRef::Text(b) | ValueRef::Blob(b) => {
                    Value::String(String::from_utf8_lossy(b).into_owned())
                }
            };
            values.push(value);
        }
        Ok(Row::new(column_names.to_vec(), values))
    }

    /// Runs `f` against the connection on the blocking pool, then refreshes
    /// the transaction flag from the connection's autocommit state.
    async fn with_conn<T, F>(&self, sql: &str, f: F) -> PdoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> PdoResult<T> + Send + 'static,
    {
        self.state.record(sql);
        tracing::trace!(vendor = "sqlite", sql, "round trip");
        let conn = Arc::clone(&self.conn);
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let result = f(&conn);
            state.set_in_transaction(!conn.is_autocommit());
            result
        })
        .await
        .map_err(|e| PdoError::DatabaseError(format!("Task join error: {e}")))?
    }
}

#[async_trait::async_trait]
impl DbExecutor for SqliteBackend {
    async fn execute_sql(&self, sql: &str, params: &[Value]) -> PdoResult<u64> {
        let owned_sql = sql.to_string();
        let params = params.to_vec();
        self.with_conn(sql, move |conn| {
            let mut stmt = conn
                .prepare(&owned_sql)
                .map_err(|e| PdoError::DatabaseError(e.to_string()))?;
            Self::bind_params(&mut stmt, &params)?;
            let count = stmt
                .raw_execute()
                .map_err(|e| PdoError::DatabaseError(e.to_string()))?;
            Ok(count as u64)
        })
        .await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> PdoResult<Vec<Row>> {
        let owned_sql = sql.to_string();
        let params = params.to_vec();
        self.with_conn(sql, move |conn| {
            let mut stmt = conn
                .prepare(&owned_sql)
                .map_err(|e| PdoError::DatabaseError(e.to_string()))?;
            let column_names: Vec<String> =
                stmt.column_names().into_iter().map(String::from).collect();
            Self::bind_params(&mut stmt, &params)?;

            let mut raw_rows = stmt.raw_query();
            let mut rows = Vec::new();
            while let Some(row) = raw_rows
                .next()
                .map_err(|e| PdoError::DatabaseError(e.to_string()))?
            {
                rows.push(Self::convert_row(row, &column_names)?);
            }
            Ok(rows)
        })
        .await
    }
}

#[async_trait::async_trait]
impl DatabaseBackend for SqliteBackend {
    fn vendor(&self) -> &str {
        "sqlite"
    }

    async fn begin_transaction(&self) -> PdoResult<Transaction> {
        self.state.ensure_idle()?;
        self.execute_sql("BEGIN", &[]).await?;
        Ok(Transaction::new(self.vendor()))
    }

    async fn commit(&self) -> PdoResult<()> {
        self.state.ensure_active()?;
        self.execute_sql("COMMIT", &[]).await?;
        Ok(())
    }

    async fn rollback(&self) -> PdoResult<()> {
        self.state.ensure_active()?;
        self.execute_sql("ROLLBACK", &[]).await?;
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.state.in_transaction()
    }

    fn last_sql(&self) -> Option<String> {
        self.state.last_sql()
    }
}
