//! Base database backend trait and common types.
//!
//! This module defines the [`DatabaseBackend`] trait that every backend
//! implements on top of [`DbExecutor`], the [`Transaction`] token handed out
//! by [`DatabaseBackend::begin_transaction`], and [`DatabaseConfig`], the
//! resolved connection parameters.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use pdo_rs_core::settings::DatabaseSettings;
use pdo_rs_core::{PdoError, PdoResult};
use pdo_rs_db::DbExecutor;

/// A token for an open transaction.
///
/// The token only records what the caller did with it; the transaction
/// itself is finished through [`DatabaseBackend::commit`] or
/// [`DatabaseBackend::rollback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    vendor: String,
    committed: bool,
}

impl Transaction {
    /// Creates a token for a transaction opened on `vendor`.
    pub fn new(vendor: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            committed: false,
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Marks this transaction as committed.
    pub fn set_committed(&mut self) {
        self.committed = true;
    }
}

/// A connected database.
///
/// Everything a [`DbExecutor`] does, plus transaction control and a record
/// of the last statement sent. All I/O is async; the `SQLite` backend wraps
/// its synchronous driver in `spawn_blocking`.
#[async_trait::async_trait]
pub trait DatabaseBackend: DbExecutor {
    /// Returns the vendor name (`"sqlite"` or `"mysql"`).
    fn vendor(&self) -> &str;

    /// Opens a transaction. Fails if one is already open.
    async fn begin_transaction(&self) -> PdoResult<Transaction>;

    /// Commits the open transaction. Fails if none is open.
    async fn commit(&self) -> PdoResult<()>;

    /// Rolls back the open transaction. Fails if none is open.
    async fn rollback(&self) -> PdoResult<()>;

    /// Returns `true` between `begin_transaction` and `commit`/`rollback`.
    fn in_transaction(&self) -> bool;

    /// Returns the last statement sent to the database, if any.
    fn last_sql(&self) -> Option<String>;
}

/// Per-connection bookkeeping shared by the backends.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    last_sql: Mutex<Option<String>>,
    in_transaction: AtomicBool,
}

impl SessionState {
    pub(crate) fn record(&self, sql: &str) {
        let mut last = self.last_sql.lock().unwrap_or_else(PoisonError::into_inner);
        *last = Some(sql.to_string());
    }

    pub(crate) fn last_sql(&self) -> Option<String> {
        self.last_sql
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn in_transaction(&self) -> bool {
        self.in_transaction.load(Ordering::SeqCst)
    }

    pub(crate) fn set_in_transaction(&self, active: bool) {
        self.in_transaction.store(active, Ordering::SeqCst);
    }

    pub(crate) fn ensure_idle(&self) -> PdoResult<()> {
        if self.in_transaction() {
            return Err(PdoError::OperationalError(
                "A transaction is already active".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn ensure_active(&self) -> PdoResult<()> {
        if !self.in_transaction() {
            return Err(PdoError::OperationalError(
                "There is no active transaction".to_string(),
            ));
        }
        Ok(())
    }
}

/// A supported database engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Sqlite,
    MySql,
}

impl Engine {
    /// Parses an engine name. Matching ignores case; `sqlite3` is accepted.
    pub fn parse(name: &str) -> PdoResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "mysql" => Ok(Self::MySql),
            other => Err(PdoError::ConfigurationError(format!(
                "Unknown database engine '{other}'"
            ))),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// The engine to connect with.
    pub engine: Engine,
    /// The database name, or the file path for `SQLite`.
    pub name: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Connection character set (`MySQL` only).
    pub charset: String,
    /// Additional connection options.
    pub options: HashMap<String, String>,
}

/// Default `MySQL` port.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Default connection character set.
pub const DEFAULT_CHARSET: &str = "utf8";

impl DatabaseConfig {
    /// Creates a configuration for an in-memory `SQLite` database.
    pub fn sqlite_memory() -> Self {
        Self::sqlite_file(":memory:")
    }

    /// Creates a configuration for a `SQLite` file database.
    pub fn sqlite_file(path: impl Into<String>) -> Self {
        Self {
            engine: Engine::Sqlite,
            name: path.into(),
            host: None,
            port: None,
            user: None,
            password: None,
            charset: DEFAULT_CHARSET.to_string(),
            options: HashMap::new(),
        }
    }

    /// Creates a configuration for a `MySQL` database.
    pub fn mysql(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            engine: Engine::MySql,
            name: name.into(),
            host: Some(host.into()),
            port: Some(port),
            user: Some(user.into()),
            password: Some(password.into()),
            charset: DEFAULT_CHARSET.to_string(),
            options: HashMap::new(),
        }
    }

    /// Sets the connection character set.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Resolves settings into a configuration.
    ///
    /// Empty strings count as unset. An empty `SQLite` name opens an
    /// in-memory database; a zero `MySQL` port falls back to 3306.
    pub fn from_settings(settings: &DatabaseSettings) -> PdoResult<Self> {
        let engine = Engine::parse(&settings.engine)?;
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        let charset = if settings.charset.trim().is_empty() {
            DEFAULT_CHARSET.to_string()
        } else {
            settings.charset.trim().to_string()
        };
        if !charset.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PdoError::ConfigurationError(format!(
                "Invalid character set '{charset}'"
            )));
        }

        let config = match engine {
            Engine::Sqlite => Self {
                name: non_empty(&settings.name).unwrap_or_else(|| ":memory:".to_string()),
                ..Self::sqlite_memory()
            },
            Engine::MySql => {
                if settings.name.is_empty() {
                    return Err(PdoError::ConfigurationError(
                        "MySQL requires a database name".to_string(),
                    ));
                }
                Self {
                    engine,
                    name: settings.name.clone(),
                    host: Some(non_empty(&settings.host).unwrap_or_else(|| "127.0.0.1".to_string())),
                    port: Some(if settings.port == 0 {
                        DEFAULT_MYSQL_PORT
                    } else {
                        settings.port
                    }),
                    user: non_empty(&settings.user),
                    password: non_empty(&settings.password),
                    charset: DEFAULT_CHARSET.to_string(),
                    options: HashMap::new(),
                }
            }
        };

        Ok(Self {
            charset,
            options: settings.options.clone(),
            ..config
        })
    }
}
