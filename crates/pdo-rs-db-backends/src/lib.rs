//! # pdo-rs-db-backends
//!
//! Database backends for pdo-rs. Each backend implements
//! [`DbExecutor`](pdo_rs_db::DbExecutor) plus the transaction and
//! last-statement surface of [`DatabaseBackend`].
//!
//! Supported backends, each behind a cargo feature:
//! - `SQLite` (`sqlite`, on by default)
//! - `MySQL` (`mysql`)

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::format_push_string)]
#![allow(clippy::cast_possible_truncation)]
// significant_drop_tightening: false positives with async Mutex guards
#![allow(clippy::significant_drop_tightening)]

pub mod base;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use base::{DatabaseBackend, DatabaseConfig, Engine, Transaction};
#[cfg(feature = "mysql")]
pub use mysql::MySqlBackend;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;

use pdo_rs_core::settings::DatabaseSettings;
use pdo_rs_core::{PdoError, PdoResult};

/// Opens a backend for the configured engine.
///
/// Fails with a configuration error when the engine is unknown or its
/// feature was not compiled in.
pub fn connect(settings: &DatabaseSettings) -> PdoResult<Box<dyn DatabaseBackend>> {
    let config = DatabaseConfig::from_settings(settings)?;
    connect_with(&config)
}

/// Opens a backend from an already-resolved configuration.
pub fn connect_with(config: &DatabaseConfig) -> PdoResult<Box<dyn DatabaseBackend>> {
    match config.engine {
        #[cfg(feature = "sqlite")]
        Engine::Sqlite => Ok(Box::new(SqliteBackend::open(&config.name)?)),
        #[cfg(feature = "mysql")]
        Engine::MySql => Ok(Box::new(MySqlBackend::from_config(config)?)),
        #[allow(unreachable_patterns)]
        engine => Err(PdoError::ConfigurationError(format!(
            "Support for '{engine}' was not compiled in; enable the `{engine}` feature"
        ))),
    }
}
