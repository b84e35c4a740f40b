//! Settings for pdo-rs.
//!
//! [`Settings`] holds the connection parameters, the logging level, and the
//! compatibility switches that change how clauses are compiled. Settings are
//! plain values: load them once (see [`settings_loader`](crate::settings_loader))
//! and pass them to whatever needs them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Database connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// The database engine: `"mysql"` or `"sqlite"`.
    pub engine: String,
    /// The database name (or file path for `SQLite`, `":memory:"` for an in-memory database).
    pub name: String,
    /// The database host.
    pub host: String,
    /// The database port.
    pub port: u16,
    /// The database user.
    pub user: String,
    /// The database password.
    pub password: String,
    /// Connection character set, sent as `SET NAMES` on `MySQL`.
    pub charset: String,
    /// Additional engine-specific options.
    pub options: HashMap<String, String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            engine: "mysql".to_string(),
            name: String::new(),
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: String::new(),
            password: String::new(),
            charset: "utf8".to_string(),
            options: HashMap::new(),
        }
    }
}

/// Switches that alter clause compilation.
///
/// Both default to `false`, which gives the corrected behavior. Turning them
/// on reproduces the output of older callers byte for byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Compile `NEQ` to `=` instead of `!=`.
    pub legacy_neq: bool,
    /// Keep one separator per clause slot in `SELECT`, even when the clause
    /// is empty.
    pub preserve_clause_spacing: bool,
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enables pretty logging output.
    pub debug: bool,
    /// Tracing filter directive (e.g. `"info"`, `"pdo_rs_db=debug"`).
    pub log_level: String,
    /// Connection parameters.
    pub database: DatabaseSettings,
    /// Compatibility switches.
    pub compiler: CompilerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            database: DatabaseSettings::default(),
            compiler: CompilerSettings::default(),
        }
    }
}
