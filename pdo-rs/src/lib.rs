//! # pdo-rs
//!
//! A small database-access helper. Describe a SELECT with loosely shaped
//! descriptors (a condition map, an order list, a page pair), and pdo-rs
//! compiles them into MySQL/SQLite clause text and runs the statement.
//!
//! This is the meta-crate that re-exports the sub-crates.
//!
//! ```
//! use pdo_rs::prelude::*;
//!
//! let sql = QueryBuilder::new()
//!     .table("user")
//!     .filter(WhereDescriptor::new().with("status", 1).with("age", ConditionSpec::gt(18)))
//!     .order(OrderDescriptor::new().then("id", Some("desc")))
//!     .limit(0, 10)
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM `user` WHERE `status` = '1' AND `age` > '18' ORDER BY `id` desc LIMIT 0,10"
//! );
//! ```

/// Errors, settings, settings loading, and logging setup.
pub use pdo_rs_core as core;

/// Descriptors, clause compilers, the query builder, and the executor trait.
pub use pdo_rs_db as db;

/// Database backends: `MySQL`, `SQLite`.
pub use pdo_rs_db_backends as db_backends;

/// The `pdo-rs` command-line tool.
#[cfg(feature = "cli")]
pub use pdo_rs_cli as cli;

/// Test helpers.
#[cfg(feature = "testing")]
pub use pdo_rs_test as test;

/// The types most callers need.
pub mod prelude {
    pub use pdo_rs_core::{CompilerSettings, DatabaseSettings, PdoError, PdoResult, Settings};
    pub use pdo_rs_db::query::{
        ConditionSpec, FieldDescriptor, GroupDescriptor, OrderDescriptor, OrderItem,
        PageDescriptor, QueryBuilder, QuerySpec, RawSql, Row, WhereDescriptor,
    };
    pub use pdo_rs_db::{DbExecutor, Value};
    pub use pdo_rs_db_backends::{connect, DatabaseBackend};
    #[cfg(feature = "mysql")]
    pub use pdo_rs_db_backends::MySqlBackend;
    #[cfg(feature = "sqlite")]
    pub use pdo_rs_db_backends::SqliteBackend;
}
