//! # pdo-rs-test
//!
//! Test helpers for code built on pdo-rs:
//!
//! - [`TestDatabase`](test_database::TestDatabase) - a fresh in-memory SQLite
//!   executor that counts and logs every statement
//! - [`RecordingExecutor`](recording::RecordingExecutor) - an executor with no
//!   database behind it that records SQL and returns canned rows
//! - [`assert_num_queries`] and [`assert_max_queries`]

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
// significant_drop_tightening: false positives with Mutex guards
#![allow(clippy::significant_drop_tightening)]

pub mod assert_queries;
pub mod recording;
#[cfg(feature = "sqlite")]
pub mod test_database;

pub use assert_queries::{assert_max_queries, assert_num_queries, CountsQueries};
pub use recording::RecordingExecutor;
#[cfg(feature = "sqlite")]
pub use test_database::TestDatabase;
