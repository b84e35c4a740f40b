//! # pdo-rs-db
//!
//! SELECT building for pdo-rs. A [`QueryBuilder`](query::QueryBuilder) collects
//! a table name and loosely-shaped clause descriptors, the
//! [`ClauseCompiler`](query::ClauseCompiler) turns each descriptor into clause
//! text with values inlined as quoted literals, and the finished statement is
//! sent through a [`DbExecutor`](executor::DbExecutor).
//!
//! ## Module Overview
//!
//! - [`value`] - The [`Value`](value::Value) enum and literal/identifier quoting
//! - [`query`] - Descriptors, compilers, the builder, rows, raw SQL
//! - [`executor`] - The async executor trait backends implement

// - cast_precision_loss: Int-to-Float row conversions are accepted
// - doc_markdown: SQL keywords in docs do not need backticks
// - return_self_not_must_use: QueryBuilder carries its own must_use
// - needless_pass_by_value: setters take owned descriptors
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::unused_self)]
#![allow(clippy::format_push_string)]
// significant_drop_tightening: false positives with async Mutex guards
#![allow(clippy::significant_drop_tightening)]

pub mod executor;
pub mod query;
pub mod value;

pub use executor::DbExecutor;
pub use query::{QueryBuilder, QuerySpec, Row};
pub use value::Value;
