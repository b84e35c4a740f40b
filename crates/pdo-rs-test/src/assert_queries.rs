//! Query-count assertions.
//!
//! [`assert_num_queries`] resets an executor's counter, runs an async
//! closure, and asserts on how many statements went through. Anything that
//! implements [`CountsQueries`] works: [`TestDatabase`](crate::TestDatabase)
//! and [`RecordingExecutor`](crate::RecordingExecutor) both do.
//!
//! ```rust,no_run
//! use pdo_rs_db::QueryBuilder;
//! use pdo_rs_test::{assert_num_queries, RecordingExecutor};
//!
//! async fn example() {
//!     let db = RecordingExecutor::new();
//!     assert_num_queries(&db, 1, || async {
//!         QueryBuilder::new().table("user").find(&db).await.unwrap();
//!     })
//!     .await;
//! }
//! ```

use std::future::Future;

/// An executor that counts the statements it runs.
pub trait CountsQueries {
    fn query_count(&self) -> usize;
    fn reset_query_count(&self);
}

/// Asserts that exactly `expected_count` statements run during `f`.
///
/// # Panics
///
/// Panics if the count differs.
pub async fn assert_num_queries<D, F, Fut>(db: &D, expected_count: usize, f: F)
where
    D: CountsQueries + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    db.reset_query_count();
    f().await;
    let actual = db.query_count();
    assert_eq!(
        actual, expected_count,
        "Expected {expected_count} SQL queries, but {actual} were executed"
    );
}

/// Asserts that at most `max_count` statements run during `f`.
///
/// # Panics
///
/// Panics if more ran.
pub async fn assert_max_queries<D, F, Fut>(db: &D, max_count: usize, f: F)
where
    D: CountsQueries + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    db.reset_query_count();
    f().await;
    let actual = db.query_count();
    assert!(
        actual <= max_count,
        "Expected at most {max_count} SQL queries, but {actual} were executed"
    );
}
