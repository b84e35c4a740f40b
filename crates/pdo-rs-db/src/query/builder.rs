//! The chainable SELECT builder.
//!
//! A [`QueryBuilder`] holds a table name and one pending descriptor of each
//! kind. Setters take and return the builder by value, and the terminal calls
//! ([`select`](QueryBuilder::select), [`find`](QueryBuilder::find)) consume it,
//! so a builder runs at most once. [`to_sql`](QueryBuilder::to_sql) compiles
//! without executing.
//!
//! # Examples
//!
//! ```
//! use pdo_rs_db::query::builder::QueryBuilder;
//! use pdo_rs_db::query::descriptors::{ConditionSpec, OrderDescriptor, WhereDescriptor};
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

use pdo_rs_core::logging::query_span;
use pdo_rs_core::settings::CompilerSettings;
use pdo_rs_core::{PdoError, PdoResult};
use serde::{Deserialize, Serialize};

use super::compiler::ClauseCompiler;
use super::descriptors::{
    ConditionSpec, FieldDescriptor, GroupDescriptor, OrderDescriptor, PageDescriptor,
    WhereDescriptor,
};
use super::row::Row;
use crate::executor::DbExecutor;
use crate::value::quote_ident;

/// Accumulates clause descriptors for one SELECT against one table.
#[derive(Debug, Clone, Default)]
#[must_use = "a QueryBuilder does nothing until select() or find() is called"]
pub struct QueryBuilder {
    table: Option<String>,
    filter: WhereDescriptor,
    fields: FieldDescriptor,
    order: OrderDescriptor,
    group: GroupDescriptor,
    page: PageDescriptor,
    compiler: ClauseCompiler,
}

impl QueryBuilder {
    /// Creates a builder with default compiler settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with the given compiler settings.
    pub fn with_settings(settings: CompilerSettings) -> Self {
        Self {
            compiler: ClauseCompiler::new(settings),
            ..Self::default()
        }
    }

    /// Sets the table. Surrounding backticks are trimmed; the name is quoted
    /// when compiled.
    pub fn table(mut self, name: &str) -> Self {
        self.table = Some(name.trim_matches('`').to_string());
        self
    }

    /// Replaces the WHERE descriptor.
    pub fn filter(mut self, descriptor: impl Into<WhereDescriptor>) -> Self {
        self.filter = descriptor.into();
        self
    }

    /// Adds (or replaces) a single condition on the WHERE descriptor.
    pub fn and_where(mut self, field: impl Into<String>, spec: impl Into<ConditionSpec>) -> Self {
        self.filter.insert(field, spec);
        self
    }

    /// Replaces the selected-columns descriptor.
    pub fn field(mut self, descriptor: impl Into<FieldDescriptor>) -> Self {
        self.fields = descriptor.into();
        self
    }

    /// Replaces the ORDER BY descriptor.
    pub fn order(mut self, descriptor: impl Into<OrderDescriptor>) -> Self {
        self.order = descriptor.into();
        self
    }

    /// Replaces the GROUP BY descriptor.
    pub fn group(mut self, descriptor: impl Into<GroupDescriptor>) -> Self {
        self.group = descriptor.into();
        self
    }

    /// Sets paging. `limit(10, None)` is `LIMIT 10`; `limit(0, 10)` is
    /// `LIMIT 0,10`; `limit(0, None)` clears it.
    pub fn limit(mut self, offset: u64, length: impl Into<Option<u64>>) -> Self {
        self.page = PageDescriptor::new(offset, length.into());
        self
    }

    /// Replaces the paging descriptor.
    pub fn page(mut self, page: PageDescriptor) -> Self {
        self.page = page;
        self
    }

    /// Returns the table name, without quotes.
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Compiles the SELECT statement without running it.
    pub fn to_sql(&self) -> PdoResult<String> {
        let table = match self.table.as_deref() {
            Some(table) if !table.is_empty() => quote_ident(table),
            _ => return Err(PdoError::MissingTable),
        };

        let where_clause = self.compiler.compile_where(&self.filter)?;
        let order = self.compiler.compile_order(&self.order)?;
        let group = self.compiler.compile_group(&self.group);
        let limit = self.compiler.compile_limit(&self.page);
        let fields = match self.compiler.compile_fields(&self.fields) {
            f if f.trim().is_empty() => "*".to_string(),
            f => f,
        };

        if self.compiler.settings().preserve_clause_spacing {
            return Ok(format!(
                "SELECT {fields} FROM {table} {where_clause} {group} {order} {limit}"
            ));
        }

        let mut sql = format!("SELECT {fields} FROM {table}");
        for clause in [&where_clause, &group, &order, &limit] {
            let clause = clause.trim();
            if !clause.is_empty() {
                sql.push(' ');
                sql.push_str(clause);
            }
        }
        Ok(sql)
    }

    /// Compiles and runs the SELECT, returning the rows unchanged.
    ///
    /// Compilation errors are returned before anything reaches `db`.
    pub async fn select(self, db: &dyn DbExecutor) -> PdoResult<Vec<Row>> {
        let sql = self.to_sql()?;
        let span = query_span(self.table_name().unwrap_or_default());
        span.in_scope(|| tracing::debug!(target: "pdo_rs_db::builder", sql = %sql, "select"));
        db.query(&sql, &[]).await
    }

    /// Like [`select`](Self::select) but fetches at most one row.
    ///
    /// Paging is forced to a single row: `LIMIT 1`, or `LIMIT offset,1` when a
    /// length was set.
    pub async fn find(mut self, db: &dyn DbExecutor) -> PdoResult<Option<Row>> {
        self.page = match self.page.length {
            Some(_) => PageDescriptor::new(self.page.offset, Some(1)),
            None => PageDescriptor::new(1, None),
        };
        Ok(self.select(db).await?.into_iter().next())
    }
}

/// A serializable bundle of a table and its descriptors.
///
/// The JSON shape mirrors the builder calls:
///
/// ```
/// use pdo_rs_db::query::builder::QuerySpec;
///
/// let spec = QuerySpec::from_json(r#"{
///     "table": "user",
///     "where": {"status": 1, "age": ["GT", 18]},
///     "order": {"id": "desc"},
///     "limit": [0, 10]
/// }"#).unwrap();
/// assert_eq!(spec.table, "user");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySpec {
    pub table: String,
    #[serde(rename = "where")]
    pub filter: WhereDescriptor,
    pub field: FieldDescriptor,
    pub order: OrderDescriptor,
    pub group: GroupDescriptor,
    pub limit: PageDescriptor,
}

impl QuerySpec {
    /// Parses a spec from JSON.
    pub fn from_json(json: &str) -> PdoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Turns the spec into a configured builder.
    pub fn into_builder(self, settings: CompilerSettings) -> QueryBuilder {
        QueryBuilder::with_settings(settings)
            .table(&self.table)
            .filter(self.filter)
            .field(self.field)
            .order(self.order)
            .group(self.group)
            .page(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::descriptors::OrderItem;
    use crate::value::Value;
    use tokio::sync::Mutex as TokioMutex;

    const E2E_PRESERVED: &str =
        "SELECT * FROM `user` WHERE `status` = '1' AND `age` > '18'  ORDER BY `id` desc LIMIT 0,10";
    const E2E_COLLAPSED: &str =
        "SELECT * FROM `user` WHERE `status` = '1' AND `age` > '18' ORDER BY `id` desc LIMIT 0,10";

    fn e2e(builder: QueryBuilder) -> QueryBuilder {
        builder
            .table("user")
            .filter(
                WhereDescriptor::new()
                    .with("status", 1)
                    .with("age", ConditionSpec::gt(18)),
            )
            .order(OrderDescriptor::new().then("id", Some("desc")))
            .limit(0, 10)
    }

    struct RecordingDb {
        rows: Vec<Row>,
        sql: TokioMutex<Vec<String>>,
    }

    impl RecordingDb {
        fn new(rows: Vec<Row>) -> Self {
            Self {
                rows,
                sql: TokioMutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl DbExecutor for RecordingDb {
        async fn execute_sql(&self, sql: &str, _params: &[Value]) -> PdoResult<u64> {
            self.sql.lock().await.push(sql.to_string());
            Ok(0)
        }

        async fn query(&self, sql: &str, _params: &[Value]) -> PdoResult<Vec<Row>> {
            self.sql.lock().await.push(sql.to_string());
            Ok(self.rows.clone())
        }
    }

    #[test]
    fn test_end_to_end_collapsed() {
        assert_eq!(e2e(QueryBuilder::new()).to_sql().unwrap(), E2E_COLLAPSED);
    }

    #[test]
    fn test_end_to_end_preserved_spacing() {
        let settings = CompilerSettings {
            preserve_clause_spacing: true,
            ..CompilerSettings::default()
        };
        assert_eq!(
            e2e(QueryBuilder::with_settings(settings)).to_sql().unwrap(),
            E2E_PRESERVED
        );
    }

    #[test]
    fn test_bare_select() {
        let sql = QueryBuilder::new().table("user").to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `user`");
    }

    #[test]
    fn test_table_trims_backticks() {
        let sql = QueryBuilder::new().table("`user`").to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `user`");
    }

    #[test]
    fn test_all_clauses_in_order() {
        let sql = QueryBuilder::new()
            .table("orders")
            .field(vec!["customer", "total"])
            .and_where("status", "paid")
            .group(vec!["customer"])
            .order(OrderDescriptor::Fields(vec![OrderItem::desc("total")]))
            .limit(5, None)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT `customer`,`total` FROM `orders` WHERE `status` = 'paid' GROUP BY `customer` ORDER BY `total` desc LIMIT 5"
        );
    }

    #[test]
    fn test_raw_where_passthrough() {
        let sql = QueryBuilder::new()
            .table("user")
            .filter("WHERE id > 3")
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM `user` WHERE id > 3");
    }

    #[test]
    fn test_setter_replaces_previous_descriptor() {
        let sql = QueryBuilder::new()
            .table("user")
            .order("id desc")
            .order("age")
            .limit(10, None)
            .limit(0, None)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM `user` ORDER BY age");
    }

    #[test]
    fn test_missing_table() {
        let err = QueryBuilder::new().and_where("id", 1).to_sql().unwrap_err();
        assert!(matches!(err, PdoError::MissingTable));
        let err = QueryBuilder::new().table("``").to_sql().unwrap_err();
        assert!(matches!(err, PdoError::MissingTable));
    }

    #[test]
    fn test_legacy_neq_through_builder() {
        let settings = CompilerSettings {
            legacy_neq: true,
            ..CompilerSettings::default()
        };
        let sql = QueryBuilder::with_settings(settings)
            .table("user")
            .and_where("id", ConditionSpec::neq(3))
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM `user` WHERE `id` = '3'");
    }

    #[tokio::test]
    async fn test_select_sends_compiled_sql_and_returns_rows() {
        let row = Row::new(vec!["id".into()], vec![Value::Int(1)]);
        let db = RecordingDb::new(vec![row.clone()]);
        let rows = e2e(QueryBuilder::new()).select(&db).await.unwrap();
        assert_eq!(rows, vec![row]);
        assert_eq!(*db.sql.lock().await, vec![E2E_COLLAPSED.to_string()]);
    }

    #[tokio::test]
    async fn test_select_compile_error_sends_nothing() {
        let db = RecordingDb::new(vec![]);
        let result = QueryBuilder::new()
            .table("user")
            .and_where("id", ConditionSpec::tagged("XYZ", Value::Int(1)))
            .select(&db)
            .await;
        assert!(matches!(result, Err(PdoError::UnsupportedOperator(_))));
        assert!(db.sql.lock().await.is_empty());

        let result = QueryBuilder::new().select(&db).await;
        assert!(matches!(result, Err(PdoError::MissingTable)));
        assert!(db.sql.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_find_forces_single_row() {
        let db = RecordingDb::new(vec![
            Row::new(vec!["id".into()], vec![Value::Int(1)]),
            Row::new(vec!["id".into()], vec![Value::Int(2)]),
        ]);
        let row = QueryBuilder::new().table("user").find(&db).await.unwrap();
        assert_eq!(row.unwrap().get::<i64>("id").unwrap(), 1);

        QueryBuilder::new()
            .table("user")
            .limit(20, 10)
            .find(&db)
            .await
            .unwrap();

        let sql = db.sql.lock().await.clone();
        assert_eq!(sql[0], "SELECT * FROM `user` LIMIT 1");
        assert_eq!(sql[1], "SELECT * FROM `user` LIMIT 20,1");
    }

    #[tokio::test]
    async fn test_find_empty() {
        let db = RecordingDb::new(vec![]);
        assert!(QueryBuilder::new().table("user").find(&db).await.unwrap().is_none());
    }

    #[test]
    fn test_query_spec_into_builder() {
        let spec = QuerySpec::from_json(
            r#"{
                "table": "user",
                "where": {"status": 1, "age": ["GT", 18]},
                "order": {"id": "desc"},
                "limit": [0, 10]
            }"#,
        )
        .unwrap();
        let sql = spec.into_builder(CompilerSettings::default()).to_sql().unwrap();
        assert_eq!(sql, E2E_COLLAPSED);
    }

    #[test]
    fn test_query_spec_null_clauses_are_empty() {
        let spec = QuerySpec::from_json(
            r#"{"table": "user", "where": null, "field": null, "order": null,
                "group": null, "limit": null}"#,
        )
        .unwrap();
        let sql = spec.into_builder(CompilerSettings::default()).to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `user`");
    }

    #[test]
    fn test_query_spec_rejects_unknown_keys() {
        let err = QuerySpec::from_json(r#"{"table": "user", "having": "x"}"#).unwrap_err();
        assert_eq!(err.code(), "serialization_error");
    }
}
