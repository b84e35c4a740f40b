//! Clause compilation.
//!
//! [`ClauseCompiler`] turns each descriptor into the literal text of one SQL
//! clause. Compilation is pure: the same descriptor always yields the same
//! string, and nothing is sent to a database. Values are inlined as quoted
//! literals (see [`crate::value`]) and identifiers are backtick-quoted, which
//! is valid for both MySQL and SQLite.
//!
//! The free functions at the bottom of the module compile with the default
//! [`CompilerSettings`].

use pdo_rs_core::settings::CompilerSettings;
use pdo_rs_core::{PdoError, PdoResult};

use super::descriptors::{
    ConditionSpec, FieldDescriptor, GroupDescriptor, Operand, Operator, OrderDescriptor,
    PageDescriptor, WhereDescriptor,
};
use crate::value::{encode, encode_bare, encode_list_piece, quote_ident, quote_literal, quote_text, Value};

/// Compiles descriptors into clause text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClauseCompiler {
    settings: CompilerSettings,
}

impl ClauseCompiler {
    /// Creates a compiler with the given compatibility switches.
    pub const fn new(settings: CompilerSettings) -> Self {
        Self { settings }
    }

    /// Returns the compatibility switches in effect.
    pub const fn settings(&self) -> CompilerSettings {
        self.settings
    }

    /// Compiles a WHERE descriptor.
    ///
    /// Raw descriptors are returned unchanged. A mapping produces
    /// `WHERE <term> AND <term> ...` in insertion order, and an empty mapping
    /// produces the empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdo_rs_db::query::compiler::ClauseCompiler;
    /// use pdo_rs_db::query::descriptors::{ConditionSpec, WhereDescriptor};
    ///
    /// let filter = WhereDescriptor::new().with("age", ConditionSpec::gt(18));
    /// let sql = ClauseCompiler::default().compile_where(&filter).unwrap();
    /// assert_eq!(sql, "WHERE `age` > '18'");
    /// ```
    pub fn compile_where(&self, descriptor: &WhereDescriptor) -> PdoResult<String> {
        match descriptor {
            WhereDescriptor::Raw(clause) => Ok(clause.clone()),
            WhereDescriptor::Conditions(entries) if entries.is_empty() => Ok(String::new()),
            WhereDescriptor::Conditions(entries) => {
                let terms = entries
                    .iter()
                    .map(|(field, spec)| self.compile_condition(field, spec))
                    .collect::<PdoResult<Vec<_>>>()?;
                Ok(format!("WHERE {}", terms.join(" AND ")))
            }
        }
    }

    /// Compiles one field's condition into a single comparison term.
    pub fn compile_condition(&self, field: &str, spec: &ConditionSpec) -> PdoResult<String> {
        let column = quote_ident(field);
        match spec {
            ConditionSpec::Scalar(Value::Null) => Ok(format!("{column} IS NULL")),
            ConditionSpec::Scalar(value) => {
                ensure_finite(value)?;
                Ok(format!("{column} = {}", quote_literal(value)))
            }
            ConditionSpec::Tagged { tag, operand } => {
                let op = Operator::parse(tag)?;
                match operand {
                    Operand::Scalar(value) => ensure_finite(value)?,
                    Operand::List(values) => values.iter().try_for_each(ensure_finite)?,
                }
                self.compile_operator(&column, op, operand)
            }
        }
    }

    fn compile_operator(&self, column: &str, op: Operator, operand: &Operand) -> PdoResult<String> {
        match op {
            Operator::Eq => match scalar(op, operand)? {
                Value::Null => Ok(format!("{column} IS NULL")),
                value => Ok(format!("{column} = {}", quote_literal(value))),
            },
            Operator::Neq => {
                let (sym, null_test) = if self.settings.legacy_neq {
                    ("=", "IS NULL")
                } else {
                    ("!=", "IS NOT NULL")
                };
                match scalar(op, operand)? {
                    Value::Null => Ok(format!("{column} {null_test}")),
                    value => Ok(format!("{column} {sym} {}", quote_literal(value))),
                }
            }
            Operator::Gt | Operator::Egt | Operator::Lt | Operator::Elt => {
                let sym = match op {
                    Operator::Gt => ">",
                    Operator::Egt => ">=",
                    Operator::Lt => "<",
                    _ => "<=",
                };
                let value = non_null_scalar(op, operand)?;
                Ok(format!("{column} {sym} {}", quote_literal(value)))
            }
            Operator::Like | Operator::NotLike => {
                let keyword = if op == Operator::Like { "LIKE" } else { "NOT LIKE" };
                let value = non_null_scalar(op, operand)?;
                let pattern = quote_text(&format!("%{}%", encode(value)));
                Ok(format!("{column} {keyword} {pattern}"))
            }
            Operator::In | Operator::NotIn => {
                let keyword = if op == Operator::In { "IN" } else { "NOT IN" };
                let members = in_members(op, operand)?;
                Ok(format!("{column} {keyword} ({})", members.join(",")))
            }
            Operator::Between | Operator::NotBetween => {
                let keyword = if op == Operator::Between {
                    "BETWEEN"
                } else {
                    "NOT BETWEEN"
                };
                let (min, max) = between_bounds(op, operand)?;
                Ok(format!("{column} {keyword} {min} AND {max}"))
            }
        }
    }

    /// Compiles an ORDER BY descriptor.
    ///
    /// Directions must be `asc` or `desc` in any letter case; the caller's
    /// spelling is kept. Entries without a direction are written bare.
    pub fn compile_order(&self, descriptor: &OrderDescriptor) -> PdoResult<String> {
        match descriptor {
            OrderDescriptor::Raw(clause) => Ok(prefixed("ORDER BY", clause)),
            OrderDescriptor::Fields(items) if items.is_empty() => Ok(String::new()),
            OrderDescriptor::Fields(items) => {
                let parts = items
                    .iter()
                    .map(|item| {
                        let column = quote_ident(item.field.trim());
                        match item.direction.as_deref().map(str::trim) {
                            None | Some("") => Ok(column),
                            Some(dir)
                                if dir.eq_ignore_ascii_case("asc")
                                    || dir.eq_ignore_ascii_case("desc") =>
                            {
                                Ok(format!("{column} {dir}"))
                            }
                            Some(dir) => Err(PdoError::MalformedOperand(format!(
                                "invalid sort direction '{dir}' for field '{}'",
                                item.field
                            ))),
                        }
                    })
                    .collect::<PdoResult<Vec<_>>>()?;
                Ok(format!("ORDER BY {}", parts.join(",")))
            }
        }
    }

    /// Compiles a GROUP BY descriptor.
    pub fn compile_group(&self, descriptor: &GroupDescriptor) -> String {
        match descriptor {
            GroupDescriptor::Raw(clause) => prefixed("GROUP BY", clause),
            GroupDescriptor::Fields(names) => match quoted_list(names) {
                list if list.is_empty() => String::new(),
                list => format!("GROUP BY {list}"),
            },
        }
    }

    /// Compiles a LIMIT descriptor.
    ///
    /// ```
    /// use pdo_rs_db::query::compiler::ClauseCompiler;
    /// use pdo_rs_db::query::descriptors::PageDescriptor;
    ///
    /// let c = ClauseCompiler::default();
    /// assert_eq!(c.compile_limit(&PageDescriptor::new(0, None)), "");
    /// assert_eq!(c.compile_limit(&PageDescriptor::new(10, None)), "LIMIT 10");
    /// assert_eq!(c.compile_limit(&PageDescriptor::new(10, Some(20))), "LIMIT 10,20");
    /// ```
    pub fn compile_limit(&self, page: &PageDescriptor) -> String {
        match page.length {
            Some(length) => format!("LIMIT {},{length}", page.offset),
            None if page.offset == 0 => String::new(),
            None => format!("LIMIT {}", page.offset),
        }
    }

    /// Compiles the selected-columns list. An empty result means `*`.
    pub fn compile_fields(&self, descriptor: &FieldDescriptor) -> String {
        match descriptor {
            FieldDescriptor::Raw(clause) => clause.clone(),
            FieldDescriptor::Fields(names) => quoted_list(names),
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn prefixed(keyword: &str, clause: &str) -> String {
    let clause = clause.trim();
    if clause.is_empty() {
        String::new()
    } else {
        format!("{keyword} {clause}")
    }
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(",")
}

/// `NaN` and the infinities have no SQL literal form.
fn ensure_finite(value: &Value) -> PdoResult<()> {
    match value {
        Value::Float(f) if !f.is_finite() => Err(PdoError::MalformedOperand(format!(
            "{f} cannot be written as a SQL number"
        ))),
        _ => Ok(()),
    }
}

fn scalar(op: Operator, operand: &Operand) -> PdoResult<&Value> {
    match operand {
        Operand::Scalar(value) => Ok(value),
        Operand::List(_) => Err(PdoError::MalformedOperand(format!(
            "{op} expects a single value, got a list"
        ))),
    }
}

fn non_null_scalar(op: Operator, operand: &Operand) -> PdoResult<&Value> {
    match scalar(op, operand)? {
        Value::Null => Err(PdoError::MalformedOperand(format!(
            "{op} cannot compare against NULL"
        ))),
        value => Ok(value),
    }
}

fn in_members(op: Operator, operand: &Operand) -> PdoResult<Vec<String>> {
    let members: Vec<String> = match operand {
        Operand::List(values) => values.iter().map(encode_bare).collect(),
        Operand::Scalar(Value::String(csv)) => csv
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(encode_list_piece)
            .collect(),
        Operand::Scalar(value) => vec![encode_bare(value)],
    };
    if members.is_empty() {
        return Err(PdoError::MalformedOperand(format!("{op} list is empty")));
    }
    Ok(members)
}

fn between_bounds(op: Operator, operand: &Operand) -> PdoResult<(String, String)> {
    let bounds: Vec<String> = match operand {
        Operand::List(values) => {
            if values.iter().any(Value::is_null) {
                return Err(PdoError::MalformedOperand(format!(
                    "{op} bounds cannot be NULL"
                )));
            }
            values.iter().map(quote_literal).collect()
        }
        Operand::Scalar(Value::String(csv)) => {
            csv.split(',').map(|piece| quote_text(piece.trim())).collect()
        }
        Operand::Scalar(_) => Vec::new(),
    };
    match <[String; 2]>::try_from(bounds) {
        Ok([min, max]) => Ok((min, max)),
        Err(bounds) => Err(PdoError::MalformedOperand(format!(
            "{op} expects exactly two bounds, got {}",
            bounds.len()
        ))),
    }
}

// ============================================================
// Default-settings shortcuts
// ============================================================

/// Compiles a WHERE descriptor with default settings.
pub fn compile_where(descriptor: &WhereDescriptor) -> PdoResult<String> {
    ClauseCompiler::default().compile_where(descriptor)
}

/// Compiles an ORDER BY descriptor with default settings.
pub fn compile_order(descriptor: &OrderDescriptor) -> PdoResult<String> {
    ClauseCompiler::default().compile_order(descriptor)
}

/// Compiles a GROUP BY descriptor.
pub fn compile_group(descriptor: &GroupDescriptor) -> String {
    ClauseCompiler::default().compile_group(descriptor)
}

/// Compiles a LIMIT descriptor.
pub fn compile_limit(page: &PageDescriptor) -> String {
    ClauseCompiler::default().compile_limit(page)
}

/// Compiles a field list.
pub fn compile_fields(descriptor: &FieldDescriptor) -> String {
    ClauseCompiler::default().compile_fields(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::descriptors::OrderItem;

    fn where_of(entries: Vec<(&str, ConditionSpec)>) -> WhereDescriptor {
        entries.into_iter().collect()
    }

    fn legacy() -> ClauseCompiler {
        ClauseCompiler::new(CompilerSettings {
            legacy_neq: true,
            ..CompilerSettings::default()
        })
    }

    // ── WHERE: scalar equality ──────────────────────────────────────

    #[test]
    fn test_scalar_equality() {
        let w = WhereDescriptor::new().with("name", "James");
        assert_eq!(compile_where(&w).unwrap(), "WHERE `name` = 'James'");
    }

    #[test]
    fn test_scalar_equality_quotes_numbers_and_bools() {
        let w = WhereDescriptor::new().with("status", 1);
        assert_eq!(compile_where(&w).unwrap(), "WHERE `status` = '1'");
        let w = WhereDescriptor::new().with("active", true);
        assert_eq!(compile_where(&w).unwrap(), "WHERE `active` = '1'");
    }

    #[test]
    fn test_scalar_equality_for_many_values() {
        for value in ["0", "abc", "x y", "1.5", "-3"] {
            let w = WhereDescriptor::new().with("field", value);
            assert_eq!(
                compile_where(&w).unwrap(),
                format!("WHERE `field` = '{value}'")
            );
        }
    }

    #[test]
    fn test_scalar_null_is_null() {
        let w = WhereDescriptor::new().with("deleted_at", Value::Null);
        assert_eq!(compile_where(&w).unwrap(), "WHERE `deleted_at` IS NULL");
    }

    #[test]
    fn test_literal_escaping() {
        let w = WhereDescriptor::new().with("name", "O'Brien");
        assert_eq!(compile_where(&w).unwrap(), "WHERE `name` = 'O''Brien'");
    }

    #[test]
    fn test_backslash_before_quote_stays_inside_literal() {
        let w = WhereDescriptor::new().with("name", "a\\' OR 1=1 -- ");
        assert_eq!(
            compile_where(&w).unwrap(),
            "WHERE `name` = 'a\\'' OR 1=1 -- '"
        );
        let w = WhereDescriptor::new().with("name", ConditionSpec::like("x\\'y"));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `name` LIKE '%x\\''y%'");
    }

    #[test]
    fn test_non_finite_floats_are_malformed() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let w = WhereDescriptor::new().with("score", bad);
            assert!(matches!(compile_where(&w), Err(PdoError::MalformedOperand(_))));
            let w = WhereDescriptor::new().with("score", ConditionSpec::in_list([1.0, bad]));
            assert!(matches!(compile_where(&w), Err(PdoError::MalformedOperand(_))));
            let w = WhereDescriptor::new().with("score", ConditionSpec::between(0.0, bad));
            assert!(matches!(compile_where(&w), Err(PdoError::MalformedOperand(_))));
        }
        let w = WhereDescriptor::new().with("score", ConditionSpec::in_list([1.5, 2.0]));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `score` IN (1.5,2)");
    }

    // ── WHERE: conjunction ──────────────────────────────────────────

    #[test]
    fn test_terms_joined_in_insertion_order() {
        let w = where_of(vec![
            ("c", 3.into()),
            ("a", 1.into()),
            ("b", ConditionSpec::lt(2)),
        ]);
        assert_eq!(
            compile_where(&w).unwrap(),
            "WHERE `c` = '3' AND `a` = '1' AND `b` < '2'"
        );
    }

    #[test]
    fn test_and_count_is_n_minus_one() {
        for n in 1..=6 {
            let w: WhereDescriptor = (0..n).map(|i| (format!("f{i}"), i)).collect();
            let sql = compile_where(&w).unwrap();
            assert_eq!(sql.matches(" AND ").count(), n as usize - 1);
            assert_eq!(sql.matches(" = ").count(), n as usize);
            assert!(!sql.ends_with("AND "));
            for i in 0..n {
                assert!(sql.contains(&format!("`f{i}` = '{i}'")));
            }
        }
    }

    #[test]
    fn test_empty_mapping_is_empty() {
        assert_eq!(compile_where(&WhereDescriptor::new()).unwrap(), "");
    }

    #[test]
    fn test_raw_where_unchanged() {
        let raw = "where `name` = 'James' and `age` >= 18";
        assert_eq!(compile_where(&WhereDescriptor::raw(raw)).unwrap(), raw);
    }

    // ── WHERE: operators ────────────────────────────────────────────

    #[test]
    fn test_eq_and_neq() {
        let w = WhereDescriptor::new().with("id", ConditionSpec::eq(5));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `id` = '5'");

        let w = WhereDescriptor::new().with("id", ConditionSpec::neq(5));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `id` != '5'");
    }

    #[test]
    fn test_neq_legacy_flag() {
        let w = WhereDescriptor::new().with("id", ConditionSpec::neq(5));
        assert_eq!(legacy().compile_where(&w).unwrap(), "WHERE `id` = '5'");
    }

    #[test]
    fn test_eq_neq_null() {
        let w = WhereDescriptor::new().with("x", ConditionSpec::eq(Value::Null));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `x` IS NULL");
        let w = WhereDescriptor::new().with("x", ConditionSpec::neq(Value::Null));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `x` IS NOT NULL");
    }

    #[test]
    fn test_comparisons() {
        let cases = [
            (ConditionSpec::gt(5), "`id` > '5'"),
            (ConditionSpec::egt(5), "`id` >= '5'"),
            (ConditionSpec::lt(5), "`id` < '5'"),
            (ConditionSpec::elt(5), "`id` <= '5'"),
        ];
        for (spec, expected) in cases {
            let w = WhereDescriptor::new().with("id", spec);
            assert_eq!(compile_where(&w).unwrap(), format!("WHERE {expected}"));
        }
    }

    #[test]
    fn test_tag_is_case_and_space_insensitive() {
        let w = WhereDescriptor::new().with("id", ConditionSpec::tagged("not in", vec![Value::Int(1)]));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `id` NOT IN (1)");
        let w = WhereDescriptor::new().with("id", ConditionSpec::tagged("egt", Value::Int(2)));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `id` >= '2'");
    }

    #[test]
    fn test_in_list_and_csv_are_equivalent() {
        let list = WhereDescriptor::new().with("id", ConditionSpec::in_list([1, 2, 3]));
        let csv = WhereDescriptor::new().with("id", ConditionSpec::in_csv("1,2,3"));
        assert_eq!(compile_where(&list).unwrap(), "WHERE `id` IN (1,2,3)");
        assert_eq!(compile_where(&list).unwrap(), compile_where(&csv).unwrap());
    }

    #[test]
    fn test_in_csv_trims_and_quotes_strings() {
        let w = WhereDescriptor::new().with("name", ConditionSpec::in_csv(" ann , bob,3 "));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `name` IN ('ann','bob',3)");
    }

    #[test]
    fn test_in_list_quotes_strings() {
        let w = WhereDescriptor::new().with("name", ConditionSpec::in_list(["a'b", "c"]));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `name` IN ('a''b','c')");
    }

    #[test]
    fn test_not_in() {
        let w = WhereDescriptor::new().with("id", ConditionSpec::not_in_csv("4,5"));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `id` NOT IN (4,5)");
    }

    #[test]
    fn test_in_empty_is_malformed() {
        let empty: Vec<Value> = Vec::new();
        let w = WhereDescriptor::new().with("id", ConditionSpec::in_list(empty));
        assert!(matches!(compile_where(&w), Err(PdoError::MalformedOperand(_))));
        let w = WhereDescriptor::new().with("id", ConditionSpec::in_csv(" , "));
        assert!(matches!(compile_where(&w), Err(PdoError::MalformedOperand(_))));
    }

    #[test]
    fn test_like_and_not_like() {
        let w = WhereDescriptor::new().with("name", ConditionSpec::like("an"));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `name` LIKE '%an%'");
        let w = WhereDescriptor::new().with("name", ConditionSpec::not_like("o'k"));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `name` NOT LIKE '%o''k%'");
    }

    #[test]
    fn test_between() {
        let w = WhereDescriptor::new().with("id", ConditionSpec::between(1, 10));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `id` BETWEEN '1' AND '10'");
        let w = WhereDescriptor::new().with("id", ConditionSpec::not_between(1, 10));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `id` NOT BETWEEN '1' AND '10'");
    }

    #[test]
    fn test_between_csv_spelling() {
        let w = WhereDescriptor::new().with("id", ConditionSpec::tagged("BETWEEN", Value::from("1, 10")));
        assert_eq!(compile_where(&w).unwrap(), "WHERE `id` BETWEEN '1' AND '10'");
    }

    #[test]
    fn test_between_wrong_arity() {
        for operand in [
            Operand::List(vec![Value::Int(1)]),
            Operand::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
            Operand::Scalar(Value::from("1,2,3")),
            Operand::Scalar(Value::Int(4)),
            Operand::List(vec![Value::Int(1), Value::Null]),
        ] {
            let w = WhereDescriptor::new().with("id", ConditionSpec::tagged("BETWEEN", operand));
            assert!(matches!(compile_where(&w), Err(PdoError::MalformedOperand(_))));
        }
    }

    #[test]
    fn test_scalar_operator_rejects_list() {
        let w = WhereDescriptor::new().with("id", ConditionSpec::tagged("GT", vec![Value::Int(1)]));
        assert!(matches!(compile_where(&w), Err(PdoError::MalformedOperand(_))));
        let w = WhereDescriptor::new().with("id", ConditionSpec::gt(Value::Null));
        assert!(matches!(compile_where(&w), Err(PdoError::MalformedOperand(_))));
    }

    #[test]
    fn test_unknown_operator() {
        let w = WhereDescriptor::new().with("id", ConditionSpec::tagged("XYZ", Value::Int(1)));
        let err = compile_where(&w).unwrap_err();
        assert!(matches!(err, PdoError::UnsupportedOperator(_)));
    }

    #[test]
    fn test_or_is_rejected() {
        let w = WhereDescriptor::new().with("id", ConditionSpec::tagged("OR", Value::Int(1)));
        assert!(matches!(compile_where(&w), Err(PdoError::UnsupportedOperator(_))));
    }

    #[test]
    fn test_error_in_later_term_fails_whole_clause() {
        let w = WhereDescriptor::new()
            .with("ok", 1)
            .with("bad", ConditionSpec::tagged("NOPE", Value::Int(1)));
        assert!(compile_where(&w).is_err());
    }

    #[test]
    fn test_compile_is_idempotent() {
        let w = WhereDescriptor::new()
            .with("status", 1)
            .with("id", ConditionSpec::in_list([1, 2]));
        let o = OrderDescriptor::new().then("id", Some("desc"));
        let c = ClauseCompiler::default();
        assert_eq!(c.compile_where(&w).unwrap(), c.compile_where(&w).unwrap());
        assert_eq!(c.compile_order(&o).unwrap(), c.compile_order(&o).unwrap());
    }

    // ── ORDER BY ────────────────────────────────────────────────────

    #[test]
    fn test_order_fields() {
        let o = OrderDescriptor::new().then("id", Some("desc")).then("age", None);
        assert_eq!(compile_order(&o).unwrap(), "ORDER BY `id` desc,`age`");
    }

    #[test]
    fn test_order_preserves_direction_spelling() {
        let o = OrderDescriptor::Fields(vec![OrderItem::new("id", Some("DESC")), OrderItem::new("`x`", Some("Asc"))]);
        assert_eq!(compile_order(&o).unwrap(), "ORDER BY `id` DESC,`x` Asc");
    }

    #[test]
    fn test_order_json_list_keeps_object_key_order() {
        let o: OrderDescriptor =
            serde_json::from_str(r#"["age", {"z": "desc", "a": "asc"}, {"m": null}]"#).unwrap();
        assert_eq!(compile_order(&o).unwrap(), "ORDER BY `age`,`z` desc,`a` asc,`m`");
    }

    #[test]
    fn test_order_rejects_bad_direction() {
        let o = OrderDescriptor::new().then("id", Some("sideways"));
        assert!(matches!(compile_order(&o), Err(PdoError::MalformedOperand(_))));
    }

    #[test]
    fn test_order_raw_and_empty() {
        assert_eq!(compile_order(&OrderDescriptor::raw("id desc")).unwrap(), "ORDER BY id desc");
        assert_eq!(compile_order(&OrderDescriptor::raw("  ")).unwrap(), "");
        assert_eq!(compile_order(&OrderDescriptor::new()).unwrap(), "");
    }

    // ── GROUP BY ────────────────────────────────────────────────────

    #[test]
    fn test_group() {
        assert_eq!(compile_group(&GroupDescriptor::from(" name,age ")), "GROUP BY name,age");
        assert_eq!(
            compile_group(&GroupDescriptor::fields([" name", "age "])),
            "GROUP BY `name`,`age`"
        );
        assert_eq!(compile_group(&GroupDescriptor::default()), "");
        assert_eq!(compile_group(&GroupDescriptor::from("")), "");
    }

    // ── LIMIT ───────────────────────────────────────────────────────

    #[test]
    fn test_limit() {
        assert_eq!(compile_limit(&PageDescriptor::new(0, None)), "");
        assert_eq!(compile_limit(&PageDescriptor::new(10, None)), "LIMIT 10");
        assert_eq!(compile_limit(&PageDescriptor::new(10, Some(20))), "LIMIT 10,20");
        assert_eq!(compile_limit(&PageDescriptor::new(0, Some(10))), "LIMIT 0,10");
    }

    // ── Field list ──────────────────────────────────────────────────

    #[test]
    fn test_fields() {
        assert_eq!(compile_fields(&FieldDescriptor::from("id, name")), "id, name");
        assert_eq!(
            compile_fields(&FieldDescriptor::fields(["id", "name", "age"])),
            "`id`,`name`,`age`"
        );
        assert_eq!(compile_fields(&FieldDescriptor::default()), "");
    }
}
