//! Clause descriptors.
//!
//! Each descriptor is either a raw clause string that bypasses compilation or
//! a structured form that the [`ClauseCompiler`](super::compiler::ClauseCompiler)
//! turns into SQL. All of them deserialize from the loose JSON shapes callers
//! already send:
//!
//! | Descriptor | Raw form | Structured form |
//! |---|---|---|
//! | [`WhereDescriptor`] | `"status = 1"` | `{"status": 1, "age": ["GT", 18]}` |
//! | [`OrderDescriptor`] | `"id desc"` | `{"id": "desc", "age": null}` or `["age", {"id": "desc"}]` |
//! | [`GroupDescriptor`] | `"name,age"` | `["name", "age"]` |
//! | [`FieldDescriptor`] | `"id,name"` | `["id", "name"]` |
//! | [`PageDescriptor`] | - | `10`, `[0, 10]` or `{"offset": 0, "length": 10}` |

use std::fmt;

use pdo_rs_core::{PdoError, PdoResult};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Value;

// ============================================================
// Operators
// ============================================================

/// The condition operator vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    In,
    NotIn,
    Gt,
    Egt,
    Lt,
    Elt,
    Like,
    NotLike,
    Between,
    NotBetween,
}

impl Operator {
    /// Resolves a condition tag. Tags are matched case-insensitively with all
    /// whitespace removed, so `"not in"` and `"NOTIN"` are the same operator.
    ///
    /// `OR` and `AND` are recognized but rejected: conditions only combine
    /// through one level of implicit `AND`.
    pub fn parse(tag: &str) -> PdoResult<Self> {
        let normalized: String = tag
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        Ok(match normalized.as_str() {
            "EQ" => Self::Eq,
            "NEQ" => Self::Neq,
            "IN" => Self::In,
            "NOTIN" => Self::NotIn,
            "GT" => Self::Gt,
            "EGT" => Self::Egt,
            "LT" => Self::Lt,
            "ELT" => Self::Elt,
            "LIKE" => Self::Like,
            "NOTLIKE" => Self::NotLike,
            "BETWEEN" => Self::Between,
            "NOTBETWEEN" => Self::NotBetween,
            "OR" | "AND" => {
                return Err(PdoError::UnsupportedOperator(format!(
                    "{normalized} (nested boolean groups are not supported)"
                )))
            }
            _ => return Err(PdoError::UnsupportedOperator(tag.to_string())),
        })
    }

    /// The canonical tag for this operator.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::In => "IN",
            Self::NotIn => "NOTIN",
            Self::Gt => "GT",
            Self::Egt => "EGT",
            Self::Lt => "LT",
            Self::Elt => "ELT",
            Self::Like => "LIKE",
            Self::NotLike => "NOTLIKE",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOTBETWEEN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================
// Conditions
// ============================================================

/// The right-hand side of a tagged condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// A list of values (`IN`, `BETWEEN`).
    List(Vec<Value>),
    /// A single value. For `IN` and `BETWEEN` a string scalar may hold a
    /// comma-joined list.
    Scalar(Value),
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

/// The condition attached to one field of a [`WhereDescriptor`].
///
/// Serialized as the bare value for [`ConditionSpec::Scalar`] and as a
/// `[tag, operand]` pair for [`ConditionSpec::Tagged`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConditionRepr", into = "ConditionRepr")]
pub enum ConditionSpec {
    /// Plain equality.
    Scalar(Value),
    /// An operator tag and its operand. The tag is resolved at compile time.
    Tagged { tag: String, operand: Operand },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ConditionRepr {
    Tagged(String, Operand),
    Scalar(Value),
}

impl From<ConditionRepr> for ConditionSpec {
    fn from(repr: ConditionRepr) -> Self {
        match repr {
            ConditionRepr::Tagged(tag, operand) => Self::Tagged { tag, operand },
            ConditionRepr::Scalar(v) => Self::Scalar(v),
        }
    }
}

impl From<ConditionSpec> for ConditionRepr {
    fn from(spec: ConditionSpec) -> Self {
        match spec {
            ConditionSpec::Tagged { tag, operand } => Self::Tagged(tag, operand),
            ConditionSpec::Scalar(v) => Self::Scalar(v),
        }
    }
}

impl ConditionSpec {
    /// A condition with a free-form tag, resolved when compiled.
    pub fn tagged(tag: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Self::Tagged {
            tag: tag.into(),
            operand: operand.into(),
        }
    }

    fn op(op: Operator, operand: Operand) -> Self {
        Self::tagged(op.tag(), operand)
    }

    fn op_scalar(op: Operator, value: impl Into<Value>) -> Self {
        Self::op(op, Operand::Scalar(value.into()))
    }

    fn op_list<I, V>(op: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::op(op, Operand::List(values.into_iter().map(Into::into).collect()))
    }

    pub fn eq(value: impl Into<Value>) -> Self {
        Self::op_scalar(Operator::Eq, value)
    }

    pub fn neq(value: impl Into<Value>) -> Self {
        Self::op_scalar(Operator::Neq, value)
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        Self::op_scalar(Operator::Gt, value)
    }

    pub fn egt(value: impl Into<Value>) -> Self {
        Self::op_scalar(Operator::Egt, value)
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        Self::op_scalar(Operator::Lt, value)
    }

    pub fn elt(value: impl Into<Value>) -> Self {
        Self::op_scalar(Operator::Elt, value)
    }

    /// Substring match; the compiler wraps the value in `%`.
    pub fn like(value: impl Into<Value>) -> Self {
        Self::op_scalar(Operator::Like, value)
    }

    pub fn not_like(value: impl Into<Value>) -> Self {
        Self::op_scalar(Operator::NotLike, value)
    }

    pub fn in_list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::op_list(Operator::In, values)
    }

    pub fn not_in_list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::op_list(Operator::NotIn, values)
    }

    /// `IN` with a comma-joined operand such as `"1,2,3"`.
    pub fn in_csv(list: impl Into<String>) -> Self {
        Self::op_scalar(Operator::In, list.into())
    }

    pub fn not_in_csv(list: impl Into<String>) -> Self {
        Self::op_scalar(Operator::NotIn, list.into())
    }

    pub fn between(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self::op(Operator::Between, Operand::List(vec![min.into(), max.into()]))
    }

    pub fn not_between(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self::op(
            Operator::NotBetween,
            Operand::List(vec![min.into(), max.into()]),
        )
    }
}

macro_rules! scalar_condition_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConditionSpec {
                fn from(v: $ty) -> Self {
                    Self::Scalar(Value::from(v))
                }
            }
        )*
    };
}

scalar_condition_from!(bool, i32, i64, u32, f64, String, &str);

impl From<Value> for ConditionSpec {
    fn from(v: Value) -> Self {
        Self::Scalar(v)
    }
}

// ============================================================
// WHERE
// ============================================================

/// The WHERE descriptor: a raw clause or an ordered field → condition mapping.
///
/// # Examples
///
/// ```
/// use pdo_rs_db::query::descriptors::{ConditionSpec, WhereDescriptor};
///
/// let filter = WhereDescriptor::new()
///     .with("status", 1)
///     .with("age", ConditionSpec::gt(18));
/// assert_eq!(filter.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum WhereDescriptor {
    /// Used verbatim, including its own `WHERE` keyword if the caller wants one.
    Raw(String),
    /// Conditions in insertion order, joined with `AND`.
    Conditions(Vec<(String, ConditionSpec)>),
}

impl Default for WhereDescriptor {
    fn default() -> Self {
        Self::Conditions(Vec::new())
    }
}

impl WhereDescriptor {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(clause: impl Into<String>) -> Self {
        Self::Raw(clause.into())
    }

    /// Sets the condition for `field`, replacing an existing one in place.
    /// Inserting into a raw descriptor discards the raw clause.
    pub fn insert(&mut self, field: impl Into<String>, spec: impl Into<ConditionSpec>) {
        let field = field.into();
        let spec = spec.into();
        if let Self::Conditions(entries) = self {
            match entries.iter_mut().find(|(name, _)| *name == field) {
                Some(entry) => entry.1 = spec,
                None => entries.push((field, spec)),
            }
        } else {
            *self = Self::Conditions(vec![(field, spec)]);
        }
    }

    /// Chaining form of [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, spec: impl Into<ConditionSpec>) -> Self {
        self.insert(field, spec);
        self
    }

    /// Number of conditions; a raw clause counts as one.
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(_) => 1,
            Self::Conditions(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Raw(clause) => clause.trim().is_empty(),
            Self::Conditions(entries) => entries.is_empty(),
        }
    }
}

impl From<&str> for WhereDescriptor {
    fn from(clause: &str) -> Self {
        Self::raw(clause)
    }
}

impl From<String> for WhereDescriptor {
    fn from(clause: String) -> Self {
        Self::Raw(clause)
    }
}

impl<F: Into<String>, S: Into<ConditionSpec>> FromIterator<(F, S)> for WhereDescriptor {
    fn from_iter<I: IntoIterator<Item = (F, S)>>(iter: I) -> Self {
        let mut descriptor = Self::new();
        for (field, spec) in iter {
            descriptor.insert(field, spec);
        }
        descriptor
    }
}

impl Serialize for WhereDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Raw(clause) => serializer.serialize_str(clause),
            Self::Conditions(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (field, spec) in entries {
                    map.serialize_entry(field, spec)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for WhereDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WhereVisitor;

        impl<'de> Visitor<'de> for WhereVisitor {
            type Value = WhereDescriptor;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a raw WHERE string or a map of field to condition")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(WhereDescriptor::raw(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(WhereDescriptor::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut descriptor = WhereDescriptor::new();
                while let Some((field, spec)) = access.next_entry::<String, ConditionSpec>()? {
                    descriptor.insert(field, spec);
                }
                Ok(descriptor)
            }
        }

        deserializer.deserialize_any(WhereVisitor)
    }
}

// ============================================================
// ORDER BY
// ============================================================

/// One ORDER BY entry. `direction: None` is a positional entry (ascending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub field: String,
    pub direction: Option<String>,
}

impl OrderItem {
    pub fn new(field: impl Into<String>, direction: Option<&str>) -> Self {
        Self {
            field: field.into(),
            direction: direction.map(str::to_string),
        }
    }

    pub fn positional(field: impl Into<String>) -> Self {
        Self::new(field, None)
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Some("asc"))
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Some("desc"))
    }
}

/// The ORDER BY descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderDescriptor {
    /// Appended verbatim after `ORDER BY`.
    Raw(String),
    Fields(Vec<OrderItem>),
}

impl Default for OrderDescriptor {
    fn default() -> Self {
        Self::Fields(Vec::new())
    }
}

impl OrderDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(clause: impl Into<String>) -> Self {
        Self::Raw(clause.into())
    }

    /// Appends an entry. Appending to a raw descriptor discards the raw clause.
    pub fn then(mut self, field: impl Into<String>, direction: Option<&str>) -> Self {
        let item = OrderItem::new(field, direction);
        if let Self::Fields(items) = &mut self {
            items.push(item);
        } else {
            self = Self::Fields(vec![item]);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Raw(clause) => clause.trim().is_empty(),
            Self::Fields(items) => items.is_empty(),
        }
    }
}

impl From<&str> for OrderDescriptor {
    fn from(clause: &str) -> Self {
        Self::raw(clause)
    }
}

impl From<Vec<OrderItem>> for OrderDescriptor {
    fn from(items: Vec<OrderItem>) -> Self {
        Self::Fields(items)
    }
}

impl Serialize for OrderDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Raw(clause) => serializer.serialize_str(clause),
            Self::Fields(items) => {
                let mut map = serializer.serialize_map(Some(items.len()))?;
                for item in items {
                    map.serialize_entry(&item.field, &item.direction)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for OrderDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum SeqEntry {
            Positional(String),
            Directed(DirectedItems),
        }

        /// A `{field: direction}` object inside a list, read in source order.
        struct DirectedItems(Vec<OrderItem>);

        impl<'de> Deserialize<'de> for DirectedItems {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match deserializer.deserialize_map(OrderVisitor)? {
                    OrderDescriptor::Fields(items) => Ok(Self(items)),
                    OrderDescriptor::Raw(_) => Err(de::Error::custom("expected a map")),
                }
            }
        }

        struct OrderVisitor;

        impl<'de> Visitor<'de> for OrderVisitor {
            type Value = OrderDescriptor;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a raw ORDER BY string, a map of field to direction, or a list")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(OrderDescriptor::raw(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrderDescriptor::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut items = Vec::new();
                while let Some((field, direction)) =
                    access.next_entry::<String, Option<String>>()?
                {
                    items.push(OrderItem { field, direction });
                }
                Ok(OrderDescriptor::Fields(items))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut items = Vec::new();
                while let Some(entry) = access.next_element::<SeqEntry>()? {
                    match entry {
                        SeqEntry::Positional(field) => items.push(OrderItem::positional(field)),
                        SeqEntry::Directed(DirectedItems(directed)) => items.extend(directed),
                    }
                }
                Ok(OrderDescriptor::Fields(items))
            }
        }

        deserializer.deserialize_any(OrderVisitor)
    }
}

// ============================================================
// GROUP BY / field list
// ============================================================

/// The GROUP BY descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GroupDescriptor {
    /// Appended (trimmed) after `GROUP BY`.
    Raw(String),
    Fields(Vec<String>),
}

impl Default for GroupDescriptor {
    fn default() -> Self {
        Self::Fields(Vec::new())
    }
}

impl GroupDescriptor {
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(names.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for GroupDescriptor {
    fn from(clause: &str) -> Self {
        Self::Raw(clause.to_string())
    }
}

impl From<Vec<&str>> for GroupDescriptor {
    fn from(names: Vec<&str>) -> Self {
        Self::fields(names)
    }
}

/// The selected-columns descriptor. Empty means `*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldDescriptor {
    /// Used verbatim, e.g. `"id, COUNT(*) AS n"`.
    Raw(String),
    Fields(Vec<String>),
}

impl Default for FieldDescriptor {
    fn default() -> Self {
        Self::Fields(Vec::new())
    }
}

impl FieldDescriptor {
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(names.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for FieldDescriptor {
    fn from(clause: &str) -> Self {
        Self::Raw(clause.to_string())
    }
}

impl From<Vec<&str>> for FieldDescriptor {
    fn from(names: Vec<&str>) -> Self {
        Self::fields(names)
    }
}

/// JSON input for the GROUP BY and field-list descriptors. `null` is empty.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClauseListRepr {
    Raw(String),
    Fields(Vec<String>),
    Empty,
}

impl<'de> Deserialize<'de> for GroupDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ClauseListRepr::deserialize(deserializer)? {
            ClauseListRepr::Raw(clause) => Self::Raw(clause),
            ClauseListRepr::Fields(names) => Self::Fields(names),
            ClauseListRepr::Empty => Self::default(),
        })
    }
}

impl<'de> Deserialize<'de> for FieldDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ClauseListRepr::deserialize(deserializer)? {
            ClauseListRepr::Raw(clause) => Self::Raw(clause),
            ClauseListRepr::Fields(names) => Self::Fields(names),
            ClauseListRepr::Empty => Self::default(),
        })
    }
}

// ============================================================
// LIMIT
// ============================================================

/// The LIMIT descriptor.
///
/// With no `length`, `offset` is the row count (`LIMIT offset`), matching
/// the one-argument form of MySQL's LIMIT. With a `length` it compiles to
/// `LIMIT offset,length`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageRepr")]
pub struct PageDescriptor {
    pub offset: u64,
    pub length: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr {
    Count(u64),
    Pair(u64, Option<u64>),
    Parts {
        #[serde(default)]
        offset: u64,
        #[serde(default)]
        length: Option<u64>,
    },
    Empty,
}

impl From<PageRepr> for PageDescriptor {
    fn from(repr: PageRepr) -> Self {
        match repr {
            PageRepr::Count(offset) => Self::new(offset, None),
            PageRepr::Empty => Self::default(),
            PageRepr::Pair(offset, length) | PageRepr::Parts { offset, length } => {
                Self::new(offset, length)
            }
        }
    }
}

impl PageDescriptor {
    pub const fn new(offset: u64, length: Option<u64>) -> Self {
        Self { offset, length }
    }
}
