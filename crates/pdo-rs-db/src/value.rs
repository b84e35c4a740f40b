//! Scalar values and their SQL literal encoding.
//!
//! [`Value`] is what callers put into condition descriptors and what backends
//! hand back in result rows. The free functions in this module are the single
//! place where literal and identifier quoting happens: every compiler goes
//! through [`encode`], [`quote_literal`], [`quote_ident`] or [`encode_bare`].

use std::fmt;

/// A scalar accepted by the clause compilers and returned by backends.
///
/// Deserializes from plain JSON scalars, so `1`, `"1"`, `true`, `1.5` and
/// `null` map to `Int`, `String`, `Bool`, `Float` and `Null`.
///
/// # Examples
///
/// ```
/// use pdo_rs_db::value::Value;
///
/// assert_eq!(Value::from(42), Value::Int(42));
/// assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for values that are written without quotes inside an
    /// `IN (...)` list.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Bool(_) | Self::Int(_) | Self::Float(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ── Encoding ───────────────────────────────────────────────────────────

/// Converts a value to its bare text: booleans become `1`/`0`, numbers their
/// decimal form, strings themselves and `Null` the empty string.
///
/// ```
/// use pdo_rs_db::value::{encode, Value};
///
/// assert_eq!(encode(&Value::Bool(true)), "1");
/// assert_eq!(encode(&Value::Float(2.5)), "2.5");
/// ```
pub fn encode(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => u8::from(*b).to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
    }
}

/// Wraps the encoded value in single quotes, doubling any embedded quote.
///
/// ```
/// use pdo_rs_db::value::{quote_literal, Value};
///
/// assert_eq!(quote_literal(&Value::Int(18)), "'18'");
/// assert_eq!(quote_literal(&Value::from("O'Brien")), "'O''Brien'");
/// ```
pub fn quote_literal(value: &Value) -> String {
    quote_text(&encode(value))
}

/// Quotes already-encoded text as a string literal.
pub fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Encodes a value the way it appears inside an `IN (...)` list: numbers and
/// booleans bare, `Null` as `NULL`, strings quoted.
pub fn encode_bare(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => quote_text(s),
        other => encode(other),
    }
}

/// Encodes one piece of a comma-joined `IN` operand. Pieces that read as
/// plain decimal numbers stay bare, everything else is quoted.
pub fn encode_list_piece(piece: &str) -> String {
    if is_numeric_text(piece) {
        piece.to_string()
    } else {
        quote_text(piece)
    }
}

/// Backtick-quotes an identifier. Surrounding backticks are trimmed first and
/// embedded ones are doubled.
///
/// ```
/// use pdo_rs_db::value::quote_ident;
///
/// assert_eq!(quote_ident("user"), "`user`");
/// assert_eq!(quote_ident("`user`"), "`user`");
/// ```
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.trim_matches('`').replace('`', "``"))
}

/// `-?digits(.digits)?`, nothing else. Rejects forms like `1e3`, `inf` and
/// `0x10` that `str::parse` would accept or that databases read differently.
fn is_numeric_text(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let mut parts = unsigned.splitn(2, '.');
    let int_part = parts.next().unwrap_or_default();
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && parts.next().map_or(true, all_digits)
}
