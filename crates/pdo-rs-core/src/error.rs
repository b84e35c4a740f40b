//! Core error types for pdo-rs.
//!
//! [`PdoError`] covers clause compilation failures, database failures, and
//! the configuration and I/O errors raised while loading settings. Every
//! variant carries a stable machine code (see [`PdoError::code`]) so callers
//! can print failures as JSON without matching on message text.

use thiserror::Error;

/// The primary error type for pdo-rs.
#[derive(Error, Debug)]
pub enum PdoError {
    // ── Compilation ──────────────────────────────────────────────────

    /// A condition tag is not part of the operator vocabulary.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// An operand has the wrong shape for its operator (e.g. a BETWEEN
    /// operand that is not a two-element list).
    #[error("Malformed operand: {0}")]
    MalformedOperand(String),

    /// A terminal operation was invoked before a table was set.
    #[error("No table selected")]
    MissingTable,

    // ── Database ─────────────────────────────────────────────────────

    /// The driver rejected a statement.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// An operational database error (connection failure, pool exhaustion, etc.).
    #[error("Operational error: {0}")]
    OperationalError(String),

    /// A column could not be read from a result row.
    #[error("Row error: {0}")]
    RowError(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PdoError {
    /// Returns the stable machine code for this error.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedOperator(_) => "unsupported_operator",
            Self::MalformedOperand(_) => "malformed_operand",
            Self::MissingTable => "missing_table",
            Self::DatabaseError(_) => "database_error",
            Self::OperationalError(_) => "operational_error",
            Self::RowError(_) => "row_error",
            Self::ConfigurationError(_) => "configuration_error",
            Self::SerializationError(_) => "serialization_error",
            Self::IoError(_) => "io_error",
        }
    }

    /// Returns `true` for errors raised while compiling clauses, before any
    /// SQL reaches the database.
    pub const fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperator(_) | Self::MalformedOperand(_) | Self::MissingTable
        )
    }

    /// Renders the error as a `{"msg": ..., "code": ...}` JSON object.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdo_rs_core::error::PdoError;
    ///
    /// let json = PdoError::MissingTable.to_json();
    /// assert_eq!(json["code"], "missing_table");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "msg": self.to_string(),
            "code": self.code(),
        })
    }
}

impl From<serde_json::Error> for PdoError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, PdoError>`.
pub type PdoResult<T> = Result<T, PdoError>;
