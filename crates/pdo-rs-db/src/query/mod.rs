//! Clause descriptors, their compilers, and the SELECT builder.
//!
//! - [`descriptors`] - WHERE, ORDER BY, GROUP BY, field and paging descriptors
//! - [`compiler`] - Turns descriptors into clause text
//! - [`builder`] - [`QueryBuilder`] and its serializable form [`QuerySpec`]
//! - [`row`] - Result rows and typed column access
//! - [`raw`] - Hand-written SQL passthrough

pub mod builder;
pub mod compiler;
pub mod descriptors;
pub mod raw;
pub mod row;

pub use builder::{QueryBuilder, QuerySpec};
pub use compiler::ClauseCompiler;
pub use descriptors::{
    ConditionSpec, FieldDescriptor, GroupDescriptor, Operand, Operator, OrderDescriptor,
    OrderItem, PageDescriptor, WhereDescriptor,
};
pub use raw::RawSql;
pub use row::{FromValue, Row};
