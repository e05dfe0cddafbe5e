//! # strata-core
//!
//! Runtime support for the query builders that `strata-codegen` generates
//! for SQLite models.
//!
//! This crate provides:
//! - [`SqlValue`] and the conversion traits every bound operand goes through
//! - [`Schema`] / [`ColumnDef`] metadata implemented by generated code
//! - Query fragment synthesis: comparisons, `IN` lists, `IS NULL`, ordering
//! - The base [`Relation`], [`Selector`], [`Updater`], [`Deleter`] and
//!   [`Inserter`] wrapped by generated per-model types
//! - Built-in [`TypeAdapter`]s for `chrono` types and string lists
//! - `CREATE TABLE` / `CREATE INDEX` rendering
//!
//! Identifiers are quoted with backticks and every operand is bound to a
//! `?` placeholder:
//!
//! ```rust,ignore
//! let (sql, params) = TodoRelation::new()
//!     .title_eq(String::from("'; DROP TABLE Todo; --"))
//!     .selector()
//!     .build();
//!
//! // sql = "SELECT `id`, `title`, `done`, `created_time` FROM `Todo` WHERE `title` = ?"
//! // params = vec![SqlValue::Text("'; DROP TABLE Todo; --")]
//! ```

pub mod adapters;
pub mod affinity;
pub mod association;
pub mod builder;
pub mod constraint;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod fragment;
pub mod row;
pub mod schema;
pub mod value;

pub use adapters::TypeAdapter;
pub use affinity::StorageType;
pub use association::SingleAssociation;
pub use builder::{Deleter, Inserter, QueryBuilder, Relation, Selector, Updater};
pub use constraint::{Collate, OnConflict};
pub use error::{Error, Result};
pub use fragment::{CompareOp, Condition, Direction, OrderingTerm};
pub use row::Row;
pub use schema::{ColumnDef, ForeignKey, Model, Schema};
pub use value::{FromSqlValue, SqlValue, ToSqlValue};

/// Everything generated code and its callers need in scope.
pub mod prelude {
    pub use crate::adapters::TypeAdapter;
    pub use crate::association::SingleAssociation;
    pub use crate::builder::QueryBuilder;
    pub use crate::schema::{Model, Schema};
    pub use crate::value::{FromSqlValue, SqlValue, ToSqlValue};
}
