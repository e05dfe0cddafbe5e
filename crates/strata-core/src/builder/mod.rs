//! Base query collaborators wrapped by generated code.
//!
//! Generated `<Model>Relation`, `<Model>Selector`, `<Model>Updater` and
//! `<Model>Deleter` types hold one of these and implement [`QueryBuilder`]
//! by delegation, inheriting `where_condition`, ordering, `limit` and
//! `offset`.
//!
//! # Example
//!
//! ```rust,ignore
//! let (sql, params) = TodoRelation::new()
//!     .title_eq(String::from("buy milk"))
//!     .order_by_created_time_desc()
//!     .limit(10)
//!     .selector()
//!     .build();
//! ```

mod delete;
mod insert;
mod relation;
mod select;
mod update;

pub use delete::Deleter;
pub use insert::Inserter;
pub use relation::Relation;
pub use select::Selector;
pub use update::Updater;

use crate::fragment::{Condition, OrderingTerm};
use crate::schema::Schema;
use crate::value::SqlValue;

/// Accumulates conditions, ordering and paging on a [`Relation`].
///
/// Every method consumes and returns the builder; clone it to branch.
pub trait QueryBuilder: Sized {
    /// The schema being queried.
    type Schema: Schema;

    /// Returns the accumulated relation.
    fn relation(&self) -> &Relation<Self::Schema>;

    /// Returns the accumulated relation mutably.
    fn relation_mut(&mut self) -> &mut Relation<Self::Schema>;

    /// Adds a condition. Conditions are combined with `AND`.
    #[must_use]
    fn where_condition(mut self, condition: Condition) -> Self {
        self.relation_mut().push_condition(condition);
        self
    }

    /// Adds a raw condition with its bind values.
    #[must_use]
    fn where_raw(self, sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        self.where_condition(Condition::raw(sql, params))
    }

    /// Appends an ordering term; earlier terms take precedence.
    #[must_use]
    fn order_by(mut self, term: OrderingTerm) -> Self {
        self.relation_mut().push_order(term);
        self
    }

    /// Sets `LIMIT`.
    #[must_use]
    fn limit(mut self, n: u64) -> Self {
        self.relation_mut().set_limit(n);
        self
    }

    /// Sets `OFFSET`.
    #[must_use]
    fn offset(mut self, n: u64) -> Self {
        self.relation_mut().set_offset(n);
        self
    }
}
