//! DELETE statements.

use super::{QueryBuilder, Relation};
use crate::schema::Schema;
use crate::value::SqlValue;

/// Builds `DELETE` statements. Ordering and paging are not rendered.
#[derive(Debug, Clone, Default)]
pub struct Deleter<S> {
    relation: Relation<S>,
}

impl<S: Schema> Deleter<S> {
    /// Creates a deleter over every row.
    #[must_use]
    pub fn new() -> Self {
        Self::from_relation(Relation::new())
    }

    /// Creates a deleter from an accumulated relation.
    #[must_use]
    pub const fn from_relation(relation: Relation<S>) -> Self {
        Self { relation }
    }

    /// Returns the SQL and bind values.
    #[must_use]
    pub fn build(&self) -> (String, Vec<SqlValue>) {
        let mut sql = format!("DELETE FROM {}", S::escaped_table_name());
        let mut params = Vec::new();
        self.relation.append_where(&mut sql, &mut params);
        (sql, params)
    }
}

impl<S: Schema> QueryBuilder for Deleter<S> {
    type Schema = S;

    fn relation(&self) -> &Relation<S> {
        &self.relation
    }

    fn relation_mut(&mut self) -> &mut Relation<S> {
        &mut self.relation
    }
}
