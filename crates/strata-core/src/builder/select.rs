//! SELECT statements.

use super::{QueryBuilder, Relation};
use crate::schema::Schema;
use crate::value::SqlValue;

/// Builds `SELECT` and `SELECT COUNT(*)` statements.
#[derive(Debug, Clone, Default)]
pub struct Selector<S> {
    relation: Relation<S>,
}

impl<S: Schema> Selector<S> {
    /// Creates a selector over every row.
    #[must_use]
    pub fn new() -> Self {
        Self::from_relation(Relation::new())
    }

    /// Creates a selector from an accumulated relation.
    #[must_use]
    pub const fn from_relation(relation: Relation<S>) -> Self {
        Self { relation }
    }

    fn append_from(sql: &mut String) {
        sql.push_str(" FROM ");
        sql.push_str(&S::escaped_table_name());
        for join in S::joins() {
            sql.push(' ');
            sql.push_str(&join);
        }
    }

    /// Returns the SQL and bind values.
    #[must_use]
    pub fn build(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::from("SELECT ");
        let mut params = Vec::new();
        sql.push_str(&S::select_columns().join(", "));
        Self::append_from(&mut sql);
        self.relation.append_where(&mut sql, &mut params);
        self.relation.append_order_by(&mut sql);
        self.relation.append_limit_offset(&mut sql, &mut params);
        (sql, params)
    }

    /// Returns a `SELECT COUNT(*)` over the same conditions.
    #[must_use]
    pub fn count(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::from("SELECT COUNT(*)");
        let mut params = Vec::new();
        Self::append_from(&mut sql);
        self.relation.append_where(&mut sql, &mut params);
        (sql, params)
    }
}

impl<S: Schema> QueryBuilder for Selector<S> {
    type Schema = S;

    fn relation(&self) -> &Relation<S> {
        &self.relation
    }

    fn relation_mut(&mut self) -> &mut Relation<S> {
        &mut self.relation
    }
}
