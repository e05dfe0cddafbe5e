//! UPDATE statements.

use super::{QueryBuilder, Relation};
use crate::dialect::quote_identifier;
use crate::schema::{ColumnDef, Schema};
use crate::value::SqlValue;

/// Builds `UPDATE` statements. Ordering and paging are not rendered.
#[derive(Debug, Clone, Default)]
pub struct Updater<S> {
    relation: Relation<S>,
    contents: Vec<(&'static str, SqlValue)>,
}

impl<S: Schema> Updater<S> {
    /// Creates an updater over every row.
    #[must_use]
    pub fn new() -> Self {
        Self::from_relation(Relation::new())
    }

    /// Creates an updater from an accumulated relation.
    #[must_use]
    pub const fn from_relation(relation: Relation<S>) -> Self {
        Self {
            relation,
            contents: Vec::new(),
        }
    }

    /// Sets `column` to an already serialized value. A later value for the
    /// same column replaces the earlier one.
    #[must_use]
    pub fn put(mut self, column: &ColumnDef, value: SqlValue) -> Self {
        match self.contents.iter_mut().find(|(name, _)| *name == column.name) {
            Some(slot) => slot.1 = value,
            None => self.contents.push((column.name, value)),
        }
        self
    }

    /// Column names and values set so far.
    #[must_use]
    pub fn contents(&self) -> &[(&'static str, SqlValue)] {
        &self.contents
    }

    /// Returns the SQL and bind values, or `None` if nothing was set.
    #[must_use]
    pub fn build(&self) -> Option<(String, Vec<SqlValue>)> {
        if self.contents.is_empty() {
            return None;
        }

        let mut sql = format!("UPDATE {} SET ", S::escaped_table_name());
        let assignments: Vec<String> = self
            .contents
            .iter()
            .map(|(name, _)| format!("{} = ?", quote_identifier(name)))
            .collect();
        sql.push_str(&assignments.join(", "));

        let mut params: Vec<SqlValue> = self.contents.iter().map(|(_, v)| v.clone()).collect();
        self.relation.append_where(&mut sql, &mut params);
        Some((sql, params))
    }
}

impl<S: Schema> QueryBuilder for Updater<S> {
    type Schema = S;

    fn relation(&self) -> &Relation<S> {
        &self.relation
    }

    fn relation_mut(&mut self) -> &mut Relation<S> {
        &mut self.relation
    }
}
