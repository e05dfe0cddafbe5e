//! INSERT statements.

use std::marker::PhantomData;

use crate::constraint::OnConflict;
use crate::dialect::quote_identifier;
use crate::schema::Schema;
use crate::value::SqlValue;

/// Builds `INSERT` statements for whole models.
#[derive(Debug, Clone, Copy)]
pub struct Inserter<S> {
    on_conflict: OnConflict,
    _schema: PhantomData<fn() -> S>,
}

impl<S> Default for Inserter<S> {
    fn default() -> Self {
        Self {
            on_conflict: OnConflict::None,
            _schema: PhantomData,
        }
    }
}

impl<S: Schema> Inserter<S> {
    /// Creates an inserter without a conflict clause.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `INSERT OR <algorithm>` conflict clause.
    #[must_use]
    pub const fn on_conflict(mut self, on_conflict: OnConflict) -> Self {
        self.on_conflict = on_conflict;
        self
    }

    /// Returns the SQL text, independent of any model instance.
    #[must_use]
    pub fn sql(&self) -> String {
        let mut sql = String::from("INSERT");
        if let Some(keyword) = self.on_conflict.keyword() {
            sql.push_str(" OR ");
            sql.push_str(keyword);
        }
        sql.push_str(" INTO ");
        sql.push_str(&S::escaped_table_name());

        let columns = S::insert_columns();
        if columns.is_empty() {
            sql.push_str(" DEFAULT VALUES");
        } else {
            let names: Vec<String> = columns.iter().map(|c| quote_identifier(c.name)).collect();
            let placeholders = vec!["?"; columns.len()].join(", ");
            sql.push_str(&format!(" ({}) VALUES ({placeholders})", names.join(", ")));
        }
        sql
    }

    /// Returns the SQL and the serialized values of `model`.
    #[must_use]
    pub fn build(&self, model: &S::Model) -> (String, Vec<SqlValue>) {
        (self.sql(), S::to_values(model))
    }
}
