//! Schema metadata implemented by generated code.
//!
//! For every model the generator emits a `<Model>Schema` unit struct that
//! implements [`Schema`] and carries one [`ColumnDef`] constant per column.

use crate::affinity::StorageType;
use crate::constraint::{Collate, OnConflict};
use crate::dialect::{qualified_identifier, quote_identifier};
use crate::error::Result;
use crate::fragment::{self, Direction, OrderingTerm};
use crate::row::Row;
use crate::value::SqlValue;

/// A `REFERENCES` target of an association column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    /// The referenced table.
    pub table: &'static str,
    /// The referenced primary key column.
    pub column: &'static str,
}

/// Static metadata of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Owning table name.
    pub table: &'static str,
    /// SQL column name.
    pub name: &'static str,
    /// Storage affinity.
    pub storage: StorageType,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Whether this is the primary key.
    pub primary_key: bool,
    /// Conflict clause of the primary key constraint.
    pub primary_key_on_conflict: OnConflict,
    /// Whether the primary key uses `AUTOINCREMENT`.
    pub autoincrement: bool,
    /// Whether the engine assigns the value (omitted from inserts).
    pub auto_id: bool,
    /// Whether an index is created for the column.
    pub indexed: bool,
    /// Whether the column carries a `UNIQUE` constraint.
    pub unique: bool,
    /// Conflict clause of the unique constraint.
    pub unique_on_conflict: OnConflict,
    /// Raw SQL default expression.
    pub default_expr: Option<&'static str>,
    /// Collating sequence.
    pub collate: Collate,
    /// Referenced table for association columns.
    pub references: Option<ForeignKey>,
    /// Whether conditions render `table.column` instead of `column`.
    pub qualified: bool,
}

impl ColumnDef {
    /// Returns the escaped name, qualified when the schema joins other tables.
    #[must_use]
    pub fn escaped_name(&self) -> String {
        self.escaped_name_with(self.qualified)
    }

    /// Returns the escaped name, qualified on request.
    #[must_use]
    pub fn escaped_name_with(&self, qualified: bool) -> String {
        if qualified {
            qualified_identifier(self.table, self.name)
        } else {
            quote_identifier(self.name)
        }
    }

    /// Ascending ordering term for this column.
    #[must_use]
    pub fn order_asc(&self) -> OrderingTerm {
        fragment::order(self, Direction::Asc)
    }

    /// Descending ordering term for this column.
    #[must_use]
    pub fn order_desc(&self) -> OrderingTerm {
        fragment::order(self, Direction::Desc)
    }
}

/// Table-level metadata and row mapping for one model.
pub trait Schema: Sized + 'static {
    /// The model struct.
    type Model;

    /// The SQL table name.
    const TABLE: &'static str;

    /// All columns in declaration order.
    const COLUMNS: &'static [ColumnDef];

    /// The primary key column.
    const PRIMARY_KEY: ColumnDef;

    /// Whether selects join the tables of direct associations.
    const HAS_DIRECT_ASSOCIATIONS: bool = false;

    /// Returns the escaped table name.
    #[must_use]
    fn escaped_table_name() -> String {
        quote_identifier(Self::TABLE)
    }

    /// `LEFT OUTER JOIN` clauses for direct associations, nested joins included.
    #[must_use]
    fn joins() -> Vec<String> {
        Vec::new()
    }

    /// Escaped result columns, followed by those of joined models.
    #[must_use]
    fn select_columns() -> Vec<String> {
        if Self::HAS_DIRECT_ASSOCIATIONS {
            Self::joined_select_columns()
        } else {
            Self::COLUMNS.iter().map(ColumnDef::escaped_name).collect()
        }
    }

    /// Qualified result columns when this schema is reached through a join.
    #[must_use]
    fn joined_select_columns() -> Vec<String> {
        Self::COLUMNS
            .iter()
            .map(|c| c.escaped_name_with(true))
            .collect()
    }

    /// Number of result columns consumed by [`Schema::read_row`].
    #[must_use]
    fn select_width() -> usize {
        Self::COLUMNS.len()
    }

    /// Columns written by an insert: every column except the auto id.
    #[must_use]
    fn insert_columns() -> Vec<&'static ColumnDef> {
        Self::COLUMNS.iter().filter(|c| !c.auto_id).collect()
    }

    /// Serialized values of `model`, in [`Schema::insert_columns`] order.
    fn to_values(model: &Self::Model) -> Vec<SqlValue>;

    /// Serialized primary key of `model`. `NULL` for a synthesized key,
    /// which has no host field.
    fn primary_key_value(model: &Self::Model) -> SqlValue;

    /// Reads a model starting at `*cursor`, advancing the cursor past every
    /// column consumed, joined models included.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be decoded or a type adapter
    /// rejects it.
    fn read_row(row: &Row, cursor: &mut usize) -> Result<Self::Model>;

    /// Reads a model from a full row.
    ///
    /// # Errors
    ///
    /// See [`Schema::read_row`].
    fn from_row(row: &Row) -> Result<Self::Model> {
        let mut cursor = 0;
        Self::read_row(row, &mut cursor)
    }
}

/// Links a model struct to its generated schema.
pub trait Model: Sized {
    /// The generated schema type.
    type Schema: Schema<Model = Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: ColumnDef = ColumnDef {
        table: "Author",
        name: "name",
        storage: StorageType::Text,
        nullable: false,
        primary_key: false,
        primary_key_on_conflict: OnConflict::None,
        autoincrement: false,
        auto_id: false,
        indexed: false,
        unique: false,
        unique_on_conflict: OnConflict::None,
        default_expr: None,
        collate: Collate::Binary,
        references: None,
        qualified: false,
    };

    #[test]
    fn test_escaped_name() {
        assert_eq!(NAME.escaped_name(), "`name`");
        assert_eq!(NAME.escaped_name_with(true), "`Author`.`name`");
        let qualified = ColumnDef {
            qualified: true,
            ..NAME
        };
        assert_eq!(qualified.escaped_name(), "`Author`.`name`");
    }

    #[test]
    fn test_escaped_name_doubles_backticks() {
        let odd = ColumnDef {
            name: "we`ird",
            ..NAME
        };
        assert_eq!(odd.escaped_name(), "`we``ird`");
    }
}
