//! `CREATE TABLE` / `CREATE INDEX` rendering from column metadata.

use crate::constraint::Collate;
use crate::dialect::quote_identifier;
use crate::schema::{ColumnDef, Schema};

/// Name of the index created for an `indexed` column.
#[must_use]
pub fn index_name(table: &str, column: &str) -> String {
    format!("index_{column}_on_{table}")
}

/// Renders one column definition of a `CREATE TABLE` statement.
#[must_use]
pub fn column_definition(column: &ColumnDef) -> String {
    let mut sql = quote_identifier(column.name);
    sql.push(' ');
    sql.push_str(column.storage.as_sql());

    if column.primary_key {
        sql.push_str(" PRIMARY KEY");
        sql.push_str(&column.primary_key_on_conflict.constraint_clause());
        if column.autoincrement {
            sql.push_str(" AUTOINCREMENT");
        }
    } else if !column.nullable {
        sql.push_str(" NOT NULL");
    }

    if column.unique {
        sql.push_str(" UNIQUE");
        sql.push_str(&column.unique_on_conflict.constraint_clause());
    }

    if let Some(expr) = column.default_expr {
        sql.push_str(" DEFAULT ");
        sql.push_str(expr);
    }

    if column.collate != Collate::Binary {
        sql.push_str(" COLLATE ");
        sql.push_str(column.collate.as_sql());
    }

    if let Some(fk) = column.references {
        sql.push_str(&format!(
            " REFERENCES {}({}) ON UPDATE CASCADE ON DELETE CASCADE",
            quote_identifier(fk.table),
            quote_identifier(fk.column)
        ));
    }

    sql
}

/// Renders `CREATE TABLE` for a schema.
#[must_use]
pub fn create_table_statement<S: Schema>() -> String {
    let columns: Vec<String> = S::COLUMNS.iter().map(column_definition).collect();
    format!(
        "CREATE TABLE {} ({})",
        S::escaped_table_name(),
        columns.join(", ")
    )
}

/// Renders one `CREATE INDEX` per indexed column.
#[must_use]
pub fn create_index_statements<S: Schema>() -> Vec<String> {
    S::COLUMNS
        .iter()
        .filter(|c| c.indexed)
        .map(|c| {
            format!(
                "CREATE INDEX {} ON {} ({})",
                quote_identifier(&index_name(S::TABLE, c.name)),
                S::escaped_table_name(),
                quote_identifier(c.name)
            )
        })
        .collect()
}
