//! Query fragment synthesis.
//!
//! Pure functions turning a column and an operator into an escaped SQL
//! fragment plus its ordered bind values. Generated condition methods are
//! thin wrappers over these; they decide how an operand is serialized
//! (plain value, type adapter, referenced identity) and hand the result in
//! as [`SqlValue`]s.

use std::fmt;

use crate::schema::ColumnDef;
use crate::value::SqlValue;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// Returns the SQL operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `ASC`
    Asc,
    /// `DESC`
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A parameterized SQL condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    sql: String,
    params: Vec<SqlValue>,
}

impl Condition {
    /// Creates a condition from raw SQL and its bind values.
    ///
    /// **Warning**: Only use this for SQL text that contains no user input;
    /// pass user input through `params`.
    #[must_use]
    pub fn raw(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Returns the SQL string.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the bind values.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Consumes the condition and returns the SQL and bind values.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }

    /// Joins conditions with `AND`, parenthesizing each when there is more
    /// than one. Returns `None` for an empty slice.
    #[must_use]
    pub fn conjunction(conditions: &[Self]) -> Option<Self> {
        match conditions {
            [] => None,
            [single] => Some(single.clone()),
            many => {
                let sql = many
                    .iter()
                    .map(|c| format!("({})", c.sql))
                    .collect::<Vec<_>>()
                    .join(" AND ");
                let params = many.iter().flat_map(|c| c.params.iter().cloned()).collect();
                Some(Self { sql, params })
            }
        }
    }
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingTerm {
    sql: String,
}

impl OrderingTerm {
    /// Returns the SQL string.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for OrderingTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// `column <op> ?` with one bind value.
#[must_use]
pub fn compare(column: &ColumnDef, op: CompareOp, value: SqlValue) -> Condition {
    Condition {
        sql: format!("{} {} ?", column.escaped_name(), op.as_sql()),
        params: vec![value],
    }
}

/// `column IN (?, ...)` or `column NOT IN (?, ...)`, one placeholder per
/// operand. Each operand goes through `transform` before binding.
#[must_use]
pub fn in_list<T, I, F>(column: &ColumnDef, negate: bool, values: I, transform: F) -> Condition
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> SqlValue,
{
    let params: Vec<SqlValue> = values.into_iter().map(transform).collect();
    let keyword = if negate { "NOT IN" } else { "IN" };
    let placeholders = vec!["?"; params.len()].join(", ");
    Condition {
        sql: format!("{} {keyword} ({placeholders})", column.escaped_name()),
        params,
    }
}

/// `column IS NULL` or `column IS NOT NULL`.
#[must_use]
pub fn is_null(column: &ColumnDef, negate: bool) -> Condition {
    let keyword = if negate { "IS NOT NULL" } else { "IS NULL" };
    Condition {
        sql: format!("{} {keyword}", column.escaped_name()),
        params: vec![],
    }
}

/// `column ASC` or `column DESC`.
#[must_use]
pub fn order(column: &ColumnDef, direction: Direction) -> OrderingTerm {
    OrderingTerm {
        sql: format!("{} {}", column.escaped_name(), direction.as_sql()),
    }
}
