//! Running generated statements against SQLite.

use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use strata_core::{Inserter, Model, Row, Schema, SqlValue, ddl};
use tracing::debug;

/// Errors raised by the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite rejected a statement.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row could not be decoded into a model.
    #[error("Decode error: {0}")]
    Decode(#[from] strata_core::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A statement and its bind values, as built by the generated types.
pub type Statement = (String, Vec<SqlValue>);

fn to_sqlite(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Int(n) => Value::Integer(n),
        SqlValue::Float(f) => Value::Real(f),
        SqlValue::Text(s) => Value::Text(s),
        SqlValue::Blob(b) => Value::Blob(b),
    }
}

fn from_sqlite(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Int(n),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    }
}

/// A SQLite connection.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot open the database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Creates the table of `S` and its indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails, e.g. when the table exists.
    pub fn create<S: Schema>(&self) -> Result<()> {
        let mut statements = vec![ddl::create_table_statement::<S>()];
        statements.extend(ddl::create_index_statements::<S>());
        for sql in statements {
            debug!(%sql, "create");
            self.conn.execute_batch(&sql)?;
        }
        Ok(())
    }

    /// Runs an `UPDATE`, `DELETE` or `INSERT`, returning the number of rows
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite rejects the statement.
    pub fn execute(&self, (sql, params): Statement) -> Result<usize> {
        debug!(%sql, params = params.len(), "execute");
        let changed = self
            .conn
            .execute(&sql, params_from_iter(params.into_iter().map(to_sqlite)))?;
        Ok(changed)
    }

    /// Inserts `model`, returning the rowid SQLite assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite rejects the insert.
    pub fn insert<M: Model>(&self, model: &M) -> Result<i64> {
        self.execute(Inserter::<M::Schema>::new().build(model))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Runs a `SELECT` and returns the raw rows.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite rejects the query.
    pub fn query(&self, (sql, params): Statement) -> Result<Vec<Row>> {
        debug!(%sql, params = params.len(), "query");
        let mut stmt = self.conn.prepare(&sql)?;
        let width = stmt.column_count();
        let rows = stmt.query_map(params_from_iter(params.into_iter().map(to_sqlite)), |r| {
            (0..width)
                .map(|i| r.get::<_, Value>(i).map(from_sqlite))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map(Row::new)
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Runs a `SELECT` and decodes every row into a model of `S`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row does not decode.
    pub fn fetch<S: Schema>(&self, statement: Statement) -> Result<Vec<S::Model>> {
        self.query(statement)?
            .iter()
            .map(|row| S::from_row(row).map_err(StoreError::from))
            .collect()
    }

    /// Runs a `SELECT COUNT(*)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self, statement: Statement) -> Result<i64> {
        let rows = self.query(statement)?;
        match rows.first() {
            Some(row) => Ok(row.get::<i64>(0)?),
            None => Ok(0),
        }
    }
}
