//! A hand-written schema in the shape the generator emits, plus helpers
//! for running statements against an in-memory SQLite database.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use strata_core::adapters::DateTimeAdapter;
use strata_core::{
    Collate, ColumnDef, Model, OnConflict, Row, Schema, SqlValue, StorageType, ToSqlValue,
    TypeAdapter,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub done: bool,
    pub created_time: DateTime<Utc>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoteSchema;

const fn column(name: &'static str, storage: StorageType) -> ColumnDef {
    ColumnDef {
        table: "Note",
        name,
        storage,
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
    }
}

impl NoteSchema {
    pub const ID: ColumnDef = ColumnDef {
        primary_key: true,
        auto_id: true,
        ..column("id", StorageType::Integer)
    };
    pub const TITLE: ColumnDef = ColumnDef {
        indexed: true,
        ..column("title", StorageType::Text)
    };
    pub const DONE: ColumnDef = column("done", StorageType::Integer);
    pub const CREATED_TIME: ColumnDef = column("created_time", StorageType::Integer);
    pub const MEMO: ColumnDef = ColumnDef {
        nullable: true,
        ..column("memo", StorageType::Text)
    };
}

impl Schema for NoteSchema {
    type Model = Note;

    const TABLE: &'static str = "Note";
    const COLUMNS: &'static [ColumnDef] = &[
        Self::ID,
        Self::TITLE,
        Self::DONE,
        Self::CREATED_TIME,
        Self::MEMO,
    ];
    const PRIMARY_KEY: ColumnDef = Self::ID;

    fn to_values(model: &Note) -> Vec<SqlValue> {
        vec![
            model.title.clone().to_sql_value(),
            model.done.to_sql_value(),
            DateTimeAdapter::serialize(&model.created_time).to_sql_value(),
            model.memo.clone().to_sql_value(),
        ]
    }

    fn primary_key_value(model: &Note) -> SqlValue {
        model.id.to_sql_value()
    }

    fn read_row(row: &Row, cursor: &mut usize) -> strata_core::Result<Note> {
        let base = *cursor;
        *cursor += Self::COLUMNS.len();
        Ok(Note {
            id: row.get(base)?,
            title: row.get(base + 1)?,
            done: row.get(base + 2)?,
            created_time: DateTimeAdapter::deserialize(row.get(base + 3)?)?,
            memo: row.get(base + 4)?,
        })
    }
}

impl Model for Note {
    type Schema = NoteSchema;
}

pub fn note(title: &str, done: bool, millis: i64) -> Note {
    Note {
        id: 0,
        title: String::from(title),
        done,
        created_time: DateTime::from_timestamp_millis(millis).unwrap(),
        memo: None,
    }
}

fn to_rusqlite(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Int(n) => Value::Integer(n),
        SqlValue::Float(f) => Value::Real(f),
        SqlValue::Text(s) => Value::Text(s),
        SqlValue::Blob(b) => Value::Blob(b),
    }
}

fn from_rusqlite(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Int(n),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    }
}

pub fn execute(conn: &Connection, (sql, params): (String, Vec<SqlValue>)) -> usize {
    conn.execute(&sql, params_from_iter(params.into_iter().map(to_rusqlite)))
        .unwrap()
}

pub fn query(conn: &Connection, (sql, params): (String, Vec<SqlValue>)) -> Vec<Row> {
    let mut stmt = conn.prepare(&sql).unwrap();
    let width = stmt.column_count();
    let rows = stmt
        .query_map(params_from_iter(params.into_iter().map(to_rusqlite)), |r| {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(from_rusqlite(r.get::<_, Value>(i)?));
            }
            Ok(Row::new(values))
        })
        .unwrap();
    rows.collect::<Result<Vec<_>, _>>().unwrap()
}

pub fn open() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&strata_core::ddl::create_table_statement::<NoteSchema>())
        .unwrap();
    for stmt in strata_core::ddl::create_index_statements::<NoteSchema>() {
        conn.execute_batch(&stmt).unwrap();
    }
    conn
}
