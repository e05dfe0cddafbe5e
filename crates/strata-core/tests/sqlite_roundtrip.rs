//! Executes builder output against an in-memory SQLite database.

mod common;

use common::{Note, NoteSchema, execute, note, open, query};
use strata_core::fragment::{self, CompareOp};
use strata_core::{Inserter, QueryBuilder, Relation, Schema, SqlValue};

fn insert(conn: &rusqlite::Connection, model: &Note) {
    execute(conn, Inserter::<NoteSchema>::new().build(model));
}

#[test]
fn test_insert_then_select_round_trip() {
    let conn = open();
    let mut first = note("buy milk", false, 1_700_000_000_000);
    first.memo = Some(String::from("2%"));
    insert(&conn, &first);
    insert(&conn, &note("walk dog", true, 1_700_000_100_000));

    let rows = query(
        &conn,
        Relation::<NoteSchema>::new()
            .order_by(NoteSchema::ID.order_asc())
            .selector()
            .build(),
    );
    let notes: Vec<Note> = rows
        .iter()
        .map(|r| NoteSchema::from_row(r).unwrap())
        .collect();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, 1);
    assert_eq!(notes[0].title, "buy milk");
    assert_eq!(notes[0].memo.as_deref(), Some("2%"));
    assert_eq!(notes[0].created_time, first.created_time);
    assert!(notes[1].done);
    assert_eq!(notes[1].memo, None);
}

#[test]
fn test_conditions_filter_rows() {
    let conn = open();
    insert(&conn, &note("a", false, 1_000));
    insert(&conn, &note("b", true, 2_000));
    insert(&conn, &note("c", true, 3_000));

    let selector = Relation::<NoteSchema>::new()
        .where_condition(fragment::compare(
            &NoteSchema::DONE,
            CompareOp::Eq,
            SqlValue::Int(1),
        ))
        .where_condition(fragment::compare(
            &NoteSchema::CREATED_TIME,
            CompareOp::Lt,
            SqlValue::Int(3_000),
        ))
        .selector();
    let rows = query(&conn, selector.build());
    assert_eq!(rows.len(), 1);
    assert_eq!(NoteSchema::from_row(&rows[0]).unwrap().title, "b");

    let count = query(&conn, selector.count());
    assert_eq!(count[0].get::<i64>(0).unwrap(), 1);
}

#[test]
fn test_update_and_delete() {
    let conn = open();
    insert(&conn, &note("a", false, 1_000));
    insert(&conn, &note("b", false, 2_000));

    let relation = Relation::<NoteSchema>::new().where_condition(fragment::compare(
        &NoteSchema::TITLE,
        CompareOp::Eq,
        SqlValue::Text(String::from("a")),
    ));
    let update = relation
        .updater()
        .put(&NoteSchema::DONE, SqlValue::Int(1))
        .build()
        .unwrap();
    assert_eq!(execute(&conn, update), 1);

    let done = query(
        &conn,
        Relation::<NoteSchema>::new()
            .where_condition(fragment::compare(
                &NoteSchema::DONE,
                CompareOp::Eq,
                SqlValue::Int(1),
            ))
            .selector()
            .build(),
    );
    assert_eq!(done.len(), 1);

    assert_eq!(execute(&conn, relation.deleter().build()), 1);
    let remaining = query(&conn, Relation::<NoteSchema>::new().selector().count());
    assert_eq!(remaining[0].get::<i64>(0).unwrap(), 1);
}

#[test]
fn test_empty_in_list_matches_nothing() {
    let conn = open();
    insert(&conn, &note("a", false, 1_000));
    let rows = query(
        &conn,
        Relation::<NoteSchema>::new()
            .where_condition(fragment::in_list(
                &NoteSchema::ID,
                false,
                Vec::<i64>::new(),
                SqlValue::Int,
            ))
            .selector()
            .build(),
    );
    assert!(rows.is_empty());
}

#[test]
fn test_quoted_operand_is_not_interpreted() {
    let conn = open();
    insert(&conn, &note("'; DROP TABLE Note; --", false, 1_000));
    let rows = query(
        &conn,
        Relation::<NoteSchema>::new()
            .where_condition(fragment::compare(
                &NoteSchema::TITLE,
                CompareOp::Eq,
                SqlValue::Text(String::from("'; DROP TABLE Note; --")),
            ))
            .selector()
            .build(),
    );
    assert_eq!(rows.len(), 1);
}
