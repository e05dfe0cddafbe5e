//! End-to-end tests of the generated to-do API against SQLite.

use chrono::{DateTime, NaiveDate, Utc};
use strata_core::{QueryBuilder, Schema, SingleAssociation, SqlValue};
use strata_todo::Store;
use strata_todo::models::{
    Author, AuthorSchema, Book, BookRelation, BookSchema, Editor, EditorSchema, Entry,
    EntryRelation, EntrySchema, Gadget, GadgetRelation, GadgetSchema, Note, NoteRelation,
    NoteSchema, Priority, Shift, ShiftSchema, Slot, SlotRelation, SlotSchema, Todo,
    TodoRelation, TodoSchema,
};

fn at(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap()
}

fn todo(title: &str, done: bool, millis: i64, owner: i64) -> Todo {
    Todo {
        id: 0,
        title: String::from(title),
        done,
        created_time: at(millis),
        priority: Priority::Normal,
        owner: SingleAssociation::new(owner),
        memo: None,
        labels: vec![],
        selected: false,
    }
}

fn store() -> Store {
    let store = Store::open_in_memory().unwrap();
    store.create::<AuthorSchema>().unwrap();
    store.create::<TodoSchema>().unwrap();
    let ada = Author {
        id: 1,
        name: String::from("Ada"),
    };
    store.insert(&ada).unwrap();
    for (title, done, millis) in [
        ("buy milk", false, 1_000),
        ("write report", true, 2_000),
        ("call bob", false, 3_000),
    ] {
        store.insert(&todo(title, done, millis, 1)).unwrap();
    }
    store
}

#[test]
fn select_sql_escapes_every_identifier() {
    let (sql, params) = TodoRelation::new()
        .title_eq(String::from("buy milk"))
        .selector()
        .build();
    assert_eq!(
        sql,
        "SELECT `id`, `title`, `done`, `created_time`, `priority`, `owner`, `memo`, `tags` \
         FROM `todos` WHERE `title` = ?"
    );
    assert_eq!(params, vec![SqlValue::Text(String::from("buy milk"))]);
}

#[test]
fn create_statements_follow_the_annotations() {
    let statements = TodoSchema::create_statements();
    assert_eq!(
        statements[0],
        "CREATE TABLE `todos` (`id` INTEGER PRIMARY KEY AUTOINCREMENT, \
         `title` TEXT NOT NULL, `done` INTEGER NOT NULL, `created_time` INTEGER NOT NULL, \
         `priority` INTEGER NOT NULL, \
         `owner` INTEGER NOT NULL REFERENCES `Author`(`id`) ON UPDATE CASCADE ON DELETE CASCADE, \
         `memo` TEXT, `tags` TEXT NOT NULL)"
    );
    assert_eq!(
        statements[1],
        "CREATE INDEX `index_title_on_todos` ON `todos` (`title`)"
    );
}

#[test]
fn filter_by_value_and_adapter_columns() {
    let store = store();
    let open = store
        .fetch::<TodoSchema>(
            TodoRelation::new()
                .done_eq(false)
                .created_time_lt(at(3_000))
                .selector()
                .build(),
        )
        .unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].title, "buy milk");
    assert_eq!(open[0].created_time, at(1_000));
    assert_eq!(open[0].owner, SingleAssociation::new(1));
}

#[test]
fn in_lists_and_ordering() {
    let store = store();
    let titles: Vec<String> = store
        .fetch::<TodoSchema>(
            TodoRelation::new()
                .title_in([String::from("buy milk"), String::from("call bob")])
                .order_by_created_time_desc()
                .selector()
                .build(),
        )
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, ["call bob", "buy milk"]);

    let none = store
        .fetch::<TodoSchema>(
            TodoRelation::new()
                .title_in(Vec::<String>::new())
                .selector()
                .build(),
        )
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn limit_offset_and_count() {
    let store = store();
    let page = store
        .fetch::<TodoSchema>(
            TodoRelation::new()
                .order_by_id_asc()
                .limit(1)
                .offset(1)
                .selector()
                .build(),
        )
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "write report");

    let done = store
        .count(TodoRelation::new().done_eq(true).selector().count())
        .unwrap();
    assert_eq!(done, 1);
}

#[test]
fn updater_sets_columns_of_matching_rows() {
    let store = store();
    let statement = TodoRelation::new()
        .done_eq(false)
        .updater()
        .set_done(true)
        .set_priority(Priority::High)
        .set_memo(Some(String::from("bulk")))
        .build()
        .unwrap();
    assert_eq!(store.execute(statement).unwrap(), 2);

    let high = store
        .fetch::<TodoSchema>(TodoSchema::selector().priority_eq(Priority::High).build())
        .unwrap();
    assert_eq!(high.len(), 2);
    assert!(high.iter().all(|t| t.done && t.memo.as_deref() == Some("bulk")));
}

#[test]
fn updater_without_setters_builds_nothing() {
    assert!(TodoRelation::new().updater().build().is_none());
}

#[test]
fn single_association_setter_and_condition() {
    let store = store();
    let grace = Author {
        id: 2,
        name: String::from("Grace"),
    };
    store.insert(&grace).unwrap();

    let statement = TodoSchema::updater()
        .title_eq(String::from("call bob"))
        .set_owner(&grace)
        .build()
        .unwrap();
    assert_eq!(statement.1[0], SqlValue::Int(2));
    store.execute(statement).unwrap();

    let graces = store
        .fetch::<TodoSchema>(
            TodoRelation::new()
                .owner_eq(SingleAssociation::new(2))
                .selector()
                .build(),
        )
        .unwrap();
    assert_eq!(graces.len(), 1);

    let owner = store
        .fetch::<AuthorSchema>(graces[0].owner.selector().build())
        .unwrap();
    assert_eq!(owner, vec![grace]);
}

#[test]
fn deleter_removes_matching_rows() {
    let store = store();
    let removed = store
        .execute(TodoRelation::new().title_not_in([String::from("buy milk")]).deleter().build())
        .unwrap();
    assert_eq!(removed, 2);
    let left = store.fetch::<TodoSchema>(TodoSchema::selector().build()).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].title, "buy milk");
}

#[test]
fn adapted_columns_round_trip() {
    let store = store();
    let mut tagged = todo("tagged", false, 5_000, 1);
    tagged.labels = vec![String::from("home"), String::from("urgent")];
    tagged.priority = Priority::Low;
    tagged.selected = true;
    let id = store.insert(&tagged).unwrap();

    let loaded = store
        .fetch::<TodoSchema>(TodoRelation::new().id_eq(id).selector().build())
        .unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].labels, tagged.labels);
    assert_eq!(loaded[0].priority, Priority::Low);
    assert!(!loaded[0].selected);
}

#[test]
fn malicious_operand_is_bound() {
    let store = store();
    let found = store
        .fetch::<TodoSchema>(
            TodoRelation::new()
                .title_eq(String::from("'; DROP TABLE todos; --"))
                .selector()
                .build(),
        )
        .unwrap();
    assert!(found.is_empty());
    assert_eq!(
        store.count(TodoSchema::selector().count()).unwrap(),
        3
    );
}

fn library() -> Store {
    let store = Store::open_in_memory().unwrap();
    store.create::<AuthorSchema>().unwrap();
    store.create::<EditorSchema>().unwrap();
    store.create::<BookSchema>().unwrap();
    let ada = Author {
        id: 1,
        name: String::from("Ada"),
    };
    let max = Editor {
        id: 7,
        name: String::from("Max"),
    };
    store.insert(&ada).unwrap();
    store.insert(&max).unwrap();
    store
        .insert(&Book {
            id: 10,
            title: String::from("Notes"),
            author: ada.clone(),
            editor: Some(max),
        })
        .unwrap();
    store
        .insert(&Book {
            id: 11,
            title: String::from("Sketches"),
            author: ada,
            editor: None,
        })
        .unwrap();
    store
}

#[test]
fn direct_associations_are_joined() {
    let (sql, _) = BookRelation::new().selector().build();
    assert_eq!(
        sql,
        "SELECT `Book`.`id`, `Book`.`title`, `Book`.`author`, `Book`.`editor`, \
         `Author`.`id`, `Author`.`name`, `Editor`.`id`, `Editor`.`name` \
         FROM `Book` \
         LEFT OUTER JOIN `Author` ON `Book`.`author` = `Author`.`id` \
         LEFT OUTER JOIN `Editor` ON `Book`.`editor` = `Editor`.`id`"
    );
    assert_eq!(BookSchema::select_width(), 8);
}

#[test]
fn joined_models_are_loaded() {
    let store = library();
    let books = store
        .fetch::<BookSchema>(BookRelation::new().order_by_id_asc().selector().build())
        .unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].author.name, "Ada");
    assert_eq!(books[0].editor.as_ref().map(|e| e.name.as_str()), Some("Max"));
    assert_eq!(books[1].editor, None);
}

#[test]
fn conditions_on_joined_tables_are_qualified() {
    let store = library();
    let ada = Author {
        id: 1,
        name: String::from("Ada"),
    };
    let (sql, params) = BookRelation::new()
        .author_eq(&ada)
        .editor_is_null()
        .selector()
        .build();
    assert!(sql.ends_with("WHERE (`Book`.`author` = ?) AND (`Book`.`editor` IS NULL)"));
    assert_eq!(params, vec![SqlValue::Int(1)]);
    let books = store.fetch::<BookSchema>((sql, params)).unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Sketches");
}

#[test]
fn synthesized_rowid() {
    let store = Store::open_in_memory().unwrap();
    store.create::<EntrySchema>().unwrap();
    let entry = Entry {
        message: String::from("started"),
        at: at(1_000),
    };
    let rowid = store.insert(&entry).unwrap();

    let (sql, _) = EntryRelation::new().rowid_eq(rowid).selector().build();
    assert_eq!(
        sql,
        "SELECT `_rowid_`, `message`, `at` FROM `Entry` WHERE `_rowid_` = ?"
    );
    let loaded = store
        .fetch::<EntrySchema>(EntryRelation::new().rowid_eq(rowid).selector().build())
        .unwrap();
    assert_eq!(loaded, vec![entry]);
}

#[test]
fn nullable_field_loads_null_as_default() {
    let store = Store::open_in_memory().unwrap();
    store.create::<NoteSchema>().unwrap();
    assert_eq!(
        NoteSchema::create_statements()[0],
        "CREATE TABLE `Note` (`id` INTEGER PRIMARY KEY, `label` TEXT)"
    );
    store
        .execute((
            String::from("INSERT INTO `Note` (`id`, `label`) VALUES (?, ?)"),
            vec![SqlValue::Int(1), SqlValue::Null],
        ))
        .unwrap();
    store
        .insert(&Note {
            id: 2,
            label: String::from("groceries"),
        })
        .unwrap();

    let unlabeled = NoteRelation::new().label_is_null().selector();
    assert_eq!(store.count(unlabeled.count()).unwrap(), 1);
    let notes = store.fetch::<NoteSchema>(unlabeled.build()).unwrap();
    assert_eq!(
        notes,
        vec![Note {
            id: 1,
            label: String::new(),
        }]
    );

    let all = store
        .fetch::<NoteSchema>(NoteRelation::new().order_by_id_asc().selector().build())
        .unwrap();
    assert_eq!(all[1].label, "groceries");
}

#[test]
fn accessors_are_used_to_persist_and_load() {
    let store = Store::open_in_memory().unwrap();
    store.create::<GadgetSchema>().unwrap();
    let lamp = Gadget::new(1, "  lamp  ", at(4_000));

    let (sql, params) = GadgetSchema::inserter().build(&lamp);
    assert_eq!(
        sql,
        "INSERT INTO `Gadget` (`id`, `name`, `made_at`) VALUES (?, ?, ?)"
    );
    assert_eq!(
        params,
        vec![
            SqlValue::Int(1),
            SqlValue::Text(String::from("  lamp  ")),
            SqlValue::Int(4_000),
        ]
    );
    store.insert(&lamp).unwrap();
    store.insert(&Gadget::new(2, "clock", at(9_000))).unwrap();

    let (sql, params) = GadgetRelation::new()
        .made_lt(at(5_000))
        .selector()
        .build();
    assert_eq!(params, vec![SqlValue::Int(5_000)]);
    let found = store.fetch::<GadgetSchema>((sql, params)).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), 1);
    assert_eq!(found[0].name(), "lamp");
    assert_eq!(found[0].made(), at(4_000));

    let renamed = GadgetSchema::updater()
        .id_eq(2)
        .set_name(String::from("alarm"))
        .build()
        .unwrap();
    store.execute(renamed).unwrap();
    let clock = store
        .fetch::<GadgetSchema>(GadgetRelation::new().name_eq(String::from("alarm")).selector().build())
        .unwrap();
    assert_eq!(clock, vec![Gadget::new(2, "alarm", at(9_000))]);
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn direct_association_binds_the_adapted_target_key() {
    let store = Store::open_in_memory().unwrap();
    store.create::<ShiftSchema>().unwrap();
    store.create::<SlotSchema>().unwrap();
    let monday = Shift {
        day: day(2020, 1, 6),
        lead: String::from("Ada"),
    };
    let tuesday = Shift {
        day: day(2020, 1, 7),
        lead: String::from("Grace"),
    };
    store.insert(&monday).unwrap();
    store.insert(&tuesday).unwrap();

    let slot = Slot {
        id: 1,
        worker: String::from("Bob"),
        shift: monday.clone(),
    };
    let (_, params) = SlotSchema::inserter().build(&slot);
    assert_eq!(
        params,
        vec![
            SqlValue::Int(1),
            SqlValue::Text(String::from("Bob")),
            SqlValue::Text(String::from("2020-01-06")),
        ]
    );
    store.insert(&slot).unwrap();

    let (sql, params) = SlotRelation::new().shift_eq(&monday).selector().build();
    assert!(sql.contains("LEFT OUTER JOIN `Shift` ON `Slot`.`shift` = `Shift`.`day`"));
    assert!(sql.ends_with("WHERE `Slot`.`shift` = ?"));
    assert_eq!(params, vec![SqlValue::Text(String::from("2020-01-06"))]);
    let loaded = store.fetch::<SlotSchema>((sql, params)).unwrap();
    assert_eq!(loaded, vec![slot]);

    let moved = SlotSchema::updater()
        .id_eq(1)
        .set_shift(&tuesday)
        .build()
        .unwrap();
    assert_eq!(
        moved,
        (
            String::from("UPDATE `Slot` SET `shift` = ? WHERE `Slot`.`id` = ?"),
            vec![SqlValue::Text(String::from("2020-01-07")), SqlValue::Int(1)],
        )
    );
    store.execute(moved).unwrap();
    let loaded = store
        .fetch::<SlotSchema>(SlotRelation::new().id_eq(1).selector().build())
        .unwrap();
    assert_eq!(loaded[0].shift, tuesday);
}
