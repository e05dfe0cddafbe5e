//! The to-do models. Their query API is generated by `build.rs` and
//! included at the bottom of this file.

use chrono::{DateTime, NaiveDate, Utc};
use strata_core::{Error, Result, SingleAssociation, TypeAdapter};
use strata_derive::Model;

/// How urgent a to-do is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Stores [`Priority`] as 0, 1 or 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityAdapter;

impl TypeAdapter for PriorityAdapter {
    type Host = Priority;
    type Serialized = i64;

    fn serialize(value: &Priority) -> i64 {
        match value {
            Priority::Low => 0,
            Priority::Normal => 1,
            Priority::High => 2,
        }
    }

    fn deserialize(value: i64) -> Result<Priority> {
        match value {
            0 => Ok(Priority::Low),
            1 => Ok(Priority::Normal),
            2 => Ok(Priority::High),
            other => Err(Error::Adapter(format!("unknown priority {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Model)]
pub struct Author {
    #[primary_key]
    pub id: i64,
    #[column(unique, collate = "nocase")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Model)]
#[table(name = "todos")]
pub struct Todo {
    #[primary_key(autoincrement)]
    pub id: i64,
    #[column(indexed)]
    pub title: String,
    pub done: bool,
    pub created_time: DateTime<Utc>,
    pub priority: Priority,
    pub owner: SingleAssociation<Author>,
    #[nullable]
    pub memo: Option<String>,
    #[column(name = "tags")]
    pub labels: Vec<String>,
    #[transient]
    pub selected: bool,
}

/// A book and its author, loaded together through a join.
#[derive(Debug, Clone, PartialEq, Model)]
pub struct Book {
    #[primary_key(auto = false)]
    pub id: i64,
    pub title: String,
    pub author: Author,
    pub editor: Option<Editor>,
}

#[derive(Debug, Clone, PartialEq, Model)]
pub struct Editor {
    #[primary_key(auto = false)]
    pub id: i64,
    pub name: String,
}

/// A log line. No declared key, so it gets a synthesized `_rowid_`.
#[derive(Debug, Clone, PartialEq, Model)]
pub struct Entry {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// A sticky note. `label` may be NULL in the table and loads as empty.
#[derive(Debug, Clone, PartialEq, Model)]
pub struct Note {
    #[primary_key(auto = false)]
    pub id: i64,
    #[nullable]
    pub label: String,
}

/// An item kept behind accessors. Loads go through the setters, so a
/// stored name comes back trimmed.
#[derive(Debug, Clone, Default, PartialEq, Model)]
pub struct Gadget {
    #[primary_key(auto = false)]
    #[column(getter = "id", setter = "set_id")]
    id: i64,
    #[column(getter = "name", setter = "set_name")]
    name: String,
    #[column(name = "made_at", getter = "made", setter = "set_made")]
    made: DateTime<Utc>,
}

impl Gadget {
    #[must_use]
    pub fn new(id: i64, name: &str, made: DateTime<Utc>) -> Self {
        Self {
            id,
            name: String::from(name),
            made,
        }
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: String) {
        self.name = String::from(name.trim());
    }

    #[must_use]
    pub const fn made(&self) -> DateTime<Utc> {
        self.made
    }

    pub fn set_made(&mut self, made: DateTime<Utc>) {
        self.made = made;
    }
}

/// A working day, keyed by its date.
#[derive(Debug, Clone, PartialEq, Model)]
pub struct Shift {
    #[primary_key]
    pub day: NaiveDate,
    pub lead: String,
}

/// A rota slot joined to the [`Shift`] it belongs to.
#[derive(Debug, Clone, PartialEq, Model)]
pub struct Slot {
    #[primary_key(auto = false)]
    pub id: i64,
    pub worker: String,
    pub shift: Shift,
}

include!(concat!(env!("OUT_DIR"), "/strata_models.rs"));
