//! # strata-todo
//!
//! A small to-do application built on strata-generated query builders,
//! backed by an embedded SQLite database.
//!
//! ```rust,ignore
//! use strata_todo::models::{Todo, TodoRelation, TodoSchema};
//! use strata_todo::Store;
//!
//! let store = Store::open_in_memory()?;
//! store.create::<TodoSchema>()?;
//! let open = store.fetch::<TodoSchema>(
//!     TodoRelation::new().done_eq(false).order_by_created_time_desc().selector().build(),
//! )?;
//! ```

pub mod models;
pub mod store;

pub use store::{Store, StoreError};
