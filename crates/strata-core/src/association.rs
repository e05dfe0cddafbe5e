//! Lazy references to other models.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::builder::{QueryBuilder, Selector};
use crate::error::Result;
use crate::fragment::{self, CompareOp};
use crate::schema::{Model, Schema};
use crate::value::{FromSqlValue, SqlValue, ToSqlValue};

/// A reference to another model stored as its bare integer id.
///
/// The referenced row is only loaded when explicitly dereferenced through
/// [`SingleAssociation::selector`].
pub struct SingleAssociation<M> {
    id: i64,
    _model: PhantomData<fn() -> M>,
}

impl<M> SingleAssociation<M> {
    /// Creates a reference to the row with primary key `id`.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            _model: PhantomData,
        }
    }

    /// Returns the referenced primary key.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }
}

impl<M: Model> SingleAssociation<M> {
    /// Returns a selector matching the referenced row.
    #[must_use]
    pub fn selector(&self) -> Selector<M::Schema> {
        let pk = <M::Schema as Schema>::PRIMARY_KEY;
        Selector::new().where_condition(fragment::compare(
            &pk,
            CompareOp::Eq,
            SqlValue::Int(self.id),
        ))
    }
}

// Manual impls avoid spurious bounds on `M`.
impl<M> Clone for SingleAssociation<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for SingleAssociation<M> {}

impl<M> PartialEq for SingleAssociation<M> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<M> Eq for SingleAssociation<M> {}

impl<M> Hash for SingleAssociation<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<M> fmt::Debug for SingleAssociation<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SingleAssociation").field(&self.id).finish()
    }
}

impl<M> ToSqlValue for SingleAssociation<M> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self.id)
    }
}

impl<M> ToSqlValue for &SingleAssociation<M> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self.id)
    }
}

impl<M> FromSqlValue for SingleAssociation<M> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        i64::from_sql_value(value).map(Self::new)
    }
}
