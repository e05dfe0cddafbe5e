//! The query root shared by selectors, updaters and deleters.

use std::fmt;
use std::marker::PhantomData;

use super::{Deleter, QueryBuilder, Selector, Updater};
use crate::fragment::{Condition, OrderingTerm};
use crate::schema::Schema;
use crate::value::SqlValue;

/// Conditions, ordering and paging accumulated for one schema.
pub struct Relation<S> {
    conditions: Vec<Condition>,
    order_by: Vec<OrderingTerm>,
    limit: Option<u64>,
    offset: Option<u64>,
    _schema: PhantomData<fn() -> S>,
}

// Manual Clone/Debug/Default implementations to avoid bounds on S
impl<S> Clone for Relation<S> {
    fn clone(&self) -> Self {
        Self {
            conditions: self.conditions.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
            _schema: PhantomData,
        }
    }
}

impl<S> fmt::Debug for Relation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("conditions", &self.conditions)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<S> Default for Relation<S> {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            _schema: PhantomData,
        }
    }
}

impl<S: Schema> Relation<S> {
    /// Creates an empty relation matching every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated conditions, in insertion order.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Accumulated ordering terms, in insertion order.
    #[must_use]
    pub fn orderings(&self) -> &[OrderingTerm] {
        &self.order_by
    }

    /// The `LIMIT`, if set.
    #[must_use]
    pub const fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// The `OFFSET`, if set.
    #[must_use]
    pub const fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    pub(crate) fn push_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub(crate) fn push_order(&mut self, term: OrderingTerm) {
        self.order_by.push(term);
    }

    pub(crate) fn set_limit(&mut self, n: u64) {
        self.limit = Some(n);
    }

    pub(crate) fn set_offset(&mut self, n: u64) {
        self.offset = Some(n);
    }

    /// Appends ` WHERE ...` when there are conditions.
    pub(crate) fn append_where(&self, sql: &mut String, params: &mut Vec<SqlValue>) {
        if let Some(condition) = Condition::conjunction(&self.conditions) {
            let (where_sql, where_params) = condition.into_parts();
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
            params.extend(where_params);
        }
    }

    /// Appends ` ORDER BY ...` when there are ordering terms.
    pub(crate) fn append_order_by(&self, sql: &mut String) {
        if !self.order_by.is_empty() {
            let terms: Vec<&str> = self.order_by.iter().map(OrderingTerm::sql).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
    }

    /// Appends ` LIMIT ? [OFFSET ?]`.
    pub(crate) fn append_limit_offset(&self, sql: &mut String, params: &mut Vec<SqlValue>) {
        match (self.limit, self.offset) {
            (None, None) => {}
            (limit, offset) => {
                // SQLite needs a LIMIT before OFFSET; -1 means unbounded
                let limit = limit.map_or(-1, to_i64);
                sql.push_str(" LIMIT ?");
                params.push(SqlValue::Int(limit));
                if let Some(offset) = offset {
                    sql.push_str(" OFFSET ?");
                    params.push(SqlValue::Int(to_i64(offset)));
                }
            }
        }
    }

    /// Starts a SELECT over this relation.
    #[must_use]
    pub fn selector(&self) -> Selector<S> {
        Selector::from_relation(self.clone())
    }

    /// Starts an UPDATE over this relation.
    #[must_use]
    pub fn updater(&self) -> Updater<S> {
        Updater::from_relation(self.clone())
    }

    /// Starts a DELETE over this relation.
    #[must_use]
    pub fn deleter(&self) -> Deleter<S> {
        Deleter::from_relation(self.clone())
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl<S: Schema> QueryBuilder for Relation<S> {
    type Schema = S;

    fn relation(&self) -> &Self {
        self
    }

    fn relation_mut(&mut self) -> &mut Self {
        self
    }
}
