//! The model registry and the link step that resolves cross-model facts.
//!
//! Phase 1 builds every schema in isolation. Linking then fills in what
//! depends on other models: the storage type of direct associations, the
//! `REFERENCES` target of every association, and the acyclicity of the
//! join graph. A model that fails here, or whose association target
//! failed, is left out of the registry.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use strata_core::StorageType;
use tracing::warn;

use crate::column::{AssociationKind, ColumnDef, ForeignKeyDef, StorageSource};
use crate::error::{Element, ErrorKind, ProcessingError};
use crate::schema::SchemaDef;

/// Every successfully built schema, in declaration order. Read-only once
/// phase 1 is over.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: IndexMap<String, SchemaDef>,
}

impl Registry {
    /// The schema of model `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaDef> {
        self.schemas.get(name)
    }

    /// Whether model `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Iterates over the schemas in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaDef> {
        self.schemas.values()
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no model is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Links schemas built in phase 1. `failed` names models whose build
    /// already failed; their dependents are dropped without a new error.
    pub(crate) fn link(
        mut schemas: IndexMap<String, SchemaDef>,
        failed: &HashSet<String>,
        errors: &mut Vec<ProcessingError>,
    ) -> Self {
        let mut dropped: HashSet<String> = failed.clone();
        let mut reported: HashSet<(String, Option<String>, String)> = HashSet::new();
        let mut report = |err: ProcessingError, errors: &mut Vec<ProcessingError>| {
            let key = (
                err.element.model.clone(),
                err.element.field.clone(),
                err.message.clone(),
            );
            if reported.insert(key) {
                errors.push(err);
            }
        };

        // Association targets must carry a declared primary key.
        for schema in schemas.values() {
            let model = schema.name();
            for column in &schema.columns {
                let Some(association) = &column.association else {
                    continue;
                };
                let field = column.method_stem();
                let Some(target) = schemas.get(&association.target) else {
                    dropped.insert(model.clone());
                    continue;
                };
                if target.has_synthesized_primary_key() {
                    report(
                        ProcessingError::new(
                            ErrorKind::SchemaShape,
                            target.element(),
                            format!(
                                "`{}` has no primary key field, but `{model}.{field}` refers to it; \
                                 add #[primary_key] to one of its fields",
                                association.target
                            ),
                        ),
                        errors,
                    );
                    dropped.insert(model.clone());
                    continue;
                }
                if association.kind == AssociationKind::Single
                    && !target.primary_key_column().host.unwrap_option().looks_like_integer()
                {
                    report(
                        ProcessingError::new(
                            ErrorKind::SchemaShape,
                            column_element(&model, column),
                            format!(
                                "`SingleAssociation<{}>` requires an integer primary key on `{}`",
                                association.target, association.target
                            ),
                        ),
                        errors,
                    );
                    dropped.insert(model.clone());
                }
            }
        }

        // Direct associations become joins: no cycles, no table twice.
        for schema in schemas.values() {
            let mut stack = vec![schema.name()];
            let mut tables = HashSet::from([schema.table.clone()]);
            if let Err(err) = walk_joins(schema, &schemas, &mut stack, &mut tables) {
                report(err, errors);
                dropped.insert(schema.name());
            }
        }

        drop_dependents(&schemas, &mut dropped);
        schemas.retain(|name, _| !dropped.contains(name));

        // Acyclic from here on, so resolution terminates.
        let mut pk_storage: HashMap<String, StorageType> = HashMap::new();
        let names: Vec<String> = schemas.keys().cloned().collect();
        for name in &names {
            resolve_pk_storage(name, &schemas, &mut pk_storage);
        }

        let targets: HashMap<String, ForeignKeyDef> = schemas
            .values()
            .map(|s| {
                (
                    s.name(),
                    ForeignKeyDef {
                        table: s.table.clone(),
                        column: s.primary_key_column().name.clone(),
                    },
                )
            })
            .collect();

        for schema in schemas.values_mut() {
            for column in &mut schema.columns {
                let Some(association) = &mut column.association else {
                    continue;
                };
                association.foreign_key = targets.get(&association.target).cloned();
                if column.storage_source == StorageSource::DirectAssociation {
                    if let Some(storage) = pk_storage.get(&association.target) {
                        column.storage = *storage;
                    }
                }
            }
        }

        Self { schemas }
    }
}

fn column_element(model: &str, column: &ColumnDef) -> Element {
    Element::field(model, column.method_stem(), column.location.clone())
}

fn walk_joins(
    schema: &SchemaDef,
    schemas: &IndexMap<String, SchemaDef>,
    stack: &mut Vec<String>,
    tables: &mut HashSet<String>,
) -> Result<(), ProcessingError> {
    let model = schema.name();
    for column in &schema.columns {
        let Some(association) = &column.association else {
            continue;
        };
        if association.kind != AssociationKind::Direct {
            continue;
        }
        let Some(target) = schemas.get(&association.target) else {
            continue;
        };
        if stack.contains(&association.target) {
            return Err(ProcessingError::new(
                ErrorKind::SchemaShape,
                column_element(&model, column),
                format!(
                    "direct association cycle: {} -> {}; use SingleAssociation to break it",
                    stack.join(" -> "),
                    association.target
                ),
            ));
        }
        if !tables.insert(target.table.clone()) {
            return Err(ProcessingError::new(
                ErrorKind::SchemaShape,
                column_element(&model, column),
                format!(
                    "table `{}` would be joined twice; use SingleAssociation for one of the references",
                    target.table
                ),
            ));
        }
        stack.push(association.target.clone());
        walk_joins(target, schemas, stack, tables)?;
        stack.pop();
    }
    Ok(())
}

/// Removes every model that refers to a removed one, transitively.
fn drop_dependents(schemas: &IndexMap<String, SchemaDef>, dropped: &mut HashSet<String>) {
    loop {
        let newly: Vec<String> = schemas
            .values()
            .filter(|s| !dropped.contains(&s.name()))
            .filter(|s| {
                s.columns.iter().any(|c| {
                    c.association
                        .as_ref()
                        .is_some_and(|a| dropped.contains(&a.target))
                })
            })
            .map(SchemaDef::name)
            .collect();
        if newly.is_empty() {
            return;
        }
        for name in newly {
            warn!(model = %name, "skipping model: an associated model failed");
            dropped.insert(name);
        }
    }
}

fn resolve_pk_storage(
    name: &str,
    schemas: &IndexMap<String, SchemaDef>,
    resolved: &mut HashMap<String, StorageType>,
) -> Option<StorageType> {
    if let Some(storage) = resolved.get(name) {
        return Some(*storage);
    }
    let schema = schemas.get(name)?;
    let pk = schema.primary_key_column();
    let storage = match (&pk.association, pk.storage_source) {
        (Some(association), StorageSource::DirectAssociation) => {
            resolve_pk_storage(&association.target, schemas, resolved)?
        }
        _ => pk.storage,
    };
    resolved.insert(name.to_string(), storage);
    Some(storage)
}
