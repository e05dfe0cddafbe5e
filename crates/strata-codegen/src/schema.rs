//! The schema model: one descriptor per model struct.

use std::collections::HashSet;

use quote::format_ident;
use syn::Ident;
use tracing::debug;

use crate::column::{AssociationKind, ColumnDef, Resolver};
use crate::decl::ModelDecl;
use crate::error::{Element, ErrorKind, Location, ProcessingError};

/// An index created for an `indexed` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    /// `index_<column>_on_<table>`
    pub name: String,
    pub column: String,
}

/// Full metadata of one model. Built once in phase 1, immutable afterwards.
#[derive(Debug, Clone)]
pub struct SchemaDef {
    pub ident: Ident,
    pub table: String,
    /// Declaration order; a synthesized primary key comes first.
    pub columns: Vec<ColumnDef>,
    /// Index into `columns`.
    pub primary_key: usize,
    pub indexes: Vec<IndexDef>,
    pub has_direct_associations: bool,
    /// Whether loads construct the model with `Default` and setters.
    pub uses_setters: bool,
    /// `#[transient]` fields, filled with `Default::default()` on load.
    pub transient: Vec<Ident>,
    pub location: Location,
}

impl SchemaDef {
    /// Builds the schema of `decl`, collecting every column error.
    ///
    /// # Errors
    ///
    /// Returns all column errors and a second-primary-key error, if any.
    pub fn build(decl: &ModelDecl, resolver: &Resolver<'_>) -> Result<Self, Vec<ProcessingError>> {
        let model = decl.name();
        let table = decl.table_name();
        let mut errors = Vec::new();
        let mut columns = Vec::with_capacity(decl.fields.len() + 1);
        let mut transient = Vec::new();
        let mut primary_key = None;

        for field in &decl.fields {
            if field.attrs.transient {
                transient.push(field.ident.clone());
                continue;
            }
            match ColumnDef::build(field, &model, resolver) {
                Ok(column) => {
                    if column.primary_key {
                        if primary_key.is_some() {
                            errors.push(ProcessingError::new(
                                ErrorKind::SchemaShape,
                                field.element(&model),
                                "multiple primary keys; only one field may be #[primary_key]",
                            ));
                            continue;
                        }
                        primary_key = Some(columns.len());
                    }
                    columns.push(column);
                }
                Err(err) => errors.push(err),
            }
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                errors.push(ProcessingError::new(
                    ErrorKind::SchemaShape,
                    Element::field(
                        &model,
                        column.method_stem(),
                        column.location.clone(),
                    ),
                    format!("duplicate column name `{}`", column.name),
                ));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let primary_key = if let Some(index) = primary_key {
            index
        } else {
            debug!(model = %model, "synthesizing primary key");
            columns.insert(0, ColumnDef::synthesized_rowid(decl.location.clone()));
            0
        };

        let has_direct_associations = columns
            .iter()
            .any(|c| c.association_kind() == Some(AssociationKind::Direct));
        for column in &mut columns {
            column.qualified = has_direct_associations;
        }

        let indexes = columns
            .iter()
            .filter(|c| c.indexed)
            .map(|c| IndexDef {
                name: strata_core::ddl::index_name(&table, &c.name),
                column: c.name.clone(),
            })
            .collect();

        let uses_setters = columns.iter().any(|c| c.setter.is_some());

        debug!(model = %model, table = %table, columns = columns.len(), "built schema");
        Ok(Self {
            ident: decl.ident.clone(),
            table,
            columns,
            primary_key,
            indexes,
            has_direct_associations,
            uses_setters,
            transient,
            location: decl.location.clone(),
        })
    }

    /// The model struct name.
    #[must_use]
    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    /// The primary key column.
    #[must_use]
    pub fn primary_key_column(&self) -> &ColumnDef {
        &self.columns[self.primary_key]
    }

    /// Whether the primary key was synthesized.
    #[must_use]
    pub fn has_synthesized_primary_key(&self) -> bool {
        self.primary_key_column().is_synthesized()
    }

    /// The column of field `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.field.as_ref().is_some_and(|f| f == name))
    }

    /// The element errors about this model are reported against.
    #[must_use]
    pub fn element(&self) -> Element {
        Element::model(self.name(), self.location.clone())
    }

    pub fn schema_ident(&self) -> Ident {
        format_ident!("{}Schema", self.ident)
    }

    pub fn relation_ident(&self) -> Ident {
        format_ident!("{}Relation", self.ident)
    }

    pub fn selector_ident(&self) -> Ident {
        format_ident!("{}Selector", self.ident)
    }

    pub fn updater_ident(&self) -> Ident {
        format_ident!("{}Updater", self.ident)
    }

    pub fn deleter_ident(&self) -> Ident {
        format_ident!("{}Deleter", self.ident)
    }
}
