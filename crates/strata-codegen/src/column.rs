//! The column model: one descriptor per persisted field.

use heck::{ToShoutySnakeCase, ToSnakeCase};
use indexmap::IndexMap;
use proc_macro2::Span;
use quote::format_ident;
use strata_core::{Collate, OnConflict, StorageType};
use syn::ext::IdentExt;
use syn::{Ident, Type, parse_quote};
use tracing::debug;

use crate::adapter::{AdapterDef, AdapterTable};
use crate::decl::{FieldDecl, ModelDecl};
use crate::error::{ErrorKind, Location, ProcessingError};
use crate::types::{HostType, generic_inner, option_inner};

/// Name of the primary key column synthesized for models that declare none.
pub const ROWID_COLUMN: &str = "_rowid_";

/// How an association column refers to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    /// The field holds the target model; selects join its table.
    Direct,
    /// The field holds a `SingleAssociation<B>`, the bare id.
    Single,
}

/// The `REFERENCES` target of an association column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub table: String,
    pub column: String,
}

/// An association to another registered model.
#[derive(Debug, Clone)]
pub struct AssociationDef {
    pub kind: AssociationKind,
    /// Name of the target model.
    pub target: String,
    /// The target model type as written in the field declaration.
    pub target_ty: Type,
    /// Filled once every schema is known.
    pub foreign_key: Option<ForeignKeyDef>,
}

impl AssociationDef {
    /// `<Target>Schema`.
    #[must_use]
    pub fn target_schema(&self) -> Ident {
        format_ident!("{}Schema", self.target)
    }
}

/// Where a column's storage type came from, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageSource {
    /// `#[column(storage = "...")]`
    Override,
    /// The adapter's serialized type.
    Adapter,
    /// Always INTEGER.
    SingleAssociation,
    /// The target's primary key storage, resolved after phase 1.
    DirectAssociation,
    /// The host type mapping.
    Default,
}

/// Metadata for one persisted field, or the synthesized primary key.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// The model field; `None` for the synthesized primary key.
    pub field: Option<Ident>,
    /// SQL column name.
    pub name: String,
    /// The declared field type.
    pub ty: Type,
    pub host: HostType,
    pub nullable_in_sql: bool,
    pub nullable_in_host: bool,
    pub primary_key: bool,
    pub primary_key_on_conflict: OnConflict,
    pub autoincrement: bool,
    pub auto_id: bool,
    pub indexed: bool,
    pub unique: bool,
    pub unique_on_conflict: OnConflict,
    pub default_expr: Option<String>,
    pub collate: Collate,
    pub storage: StorageType,
    pub storage_source: StorageSource,
    pub adapter: Option<AdapterDef>,
    pub association: Option<AssociationDef>,
    pub getter: Option<Ident>,
    pub setter: Option<Ident>,
    /// Whether generated fragments qualify the name with the table.
    pub qualified: bool,
    pub location: Location,
}

/// What phase 1 knows while building columns: every declared model and
/// every adapter.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    pub models: &'a IndexMap<String, ModelDecl>,
    pub adapters: &'a AdapterTable,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub const fn new(models: &'a IndexMap<String, ModelDecl>, adapters: &'a AdapterTable) -> Self {
        Self { models, adapters }
    }

    fn is_model(&self, key: &str) -> bool {
        self.models.contains_key(key)
    }
}

impl ColumnDef {
    /// Builds the column for `field` of `model`.
    ///
    /// # Errors
    ///
    /// Fails on a missing type adapter, an unregistered association target,
    /// a nullable association not declared as `Option`, or `AUTOINCREMENT`
    /// on a non-integer key.
    pub fn build(
        field: &FieldDecl,
        model: &str,
        resolver: &Resolver<'_>,
    ) -> Result<Self, ProcessingError> {
        let attrs = &field.attrs;
        let error = |kind, message: String| ProcessingError::new(kind, field.element(model), message);

        let name = attrs
            .column
            .name
            .clone()
            .or_else(|| attrs.serde_rename.clone())
            .unwrap_or_else(|| field.ident.unraw().to_string());

        let host = HostType::classify(&field.ty);
        let inner_ty = option_inner(&field.ty);
        let inner = host.unwrap_option();

        let association = match inner {
            HostType::SingleAssociation(target) => {
                if !resolver.is_model(target) {
                    return Err(error(
                        ErrorKind::Resolution,
                        format!("`SingleAssociation` target `{target}` is not a registered model"),
                    ));
                }
                let target_ty = generic_inner(inner_ty, "SingleAssociation")
                    .cloned()
                    .unwrap_or_else(|| inner_ty.clone());
                Some(AssociationDef {
                    kind: AssociationKind::Single,
                    target: target.clone(),
                    target_ty,
                    foreign_key: None,
                })
            }
            HostType::Named(key) if resolver.is_model(key) => Some(AssociationDef {
                kind: AssociationKind::Direct,
                target: key.clone(),
                target_ty: inner_ty.clone(),
                foreign_key: None,
            }),
            _ => None,
        };

        let adapter = match association {
            Some(_) => None,
            None => resolver.adapters.lookup(inner_ty).cloned(),
        };

        let (storage, storage_source) = if let Some(storage) = attrs.column.storage {
            (storage, StorageSource::Override)
        } else if let Some(adapter) = &adapter {
            (adapter.storage, StorageSource::Adapter)
        } else if let Some(association) = &association {
            match association.kind {
                AssociationKind::Single => (StorageType::Integer, StorageSource::SingleAssociation),
                // Placeholder until the target's primary key is known.
                AssociationKind::Direct => (StorageType::Integer, StorageSource::DirectAssociation),
            }
        } else if let Some(storage) = inner.default_storage() {
            (storage, StorageSource::Default)
        } else {
            return Err(error(
                ErrorKind::SchemaShape,
                format!(
                    "missing type adapter for `{}`: declare `impl TypeAdapter for ... {{ type Host = {}; ... }}`",
                    crate::types::type_key(inner_ty),
                    crate::types::type_key(inner_ty),
                ),
            ));
        };

        let nullable_in_sql = attrs.nullable || host.is_option();
        let nullable_in_host = !host.is_primitive() && nullable_in_sql;
        if nullable_in_sql && association.is_some() && !host.is_option() {
            return Err(error(
                ErrorKind::SchemaShape,
                String::from("a nullable association field must be declared as `Option<_>`"),
            ));
        }

        let (primary_key, primary_key_on_conflict, autoincrement, auto_id) =
            match attrs.primary_key {
                Some(pk) => {
                    let integer = inner.looks_like_integer();
                    if pk.autoincrement && !(integer && storage == StorageType::Integer) {
                        return Err(error(
                            ErrorKind::SchemaShape,
                            String::from("AUTOINCREMENT requires an integer primary key"),
                        ));
                    }
                    (true, pk.on_conflict, pk.autoincrement, pk.auto && integer)
                }
                None => (false, OnConflict::None, false, false),
            };

        let column = Self {
            field: Some(field.ident.clone()),
            name,
            ty: field.ty.clone(),
            host,
            nullable_in_sql,
            nullable_in_host,
            primary_key,
            primary_key_on_conflict,
            autoincrement,
            auto_id,
            indexed: attrs.column.indexed,
            unique: attrs.column.unique,
            unique_on_conflict: attrs.column.unique_on_conflict,
            default_expr: attrs.column.default_expr.clone(),
            collate: attrs.column.collate,
            storage,
            storage_source,
            adapter,
            association,
            getter: attrs.column.getter.clone(),
            setter: attrs.column.setter.clone(),
            qualified: false,
            location: field.location.clone(),
        };
        debug!(
            model,
            column = %column.name,
            storage = %column.storage,
            source = ?column.storage_source,
            "resolved column"
        );
        Ok(column)
    }

    /// The integer primary key synthesized for models without one.
    #[must_use]
    pub fn synthesized_rowid(location: Location) -> Self {
        Self {
            field: None,
            name: String::from(ROWID_COLUMN),
            ty: parse_quote!(i64),
            host: HostType::Integer(crate::types::IntegerKind::I64),
            nullable_in_sql: false,
            nullable_in_host: false,
            primary_key: true,
            primary_key_on_conflict: OnConflict::None,
            autoincrement: false,
            auto_id: true,
            indexed: false,
            unique: false,
            unique_on_conflict: OnConflict::None,
            default_expr: None,
            collate: Collate::Binary,
            storage: StorageType::Integer,
            storage_source: StorageSource::Default,
            adapter: None,
            association: None,
            getter: None,
            setter: None,
            qualified: false,
            location,
        }
    }

    /// Whether this is the synthesized primary key.
    #[must_use]
    pub const fn is_synthesized(&self) -> bool {
        self.field.is_none()
    }

    /// Snake-case stem of generated method names, e.g. `created_time`.
    #[must_use]
    pub fn method_stem(&self) -> String {
        match &self.field {
            Some(ident) => ident.unraw().to_string().to_snake_case(),
            None => self.name.to_snake_case(),
        }
    }

    /// Name of the `ColumnDef` constant on the schema, e.g. `CREATED_TIME`.
    #[must_use]
    pub fn const_ident(&self) -> Ident {
        let name = match &self.field {
            Some(ident) => ident.unraw().to_string(),
            None => self.name.clone(),
        };
        Ident::new(&name.to_shouty_snake_case(), Span::call_site())
    }

    /// Whether a stored NULL decodes to the host type's `Default`: the
    /// column is nullable in SQL but the field is not an `Option`.
    #[must_use]
    pub const fn null_as_default(&self) -> bool {
        self.nullable_in_sql && !self.host.is_option()
    }

    /// The association kind, if any.
    #[must_use]
    pub fn association_kind(&self) -> Option<AssociationKind> {
        self.association.as_ref().map(|a| a.kind)
    }
}
