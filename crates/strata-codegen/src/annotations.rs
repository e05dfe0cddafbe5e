//! Parsing of the `#[derive(Model)]` helper attributes.
//!
//! Shared by the derive macro, which only validates them at the user's
//! span, and by the source scanner, which builds column descriptors from
//! them.
//!
//! # Struct attributes
//!
//! - `#[table(name = "todos")]` - SQL table name (defaults to the struct name)
//!
//! # Field attributes
//!
//! - `#[column(name = "...", storage = "TEXT", indexed, unique,
//!   unique_on_conflict = "replace", collate = "nocase", default = "0",
//!   getter = "title", setter = "set_title")]`
//! - `#[primary_key]` or `#[primary_key(auto = false, autoincrement,
//!   on_conflict = "replace")]`
//! - `#[transient]` - not persisted
//! - `#[nullable]` - any attribute whose last path segment is `nullable` or
//!   `Nullable`
//! - `#[serde(rename = "...")]` - column name hint

use std::str::FromStr;

use strata_core::{Collate, OnConflict, StorageType};
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Ident, Lit, LitBool, LitStr, Meta, Token};

/// Collects `syn::Error`s and combines them into one.
#[derive(Debug, Default)]
pub(crate) struct ErrorSet {
    errors: Vec<syn::Error>,
}

impl ErrorSet {
    pub(crate) fn new() -> Self {
        Self { errors: vec![] }
    }

    pub(crate) fn push(&mut self, err: syn::Error) {
        self.errors.push(err);
    }

    pub(crate) fn collect(self) -> Option<syn::Error> {
        self.errors.into_iter().reduce(|mut acc, err| {
            acc.combine(err);
            acc
        })
    }

    pub(crate) fn finish<T>(self, value: T) -> syn::Result<T> {
        match self.collect() {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }
}

/// Attributes on the model struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelAttrs {
    /// `#[table(name = "...")]`
    pub table: Option<String>,
}

/// `#[primary_key(...)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryKeyAttr {
    /// Whether the engine assigns the key. Only takes effect for integers.
    pub auto: bool,
    /// `AUTOINCREMENT`
    pub autoincrement: bool,
    /// Conflict clause of the constraint.
    pub on_conflict: OnConflict,
}

impl Default for PrimaryKeyAttr {
    fn default() -> Self {
        Self {
            auto: true,
            autoincrement: false,
            on_conflict: OnConflict::None,
        }
    }
}

/// `#[column(...)]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAttr {
    pub name: Option<String>,
    pub storage: Option<StorageType>,
    pub indexed: bool,
    pub unique: bool,
    pub unique_on_conflict: OnConflict,
    pub collate: Collate,
    pub default_expr: Option<String>,
    pub getter: Option<Ident>,
    pub setter: Option<Ident>,
}

/// Every helper attribute on one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAttrs {
    pub column: ColumnAttr,
    pub primary_key: Option<PrimaryKeyAttr>,
    pub transient: bool,
    pub nullable: bool,
    /// `#[serde(rename = "...")]`
    pub serde_rename: Option<String>,
}

/// Parses the struct-level attributes.
///
/// # Errors
///
/// Returns every malformed or duplicated attribute, combined.
pub fn parse_model_attrs(attrs: &[Attribute]) -> syn::Result<ModelAttrs> {
    let mut errs = ErrorSet::new();
    let mut result = ModelAttrs::default();
    let mut seen = false;

    for attr in attrs.iter().filter(|a| a.path().is_ident("table")) {
        if seen {
            errs.push(syn::Error::new_spanned(attr, "duplicate #[table] attribute"));
            continue;
        }
        seen = true;
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let name: LitStr = meta.value()?.parse()?;
                if name.value().is_empty() {
                    return Err(syn::Error::new_spanned(&name, "table name must not be empty"));
                }
                result.table = Some(name.value());
                Ok(())
            } else {
                Err(meta.error("unknown #[table] key (expected `name`)"))
            }
        });
        if let Err(err) = parsed {
            errs.push(err);
        }
    }

    errs.finish(result)
}

/// Parses the attributes of one field.
///
/// # Errors
///
/// Returns every malformed or duplicated attribute, combined.
pub fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut errs = ErrorSet::new();
    let mut result = FieldAttrs::default();
    let mut seen_column = false;
    let mut seen_primary_key = false;
    let mut transient_attr = None;

    for attr in attrs {
        let path = attr.path();
        if path.is_ident("column") {
            if seen_column {
                errs.push(syn::Error::new_spanned(attr, "duplicate #[column] attribute"));
                continue;
            }
            seen_column = true;
            if let Err(err) = parse_column(attr, &mut result.column) {
                errs.push(err);
            }
        } else if path.is_ident("primary_key") {
            if seen_primary_key {
                errs.push(syn::Error::new_spanned(
                    attr,
                    "duplicate #[primary_key] attribute",
                ));
                continue;
            }
            seen_primary_key = true;
            match parse_primary_key(attr) {
                Ok(pk) => result.primary_key = Some(pk),
                Err(err) => errs.push(err),
            }
        } else if path.is_ident("transient") {
            if result.transient {
                errs.push(syn::Error::new_spanned(attr, "duplicate #[transient] attribute"));
            } else if let Err(err) = attr.meta.require_path_only() {
                errs.push(err);
            } else {
                result.transient = true;
                transient_attr = Some(attr);
            }
        } else if is_nullable_marker(attr) {
            // Any `nullable`/`Nullable` marker counts, whatever its module
            // path, and repeats are harmless.
            result.nullable = true;
        } else if path.is_ident("serde") {
            if let Some(rename) = serde_rename(attr) {
                result.serde_rename = Some(rename);
            }
        }
    }

    if let (Some(attr), true) = (transient_attr, seen_primary_key) {
        errs.push(syn::Error::new_spanned(
            attr,
            "a transient field cannot be the primary key",
        ));
    }

    errs.finish(result)
}

/// Whether `attr` is a nullability marker, matched on its simple name only.
#[must_use]
pub fn is_nullable_marker(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|s| s.ident == "nullable" || s.ident == "Nullable")
}

fn parse_column(attr: &Attribute, column: &mut ColumnAttr) -> syn::Result<()> {
    // `#[column]` alone is allowed and means nothing.
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(());
    }

    let mut unique_on_conflict = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            let name: LitStr = meta.value()?.parse()?;
            if name.value().is_empty() {
                return Err(syn::Error::new_spanned(&name, "column name must not be empty"));
            }
            column.name = Some(name.value());
        } else if meta.path.is_ident("storage") {
            let lit: LitStr = meta.value()?.parse()?;
            let storage = StorageType::from_str(&lit.value())
                .map_err(|e| syn::Error::new_spanned(&lit, e))?;
            column.storage = Some(storage);
        } else if meta.path.is_ident("indexed") {
            column.indexed = true;
        } else if meta.path.is_ident("unique") {
            column.unique = true;
        } else if meta.path.is_ident("unique_on_conflict") {
            let lit: LitStr = meta.value()?.parse()?;
            let policy =
                OnConflict::from_str(&lit.value()).map_err(|e| syn::Error::new_spanned(&lit, e))?;
            unique_on_conflict = Some(policy);
        } else if meta.path.is_ident("collate") {
            let lit: LitStr = meta.value()?.parse()?;
            column.collate =
                Collate::from_str(&lit.value()).map_err(|e| syn::Error::new_spanned(&lit, e))?;
        } else if meta.path.is_ident("default") {
            let lit: LitStr = meta.value()?.parse()?;
            let expr = lit.value();
            column.default_expr = (!expr.is_empty()).then_some(expr);
        } else if meta.path.is_ident("getter") {
            let lit: LitStr = meta.value()?.parse()?;
            column.getter = Some(lit.parse()?);
        } else if meta.path.is_ident("setter") {
            let lit: LitStr = meta.value()?.parse()?;
            column.setter = Some(lit.parse()?);
        } else {
            return Err(meta.error(
                "unknown #[column] key (expected name, storage, indexed, unique, \
                 unique_on_conflict, collate, default, getter or setter)",
            ));
        }
        Ok(())
    })?;

    if let Some(policy) = unique_on_conflict {
        column.unique_on_conflict = policy;
        if policy != OnConflict::None {
            column.unique = true;
        }
    }
    Ok(())
}

fn parse_primary_key(attr: &Attribute) -> syn::Result<PrimaryKeyAttr> {
    let mut pk = PrimaryKeyAttr::default();
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(pk);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("auto") {
            // `auto` alone means `auto = true`.
            if meta.input.peek(Token![=]) {
                let lit: LitBool = meta.value()?.parse()?;
                pk.auto = lit.value;
            } else {
                pk.auto = true;
            }
        } else if meta.path.is_ident("autoincrement") {
            pk.autoincrement = true;
        } else if meta.path.is_ident("on_conflict") {
            let lit: LitStr = meta.value()?.parse()?;
            pk.on_conflict =
                OnConflict::from_str(&lit.value()).map_err(|e| syn::Error::new_spanned(&lit, e))?;
        } else {
            return Err(meta.error(
                "unknown #[primary_key] key (expected auto, autoincrement or on_conflict)",
            ));
        }
        Ok(())
    })?;
    Ok(pk)
}

/// Extracts `rename = "..."` from a `#[serde(...)]` list, ignoring every
/// other serde key.
fn serde_rename(attr: &Attribute) -> Option<String> {
    let nested = attr
        .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
        .ok()?;
    nested.iter().find_map(|meta| match meta {
        Meta::NameValue(nv) if nv.path.is_ident("rename") => match &nv.value {
            Expr::Lit(expr) => match &expr.lit {
                Lit::Str(s) => Some(s.value()),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    })
}
