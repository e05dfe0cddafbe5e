//! Derive macro marking a struct as a strata model.
//!
//! `#[derive(Model)]` generates nothing by itself. The query API is
//! produced by `strata-build` from the same source; the derive registers
//! the helper attributes and reports malformed ones at their span, so
//! mistakes surface in the editor before the build script runs.

use proc_macro::TokenStream;
use strata_codegen::annotations::{parse_field_attrs, parse_model_attrs};
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Marks a struct as a model.
///
/// # Struct Attributes
///
/// - `#[table(name = "table_name")]` - SQL table name (optional, defaults
///   to the struct name)
///
/// # Field Attributes
///
/// - `#[primary_key]` - Marks the primary key; accepts `auto = false`,
///   `autoincrement` and `on_conflict = "..."`
/// - `#[column(name = "...")]` - SQL column name; also accepts `storage`,
///   `indexed`, `unique`, `unique_on_conflict`, `collate`, `default`,
///   `getter` and `setter`
/// - `#[nullable]` - Allows `NULL` in SQL
/// - `#[transient]` - Not persisted
/// - `#[serde(rename = "...")]` - Column name hint, used when `#[column]`
///   does not name the column
#[proc_macro_derive(
    Model,
    attributes(table, column, primary_key, nullable, Nullable, transient, serde)
)]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match validate(&input) {
        Ok(()) => TokenStream::new(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Checks the shape of the struct and every helper attribute, combining all
/// errors into one.
fn validate(input: &DeriveInput) -> syn::Result<()> {
    let mut errors: Vec<syn::Error> = Vec::new();

    if !input.generics.params.is_empty() {
        errors.push(syn::Error::new_spanned(
            &input.generics,
            "models cannot be generic",
        ));
    }
    if let Err(err) = parse_model_attrs(&input.attrs) {
        errors.push(err);
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                errors.push(syn::Error::new_spanned(
                    &input.ident,
                    "models must have named fields",
                ));
                Vec::new()
            }
        },
        _ => {
            errors.push(syn::Error::new_spanned(
                &input.ident,
                "Model can only be derived for structs",
            ));
            Vec::new()
        }
    };

    let mut primary_key = None;
    for field in fields {
        match parse_field_attrs(&field.attrs) {
            Ok(attrs) if attrs.primary_key.is_some() => {
                if primary_key.is_some() {
                    errors.push(syn::Error::new_spanned(
                        field,
                        "multiple primary keys; only one field may be #[primary_key]",
                    ));
                }
                primary_key = Some(field);
            }
            Ok(_) => {}
            Err(err) => errors.push(err),
        }
    }

    match errors.into_iter().reduce(|mut acc, err| {
        acc.combine(err);
        acc
    }) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
