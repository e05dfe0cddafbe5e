//! Model declarations as found in source, before any resolution.

use std::path::Path;

use syn::spanned::Spanned;
use syn::punctuated::Punctuated;
use syn::{Attribute, Fields, Ident, ItemStruct, Token, Type};

use crate::annotations::{self, FieldAttrs, ModelAttrs};
use crate::error::{Element, ErrorKind, Location, ProcessingError};

/// A `#[derive(Model)]` struct.
#[derive(Debug, Clone)]
pub struct ModelDecl {
    pub ident: Ident,
    pub attrs: ModelAttrs,
    pub fields: Vec<FieldDecl>,
    pub location: Location,
}

/// One named field of a model struct.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub ident: Ident,
    pub ty: Type,
    pub attrs: FieldAttrs,
    pub location: Location,
}

impl ModelDecl {
    /// Reads a model declaration from a struct item.
    ///
    /// # Errors
    ///
    /// Returns one error per malformed attribute, plus shape errors for
    /// generic or tuple structs.
    pub fn from_item(item: &ItemStruct, file: &Path) -> Result<Self, Vec<ProcessingError>> {
        let name = item.ident.to_string();
        let location = Location::from_span(file, item.ident.span());
        let mut errors = Vec::new();

        if !item.generics.params.is_empty() {
            errors.push(ProcessingError::new(
                ErrorKind::SchemaShape,
                Element::model(&name, location.clone()),
                "models cannot be generic",
            ));
        }

        let attrs = match annotations::parse_model_attrs(&item.attrs) {
            Ok(attrs) => attrs,
            Err(err) => {
                errors.extend(ProcessingError::from_syn(err, &name, file));
                ModelAttrs::default()
            }
        };

        let named = match &item.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                errors.push(ProcessingError::new(
                    ErrorKind::SchemaShape,
                    Element::model(&name, location.clone()),
                    "models must have named fields",
                ));
                Vec::new()
            }
        };

        let mut fields = Vec::with_capacity(named.len());
        for field in named {
            let Some(ident) = &field.ident else { continue };
            let field_location = Location::from_span(file, ident.span());
            match annotations::parse_field_attrs(&field.attrs) {
                Ok(attrs) => fields.push(FieldDecl {
                    ident: ident.clone(),
                    ty: field.ty.clone(),
                    attrs,
                    location: field_location,
                }),
                Err(err) => errors.extend(err.into_iter().map(|e| {
                    ProcessingError::new(
                        ErrorKind::Syntax,
                        Element::field(&name, ident.to_string(), Location::from_span(file, e.span())),
                        e.to_string(),
                    )
                })),
            }
        }

        if errors.is_empty() {
            Ok(Self {
                ident: item.ident.clone(),
                attrs,
                fields,
                location,
            })
        } else {
            Err(errors)
        }
    }

    /// The struct name.
    #[must_use]
    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    /// The SQL table name: `#[table(name)]` or the struct name verbatim.
    #[must_use]
    pub fn table_name(&self) -> String {
        self.attrs.table.clone().unwrap_or_else(|| self.name())
    }

    /// The element errors about the struct itself are reported against.
    #[must_use]
    pub fn element(&self) -> Element {
        Element::model(self.name(), self.location.clone())
    }
}

impl FieldDecl {
    /// The element errors about this field are reported against.
    #[must_use]
    pub fn element(&self, model: &str) -> Element {
        Element::field(model, self.ident.to_string(), self.location.clone())
    }
}

/// Whether the attributes contain `#[derive(..., Model, ...)]`, matched on
/// the last path segment so `strata::Model` counts too.
#[must_use]
pub fn derives_model(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|a| a.path().is_ident("derive"))
        .filter_map(|a| {
            a.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
                .ok()
        })
        .any(|paths| {
            paths
                .iter()
                .any(|p| p.segments.last().is_some_and(|s| s.ident == "Model"))
        })
}

/// Span used when a declaration has no better anchor.
pub(crate) fn type_location(file: &Path, ty: &Type) -> Location {
    Location::from_span(file, ty.span())
}
