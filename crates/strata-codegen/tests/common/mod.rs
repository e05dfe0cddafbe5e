#![allow(dead_code)]

use std::path::Path;

use strata_codegen::{BuildContext, Errors, Registry};
use syn::{ImplItem, Item, ItemImpl, Type};

pub const FILE: &str = "src/models.rs";

pub fn context(source: &str) -> BuildContext {
    let mut ctx = BuildContext::new();
    ctx.add_source(Path::new(FILE), source);
    ctx
}

pub fn build(source: &str) -> (Registry, Errors) {
    context(source).build()
}

pub fn registry(source: &str) -> Registry {
    let (registry, errors) = build(source);
    assert!(errors.is_empty(), "unexpected errors:\n{errors}");
    registry
}

pub fn build_errors(source: &str) -> Errors {
    let (_, errors) = build(source);
    assert!(!errors.is_empty(), "expected errors for:\n{source}");
    errors
}

/// Runs both phases and parses the output back into items.
pub fn generate(source: &str) -> syn::File {
    let tokens = strata_codegen::run(context(source))
        .unwrap_or_else(|errors| panic!("generation failed:\n{errors}"));
    syn::parse2(tokens).unwrap_or_else(|e| panic!("generated code does not parse: {e}"))
}

fn self_ty_is(item: &ItemImpl, name: &str) -> bool {
    match &*item.self_ty {
        Type::Path(path) => path.path.is_ident(name),
        _ => false,
    }
}

/// Inherent impl blocks of `ty`.
pub fn inherent_impls<'a>(file: &'a syn::File, ty: &str) -> Vec<&'a ItemImpl> {
    file.items
        .iter()
        .filter_map(|item| match item {
            Item::Impl(item) if item.trait_.is_none() && self_ty_is(item, ty) => Some(item),
            _ => None,
        })
        .collect()
}

/// Names of the inherent methods of `ty`.
pub fn methods(file: &syn::File, ty: &str) -> Vec<String> {
    inherent_impls(file, ty)
        .into_iter()
        .flat_map(|item| item.items.iter())
        .filter_map(|item| match item {
            ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
            _ => None,
        })
        .collect()
}

/// The tokens of inherent method `method` of `ty`.
pub fn method_tokens(file: &syn::File, ty: &str, method: &str) -> String {
    inherent_impls(file, ty)
        .into_iter()
        .flat_map(|item| item.items.iter())
        .find_map(|item| match item {
            ImplItem::Fn(f) if f.sig.ident == method => {
                Some(quote::ToTokens::to_token_stream(f).to_string())
            }
            _ => None,
        })
        .unwrap_or_else(|| panic!("`{ty}::{method}` was not generated"))
}

/// Whether `Trait` is implemented for `ty`.
pub fn implements(file: &syn::File, trait_name: &str, ty: &str) -> bool {
    file.items.iter().any(|item| match item {
        Item::Impl(item) => {
            self_ty_is(item, ty)
                && item.trait_.as_ref().is_some_and(|(_, path, _)| {
                    path.segments.last().is_some_and(|s| s.ident == trait_name)
                })
        }
        _ => false,
    })
}

pub const TODO: &str = r#"
    use chrono::{DateTime, Utc};
    use strata_core::SingleAssociation;

    #[derive(Debug, Clone, Model)]
    pub struct Author {
        #[primary_key]
        pub id: i64,
        pub name: String,
    }

    #[derive(Debug, Clone, Model)]
    pub struct Todo {
        #[primary_key]
        pub id: i64,
        #[column(indexed)]
        pub title: String,
        pub done: bool,
        pub created_time: DateTime<Utc>,
        pub owner: SingleAssociation<Author>,
        #[nullable]
        pub memo: Option<String>,
        #[transient]
        pub selected: bool,
    }
"#;
