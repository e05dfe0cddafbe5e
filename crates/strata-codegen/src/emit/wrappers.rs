//! `<Model>Relation`, `<Model>Selector`, `<Model>Updater` and
//! `<Model>Deleter`: newtypes over the `strata_core` builders carrying the
//! per-column methods.

use proc_macro2::TokenStream;
use quote::quote;
use strata_core::{CompareOp, Direction};
use syn::Ident;

use super::exprs::{
    bind_operand, bind_setter, list_item_type, list_transform, operand_type, setter_type,
};
use crate::plan::{ConditionMethod, ModelPlan, Operand, Operator, OrderingMethod, SetterMethod};

fn compare_op_tokens(op: CompareOp) -> TokenStream {
    match op {
        CompareOp::Eq => quote! { ::strata_core::CompareOp::Eq },
        CompareOp::NotEq => quote! { ::strata_core::CompareOp::NotEq },
        CompareOp::Lt => quote! { ::strata_core::CompareOp::Lt },
        CompareOp::Le => quote! { ::strata_core::CompareOp::Le },
        CompareOp::Gt => quote! { ::strata_core::CompareOp::Gt },
        CompareOp::Ge => quote! { ::strata_core::CompareOp::Ge },
    }
}

fn condition_method(schema: &Ident, method: &ConditionMethod) -> TokenStream {
    let ConditionMethod {
        name,
        column,
        operator,
        operand,
    } = method;
    let column = quote! { &#schema::#column };

    let (generics, params, condition) = match operator {
        Operator::In | Operator::NotIn => {
            let negate = *operator == Operator::NotIn;
            let item = list_item_type(operand);
            let transform = list_transform(operand);
            let generics = match operand {
                Operand::Model { .. } => quote! { <'a> },
                _ => TokenStream::new(),
            };
            (
                generics,
                quote! { , values: impl ::core::iter::IntoIterator<Item = #item> },
                quote! { ::strata_core::fragment::in_list(#column, #negate, values, #transform) },
            )
        }
        Operator::IsNull | Operator::IsNotNull => {
            let negate = *operator == Operator::IsNotNull;
            (
                TokenStream::new(),
                TokenStream::new(),
                quote! { ::strata_core::fragment::is_null(#column, #negate) },
            )
        }
        _ => {
            let ty = operand_type(operand);
            let bind = bind_operand(operand, &quote! { value });
            let op = operator
                .compare_op()
                .map(compare_op_tokens)
                .unwrap_or_default();
            (
                TokenStream::new(),
                quote! { , value: #ty },
                quote! { ::strata_core::fragment::compare(#column, #op, #bind) },
            )
        }
    };

    quote! {
        #[must_use]
        pub fn #name #generics (self #params) -> Self {
            ::strata_core::QueryBuilder::where_condition(self, #condition)
        }
    }
}

fn ordering_method(schema: &Ident, method: &OrderingMethod) -> TokenStream {
    let OrderingMethod {
        name,
        column,
        direction,
    } = method;
    let term = match direction {
        Direction::Asc => quote! { #schema::#column.order_asc() },
        Direction::Desc => quote! { #schema::#column.order_desc() },
    };
    quote! {
        #[must_use]
        pub fn #name(self) -> Self {
            ::strata_core::QueryBuilder::order_by(self, #term)
        }
    }
}

fn setter_method(schema: &Ident, method: &SetterMethod) -> TokenStream {
    let SetterMethod {
        name,
        column,
        input,
    } = method;
    let ty = setter_type(input);
    let bind = bind_setter(input, &quote! { value });
    quote! {
        #[must_use]
        pub fn #name(self, value: #ty) -> Self {
            Self(self.0.put(&#schema::#column, #bind))
        }
    }
}

fn query_builder_impl(ty: &Ident, schema: &Ident, direct: bool) -> TokenStream {
    let (get, get_mut) = if direct {
        (quote! { &self.0 }, quote! { &mut self.0 })
    } else {
        (
            quote! { ::strata_core::QueryBuilder::relation(&self.0) },
            quote! { ::strata_core::QueryBuilder::relation_mut(&mut self.0) },
        )
    };
    let allow = super::allow_lints();
    quote! {
        #allow
        impl ::strata_core::QueryBuilder for #ty {
            type Schema = #schema;

            fn relation(&self) -> &::strata_core::Relation<#schema> {
                #get
            }

            fn relation_mut(&mut self) -> &mut ::strata_core::Relation<#schema> {
                #get_mut
            }
        }
    }
}

/// Renders the four query types of one model.
pub(crate) fn emit_wrappers(plan: &ModelPlan) -> TokenStream {
    let ModelPlan {
        model,
        schema,
        relation,
        selector,
        updater,
        deleter,
        ..
    } = plan;

    let conditions: Vec<TokenStream> = plan
        .conditions
        .iter()
        .map(|m| condition_method(schema, m))
        .collect();
    let orderings: Vec<TokenStream> = plan
        .orderings
        .iter()
        .map(|m| ordering_method(schema, m))
        .collect();
    let setters = plan.setters.iter().map(|m| setter_method(schema, m));

    let relation_doc = format!("Conditions, ordering and paging over [`{model}`] rows.");
    let selector_doc = format!("`SELECT` over [`{model}`] rows.");
    let updater_doc = format!("`UPDATE` of [`{model}`] rows.");
    let deleter_doc = format!("`DELETE` of [`{model}`] rows.");

    let relation_impl = query_builder_impl(relation, schema, true);
    let selector_impl = query_builder_impl(selector, schema, false);
    let updater_impl = query_builder_impl(updater, schema, false);
    let deleter_impl = query_builder_impl(deleter, schema, false);
    let allow = super::allow_lints();

    quote! {
        #[doc = #relation_doc]
        #[derive(Debug, Clone, Default)]
        #allow
        pub struct #relation(::strata_core::Relation<#schema>);

        #allow
        impl #relation {
            /// A relation matching every row.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Selects the matching rows.
            #[must_use]
            pub fn selector(&self) -> #selector {
                #selector(self.0.selector())
            }

            /// Updates the matching rows.
            #[must_use]
            pub fn updater(&self) -> #updater {
                #updater(self.0.updater())
            }

            /// Deletes the matching rows.
            #[must_use]
            pub fn deleter(&self) -> #deleter {
                #deleter(self.0.deleter())
            }

            #(#conditions)*
            #(#orderings)*
        }

        #relation_impl

        #[doc = #selector_doc]
        #[derive(Debug, Clone, Default)]
        #allow
        pub struct #selector(::strata_core::Selector<#schema>);

        #allow
        impl #selector {
            /// A selector over every row.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Returns the `SELECT` statement and its bind values.
            #[must_use]
            pub fn build(&self) -> (::std::string::String, ::std::vec::Vec<::strata_core::SqlValue>) {
                self.0.build()
            }

            /// Returns a `SELECT COUNT(*)` over the same conditions.
            #[must_use]
            pub fn count(&self) -> (::std::string::String, ::std::vec::Vec<::strata_core::SqlValue>) {
                self.0.count()
            }

            #(#conditions)*
            #(#orderings)*
        }

        #selector_impl

        #[doc = #updater_doc]
        #[derive(Debug, Clone, Default)]
        #allow
        pub struct #updater(::strata_core::Updater<#schema>);

        #allow
        impl #updater {
            /// An updater over every row.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Returns the `UPDATE` statement and its bind values, or `None`
            /// if no column was set.
            #[must_use]
            pub fn build(&self) -> ::core::option::Option<(::std::string::String, ::std::vec::Vec<::strata_core::SqlValue>)> {
                self.0.build()
            }

            #(#setters)*
            #(#conditions)*
        }

        #updater_impl

        #[doc = #deleter_doc]
        #[derive(Debug, Clone, Default)]
        #allow
        pub struct #deleter(::strata_core::Deleter<#schema>);

        #allow
        impl #deleter {
            /// A deleter over every row.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Returns the `DELETE` statement and its bind values.
            #[must_use]
            pub fn build(&self) -> (::std::string::String, ::std::vec::Vec<::strata_core::SqlValue>) {
                self.0.build()
            }

            #(#conditions)*
        }

        #deleter_impl
    }
}
