//! Value expressions: how a host value is bound, and how a stored value is
//! read back.

use proc_macro2::TokenStream;
use quote::quote;

use crate::column::{AssociationKind, ColumnDef};
use crate::plan::{Encoding, Operand, SetterInput};

fn to_sql(value: TokenStream) -> TokenStream {
    quote! { ::strata_core::ToSqlValue::to_sql_value(#value) }
}

fn serialize(adapter: &syn::Type) -> TokenStream {
    quote! { <#adapter as ::strata_core::TypeAdapter>::serialize }
}

fn deserialize(adapter: &syn::Type) -> TokenStream {
    quote! { <#adapter as ::strata_core::TypeAdapter>::deserialize }
}

fn primary_key_value(schema: &syn::Ident) -> TokenStream {
    quote! { <#schema as ::strata_core::Schema>::primary_key_value }
}

/// Parameter type of a single-operand condition.
pub(crate) fn operand_type(operand: &Operand) -> TokenStream {
    match operand {
        Operand::Value { ty, .. } | Operand::Reference { ty } => quote! { #ty },
        Operand::Model { ty, .. } => quote! { &#ty },
        Operand::Nothing => TokenStream::new(),
    }
}

/// Item type of an `IN` list operand.
pub(crate) fn list_item_type(operand: &Operand) -> TokenStream {
    match operand {
        Operand::Value { ty, .. } | Operand::Reference { ty } => quote! { #ty },
        Operand::Model { ty, .. } => quote! { &'a #ty },
        Operand::Nothing => TokenStream::new(),
    }
}

/// Bind value of the condition operand held in `value`.
pub(crate) fn bind_operand(operand: &Operand, value: &TokenStream) -> TokenStream {
    match operand {
        Operand::Value {
            encoding: Encoding::Adapter(adapter),
            ..
        } => {
            let serialize = serialize(adapter);
            to_sql(quote! { #serialize(&#value) })
        }
        Operand::Value {
            encoding: Encoding::Plain,
            ..
        }
        | Operand::Reference { .. } => to_sql(value.clone()),
        Operand::Model { schema, .. } => {
            let pk = primary_key_value(schema);
            quote! { #pk(#value) }
        }
        Operand::Nothing => quote! { ::strata_core::SqlValue::Null },
    }
}

/// Per-element transform of an `IN` list operand.
pub(crate) fn list_transform(operand: &Operand) -> TokenStream {
    match operand {
        Operand::Value {
            ty,
            encoding: Encoding::Adapter(adapter),
        } => {
            let serialize = serialize(adapter);
            let bind = to_sql(quote! { #serialize(&value) });
            quote! { |value: #ty| #bind }
        }
        Operand::Value {
            encoding: Encoding::Plain,
            ..
        }
        | Operand::Reference { .. }
        | Operand::Nothing => quote! { ::strata_core::ToSqlValue::to_sql_value },
        Operand::Model { schema, .. } => primary_key_value(schema),
    }
}

/// Parameter type of an updater setter.
pub(crate) fn setter_type(input: &SetterInput) -> TokenStream {
    match input {
        SetterInput::Value { ty, .. } => quote! { #ty },
        SetterInput::Model {
            ty,
            optional: false,
            ..
        } => quote! { &#ty },
        SetterInput::Model {
            ty, optional: true, ..
        } => quote! { ::core::option::Option<&#ty> },
        SetterInput::Reference { ty, optional: false } => quote! { #ty },
        SetterInput::Reference { ty, optional: true } => {
            quote! { ::core::option::Option<#ty> }
        }
    }
}

/// Bind value of the setter argument held in `value`.
pub(crate) fn bind_setter(input: &SetterInput, value: &TokenStream) -> TokenStream {
    match input {
        SetterInput::Value {
            encoding: Encoding::Adapter(adapter),
            optional,
            ..
        } => {
            let serialize = serialize(adapter);
            if *optional {
                to_sql(quote! { #value.as_ref().map(#serialize) })
            } else {
                to_sql(quote! { #serialize(&#value) })
            }
        }
        SetterInput::Value {
            encoding: Encoding::Plain,
            ..
        }
        | SetterInput::Reference { .. } => to_sql(value.clone()),
        SetterInput::Model {
            schema, optional, ..
        } => {
            let pk = primary_key_value(schema);
            if *optional {
                quote! { #value.map_or(::strata_core::SqlValue::Null, #pk) }
            } else {
                quote! { #pk(#value) }
            }
        }
    }
}

/// The field of `model` as a place expression, through its getter if the
/// column declares one.
fn access(column: &ColumnDef, model: &TokenStream) -> TokenStream {
    match (&column.getter, &column.field) {
        (Some(getter), _) => quote! { #model.#getter() },
        (None, Some(field)) => quote! { #model.#field },
        (None, None) => quote! { ::strata_core::SqlValue::Null },
    }
}

/// Bind value of `column` read out of `model` (a `&Model` expression).
pub(crate) fn model_value(column: &ColumnDef, model: &TokenStream) -> TokenStream {
    if column.is_synthesized() {
        return quote! { ::strata_core::SqlValue::Null };
    }
    let value = access(column, model);
    let optional = column.host.is_option();

    if let Some(association) = &column.association {
        if association.kind == AssociationKind::Single {
            return to_sql(value);
        }
        let pk = primary_key_value(&association.target_schema());
        return if optional {
            quote! { #value.as_ref().map_or(::strata_core::SqlValue::Null, #pk) }
        } else {
            quote! { #pk(&#value) }
        };
    }

    if let Some(adapter) = &column.adapter {
        let serialize = serialize(&adapter.adapter);
        return if optional {
            to_sql(quote! { #value.as_ref().map(#serialize) })
        } else {
            to_sql(quote! { #serialize(&#value) })
        };
    }

    if column.host.is_copy() {
        to_sql(value)
    } else {
        to_sql(quote! { #value.clone() })
    }
}

/// Expression reading `column` from `row` at `index`, advancing `cursor`
/// past joined models.
pub(crate) fn read_value(column: &ColumnDef, index: &TokenStream) -> TokenStream {
    let ty = &column.ty;
    let optional = column.host.is_option();

    if let Some(association) = &column.association {
        if association.kind == AssociationKind::Direct {
            let schema = association.target_schema();
            let read = quote! { <#schema as ::strata_core::Schema>::read_row(row, cursor)? };
            return if optional {
                quote! {
                    if matches!(row.value(#index), None | Some(::strata_core::SqlValue::Null)) {
                        *cursor += <#schema as ::strata_core::Schema>::select_width();
                        None
                    } else {
                        Some(#read)
                    }
                }
            } else {
                read
            };
        }
    }

    if let Some(adapter) = &column.adapter {
        let serialized = &adapter.serialized;
        let deserialize = deserialize(&adapter.adapter);
        return if optional {
            quote! {
                row.get::<::core::option::Option<#serialized>>(#index)?
                    .map(#deserialize)
                    .transpose()?
            }
        } else if column.null_as_default() {
            quote! {
                row.get::<::core::option::Option<#serialized>>(#index)?
                    .map(#deserialize)
                    .transpose()?
                    .unwrap_or_default()
            }
        } else {
            quote! { #deserialize(row.get::<#serialized>(#index)?)? }
        };
    }

    if column.null_as_default() {
        return quote! { row.get::<::core::option::Option<#ty>>(#index)?.unwrap_or_default() };
    }
    quote! { row.get::<#ty>(#index)? }
}
