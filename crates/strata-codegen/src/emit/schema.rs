//! `<Model>Schema`: column constants, entry points, `impl Schema`.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use strata_core::dialect::{qualified_identifier, quote_identifier};
use strata_core::{Collate, OnConflict, StorageType};

use super::exprs::{model_value, read_value};
use crate::column::{AssociationKind, ColumnDef};
use crate::plan::ModelPlan;
use crate::schema::SchemaDef;

fn storage_tokens(storage: StorageType) -> TokenStream {
    match storage {
        StorageType::Integer => quote! { ::strata_core::StorageType::Integer },
        StorageType::Real => quote! { ::strata_core::StorageType::Real },
        StorageType::Text => quote! { ::strata_core::StorageType::Text },
        StorageType::Blob => quote! { ::strata_core::StorageType::Blob },
    }
}

fn on_conflict_tokens(on_conflict: OnConflict) -> TokenStream {
    match on_conflict {
        OnConflict::None => quote! { ::strata_core::OnConflict::None },
        OnConflict::Rollback => quote! { ::strata_core::OnConflict::Rollback },
        OnConflict::Abort => quote! { ::strata_core::OnConflict::Abort },
        OnConflict::Fail => quote! { ::strata_core::OnConflict::Fail },
        OnConflict::Ignore => quote! { ::strata_core::OnConflict::Ignore },
        OnConflict::Replace => quote! { ::strata_core::OnConflict::Replace },
    }
}

fn collate_tokens(collate: Collate) -> TokenStream {
    match collate {
        Collate::Binary => quote! { ::strata_core::Collate::Binary },
        Collate::NoCase => quote! { ::strata_core::Collate::NoCase },
        Collate::RTrim => quote! { ::strata_core::Collate::RTrim },
    }
}

fn column_const(schema: &SchemaDef, column: &ColumnDef) -> TokenStream {
    let ident = column.const_ident();
    let table = &schema.table;
    let name = &column.name;
    let storage = storage_tokens(column.storage);
    let nullable = column.nullable_in_sql;
    let primary_key = column.primary_key;
    let primary_key_on_conflict = on_conflict_tokens(column.primary_key_on_conflict);
    let autoincrement = column.autoincrement;
    let auto_id = column.auto_id;
    let indexed = column.indexed;
    let unique = column.unique;
    let unique_on_conflict = on_conflict_tokens(column.unique_on_conflict);
    let default_expr = match &column.default_expr {
        Some(expr) => quote! { ::core::option::Option::Some(#expr) },
        None => quote! { ::core::option::Option::None },
    };
    let collate = collate_tokens(column.collate);
    let references = match column.association.as_ref().and_then(|a| a.foreign_key.as_ref()) {
        Some(fk) => {
            let (fk_table, fk_column) = (&fk.table, &fk.column);
            quote! {
                ::core::option::Option::Some(::strata_core::ForeignKey {
                    table: #fk_table,
                    column: #fk_column,
                })
            }
        }
        None => quote! { ::core::option::Option::None },
    };
    let qualified = column.qualified;
    let doc = format!("The `{name}` column.");

    quote! {
        #[doc = #doc]
        pub const #ident: ::strata_core::ColumnDef = ::strata_core::ColumnDef {
            table: #table,
            name: #name,
            storage: #storage,
            nullable: #nullable,
            primary_key: #primary_key,
            primary_key_on_conflict: #primary_key_on_conflict,
            autoincrement: #autoincrement,
            auto_id: #auto_id,
            indexed: #indexed,
            unique: #unique,
            unique_on_conflict: #unique_on_conflict,
            default_expr: #default_expr,
            collate: #collate,
            references: #references,
            qualified: #qualified,
        };
    }
}

/// `LEFT OUTER JOIN` text for one direct association column.
fn join_clause(schema: &SchemaDef, column: &ColumnDef) -> Option<String> {
    let fk = column.association.as_ref()?.foreign_key.as_ref()?;
    Some(format!(
        "LEFT OUTER JOIN {} ON {} = {}",
        quote_identifier(&fk.table),
        qualified_identifier(&schema.table, &column.name),
        qualified_identifier(&fk.table, &fk.column),
    ))
}

fn join_items(schema: &SchemaDef) -> TokenStream {
    let direct: Vec<&ColumnDef> = schema
        .columns
        .iter()
        .filter(|c| c.association_kind() == Some(AssociationKind::Direct))
        .collect();
    if direct.is_empty() {
        return TokenStream::new();
    }

    let mut joins = Vec::new();
    let mut nested_columns = Vec::new();
    let mut nested_widths = Vec::new();
    for column in direct {
        let Some(association) = &column.association else {
            continue;
        };
        let target = association.target_schema();
        if let Some(clause) = join_clause(schema, column) {
            joins.push(quote! { ::std::vec![::std::string::String::from(#clause)] });
        }
        joins.push(quote! { <#target as ::strata_core::Schema>::joins() });
        nested_columns.push(quote! { <#target as ::strata_core::Schema>::joined_select_columns() });
        nested_widths.push(quote! { <#target as ::strata_core::Schema>::select_width() });
    }

    quote! {
        const HAS_DIRECT_ASSOCIATIONS: bool = true;

        fn joins() -> ::std::vec::Vec<::std::string::String> {
            [#(#joins),*].concat()
        }

        fn joined_select_columns() -> ::std::vec::Vec<::std::string::String> {
            let own: ::std::vec::Vec<::std::string::String> = <Self as ::strata_core::Schema>::COLUMNS
                .iter()
                .map(|c| c.escaped_name_with(true))
                .collect();
            [own, #(#nested_columns),*].concat()
        }

        fn select_width() -> usize {
            <Self as ::strata_core::Schema>::COLUMNS.len() #(+ #nested_widths)*
        }
    }
}

fn read_row_body(schema: &SchemaDef) -> TokenStream {
    let model = &schema.ident;
    let mut bindings = Vec::new();
    let mut uses_base = false;

    for (i, column) in schema.columns.iter().enumerate() {
        let Some(field) = &column.field else { continue };
        let index = if i == 0 {
            quote! { base }
        } else {
            let offset = Literal::usize_unsuffixed(i);
            quote! { base + #offset }
        };
        let direct = column.association_kind() == Some(AssociationKind::Direct);
        if !direct || column.host.is_option() {
            uses_base = true;
        }
        let local = quote::format_ident!("__{}", syn::ext::IdentExt::unraw(field));
        let value = read_value(column, &index);
        bindings.push((column, field, local, value));
    }

    let base = if uses_base {
        quote! { let base = *cursor; }
    } else {
        TokenStream::new()
    };
    let lets = bindings
        .iter()
        .map(|(_, _, local, value)| quote! { let #local = #value; });

    let transient = &schema.transient;
    let construct = if schema.uses_setters {
        let plain: Vec<TokenStream> = bindings
            .iter()
            .filter(|(c, ..)| c.setter.is_none())
            .map(|(_, field, local, _)| quote! { #field: #local })
            .collect();
        let setters = bindings.iter().filter_map(|(c, _, local, _)| {
            c.setter.as_ref().map(|setter| quote! { model.#setter(#local); })
        });
        let init = if plain.is_empty() {
            quote! { <#model as ::core::default::Default>::default() }
        } else {
            quote! { #model { #(#plain,)* ..::core::default::Default::default() } }
        };
        quote! {
            let mut model = #init;
            #(#setters)*
            Ok(model)
        }
    } else {
        let fields = bindings
            .iter()
            .map(|(_, field, local, _)| quote! { #field: #local });
        quote! {
            Ok(#model {
                #(#fields,)*
                #(#transient: ::core::default::Default::default(),)*
            })
        }
    };

    quote! {
        #base
        *cursor += <Self as ::strata_core::Schema>::COLUMNS.len();
        #(#lets)*
        #construct
    }
}

/// Renders `<Model>Schema` and `impl Model for <Model>`.
pub(crate) fn emit_schema(schema: &SchemaDef, plan: &ModelPlan) -> TokenStream {
    let ModelPlan {
        model,
        schema: schema_ident,
        relation,
        selector,
        updater,
        deleter,
        ..
    } = plan;
    let table = &schema.table;
    let consts = schema.columns.iter().map(|c| column_const(schema, c));
    let const_idents: Vec<_> = schema.columns.iter().map(ColumnDef::const_ident).collect();
    let pk_ident = schema.primary_key_column().const_ident();

    let model_ident = quote! { model };
    let insert_values: Vec<TokenStream> = schema
        .columns
        .iter()
        .filter(|c| !c.auto_id)
        .map(|c| model_value(c, &model_ident))
        .collect();
    let to_values_param = if insert_values.is_empty() {
        quote! { _model }
    } else {
        quote! { model }
    };

    let pk = schema.primary_key_column();
    let (pk_param, pk_value) = if pk.is_synthesized() {
        (quote! { _model }, quote! { ::strata_core::SqlValue::Null })
    } else {
        (quote! { model }, model_value(pk, &model_ident))
    };

    let joins = join_items(schema);
    let read_row = read_row_body(schema);
    let doc = format!("Schema of [`{model}`], table `{table}`.");
    let allow = super::allow_lints();

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, Default)]
        #allow
        pub struct #schema_ident;

        #allow
        impl #schema_ident {
            #(#consts)*

            /// Starts a query over every row.
            #[must_use]
            pub fn relation() -> #relation {
                #relation::new()
            }

            /// Starts a `SELECT` over every row.
            #[must_use]
            pub fn selector() -> #selector {
                #relation::new().selector()
            }

            /// Starts an `UPDATE` over every row.
            #[must_use]
            pub fn updater() -> #updater {
                #relation::new().updater()
            }

            /// Starts a `DELETE` over every row.
            #[must_use]
            pub fn deleter() -> #deleter {
                #relation::new().deleter()
            }

            /// Builds `INSERT` statements.
            #[must_use]
            pub fn inserter() -> ::strata_core::Inserter<Self> {
                ::strata_core::Inserter::new()
            }

            /// `CREATE TABLE` followed by one `CREATE INDEX` per indexed column.
            #[must_use]
            pub fn create_statements() -> ::std::vec::Vec<::std::string::String> {
                let mut statements = ::std::vec![::strata_core::ddl::create_table_statement::<Self>()];
                statements.extend(::strata_core::ddl::create_index_statements::<Self>());
                statements
            }
        }

        #allow
        impl ::strata_core::Schema for #schema_ident {
            type Model = #model;

            const TABLE: &'static str = #table;
            const COLUMNS: &'static [::strata_core::ColumnDef] = &[#(Self::#const_idents),*];
            const PRIMARY_KEY: ::strata_core::ColumnDef = Self::#pk_ident;

            #joins

            fn to_values(#to_values_param: &#model) -> ::std::vec::Vec<::strata_core::SqlValue> {
                ::std::vec![#(#insert_values),*]
            }

            fn primary_key_value(#pk_param: &#model) -> ::strata_core::SqlValue {
                #pk_value
            }

            fn read_row(
                row: &::strata_core::Row,
                cursor: &mut usize,
            ) -> ::strata_core::Result<#model> {
                #read_row
            }
        }

        #allow
        impl ::strata_core::Model for #model {
            type Schema = #schema_ident;
        }
    }
}
