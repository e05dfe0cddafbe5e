//! Rendering of model plans into Rust source.

mod exprs;
mod schema;
mod wrappers;

use proc_macro2::TokenStream;
use quote::quote;

use crate::plan::ModelPlan;
use crate::schema::SchemaDef;

/// Attribute placed on every generated item; the code lands in user crates
/// with their own lint levels.
fn allow_lints() -> TokenStream {
    quote! { #[allow(clippy::all, clippy::pedantic, clippy::nursery)] }
}

/// Everything generated for one model: its schema, `impl Model`, and the
/// four query types.
#[must_use]
pub fn emit_model(schema: &SchemaDef, plan: &ModelPlan) -> TokenStream {
    let schema_items = schema::emit_schema(schema, plan);
    let wrappers = wrappers::emit_wrappers(plan);
    quote! {
        #schema_items
        #wrappers
    }
}
