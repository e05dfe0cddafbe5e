//! # strata-codegen
//!
//! Turns annotated model structs into per-model query APIs over
//! [`strata_core`].
//!
//! Processing runs in two phases:
//! - Phase 1 scans sources, resolves every field into a column and every
//!   model into a schema, then links schemas across associations into a
//!   read-only [`Registry`]
//! - Phase 2 plans and emits `<Model>Schema`, `<Model>Relation`,
//!   `<Model>Selector`, `<Model>Updater` and `<Model>Deleter` for each
//!   schema in the registry
//!
//! Errors never stop processing early. Each is attributed to a model or
//! field with its source location, and the whole set is reported at the
//! end.
//!
//! ```rust,ignore
//! use std::path::Path;
//! use strata_codegen::BuildContext;
//!
//! let mut ctx = BuildContext::new();
//! ctx.add_source(Path::new("src/models.rs"), &source);
//! let tokens = strata_codegen::run(ctx)?;
//! ```

pub mod adapter;
pub mod annotations;
pub mod column;
pub mod context;
pub mod decl;
pub mod emit;
pub mod error;
pub mod plan;
pub mod registry;
pub mod schema;
pub mod types;

pub use adapter::{AdapterDef, AdapterTable};
pub use column::{AssociationKind, ColumnDef, ROWID_COLUMN};
pub use context::BuildContext;
pub use decl::ModelDecl;
pub use error::{Element, ErrorKind, Errors, Location, ProcessingError};
pub use plan::{ModelPlan, Operator, plan_model};
pub use registry::Registry;
pub use schema::SchemaDef;

use proc_macro2::TokenStream;
use tracing::{debug, info};

/// Phase 2: generates the API of every schema in `registry`.
///
/// Models whose plan fails contribute errors and no tokens; the others are
/// still generated.
#[must_use]
pub fn generate(registry: &Registry) -> (TokenStream, Errors) {
    let mut tokens = TokenStream::new();
    let mut errors = Errors::new();

    for schema in registry.iter() {
        match plan_model(schema) {
            Ok(plan) => {
                debug!(
                    model = %plan.model,
                    conditions = plan.conditions.len(),
                    setters = plan.setters.len(),
                    "generating model"
                );
                tokens.extend(emit::emit_model(schema, &plan));
            }
            Err(model_errors) => errors.extend(model_errors),
        }
    }

    (tokens, errors)
}

/// Runs both phases over `ctx`.
///
/// # Errors
///
/// Returns every error of both phases if there was any.
pub fn run(ctx: BuildContext) -> Result<TokenStream, Errors> {
    let (registry, mut errors) = ctx.build();
    let (tokens, generation_errors) = generate(&registry);
    errors.extend(generation_errors);
    info!(
        models = registry.len(),
        errors = errors.len(),
        "code generation finished"
    );
    errors.into_result(tokens)
}
