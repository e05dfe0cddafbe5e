//! The build context: what the scanner found, and the two build phases.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::adapter::{AdapterDef, AdapterTable};
use crate::column::Resolver;
use crate::decl::{ModelDecl, derives_model};
use crate::error::{Element, ErrorKind, Errors, Location, ProcessingError};
use crate::registry::Registry;
use crate::schema::SchemaDef;
use crate::types::type_key;

/// Declarations collected from source before any schema is built.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    models: IndexMap<String, ModelDecl>,
    adapters: AdapterTable,
    user_adapters: HashSet<String>,
    errors: Vec<ProcessingError>,
}

impl BuildContext {
    /// Creates a context holding only the built-in adapters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `source` and collects its models and adapters. Parse errors
    /// are recorded, not returned.
    pub fn add_source(&mut self, path: &Path, source: &str) {
        match syn::parse_file(source) {
            Ok(file) => self.add_file(path, &file),
            Err(err) => {
                let element = Element::model(
                    path.display().to_string(),
                    Location::from_span(path, err.span()),
                );
                self.errors.push(ProcessingError::new(
                    ErrorKind::Syntax,
                    element,
                    err.to_string(),
                ));
            }
        }
    }

    /// Collects `#[derive(Model)]` structs and `impl TypeAdapter` blocks
    /// among the top-level items of `file`.
    pub fn add_file(&mut self, path: &Path, file: &syn::File) {
        for item in &file.items {
            match item {
                syn::Item::Struct(item) if derives_model(&item.attrs) => {
                    match ModelDecl::from_item(item, path) {
                        Ok(decl) => self.add_model(decl),
                        Err(errors) => self.errors.extend(errors),
                    }
                }
                syn::Item::Impl(item) => match AdapterDef::from_impl(item, path) {
                    Some(Ok(def)) => self.add_adapter(def, path),
                    Some(Err(err)) => self.errors.push(err),
                    None => {}
                },
                syn::Item::Mod(module) if module.content.is_some() => {
                    warn!(
                        module = %module.ident,
                        file = %path.display(),
                        "inline modules are not scanned"
                    );
                }
                _ => {}
            }
        }
    }

    /// Registers a model declaration. A second model with the same name is
    /// an error.
    pub fn add_model(&mut self, decl: ModelDecl) {
        let name = decl.name();
        if let Some(first) = self.models.get(&name) {
            self.errors.push(ProcessingError::new(
                ErrorKind::SchemaShape,
                decl.element(),
                format!("model `{name}` is already declared at {}", first.location),
            ));
            return;
        }
        debug!(model = %name, "found model");
        self.models.insert(name, decl);
    }

    /// Registers a type adapter. A user adapter replaces a built-in one for
    /// the same host type; two user adapters for one host type are an error.
    pub fn add_adapter(&mut self, def: AdapterDef, path: &Path) {
        let host = type_key(&def.host);
        if !self.user_adapters.insert(host.clone()) {
            self.errors.push(ProcessingError::new(
                ErrorKind::SchemaShape,
                Element::model(
                    type_key(&def.adapter),
                    crate::decl::type_location(path, &def.adapter),
                ),
                format!("duplicate type adapter for `{host}`"),
            ));
            return;
        }
        debug!(host = %host, adapter = %type_key(&def.adapter), "found type adapter");
        self.adapters.register(def);
    }

    /// Number of models collected so far.
    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Phase 1: builds every schema and links them. Models with errors are
    /// left out of the registry; every other model is still built.
    #[must_use]
    pub fn build(self) -> (Registry, Errors) {
        let mut errors = self.errors;
        let resolver = Resolver::new(&self.models, &self.adapters);

        let mut schemas = IndexMap::new();
        let mut failed = HashSet::new();
        for (name, decl) in &self.models {
            match SchemaDef::build(decl, &resolver) {
                Ok(schema) => {
                    schemas.insert(name.clone(), schema);
                }
                Err(model_errors) => {
                    warn!(model = %name, errors = model_errors.len(), "model has errors");
                    errors.extend(model_errors);
                    failed.insert(name.clone());
                }
            }
        }

        let registry = Registry::link(schemas, &failed, &mut errors);
        let mut all = Errors::new();
        all.extend(errors);
        (registry, all)
    }
}
