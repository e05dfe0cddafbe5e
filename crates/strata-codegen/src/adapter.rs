//! Type adapter registrations.

use std::path::Path;

use indexmap::IndexMap;
use strata_core::StorageType;
use syn::{ImplItem, ItemImpl, Type, parse_quote};

use crate::decl::type_location;
use crate::error::{Element, ErrorKind, ProcessingError};
use crate::types::{HostType, type_key};

/// A conversion between a host type and its stored form, as declared by an
/// `impl TypeAdapter for X` block.
#[derive(Debug, Clone)]
pub struct AdapterDef {
    /// The type implementing `TypeAdapter`.
    pub adapter: Type,
    /// `type Host = ...`
    pub host: Type,
    /// `type Serialized = ...`
    pub serialized: Type,
    /// Storage of the serialized type.
    pub storage: StorageType,
}

impl AdapterDef {
    /// Reads an adapter from an impl block. Returns `None` when the block
    /// does not implement a trait named `TypeAdapter`.
    pub fn from_impl(item: &ItemImpl, file: &Path) -> Option<Result<Self, ProcessingError>> {
        let (_, trait_path, _) = item.trait_.as_ref()?;
        if !trait_path
            .segments
            .last()
            .is_some_and(|s| s.ident == "TypeAdapter")
        {
            return None;
        }

        let adapter = (*item.self_ty).clone();
        let element = || {
            Element::model(
                type_key(&adapter),
                type_location(file, &item.self_ty),
            )
        };

        let assoc = |name: &str| {
            item.items.iter().find_map(|i| match i {
                ImplItem::Type(t) if t.ident == name => Some(t.ty.clone()),
                _ => None,
            })
        };

        let (Some(host), Some(serialized)) = (assoc("Host"), assoc("Serialized")) else {
            return Some(Err(ProcessingError::new(
                ErrorKind::SchemaShape,
                element(),
                "type adapter must declare `type Host` and `type Serialized`",
            )));
        };

        Some(Self::new(adapter.clone(), host, serialized).ok_or_else(|| {
            ProcessingError::new(
                ErrorKind::SchemaShape,
                element(),
                "serialized type must be a bool, integer, float, String or Vec<u8>",
            )
        }))
    }

    /// Creates an adapter; `None` if `serialized` has no storage mapping.
    #[must_use]
    pub fn new(adapter: Type, host: Type, serialized: Type) -> Option<Self> {
        let storage = match HostType::classify(&serialized) {
            HostType::Option(_) | HostType::SingleAssociation(_) => None,
            other => other.default_storage(),
        }?;
        Some(Self {
            adapter,
            host,
            serialized,
            storage,
        })
    }
}

/// Adapters keyed by host type.
#[derive(Debug, Clone)]
pub struct AdapterTable {
    by_host: IndexMap<String, AdapterDef>,
}

impl Default for AdapterTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl AdapterTable {
    /// An empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_host: IndexMap::new(),
        }
    }

    /// A table holding the `strata_core::adapters` built-ins.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut table = Self::empty();
        let builtins: [(Type, Type, Type); 4] = [
            (
                parse_quote!(::strata_core::adapters::DateTimeAdapter),
                parse_quote!(DateTime<Utc>),
                parse_quote!(i64),
            ),
            (
                parse_quote!(::strata_core::adapters::NaiveDateTimeAdapter),
                parse_quote!(NaiveDateTime),
                parse_quote!(i64),
            ),
            (
                parse_quote!(::strata_core::adapters::NaiveDateAdapter),
                parse_quote!(NaiveDate),
                parse_quote!(String),
            ),
            (
                parse_quote!(::strata_core::adapters::StringListAdapter),
                parse_quote!(Vec<String>),
                parse_quote!(String),
            ),
        ];
        for (adapter, host, serialized) in builtins {
            if let Some(def) = AdapterDef::new(adapter, host, serialized) {
                table.register(def);
            }
        }
        table
    }

    /// Registers `def`, replacing and returning any adapter for the same
    /// host type.
    pub fn register(&mut self, def: AdapterDef) -> Option<AdapterDef> {
        self.by_host.insert(type_key(&def.host), def)
    }

    /// The adapter for a host type.
    #[must_use]
    pub fn lookup(&self, host: &Type) -> Option<&AdapterDef> {
        self.by_host.get(&type_key(host))
    }

    /// Number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_host.len()
    }

    /// Returns true if no adapter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_host.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let table = AdapterTable::with_builtins();
        assert_eq!(table.len(), 4);
        let def = table.lookup(&parse_quote!(chrono::DateTime<chrono::Utc>)).unwrap();
        assert_eq!(def.storage, StorageType::Integer);
        let list = table.lookup(&parse_quote!(Vec<String>)).unwrap();
        assert_eq!(list.storage, StorageType::Text);
        assert!(table.lookup(&parse_quote!(Uuid)).is_none());
    }

    #[test]
    fn test_from_impl() {
        let item: ItemImpl = parse_quote! {
            impl TypeAdapter for UuidAdapter {
                type Host = Uuid;
                type Serialized = Vec<u8>;
                fn serialize(value: &Uuid) -> Vec<u8> { value.as_bytes().to_vec() }
                fn deserialize(value: Vec<u8>) -> Result<Uuid> { todo!() }
            }
        };
        let def = AdapterDef::from_impl(&item, Path::new("a.rs"))
            .unwrap()
            .unwrap();
        assert_eq!(def.storage, StorageType::Blob);
        assert_eq!(type_key(&def.host), "Uuid");
    }

    #[test]
    fn test_user_adapter_overrides_builtin() {
        let mut table = AdapterTable::with_builtins();
        let def = AdapterDef::new(
            parse_quote!(IsoDateTime),
            parse_quote!(DateTime<Utc>),
            parse_quote!(String),
        )
        .unwrap();
        assert!(table.register(def).is_some());
        let found = table.lookup(&parse_quote!(DateTime<Utc>)).unwrap();
        assert_eq!(found.storage, StorageType::Text);
    }

    #[test]
    fn test_other_impls_ignored() {
        let item: ItemImpl = parse_quote! { impl Display for Todo {} };
        assert!(AdapterDef::from_impl(&item, Path::new("a.rs")).is_none());
    }

    #[test]
    fn test_unmappable_serialized_type() {
        let item: ItemImpl = parse_quote! {
            impl TypeAdapter for Weird {
                type Host = Foo;
                type Serialized = Option<i64>;
            }
        };
        let err = AdapterDef::from_impl(&item, Path::new("a.rs"))
            .unwrap()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SchemaShape);
    }
}
