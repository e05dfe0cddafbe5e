//! Classification of declared field types.

use quote::ToTokens;
use strata_core::StorageType;
use syn::{GenericArgument, PathArguments, Type};

/// Integer host types with a lossless `INTEGER` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
}

/// Floating point host types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

/// What a declared field type is, as far as column modelling cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostType {
    /// `bool`, stored as 0/1.
    Bool,
    /// One of [`IntegerKind`].
    Integer(IntegerKind),
    /// One of [`FloatKind`].
    Float(FloatKind),
    /// `String`.
    Text,
    /// `Vec<u8>`.
    Blob,
    /// `Option<T>`.
    Option(Box<HostType>),
    /// `SingleAssociation<M>`; holds `M`'s type key.
    SingleAssociation(String),
    /// Anything else: a model, an adapted type, or nothing we know. Holds
    /// the type key.
    Named(String),
}

impl HostType {
    /// Classifies `ty`.
    #[must_use]
    pub fn classify(ty: &Type) -> Self {
        let Type::Path(type_path) = ty else {
            return Self::Named(type_key(ty));
        };
        if type_path.qself.is_some() {
            return Self::Named(type_key(ty));
        }
        let Some(last) = type_path.path.segments.last() else {
            return Self::Named(type_key(ty));
        };

        let ident = last.ident.to_string();
        match (ident.as_str(), single_generic(&last.arguments)) {
            ("bool", None) => Self::Bool,
            ("i8", None) => Self::Integer(IntegerKind::I8),
            ("i16", None) => Self::Integer(IntegerKind::I16),
            ("i32", None) => Self::Integer(IntegerKind::I32),
            ("i64", None) => Self::Integer(IntegerKind::I64),
            ("u8", None) => Self::Integer(IntegerKind::U8),
            ("u16", None) => Self::Integer(IntegerKind::U16),
            ("u32", None) => Self::Integer(IntegerKind::U32),
            ("f32", None) => Self::Float(FloatKind::F32),
            ("f64", None) => Self::Float(FloatKind::F64),
            ("String", None) => Self::Text,
            ("Option", Some(inner)) => Self::Option(Box::new(Self::classify(inner))),
            ("SingleAssociation", Some(inner)) => Self::SingleAssociation(type_key(inner)),
            ("Vec", Some(inner)) if type_key(inner) == "u8" => Self::Blob,
            _ => Self::Named(type_key(ty)),
        }
    }

    /// The type with one level of `Option` removed.
    #[must_use]
    pub fn unwrap_option(&self) -> &Self {
        match self {
            Self::Option(inner) => inner,
            other => other,
        }
    }

    /// Whether this is `Option<T>`.
    #[must_use]
    pub const fn is_option(&self) -> bool {
        matches!(self, Self::Option(_))
    }

    /// Whether this is a primitive scalar: bool, integer or float.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self, Self::Bool | Self::Integer(_) | Self::Float(_))
    }

    /// Whether this is an integer type. Booleans are not.
    #[must_use]
    pub const fn looks_like_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// Whether values are `Copy` and need no clone when read from a model.
    #[must_use]
    pub fn is_copy(&self) -> bool {
        match self {
            Self::Option(inner) => inner.is_copy(),
            Self::SingleAssociation(_) => true,
            other => other.is_primitive(),
        }
    }

    /// Default storage mapping. `None` for types that need an adapter or
    /// resolve through an association.
    #[must_use]
    pub fn default_storage(&self) -> Option<StorageType> {
        match self {
            Self::Bool | Self::Integer(_) | Self::SingleAssociation(_) => Some(StorageType::Integer),
            Self::Float(_) => Some(StorageType::Real),
            Self::Text => Some(StorageType::Text),
            Self::Blob => Some(StorageType::Blob),
            Self::Option(inner) => inner.default_storage(),
            Self::Named(_) => None,
        }
    }
}

fn single_generic(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first() {
        Some(GenericArgument::Type(ty)) => Some(ty),
        _ => None,
    }
}

/// Returns the type argument of `Option<T>`, or `ty` itself.
#[must_use]
pub fn option_inner(ty: &Type) -> &Type {
    generic_inner(ty, "Option").unwrap_or(ty)
}

/// Returns `T` when `ty` is `<wrapper><T>`.
#[must_use]
pub fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let last = type_path.path.segments.last()?;
    if last.ident != wrapper {
        return None;
    }
    single_generic(&last.arguments)
}

/// A lookup key for `ty` that ignores module paths: `chrono::DateTime<chrono::Utc>`
/// and `DateTime<Utc>` share the key `DateTime<Utc>`.
#[must_use]
pub fn type_key(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            match type_path.path.segments.last() {
                Some(last) => {
                    let mut key = last.ident.to_string();
                    if let PathArguments::AngleBracketed(args) = &last.arguments {
                        let inner: Vec<String> = args
                            .args
                            .iter()
                            .map(|arg| match arg {
                                GenericArgument::Type(t) => type_key(t),
                                other => compact(other),
                            })
                            .collect();
                        key.push('<');
                        key.push_str(&inner.join(","));
                        key.push('>');
                    }
                    key
                }
                None => compact(ty),
            }
        }
        Type::Group(group) => type_key(&group.elem),
        Type::Paren(paren) => type_key(&paren.elem),
        other => compact(other),
    }
}

fn compact(tokens: &impl ToTokens) -> String {
    tokens.to_token_stream().to_string().replace(' ', "")
}
