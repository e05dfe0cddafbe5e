//! Error types for decoding rows and running type adapters.

use thiserror::Error;

/// Errors raised while converting between host values and stored values.
#[derive(Debug, Error)]
pub enum Error {
    /// A stored value has a different storage class than the host type expects.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Storage class the host type can be decoded from.
        expected: &'static str,
        /// Storage class actually found.
        found: &'static str,
    },

    /// NULL was read for a host type that cannot represent it.
    #[error("unexpected NULL for non-nullable value")]
    UnexpectedNull,

    /// An integer does not fit the host integer type.
    #[error("integer {value} out of range for {target}")]
    OutOfRange {
        /// The stored integer.
        value: i64,
        /// The host type name.
        target: &'static str,
    },

    /// A row is shorter than the schema's select column list.
    #[error("row has no column at index {0}")]
    MissingColumn(usize),

    /// A type adapter rejected a stored value.
    #[error("type adapter failed: {0}")]
    Adapter(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for runtime conversions.
pub type Result<T> = std::result::Result<T, Error>;
