//! SQLite storage affinity.

use std::fmt;
use std::str::FromStr;

/// The physical column type a value is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// `INTEGER`: integers, booleans (0/1), epoch-millisecond timestamps.
    Integer,
    /// `REAL`: floating point.
    Real,
    /// `TEXT`: strings.
    Text,
    /// `BLOB`: raw bytes.
    Blob,
}

impl StorageType {
    /// Returns the SQL type name.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Error returned when parsing an unknown storage type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStorageType(pub String);

impl fmt::Display for UnknownStorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown storage type `{}` (expected INTEGER, REAL, TEXT or BLOB)",
            self.0
        )
    }
}

impl std::error::Error for UnknownStorageType {}

impl FromStr for StorageType {
    type Err = UnknownStorageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INTEGER" | "INT" => Ok(Self::Integer),
            "REAL" => Ok(Self::Real),
            "TEXT" => Ok(Self::Text),
            "BLOB" => Ok(Self::Blob),
            _ => Err(UnknownStorageType(s.to_string())),
        }
    }
}
