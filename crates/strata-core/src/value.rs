//! SQL values and parameter handling.
//!
//! Every operand that reaches a generated statement is bound as a
//! [`SqlValue`]; nothing is interpolated into SQL text.

use crate::error::{Error, Result};

/// A SQL value that can be bound to a `?` placeholder.
///
/// The variants mirror SQLite's storage classes. Booleans are stored as
/// `INTEGER` 0/1.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the storage class name of this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Int(_) => "INTEGER",
            Self::Float(_) => "REAL",
            Self::Text(_) => "TEXT",
            Self::Blob(_) => "BLOB",
        }
    }

    /// Returns true if this is `NULL`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        if self.is_null() {
            Error::UnexpectedNull
        } else {
            Error::TypeMismatch {
                expected,
                found: self.type_name(),
            }
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

/// Trait for types that can be decoded from SQL values.
pub trait FromSqlValue: Sized {
    /// Converts a stored value back to the host type.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage class does not match or the value
    /// is out of range for the host type.
    fn from_sql_value(value: SqlValue) -> Result<Self>;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        Ok(value)
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Int(n) => Ok(n != 0),
            other => Err(other.mismatch("INTEGER")),
        }
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Int(n) => Ok(n),
            other => Err(other.mismatch("INTEGER")),
        }
    }
}

macro_rules! impl_narrow_integer {
    ($($ty:ty),+) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }

            impl FromSqlValue for $ty {
                fn from_sql_value(value: SqlValue) -> Result<Self> {
                    let n = i64::from_sql_value(value)?;
                    <$ty>::try_from(n).map_err(|_| Error::OutOfRange {
                        value: n,
                        target: stringify!($ty),
                    })
                }
            }
        )+
    };
}

impl_narrow_integer!(i8, i16, i32, u8, u16, u32);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl FromSqlValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Float(f) => Ok(f),
            // REAL affinity may hand back integral values as INTEGER
            SqlValue::Int(n) => Ok(n as f64),
            other => Err(other.mismatch("REAL")),
        }
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl FromSqlValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        f64::from_sql_value(value).map(|f| f as f32)
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Text(s) => Ok(s),
            other => Err(other.mismatch("TEXT")),
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Blob(b) => Ok(b),
            other => Err(other.mismatch("BLOB")),
        }
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(true.to_sql_value(), SqlValue::Int(1));
        assert_eq!(false.to_sql_value(), SqlValue::Int(0));
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(2.5_f64.to_sql_value(), SqlValue::Float(2.5));
        assert_eq!(
            "hello".to_sql_value(),
            SqlValue::Text(String::from("hello"))
        );
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(42_i32).to_sql_value(), SqlValue::Int(42));
    }

    #[test]
    fn test_from_sql_value_bool() {
        assert!(bool::from_sql_value(SqlValue::Int(1)).unwrap());
        assert!(!bool::from_sql_value(SqlValue::Int(0)).unwrap());
    }

    #[test]
    fn test_from_sql_value_narrow_integer_out_of_range() {
        let err = u8::from_sql_value(SqlValue::Int(300)).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { value: 300, target: "u8" }));
    }

    #[test]
    fn test_from_sql_value_null_into_non_nullable() {
        let err = String::from_sql_value(SqlValue::Null).unwrap_err();
        assert!(matches!(err, Error::UnexpectedNull));
    }

    #[test]
    fn test_from_sql_value_type_mismatch() {
        let err = i64::from_sql_value(SqlValue::Text(String::from("x"))).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: "INTEGER",
                found: "TEXT"
            }
        ));
    }

    #[test]
    fn test_from_sql_value_option() {
        assert_eq!(Option::<i64>::from_sql_value(SqlValue::Null).unwrap(), None);
        assert_eq!(
            Option::<i64>::from_sql_value(SqlValue::Int(7)).unwrap(),
            Some(7)
        );
    }

    #[test]
    fn test_real_accepts_integer_storage() {
        assert!((f64::from_sql_value(SqlValue::Int(3)).unwrap() - 3.0).abs() < f64::EPSILON);
    }
}
