//! Type adapters: conversions between a host type and its stored form.
//!
//! The generator routes every operand and every loaded value of an adapted
//! column through [`TypeAdapter::serialize`] / [`TypeAdapter::deserialize`].
//! User adapters are picked up from `impl TypeAdapter for X` blocks in the
//! scanned sources and take precedence over the built-ins below.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Error, Result};
use crate::value::{FromSqlValue, ToSqlValue};

/// A monomorphic conversion between `Host` and its storage type.
pub trait TypeAdapter {
    /// The model field type.
    type Host;

    /// The physical representation bound to statements.
    type Serialized: ToSqlValue + FromSqlValue;

    /// Converts a host value to its stored form.
    fn serialize(value: &Self::Host) -> Self::Serialized;

    /// Converts a stored value back to the host type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Adapter`] (or [`Error::Json`]) when the stored value
    /// is malformed.
    fn deserialize(value: Self::Serialized) -> Result<Self::Host>;
}

/// `DateTime<Utc>` stored as epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeAdapter;

impl TypeAdapter for DateTimeAdapter {
    type Host = DateTime<Utc>;
    type Serialized = i64;

    fn serialize(value: &DateTime<Utc>) -> i64 {
        value.timestamp_millis()
    }

    fn deserialize(value: i64) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp_millis(value)
            .ok_or_else(|| Error::Adapter(format!("timestamp {value}ms out of range")))
    }
}

/// `NaiveDateTime` stored as epoch milliseconds, read as UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveDateTimeAdapter;

impl TypeAdapter for NaiveDateTimeAdapter {
    type Host = NaiveDateTime;
    type Serialized = i64;

    fn serialize(value: &NaiveDateTime) -> i64 {
        value.and_utc().timestamp_millis()
    }

    fn deserialize(value: i64) -> Result<NaiveDateTime> {
        DateTimeAdapter::deserialize(value).map(|dt| dt.naive_utc())
    }
}

/// `NaiveDate` stored as `YYYY-MM-DD` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveDateAdapter;

impl TypeAdapter for NaiveDateAdapter {
    type Host = NaiveDate;
    type Serialized = String;

    fn serialize(value: &NaiveDate) -> String {
        value.format("%Y-%m-%d").to_string()
    }

    fn deserialize(value: String) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map_err(|e| Error::Adapter(format!("invalid date `{value}`: {e}")))
    }
}

/// `Vec<String>` stored as a JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringListAdapter;

impl TypeAdapter for StringListAdapter {
    type Host = Vec<String>;
    type Serialized = String;

    fn serialize(value: &Vec<String>) -> String {
        // serializing a list of strings cannot fail
        serde_json::to_string(value).unwrap_or_else(|_| String::from("[]"))
    }

    fn deserialize(value: String) -> Result<Vec<String>> {
        Ok(serde_json::from_str(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_time_round_trip() {
        let values = [
            Utc.with_ymd_and_hms(2015, 10, 21, 16, 29, 0).unwrap(),
            Utc.timestamp_millis_opt(0).unwrap(),
            Utc.timestamp_millis_opt(1_234_567_890_123).unwrap(),
        ];
        for value in values {
            let stored = DateTimeAdapter::serialize(&value);
            assert_eq!(DateTimeAdapter::deserialize(stored).unwrap(), value);
        }
    }

    #[test]
    fn test_date_time_is_epoch_millis() {
        let value = Utc.timestamp_millis_opt(1_500).unwrap();
        assert_eq!(DateTimeAdapter::serialize(&value), 1_500);
    }

    #[test]
    fn test_naive_date_time_round_trip() {
        let value = NaiveDate::from_ymd_opt(2020, 2, 29)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 250)
            .unwrap();
        let stored = NaiveDateTimeAdapter::serialize(&value);
        assert_eq!(NaiveDateTimeAdapter::deserialize(stored).unwrap(), value);
    }

    #[test]
    fn test_naive_date_round_trip() {
        let value = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        let stored = NaiveDateAdapter::serialize(&value);
        assert_eq!(stored, "1999-12-31");
        assert_eq!(NaiveDateAdapter::deserialize(stored).unwrap(), value);
    }

    #[test]
    fn test_naive_date_rejects_garbage() {
        let err = NaiveDateAdapter::deserialize(String::from("yesterday")).unwrap_err();
        assert!(matches!(err, Error::Adapter(_)));
    }

    #[test]
    fn test_string_list_round_trip() {
        let value = vec![String::from("a"), String::from("b,c"), String::new()];
        let stored = StringListAdapter::serialize(&value);
        assert_eq!(stored, r#"["a","b,c",""]"#);
        assert_eq!(StringListAdapter::deserialize(stored).unwrap(), value);
    }

    #[test]
    fn test_string_list_rejects_malformed_json() {
        let err = StringListAdapter::deserialize(String::from("[1,")).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
