//! Conflict clauses and collations.

use std::str::FromStr;

/// Conflict resolution algorithm for `PRIMARY KEY`, `UNIQUE` and `INSERT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OnConflict {
    /// No conflict clause.
    #[default]
    None,
    /// `ROLLBACK`
    Rollback,
    /// `ABORT`
    Abort,
    /// `FAIL`
    Fail,
    /// `IGNORE`
    Ignore,
    /// `REPLACE`
    Replace,
}

impl OnConflict {
    /// Returns the algorithm keyword, or `None` for [`OnConflict::None`].
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Rollback => Some("ROLLBACK"),
            Self::Abort => Some("ABORT"),
            Self::Fail => Some("FAIL"),
            Self::Ignore => Some("IGNORE"),
            Self::Replace => Some("REPLACE"),
        }
    }

    /// Returns the column-constraint clause, e.g. ` ON CONFLICT REPLACE`.
    #[must_use]
    pub fn constraint_clause(self) -> String {
        self.keyword()
            .map(|k| format!(" ON CONFLICT {k}"))
            .unwrap_or_default()
    }
}

impl FromStr for OnConflict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "rollback" => Ok(Self::Rollback),
            "abort" => Ok(Self::Abort),
            "fail" => Ok(Self::Fail),
            "ignore" => Ok(Self::Ignore),
            "replace" => Ok(Self::Replace),
            _ => Err(format!(
                "unknown conflict algorithm `{s}` \
                 (expected none, rollback, abort, fail, ignore or replace)"
            )),
        }
    }
}

/// Collating sequence for text comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collate {
    /// `BINARY`, SQLite's default. Not rendered in DDL.
    #[default]
    Binary,
    /// `NOCASE`
    NoCase,
    /// `RTRIM`
    RTrim,
}

impl Collate {
    /// Returns the collation name.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Binary => "BINARY",
            Self::NoCase => "NOCASE",
            Self::RTrim => "RTRIM",
        }
    }
}

impl FromStr for Collate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "nocase" => Ok(Self::NoCase),
            "rtrim" => Ok(Self::RTrim),
            _ => Err(format!(
                "unknown collation `{s}` (expected binary, nocase or rtrim)"
            )),
        }
    }
}
