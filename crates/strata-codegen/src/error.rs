//! Build-time errors.
//!
//! Every error names the element it belongs to: a model, optionally one of
//! its fields, and a source position. Errors never stop the pass that
//! raised them; they are collected into [`Errors`] and reported together.

use std::fmt;
use std::path::{Path, PathBuf};

use proc_macro2::Span;
use thiserror::Error;

/// A position in a scanned source file. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// The source file.
    pub file: PathBuf,
    /// Line number.
    pub line: usize,
    /// Column number.
    pub column: usize,
}

impl Location {
    /// Location of `span` within `file`.
    #[must_use]
    pub fn from_span(file: &Path, span: Span) -> Self {
        let start = span.start();
        Self {
            file: file.to_path_buf(),
            line: start.line,
            column: start.column + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// The source element an error is reported against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Model struct name.
    pub model: String,
    /// Field name, when the error concerns a single field.
    pub field: Option<String>,
    /// Where the element is declared.
    pub location: Location,
}

impl Element {
    /// A model struct.
    #[must_use]
    pub fn model(model: impl Into<String>, location: Location) -> Self {
        Self {
            model: model.into(),
            field: None,
            location,
        }
    }

    /// A field of a model struct.
    #[must_use]
    pub fn field(model: impl Into<String>, field: impl Into<String>, location: Location) -> Self {
        Self {
            model: model.into(),
            field: Some(field.into()),
            location,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.model)?;
        if let Some(field) = &self.field {
            write!(f, ".{field}")?;
        }
        Ok(())
    }
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed helper attribute or unparsable source.
    Syntax,
    /// Multiple primary keys, an association target without a primary key,
    /// a missing type adapter, an association cycle.
    SchemaShape,
    /// A referenced model that is not registered.
    Resolution,
    /// An operator the column category does not support.
    Generation,
}

/// One build-time failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{element}: {message}")]
pub struct ProcessingError {
    /// Category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Offending element.
    pub element: Element,
}

impl ProcessingError {
    /// Creates an error.
    #[must_use]
    pub fn new(kind: ErrorKind, element: Element, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            element,
        }
    }

    /// Converts every message of a `syn::Error` into a syntax error on `model`.
    #[must_use]
    pub fn from_syn(err: syn::Error, model: &str, file: &Path) -> Vec<Self> {
        err.into_iter()
            .map(|e| {
                Self::new(
                    ErrorKind::Syntax,
                    Element::model(model, Location::from_span(file, e.span())),
                    e.to_string(),
                )
            })
            .collect()
    }
}

/// Every error of a build, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct Errors {
    errors: Vec<ProcessingError>,
}

impl Errors {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one error.
    pub fn push(&mut self, err: ProcessingError) {
        self.errors.push(err);
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates over the recorded errors.
    pub fn iter(&self) -> std::slice::Iter<'_, ProcessingError> {
        self.errors.iter()
    }

    /// `Ok(value)` if nothing was recorded, `Err(self)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl Extend<ProcessingError> for Errors {
    fn extend<I: IntoIterator<Item = ProcessingError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for Errors {
    type Item = ProcessingError;
    type IntoIter = std::vec::IntoIter<ProcessingError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a ProcessingError;
    type IntoIter = std::slice::Iter<'a, ProcessingError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> Location {
        Location {
            file: PathBuf::from("src/models.rs"),
            line: 12,
            column: 5,
        }
    }

    #[test]
    fn test_display_with_field() {
        let err = ProcessingError::new(
            ErrorKind::SchemaShape,
            Element::field("Todo", "owner", location()),
            "missing primary key",
        );
        assert_eq!(
            err.to_string(),
            "src/models.rs:12:5: Todo.owner: missing primary key"
        );
    }

    #[test]
    fn test_errors_render_one_per_line() {
        let mut errors = Errors::new();
        errors.push(ProcessingError::new(
            ErrorKind::Resolution,
            Element::model("A", location()),
            "first",
        ));
        errors.push(ProcessingError::new(
            ErrorKind::Resolution,
            Element::model("B", location()),
            "second",
        ));
        assert_eq!(
            errors.to_string(),
            "src/models.rs:12:5: A: first\nsrc/models.rs:12:5: B: second"
        );
        assert!(errors.into_result(()).is_err());
    }
}
