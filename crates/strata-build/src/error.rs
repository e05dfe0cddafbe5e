//! Error types for the build driver.

use std::path::PathBuf;

use strata_codegen::Errors;

/// Errors that can occur while generating a models file.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No source file was given.
    #[error("No model sources given")]
    NoSources,

    /// Neither an output directory nor `OUT_DIR` is set.
    #[error("No output directory: set one on the builder or run from a build script")]
    MissingOutDir,

    /// Reading a source or writing the output failed.
    #[error("IO error on '{path}': {source}")]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The models have errors.
    #[error("{0}")]
    Processing(#[from] Errors),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
