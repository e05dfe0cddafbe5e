//! # strata-build
//!
//! Drives `strata-codegen` over model source files and writes the
//! generated API to a file, from a build script or the `strata-gen` CLI.
//!
//! ```rust,ignore
//! // build.rs
//! fn main() {
//!     strata_build::Builder::new()
//!         .source("src/models.rs")
//!         .generate()
//!         .unwrap_or_else(|e| panic!("{e}"));
//! }
//!
//! // src/models.rs, after the model structs
//! include!(concat!(env!("OUT_DIR"), "/strata_models.rs"));
//! ```

pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use strata_codegen::BuildContext;
use tracing::{debug, info};

pub use error::{BuildError, Result};

/// Default name of the generated file.
pub const DEFAULT_FILE_NAME: &str = "strata_models.rs";

const HEADER: &str = "// @generated by strata-build. Do not edit.\n";

/// Collects model sources and writes their generated API.
#[derive(Debug, Clone)]
pub struct Builder {
    sources: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
    file_name: String,
    cargo_instructions: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            out_dir: None,
            file_name: String::from(DEFAULT_FILE_NAME),
            cargo_instructions: true,
        }
    }
}

impl Builder {
    /// Creates a builder writing `strata_models.rs` into `OUT_DIR`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source file declaring models or type adapters.
    #[must_use]
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Adds several source files.
    #[must_use]
    pub fn sources<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the output directory. Defaults to `OUT_DIR`.
    #[must_use]
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Sets the generated file name.
    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Whether to print `cargo:rerun-if-changed` lines. On by default.
    #[must_use]
    pub const fn cargo_instructions(mut self, enabled: bool) -> Self {
        self.cargo_instructions = enabled;
        self
    }

    /// Generates the API of every model in the sources and returns it as
    /// Rust source text.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Io`] if a source cannot be read and
    /// [`BuildError::Processing`] with every model error otherwise.
    pub fn render(&self) -> Result<String> {
        if self.sources.is_empty() {
            return Err(BuildError::NoSources);
        }

        let mut ctx = BuildContext::new();
        for path in &self.sources {
            let source = fs::read_to_string(path).map_err(|source| BuildError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "scanning source");
            ctx.add_source(path, &source);
            if self.cargo_instructions {
                println!("cargo:rerun-if-changed={}", path.display());
            }
        }
        info!(models = ctx.model_count(), "found models");

        let tokens = strata_codegen::run(ctx)?;
        Ok(format!("{HEADER}{tokens}\n"))
    }

    /// Generates and writes the models file, returning its path.
    ///
    /// # Errors
    ///
    /// See [`Builder::render`]; also fails with
    /// [`BuildError::MissingOutDir`] when no output directory is known and
    /// [`BuildError::Io`] when the file cannot be written.
    pub fn generate(&self) -> Result<PathBuf> {
        let out_dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => std::env::var_os("OUT_DIR")
                .map(PathBuf::from)
                .ok_or(BuildError::MissingOutDir)?,
        };
        let code = self.render()?;
        let path = out_dir.join(&self.file_name);
        write(&path, &code)?;
        info!(path = %path.display(), "wrote generated models");
        Ok(path)
    }
}

fn write(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, code).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}
