//! Package discovery: which files make up the package at an import path.
//!
//! The frontend asks a [`PackageSource`] for the files of every path-keyed
//! package it resolves. Sources:
//! - [`MemorySource`]: packages registered in memory, mostly for tests
//! - [`DirSource`]: `<root>/<import path>/*.go` on disk
//! - [`StdSource`]: the standard packages embedded in this crate
//! - [`SearchPath`]: several sources tried in order

mod dir;
mod memory;
mod stdlib;

#[cfg(test)]
mod dir_tests;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use canonpkg_core::{InvalidImportPath, SourceFile};

pub use dir::DirSource;
pub use memory::MemorySource;
pub use stdlib::StdSource;

/// Where the files of a package come from.
///
/// Implementations must return files in a stable order: the order decides
/// how diagnostics are sorted and how the package lists its files.
pub trait PackageSource: Send + Sync {
    fn locate(&self, path: &str) -> Result<Vec<SourceFile>, DiscoveryError>;
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    #[error("cannot find package `{path}`")]
    NotFound { path: String },
    #[error("no Go files in `{dir}`")]
    NoSourceFiles { dir: String },
    #[error("failed to read `{file}`: {message}")]
    Io { file: String, message: String },
    #[error(transparent)]
    InvalidPath(#[from] InvalidImportPath),
}

/// Sources tried in order. The first one that knows the path wins.
#[derive(Clone, Default)]
pub struct SearchPath {
    sources: Vec<Arc<dyn PackageSource>>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: Arc<dyn PackageSource>) {
        self.sources.push(source);
    }

    pub fn with(mut self, source: impl PackageSource + 'static) -> Self {
        self.push(Arc::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl PackageSource for SearchPath {
    fn locate(&self, path: &str) -> Result<Vec<SourceFile>, DiscoveryError> {
        for source in &self.sources {
            match source.locate(path) {
                Err(DiscoveryError::NotFound { .. }) => continue,
                found => return found,
            }
        }
        tracing::debug!(path, sources = self.sources.len(), "package not found on search path");
        Err(DiscoveryError::NotFound {
            path: path.to_string(),
        })
    }
}

impl<S: PackageSource + ?Sized> PackageSource for Arc<S> {
    fn locate(&self, path: &str) -> Result<Vec<SourceFile>, DiscoveryError> {
        (**self).locate(path)
    }
}
