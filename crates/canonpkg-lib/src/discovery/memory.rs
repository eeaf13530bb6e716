use std::sync::{PoisonError, RwLock};

use canonpkg_core::{ImportKey, SourceFile};
use indexmap::IndexMap;

use super::{DiscoveryError, PackageSource};

/// Packages held in memory, keyed by import path.
#[derive(Default)]
pub struct MemorySource {
    packages: RwLock<IndexMap<String, Vec<SourceFile>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the package at `path`.
    pub fn insert(&self, path: &str, file: SourceFile) -> Result<(), DiscoveryError> {
        ImportKey::path(path)?;
        self.packages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_string())
            .or_default()
            .push(file);
        Ok(())
    }

    /// Builder form of [`Self::insert`] for fixtures with known-good paths.
    ///
    /// # Panics
    /// If `path` is not a valid import path.
    pub fn with(self, path: &str, name: &str, text: &str) -> Self {
        if let Err(err) = self.insert(path, SourceFile::new(name, text)) {
            panic!("{}", err);
        }
        self
    }

    /// Swap the files of the package at `path`. Packages already resolved
    /// from the old files are unaffected.
    pub fn replace(&self, path: &str, files: Vec<SourceFile>) -> Result<(), DiscoveryError> {
        ImportKey::path(path)?;
        self.packages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), files);
        Ok(())
    }

    pub fn remove(&self, path: &str) -> Option<Vec<SourceFile>> {
        self.packages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(path)
    }

    pub fn paths(&self) -> Vec<String> {
        self.packages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl PackageSource for MemorySource {
    fn locate(&self, path: &str) -> Result<Vec<SourceFile>, DiscoveryError> {
        self.packages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| DiscoveryError::NotFound {
                path: path.to_string(),
            })
    }
}
