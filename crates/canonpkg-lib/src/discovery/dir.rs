use std::fs;
use std::path::{Path, PathBuf};

use canonpkg_core::{ImportKey, SourceFile};

use super::{DiscoveryError, PackageSource};

/// Packages laid out under a root directory: `<root>/<import path>/*.go`.
///
/// Test files (`*_test.go`) are skipped. Files are read in name order.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageSource for DirSource {
    fn locate(&self, path: &str) -> Result<Vec<SourceFile>, DiscoveryError> {
        // Validated paths have no `..` segments, so the join stays under root.
        ImportKey::path(path)?;
        let dir = self.root.join(path);
        if !dir.is_dir() {
            return Err(DiscoveryError::NotFound {
                path: path.to_string(),
            });
        }

        let io_error = |file: &Path, err: std::io::Error| DiscoveryError::Io {
            file: file.display().to_string(),
            message: err.to_string(),
        };
        let mut entries: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| io_error(&dir, e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_package_file(p))
            .collect();

        if entries.is_empty() {
            return Err(DiscoveryError::NoSourceFiles {
                dir: dir.display().to_string(),
            });
        }
        entries.sort();

        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            let text = fs::read_to_string(&entry).map_err(|e| io_error(&entry, e))?;
            files.push(SourceFile::new(entry.display().to_string(), text));
        }
        tracing::trace!(path, root = %self.root.display(), files = files.len(), "package located");
        Ok(files)
    }
}

fn is_package_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}
