use canonpkg_core::SourceFile;

use super::{DiscoveryError, PackageSource};

/// Path, file name and text of every embedded standard file.
const FILES: &[(&str, &str, &str)] = &[
    (
        "sync",
        "sync/mutex.go",
        include_str!("../../std/sync/mutex.go"),
    ),
    (
        "sync",
        "sync/once.go",
        include_str!("../../std/sync/once.go"),
    ),
    (
        "sync",
        "sync/waitgroup.go",
        include_str!("../../std/sync/waitgroup.go"),
    ),
    (
        "sync/atomic",
        "sync/atomic/types.go",
        include_str!("../../std/sync/atomic/types.go"),
    ),
];

/// Standard packages compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdSource;

impl StdSource {
    /// Import paths of the embedded packages.
    pub fn paths() -> Vec<&'static str> {
        let mut paths: Vec<&str> = FILES.iter().map(|(path, _, _)| *path).collect();
        paths.dedup();
        paths
    }
}

impl PackageSource for StdSource {
    fn locate(&self, path: &str) -> Result<Vec<SourceFile>, DiscoveryError> {
        let files: Vec<SourceFile> = FILES
            .iter()
            .filter(|(pkg, _, _)| *pkg == path)
            .map(|(_, name, text)| SourceFile::new(*name, *text))
            .collect();
        if files.is_empty() {
            return Err(DiscoveryError::NotFound {
                path: path.to_string(),
            });
        }
        Ok(files)
    }
}
