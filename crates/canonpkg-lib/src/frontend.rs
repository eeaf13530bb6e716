//! Turns a source unit into a typed package.
//!
//! The frontend parses and checks; it never caches and never resolves
//! imports by itself. Every import goes through the [`Importer`] the caller
//! hands in, which for a session is the registry.

use std::sync::Arc;

use canonpkg_core::{ImportKey, SourceFile, SourceUnit};
use indexmap::IndexMap;

use crate::check::{check_package, import_paths};
use crate::diagnostics::Diagnostics;
use crate::discovery::PackageSource;
use crate::error::{DiagnosticReport, ResolutionFailure};
use crate::parser::parse;
use crate::source_map::SourceMap;
use crate::types::TypedPackage;

/// Resolves the imports of a package being checked.
pub trait Importer {
    fn import(&self, path: &str) -> Result<TypedPackage, ResolutionFailure>;
}

/// Parse + check stage behind the registry.
#[derive(Clone)]
pub struct Frontend {
    source: Arc<dyn PackageSource>,
}

impl Frontend {
    pub fn new(source: Arc<dyn PackageSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn PackageSource> {
        &self.source
    }

    /// Resolve `unit` into a freshly built package.
    ///
    /// Two calls for the same unit build two distinct packages; only the
    /// registry makes results canonical.
    pub fn resolve(
        &self,
        unit: &SourceUnit,
        importer: &dyn Importer,
    ) -> Result<TypedPackage, ResolutionFailure> {
        let key = unit.key();
        let _span = tracing::debug_span!("resolve", %key).entered();

        let files = match unit {
            SourceUnit::Inline { file, .. } => vec![file.clone()],
            SourceUnit::Import(key) => self.locate(key)?,
        };
        self.resolve_files(key, files, importer)
    }

    fn locate(&self, key: &ImportKey) -> Result<Vec<SourceFile>, ResolutionFailure> {
        let Some(path) = key.as_path() else {
            return Err(ResolutionFailure::InternalConsistency {
                key: key.clone(),
                detail: "inline key used as an import reference".to_string(),
            });
        };
        self.source
            .locate(path)
            .map_err(|reason| ResolutionFailure::PackageNotFound {
                path: path.to_string(),
                reason,
            })
    }

    fn resolve_files(
        &self,
        key: &ImportKey,
        files: Vec<SourceFile>,
        importer: &dyn Importer,
    ) -> Result<TypedPackage, ResolutionFailure> {
        let mut sources = SourceMap::new();
        let mut parsed = Vec::with_capacity(files.len());
        let mut diagnostics = Diagnostics::new();
        for file in files {
            let id = sources.push(file);
            let (parse, diag) = parse(sources.content(id), id);
            diagnostics.extend(diag);
            parsed.push((id, parse.file()));
        }
        if diagnostics.has_errors() {
            tracing::debug!(errors = diagnostics.error_count(), "parse failed");
            return Err(ResolutionFailure::Parse {
                key: key.clone(),
                report: Arc::new(DiagnosticReport::new(sources, diagnostics)),
            });
        }

        let mut imports = IndexMap::new();
        for (_, file) in &parsed {
            for path in import_paths(file) {
                if imports.contains_key(&path) {
                    continue;
                }
                let package = importer.import(&path)?;
                imports.insert(path, package);
            }
        }

        let (package, diagnostics) = check_package(key, &sources, &parsed, &imports);
        for warning in diagnostics.iter().filter(|d| d.is_warning()) {
            tracing::warn!(%key, message = warning.message(), "check warning");
        }
        match package {
            Some(package) => {
                tracing::debug!(decls = package.len(), imports = imports.len(), "checked");
                Ok(package)
            }
            None => Err(ResolutionFailure::TypeCheck {
                key: key.clone(),
                report: Arc::new(DiagnosticReport::new(sources, diagnostics)),
            }),
        }
    }
}
