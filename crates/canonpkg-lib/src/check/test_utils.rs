//! Check packages straight from source text, without a registry.

use canonpkg_core::ImportKey;
use indexmap::IndexMap;

use super::{check_package, import_paths};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::parse;
use crate::source_map::SourceMap;
use crate::types::TypedPackage;

const MAIN: &str = "example.com/app";

#[derive(Default)]
pub(super) struct Harness {
    imports: IndexMap<String, TypedPackage>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `src` as package `path` and make it importable.
    #[track_caller]
    pub fn with(mut self, path: &str, src: &str) -> Self {
        let package = self.check_at(path, &[src]).0.unwrap_or_else(|| {
            panic!("dependency `{}` failed to check", path);
        });
        self.imports.insert(path.to_string(), package);
        self
    }

    pub fn package(&self, path: &str) -> TypedPackage {
        self.imports[path].clone()
    }

    #[track_caller]
    pub fn check_at(&self, path: &str, files: &[&str]) -> (Option<TypedPackage>, Diagnostics) {
        let key = ImportKey::path(path).expect("valid test path");
        let mut sources = SourceMap::new();
        let mut parsed = Vec::new();
        for (i, src) in files.iter().enumerate() {
            let id = sources.add_file(&format!("f{}.go", i), src);
            let (parse, diagnostics) = parse(src, id);
            assert!(
                diagnostics.is_empty(),
                "unexpected parse errors: {}",
                diagnostics.render(&sources)
            );
            let file = parse.file();
            for path in import_paths(&file) {
                assert!(
                    self.imports.contains_key(&path) || path.starts_with("missing"),
                    "test forgot to provide `{}`",
                    path
                );
            }
            parsed.push((id, file));
        }
        check_package(&key, &sources, &parsed, &self.imports)
    }

    pub fn check_files(&self, files: &[&str]) -> (Option<TypedPackage>, Diagnostics) {
        self.check_at(MAIN, files)
    }

    #[track_caller]
    pub fn ok(&self, src: &str) -> TypedPackage {
        let (package, diagnostics) = self.check_files(&[src]);
        assert!(
            diagnostics.is_empty(),
            "unexpected diagnostics:\n{}",
            lines(&diagnostics)
        );
        package.expect("package without diagnostics is built")
    }

    /// One line per diagnostic: severity and message.
    pub fn messages(&self, src: &str) -> String {
        lines(&self.check_files(&[src]).1)
    }

    pub fn kinds(&self, src: &str) -> Vec<DiagnosticKind> {
        self.check_files(&[src]).1.kinds()
    }
}

pub(super) fn lines(diagnostics: &Diagnostics) -> String {
    diagnostics
        .iter()
        .map(|d| format!("{}: {}", d.severity(), d.message()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rendered type of the value declared as `name`.
#[track_caller]
pub(super) fn type_of(package: &TypedPackage, name: &str) -> String {
    package
        .type_of(name)
        .unwrap_or_else(|| panic!("no value `{}`", name))
        .to_string()
}
