//! Declaration-level type checking of one package.
//!
//! Runs after parsing, over all files of the package at once:
//! - `scope`: package names, file imports, package-level objects
//! - `resolve`: type expressions, named types, methods, recursive types
//! - `values`: var/const/func declarations and their initializers
//!
//! Imports are loaded by the caller. The checker only sees the typed
//! packages they produced, keyed by import path.

mod builder;
mod constant;
mod resolve;
mod scope;
mod values;

#[cfg(test)]
mod constant_tests;
#[cfg(test)]
mod resolve_tests;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod values_tests;

use canonpkg_core::ImportKey;
use canonpkg_core::utils::is_blank;
use indexmap::IndexMap;
use rowan::{TextRange, TextSize};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::diagnostics::{DiagnosticBuilder, DiagnosticKind, Diagnostics, Span};
use crate::parser::ast;
use crate::parser::cst::SyntaxNode;
use crate::source_map::{SourceId, SourceMap};
use crate::types::{DeclData, DeclKind, PackageData, TypeId, TypedPackage};

use builder::TypeBuilder;
use scope::{FileScope, Object, ObjectId, ObjectKind, State};

/// Import paths a file asks for, as the checker will look them up.
///
/// Malformed paths and dot imports are left out; the checker reports them.
pub fn import_paths(file: &ast::SourceFile) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for spec in file.imports().flat_map(|decl| decl.specs().collect::<Vec<_>>()) {
        if spec.dot().is_some() {
            continue;
        }
        let Some(path) = spec.path().and_then(|tok| constant::unquote(tok.text())) else {
            continue;
        };
        if ImportKey::path(&path).is_ok() && !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

/// Check the parsed files of one package.
///
/// `imports` maps every path returned by [`import_paths`] to its typed
/// package. The package is only built when no errors were found; warnings
/// are returned either way.
pub fn check_package(
    key: &ImportKey,
    sources: &SourceMap,
    files: &[(SourceId, ast::SourceFile)],
    imports: &IndexMap<String, TypedPackage>,
) -> (Option<TypedPackage>, Diagnostics) {
    let mut checker = Checker::new(key, sources, files);
    checker.collect(imports);
    checker.resolve_all();
    checker.finish()
}

pub(crate) struct Checker<'a> {
    key: &'a ImportKey,
    sources: &'a SourceMap,
    package_name: Option<String>,
    files: Vec<FileScope>,
    /// Directly imported packages, in first-import order.
    imported: Vec<TypedPackage>,
    objects: Vec<Object>,
    /// Package block.
    scope: IndexMap<String, ObjectId>,
    methods: Vec<(usize, ast::FuncDecl)>,
    types: TypeBuilder,
    diag: Diagnostics,

    named_objects: FxHashMap<TypeId, ObjectId>,
    cycle_reported: FxHashSet<ObjectId>,
    map_keys: Vec<(TypeId, usize, TextRange)>,
    method_decls: FxHashMap<(TypeId, String), (usize, TextRange)>,

    value_stack: Vec<ObjectId>,
    iota: Option<usize>,
    spec_types: FxHashMap<(usize, TextSize), Option<TypeId>>,
    spec_tuples: FxHashMap<(usize, TextSize), Option<Vec<TypeId>>>,
}

impl<'a> Checker<'a> {
    fn new(
        key: &'a ImportKey,
        sources: &'a SourceMap,
        files: &[(SourceId, ast::SourceFile)],
    ) -> Self {
        let files = files
            .iter()
            .map(|(source, ast)| FileScope {
                source: *source,
                ast: ast.clone(),
                imports: IndexMap::new(),
            })
            .collect();
        Self {
            key,
            sources,
            package_name: None,
            files,
            imported: Vec::new(),
            objects: Vec::new(),
            scope: IndexMap::new(),
            methods: Vec::new(),
            types: TypeBuilder::default(),
            diag: Diagnostics::new(),
            named_objects: FxHashMap::default(),
            cycle_reported: FxHashSet::default(),
            map_keys: Vec::new(),
            method_decls: FxHashMap::default(),
            value_stack: Vec::new(),
            iota: None,
            spec_types: FxHashMap::default(),
            spec_tuples: FxHashMap::default(),
        }
    }

    fn report(&mut self, file: usize, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        let source = self.files[file].source;
        self.diag.report(source, kind, range)
    }

    fn span(&self, file: usize, range: TextRange) -> Span {
        Span::new(self.files[file].source, range)
    }

    fn object_span(&self, id: ObjectId) -> Span {
        let object = &self.objects[id];
        self.span(object.file, object.range)
    }

    /// Resolve every object, then run the package-wide checks.
    fn resolve_all(&mut self) {
        for id in 0..self.objects.len() {
            match self.objects[id].kind {
                ObjectKind::Type(_) => {
                    self.resolve_type_object(id);
                }
                _ => {
                    self.resolve_value(id);
                }
            }
        }
        self.resolve_methods();
        if self.check_recursive_types() {
            self.check_map_keys();
        }
        self.check_unused_imports();
    }

    fn finish(mut self) -> (Option<TypedPackage>, Diagnostics) {
        self.diag.sort();
        self.diag.dedup();
        if self.diag.has_errors() {
            return (None, self.diag);
        }
        debug_assert!(!self.types.has_pending(), "named type left without underlying type");

        let mut decls = IndexMap::new();
        for (id, object) in self.objects.iter().enumerate() {
            if is_blank(&object.name) || self.scope.get(&object.name) != Some(&id) {
                continue;
            }
            let data = match (&object.kind, &object.state) {
                (ObjectKind::Type(_), State::Type(Some(ty))) => DeclData {
                    kind: DeclKind::Type,
                    ty: *ty,
                    untyped: false,
                },
                (kind, State::Value(Some(value))) => DeclData {
                    kind: match kind {
                        ObjectKind::Var { .. } => DeclKind::Var,
                        ObjectKind::Const { .. } => DeclKind::Const,
                        _ => DeclKind::Func,
                    },
                    ty: value.ty,
                    untyped: value.untyped.is_some(),
                },
                _ => continue,
            };
            decls.insert(object.name.clone(), data);
        }

        let name = self.package_name.clone().unwrap_or_else(|| {
            canonpkg_core::utils::last_segment(self.key.qualifier()).to_string()
        });
        let files = self
            .files
            .iter()
            .map(|f| self.sources.name(f.source).to_string())
            .collect();
        let package = TypedPackage::new(PackageData {
            key: self.key.clone(),
            name,
            files,
            imports: self.imported,
            types: self.types.finish(),
            decls,
        });
        (Some(package), self.diag)
    }
}

/// Source text of a node, without surrounding trivia.
fn node_text(node: &SyntaxNode) -> String {
    let text = node.text().to_string();
    let text = text.trim();
    match text.find('{') {
        // Literal bodies can be long; `T{…}` is enough to recognize them.
        Some(open) if node.kind() == crate::parser::cst::SyntaxKind::CompositeLit => {
            format!("{}{{…}}", text[..open].trim_end())
        }
        _ => text.to_string(),
    }
}
