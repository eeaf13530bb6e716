//! First pass: package clauses, file imports and package-level objects.
//!
//! Nothing is resolved here. Objects only remember the syntax that declares
//! them; later passes resolve them on demand.

use canonpkg_core::utils::is_blank;
use canonpkg_core::{BasicKind, ImportKey};
use indexmap::IndexMap;
use rowan::TextRange;

use super::Checker;
use super::constant::{Constant, unquote};
use super::values::Value;
use crate::diagnostics::DiagnosticKind;
use crate::parser::ast;
use crate::parser::cst::SyntaxToken;
use crate::source_map::SourceId;
use crate::types::{TypeId, TypedPackage};

pub(super) type ObjectId = usize;

pub(super) struct FileScope {
    pub source: SourceId,
    pub ast: ast::SourceFile,
    /// File block: local import names.
    pub imports: IndexMap<String, ImportName>,
}

pub(super) struct ImportName {
    pub path: String,
    pub package: TypedPackage,
    pub range: TextRange,
    pub used: bool,
}

/// A package-level declaration.
pub(super) struct Object {
    pub name: String,
    pub file: usize,
    /// Range of the declaring identifier.
    pub range: TextRange,
    pub kind: ObjectKind,
    pub state: State,
}

#[derive(Clone)]
pub(super) enum ObjectKind {
    Type(ast::TypeSpec),
    Var {
        spec: ast::ValueSpec,
        index: usize,
    },
    /// `source` is the spec whose type and values apply; an earlier one when
    /// the declaring spec repeats it implicitly.
    Const {
        spec: ast::ValueSpec,
        source: ast::ValueSpec,
        index: usize,
        iota: usize,
    },
    Func(ast::FuncDecl),
}

#[derive(Clone)]
pub(super) enum State {
    Unresolved,
    InProgress,
    Type(Option<TypeId>),
    Value(Option<Value>),
}

impl Checker<'_> {
    pub(super) fn collect(&mut self, imports: &IndexMap<String, TypedPackage>) {
        self.collect_package_names();
        for file in 0..self.files.len() {
            self.collect_imports(file, imports);
        }
        for file in 0..self.files.len() {
            self.collect_decls(file);
        }
        for file in 0..self.files.len() {
            self.check_import_conflicts(file);
        }
    }

    fn collect_package_names(&mut self) {
        let mut first: Option<(String, usize)> = None;
        for file in 0..self.files.len() {
            let Some(name) = self.files[file].ast.package_clause().and_then(|c| c.name()) else {
                continue;
            };
            let text = name.text().to_string();
            if is_blank(&text) {
                self.report(file, DiagnosticKind::InvalidPackageName, name.text_range())
                    .message("`_`")
                    .emit();
                continue;
            }
            match first.clone() {
                None => first = Some((text, file)),
                Some((expected, _)) if expected == text => {}
                Some((expected, first_file)) => {
                    let detail = format!(
                        "found packages {} ({}) and {} ({})",
                        expected,
                        self.sources.name(self.files[first_file].source),
                        text,
                        self.sources.name(self.files[file].source),
                    );
                    self.report(file, DiagnosticKind::PackageNameMismatch, name.text_range())
                        .message(detail)
                        .emit();
                }
            }
        }
        self.package_name = first.map(|(name, _)| name);
    }

    fn collect_imports(&mut self, file: usize, imports: &IndexMap<String, TypedPackage>) {
        let specs: Vec<_> = self.files[file]
            .ast
            .imports()
            .flat_map(|decl| decl.specs().collect::<Vec<_>>())
            .collect();

        for spec in specs {
            let Some(path_token) = spec.path() else {
                continue;
            };
            let range = path_token.text_range();
            let Some(path) = unquote(path_token.text()) else {
                self.report(file, DiagnosticKind::InvalidImportPath, range)
                    .message("malformed string literal")
                    .emit();
                continue;
            };
            if let Err(err) = ImportKey::path(&path) {
                self.report(file, DiagnosticKind::InvalidImportPath, range)
                    .message(format!("`{}`: {}", err.path, err.reason))
                    .emit();
                continue;
            }
            if let Some(dot) = spec.dot() {
                self.report(file, DiagnosticKind::DotImport, dot.text_range()).emit();
                continue;
            }
            let Some(package) = imports.get(&path) else {
                self.report(file, DiagnosticKind::InvalidImportPath, range)
                    .message(format!("could not import `{}`", path))
                    .emit();
                continue;
            };
            if !self.imported.iter().any(|p| TypedPackage::ptr_eq(p, package)) {
                self.imported.push(package.clone());
            }

            let (name, name_range) = match spec.name() {
                Some(alias) => (alias.text().to_string(), alias.text_range()),
                None => (package.name().to_string(), range),
            };
            if is_blank(&name) {
                continue;
            }

            if let Some(previous) = self.files[file].imports.get(&name) {
                let other = self.span(file, previous.range);
                self.report(file, DiagnosticKind::DuplicateImport, name_range)
                    .message(&name)
                    .related_to(format!("other import of `{}`", name), other)
                    .emit();
                continue;
            }
            self.files[file].imports.insert(
                name,
                ImportName {
                    path,
                    package: package.clone(),
                    range: name_range,
                    used: false,
                },
            );
        }
    }

    fn collect_decls(&mut self, file: usize) {
        let decls: Vec<_> = self.files[file].ast.decls().collect();
        for decl in decls {
            match decl {
                ast::Decl::Type(decl) => {
                    for spec in decl.specs() {
                        if let Some(name) = spec.name() {
                            self.declare(file, &name, ObjectKind::Type(spec), true);
                        }
                    }
                }
                ast::Decl::Var(decl) => {
                    for spec in decl.specs() {
                        for (index, name) in spec.names().enumerate() {
                            let kind = ObjectKind::Var {
                                spec: spec.clone(),
                                index,
                            };
                            self.declare(file, &name, kind, true);
                        }
                    }
                }
                ast::Decl::Const(decl) => {
                    let mut source: Option<ast::ValueSpec> = None;
                    for (iota, spec) in decl.specs().enumerate() {
                        if spec.has_values() {
                            source = Some(spec.clone());
                        }
                        // A leading spec without values already failed to parse.
                        let Some(source) = source.clone() else {
                            continue;
                        };
                        for (index, name) in spec.names().enumerate() {
                            let kind = ObjectKind::Const {
                                spec: spec.clone(),
                                source: source.clone(),
                                index,
                                iota,
                            };
                            self.declare(file, &name, kind, true);
                        }
                    }
                }
                ast::Decl::Func(decl) => self.collect_func(file, decl),
            }
        }
    }

    fn collect_func(&mut self, file: usize, decl: ast::FuncDecl) {
        if decl.receiver().is_some() {
            self.methods.push((file, decl));
            return;
        }
        let Some(name) = decl.name() else {
            return;
        };
        if name.text() != "init" {
            self.declare(file, &name, ObjectKind::Func(decl), true);
            return;
        }

        let has_params = decl.params().is_some_and(|p| p.params().next().is_some());
        if has_params || decl.results().is_some() {
            self.report(file, DiagnosticKind::InvalidParameters, name.text_range())
                .message("func init must have no arguments and no return values")
                .emit();
        }
        // Checked like any function, but never bound: `init` is not addressable.
        self.declare(file, &name, ObjectKind::Func(decl), false);
    }

    fn declare(&mut self, file: usize, name: &SyntaxToken, kind: ObjectKind, bind: bool) -> ObjectId {
        let id = self.objects.len();
        let text = name.text().to_string();
        let range = name.text_range();
        self.objects.push(Object {
            name: text.clone(),
            file,
            range,
            kind,
            state: State::Unresolved,
        });
        if !bind || is_blank(&text) {
            return id;
        }

        if BasicKind::from_name(&text).is_some() {
            self.report(file, DiagnosticKind::ShadowsPredeclared, range)
                .message(&text)
                .emit();
        }
        if let Some(&previous) = self.scope.get(&text) {
            let other = self.object_span(previous);
            self.report(file, DiagnosticKind::Redeclared, range)
                .message(&text)
                .related_to(format!("other declaration of `{}`", text), other)
                .emit();
            return id;
        }
        self.scope.insert(text, id);
        id
    }

    fn check_import_conflicts(&mut self, file: usize) {
        let conflicts: Vec<_> = self.files[file]
            .imports
            .iter()
            .filter_map(|(name, import)| {
                let object = *self.scope.get(name)?;
                Some((name.clone(), import.range, object))
            })
            .collect();

        for (name, import_range, object) in conflicts {
            let import_span = self.span(file, import_range);
            let object_file = self.objects[object].file;
            let object_range = self.objects[object].range;
            self.report(object_file, DiagnosticKind::ImportNameConflict, object_range)
                .message(&name)
                .related_to(format!("`{}` imported here", name), import_span)
                .emit();
        }
    }

    /// Mark the import `name` of `file` as used. Returns its package.
    pub(super) fn use_import(&mut self, file: usize, name: &str) -> Option<TypedPackage> {
        let import = self.files[file].imports.get_mut(name)?;
        import.used = true;
        Some(import.package.clone())
    }

    pub(super) fn check_unused_imports(&mut self) {
        for file in 0..self.files.len() {
            let unused: Vec<_> = self.files[file]
                .imports
                .values()
                .filter(|import| !import.used)
                .map(|import| (import.path.clone(), import.range))
                .collect();
            for (path, range) in unused {
                self.report(file, DiagnosticKind::UnusedImport, range)
                    .message(path)
                    .emit();
            }
        }
    }
}

/// Value of an untyped boolean constant named by the universe.
pub(super) fn universe_bool(name: &str) -> Option<Constant> {
    match name {
        "true" => Some(Constant::boolean(true)),
        "false" => Some(Constant::boolean(false)),
        _ => None,
    }
}
