//! Type expressions, named types and methods.
//!
//! Named types are resolved on demand. A named type gets its slot before its
//! underlying type is resolved, so references through pointers, slices, maps
//! and signatures can point back at it. Value containment cycles are found
//! afterwards by walking struct fields.

use canonpkg_core::BasicKind;
use canonpkg_core::utils::{is_blank, is_exported};
use rowan::TextRange;
use rustc_hash::{FxHashMap, FxHashSet};

use super::builder::{PENDING, Shape};
use super::scope::{ObjectId, ObjectKind, State};
use super::{Checker, node_text};
use crate::diagnostics::DiagnosticKind;
use crate::parser::ast;
use crate::parser::cst::SyntaxToken;
use crate::types::{DeclKind, Declaration, FieldData, MethodData, TypeData, TypeId};

impl Checker<'_> {
    /// Type denoted by a type declaration.
    pub(super) fn resolve_type_object(&mut self, id: ObjectId) -> Option<TypeId> {
        match self.objects[id].state {
            State::Type(ty) => return ty,
            // Named types are bound before their underlying type, so only
            // aliases are ever seen in progress.
            State::InProgress => {
                self.report_alias_cycle(id);
                return None;
            }
            _ => {}
        }
        let ObjectKind::Type(spec) = self.objects[id].kind.clone() else {
            return None;
        };
        let file = self.objects[id].file;

        if spec.is_alias() {
            self.objects[id].state = State::InProgress;
            let ty = spec.ty().and_then(|ty| self.resolve_type(file, &ty));
            self.objects[id].state = State::Type(ty);
            return ty;
        }

        let name = self.objects[id].name.clone();
        let named = self.types.declare_named(&name);
        self.named_objects.insert(named, id);
        self.objects[id].state = State::Type(Some(named));

        let Some(rhs) = spec.ty().and_then(|ty| self.resolve_type(file, &ty)) else {
            return Some(named);
        };
        match self.types.underlying(rhs) {
            Some(underlying) => self.types.set_underlying(named, underlying),
            None => {
                // `type A B` while `B` is still waiting for its own underlying type.
                let culprit = self.named_objects.get(&rhs).copied();
                if culprit.is_some_and(|c| self.cycle_reported.contains(&c)) {
                    self.cycle_reported.insert(id);
                } else {
                    self.report_recursive(id, culprit.into_iter().collect());
                }
            }
        }
        Some(named)
    }

    pub(super) fn resolve_type(&mut self, file: usize, ty: &ast::Type) -> Option<TypeId> {
        match ty {
            ast::Type::Name(name) => self.resolve_type_name(file, name.qualifier(), name.name()),
            ast::Type::Pointer(ptr) => {
                let elem = self.resolve_type(file, &ptr.elem()?)?;
                Some(self.types.push(TypeData::Pointer(elem)))
            }
            ast::Type::Slice(slice) => {
                let elem = self.resolve_type(file, &slice.elem()?)?;
                Some(self.types.push(TypeData::Slice(elem)))
            }
            ast::Type::Map(map) => {
                let key_node = map.key()?;
                let key = self.resolve_type(file, &key_node);
                let value = self.resolve_type(file, &map.value()?);
                let (key, value) = (key?, value?);
                self.map_keys.push((key, file, key_node.as_cst().text_range()));
                Some(self.types.push(TypeData::Map(key, value)))
            }
            ast::Type::Struct(st) => self.resolve_struct(file, st),
            ast::Type::Func(func) => self.resolve_signature(file, func.params(), func.results()),
            ast::Type::Paren(paren) => self.resolve_type(file, &paren.inner()?),
        }
    }

    /// `Name` or `pkg.Name` in type position.
    pub(super) fn resolve_type_name(
        &mut self,
        file: usize,
        qualifier: Option<SyntaxToken>,
        name: Option<SyntaxToken>,
    ) -> Option<TypeId> {
        let name = name?;
        if let Some(qualifier) = qualifier {
            let range = TextRange::new(qualifier.text_range().start(), name.text_range().end());
            let decl = self.qualified(file, &qualifier, &name)?;
            if decl.kind != DeclKind::Type {
                self.report(file, DiagnosticKind::NotAType, range)
                    .message(format!("{}.{}", qualifier.text(), name.text()))
                    .emit();
                return None;
            }
            return Some(self.types.import(&decl.ty));
        }

        let text = name.text();
        let range = name.text_range();
        if let Some(&object) = self.scope.get(text) {
            if let ObjectKind::Type(_) = self.objects[object].kind {
                return self.resolve_type_object(object);
            }
            self.report(file, DiagnosticKind::NotAType, range)
                .message(text)
                .emit();
            return None;
        }
        if let Some(kind) = BasicKind::from_name(text) {
            return Some(self.types.basic(kind));
        }
        if self.use_import(file, text).is_some() {
            self.report(file, DiagnosticKind::NotAType, range)
                .message(text)
                .hint(format!("`{}` is an imported package", text))
                .emit();
        } else {
            self.report(file, DiagnosticKind::Undefined, range)
                .message(text)
                .emit();
        }
        None
    }

    /// Look up `pkg.Name` through the file's imports.
    pub(super) fn qualified(
        &mut self,
        file: usize,
        qualifier: &SyntaxToken,
        name: &SyntaxToken,
    ) -> Option<Declaration> {
        let range = TextRange::new(qualifier.text_range().start(), name.text_range().end());
        let Some(package) = self.use_import(file, qualifier.text()) else {
            if self.scope.contains_key(qualifier.text()) {
                self.report(file, DiagnosticKind::Unsupported, range)
                    .message(format!("selector expression `{}.{}`", qualifier.text(), name.text()))
                    .emit();
            } else {
                self.report(file, DiagnosticKind::Undefined, qualifier.text_range())
                    .message(qualifier.text())
                    .emit();
            }
            return None;
        };

        let full = format!("{}.{}", qualifier.text(), name.text());
        if !is_exported(name.text()) {
            self.report(file, DiagnosticKind::NotExported, range)
                .message(full)
                .emit();
            return None;
        }
        let decl = package.decl(name.text());
        if decl.is_none() {
            self.report(file, DiagnosticKind::Undefined, range)
                .message(full)
                .emit();
        }
        decl
    }

    fn resolve_struct(&mut self, file: usize, st: &ast::StructType) -> Option<TypeId> {
        let mut fields: Vec<FieldData> = Vec::new();
        let mut seen: FxHashMap<String, TextRange> = FxHashMap::default();
        let mut ok = true;

        for decl in st.fields() {
            let Some(ty_node) = decl.ty() else {
                ok = false;
                continue;
            };
            let ty = self.resolve_type(file, &ty_node);

            let names: Vec<(String, TextRange, bool)> = if decl.is_embedded() {
                match embedded_name(&ty_node) {
                    Some(name) => vec![(name.text().to_string(), name.text_range(), true)],
                    None => {
                        self.report(file, DiagnosticKind::InvalidOperation, ty_node.as_cst().text_range())
                            .message("embedded field type must be a type name")
                            .emit();
                        ok = false;
                        continue;
                    }
                }
            } else {
                decl.names()
                    .map(|n| (n.text().to_string(), n.text_range(), false))
                    .collect()
            };

            let Some(ty) = ty else {
                ok = false;
                continue;
            };
            for (name, range, embedded) in names {
                if !is_blank(&name) {
                    if let Some(&previous) = seen.get(&name) {
                        let other = self.span(file, previous);
                        self.report(file, DiagnosticKind::Redeclared, range)
                            .message(&name)
                            .related_to(format!("other declaration of `{}`", name), other)
                            .emit();
                        ok = false;
                        continue;
                    }
                    seen.insert(name.clone(), range);
                }
                fields.push(FieldData { name, ty, embedded });
            }
        }

        ok.then(|| self.types.push(TypeData::Struct(fields)))
    }

    pub(super) fn resolve_signature(
        &mut self,
        file: usize,
        params: Option<ast::ParamList>,
        results: Option<ast::Results>,
    ) -> Option<TypeId> {
        let params = self.resolve_params(file, params.as_ref(), false);
        let results = match results {
            None => Some(Vec::new()),
            Some(results) => match (results.list(), results.ty()) {
                (Some(list), _) => self.resolve_params(file, Some(&list), true).map(|(r, _)| r),
                (None, Some(ty)) => self.resolve_type(file, &ty).map(|r| vec![r]),
                (None, None) => Some(Vec::new()),
            },
        };
        let ((params, variadic), results) = (params?, results?);
        Some(self.types.push(TypeData::Signature {
            params,
            results,
            variadic,
        }))
    }

    /// Parameter or result types, in order.
    ///
    /// In a list with any names, a bare unqualified type name is a name
    /// waiting for the type of the next named entry: `(a, b int)`.
    fn resolve_params(
        &mut self,
        file: usize,
        list: Option<&ast::ParamList>,
        results: bool,
    ) -> Option<(Vec<TypeId>, bool)> {
        let params: Vec<ast::Param> = list.map(|l| l.params().collect()).unwrap_or_default();
        let named = params.iter().any(|p| p.name().is_some());

        let mut types = Vec::new();
        let mut variadic = false;
        let mut ok = true;
        let mut pending: Vec<SyntaxToken> = Vec::new();
        let mut seen: FxHashMap<String, TextRange> = FxHashMap::default();

        for (i, param) in params.iter().enumerate() {
            let range = param.as_cst().text_range();
            if param.is_variadic() {
                let last = i + 1 == params.len();
                if results || !last {
                    let detail = if results {
                        "cannot use ... in result list"
                    } else {
                        "can only use ... with final parameter"
                    };
                    self.report(file, DiagnosticKind::InvalidParameters, range)
                        .message(detail)
                        .emit();
                    ok = false;
                }
                variadic = last && !results;
            }

            if named {
                match (param.name(), param.ty()) {
                    (None, Some(ast::Type::Name(bare)))
                        if bare.qualifier().is_none() && !param.is_variadic() =>
                    {
                        pending.extend(bare.name());
                        continue;
                    }
                    (None, _) => {
                        self.report(file, DiagnosticKind::InvalidParameters, range)
                            .message("mixed named and unnamed parameters")
                            .emit();
                        ok = false;
                        continue;
                    }
                    (Some(name), _) => pending.push(name),
                }
                for name in &pending {
                    if is_blank(name.text()) {
                        continue;
                    }
                    if let Some(&previous) = seen.get(name.text()) {
                        let other = self.span(file, previous);
                        self.report(file, DiagnosticKind::Redeclared, name.text_range())
                            .message(name.text())
                            .related_to(format!("other declaration of `{}`", name.text()), other)
                            .emit();
                        ok = false;
                    } else {
                        seen.insert(name.text().to_string(), name.text_range());
                    }
                }
            }

            let count = if named { pending.len() } else { 1 };
            pending.clear();
            let ty = param.ty().and_then(|ty| self.resolve_type(file, &ty));
            match (ty, param.is_variadic()) {
                (Some(elem), true) => {
                    let slice = self.types.push(TypeData::Slice(elem));
                    types.extend(std::iter::repeat_n(slice, count));
                }
                (Some(ty), false) => types.extend(std::iter::repeat_n(ty, count)),
                (None, _) => ok = false,
            }
        }

        // Trailing names with no type to share.
        if let Some(first) = pending.first() {
            self.report(file, DiagnosticKind::InvalidParameters, first.text_range())
                .message("mixed named and unnamed parameters")
                .emit();
            ok = false;
        }

        ok.then_some((types, variadic))
    }

    pub(super) fn resolve_methods(&mut self) {
        for (file, decl) in std::mem::take(&mut self.methods) {
            let Some(name) = decl.name() else {
                continue;
            };
            let signature = self.resolve_signature(file, decl.params(), decl.results());

            let Some(receiver) = decl.receiver().and_then(|r| r.param()).and_then(|p| p.ty()) else {
                self.report(file, DiagnosticKind::InvalidReceiver, name.text_range())
                    .message("missing receiver")
                    .emit();
                continue;
            };
            let (pointer, base) = match strip_parens(receiver) {
                Some(ast::Type::Pointer(ptr)) => (true, ptr.elem().and_then(strip_parens)),
                other => (false, other),
            };
            let Some(named) = base.and_then(|base| self.receiver_base(file, &base)) else {
                continue;
            };
            if is_blank(name.text()) {
                continue;
            }

            let method = name.text().to_string();
            let type_name = self.types.describe(named);
            if self.types.struct_fields(named).contains(&method) {
                self.report(file, DiagnosticKind::FieldMethodConflict, name.text_range())
                    .message(format!("{}.{}", type_name, method))
                    .emit();
                continue;
            }
            if self.types.has_method(named, &method) {
                let previous = self
                    .method_decls
                    .get(&(named, method.clone()))
                    .map(|&(prev_file, prev_range)| self.span(prev_file, prev_range));
                let mut builder = self
                    .report(file, DiagnosticKind::DuplicateMethod, name.text_range())
                    .message(format!("{}.{}", type_name, method));
                if let Some(previous) = previous {
                    builder = builder.related_to(format!("other declaration of `{}`", method), previous);
                }
                builder.emit();
                continue;
            }
            let Some(signature) = signature else {
                continue;
            };
            self.types.add_method(
                named,
                &method,
                MethodData {
                    signature,
                    pointer_receiver: pointer,
                },
            );
            self.method_decls.insert((named, method), (file, name.text_range()));
        }
    }

    /// The local named type a receiver declares methods on.
    fn receiver_base(&mut self, file: usize, base: &ast::Type) -> Option<TypeId> {
        let range = base.as_cst().text_range();
        let text = node_text(base.as_cst());
        let ast::Type::Name(name) = base else {
            self.report(file, DiagnosticKind::InvalidReceiver, range)
                .message(text)
                .emit();
            return None;
        };
        if let Some(qualifier) = name.qualifier() {
            self.use_import(file, qualifier.text());
            self.report(file, DiagnosticKind::InvalidReceiver, range)
                .message(format!("{} (cannot define new methods on non-local type)", text))
                .emit();
            return None;
        }

        let token = name.name()?;
        let is_local_type = self
            .scope
            .get(token.text())
            .is_some_and(|&o| matches!(self.objects[o].kind, ObjectKind::Type(_)));
        if !is_local_type && BasicKind::from_name(token.text()).is_some() {
            self.report(file, DiagnosticKind::InvalidReceiver, range)
                .message(format!("{} (cannot define new methods on non-local type)", text))
                .emit();
            return None;
        }

        let id = self.resolve_type_name(file, None, Some(token))?;
        if !matches!(self.types.data(id), TypeData::Named { .. }) {
            self.report(file, DiagnosticKind::InvalidReceiver, range)
                .message(format!("{} (cannot define new methods on non-local type)", text))
                .emit();
            return None;
        }
        if self.types.shape(id) == Shape::Pointer {
            self.report(file, DiagnosticKind::InvalidReceiver, range)
                .message(format!("{} (pointer or interface type)", text))
                .emit();
            return None;
        }
        Some(id)
    }

    fn report_alias_cycle(&mut self, id: ObjectId) {
        if !self.cycle_reported.insert(id) {
            return;
        }
        let name = self.objects[id].name.clone();
        let (file, range) = (self.objects[id].file, self.objects[id].range);
        self.report(file, DiagnosticKind::InvalidRecursiveType, range)
            .message(name)
            .emit();
    }

    /// Report `id` as recursive; `path` lists the types it reaches itself through.
    fn report_recursive(&mut self, id: ObjectId, path: Vec<ObjectId>) {
        let mut chain = vec![id];
        chain.extend(path);
        chain.push(id);

        let related: Vec<_> = chain
            .windows(2)
            .map(|pair| {
                let message = format!(
                    "`{}` refers to `{}`",
                    self.objects[pair[0]].name, self.objects[pair[1]].name
                );
                (message, self.object_span(pair[0]))
            })
            .collect();
        for &object in &chain {
            self.cycle_reported.insert(object);
        }

        let name = self.objects[id].name.clone();
        let (file, range) = (self.objects[id].file, self.objects[id].range);
        let mut builder = self
            .report(file, DiagnosticKind::InvalidRecursiveType, range)
            .message(name);
        for (message, span) in related {
            builder = builder.related_to(message, span);
        }
        builder.emit();
    }

    /// Find named types that contain themselves by value.
    ///
    /// Returns whether the package is free of them.
    pub(super) fn check_recursive_types(&mut self) -> bool {
        for id in 0..self.objects.len() {
            let State::Type(Some(named)) = self.objects[id].state else {
                continue;
            };
            if self.named_objects.get(&named) != Some(&id) || self.cycle_reported.contains(&id) {
                continue;
            }
            let mut path = Vec::new();
            let mut visited = FxHashSet::default();
            let TypeData::Named { underlying, .. } = self.types.data(named) else {
                continue;
            };
            let underlying = *underlying;
            if underlying != PENDING && self.contains(underlying, named, &mut path, &mut visited) {
                let path = path
                    .iter()
                    .filter_map(|ty| self.named_objects.get(ty).copied())
                    .collect();
                self.report_recursive(id, path);
            }
        }
        self.cycle_reported.is_empty()
    }

    fn contains(
        &self,
        ty: TypeId,
        target: TypeId,
        path: &mut Vec<TypeId>,
        visited: &mut FxHashSet<TypeId>,
    ) -> bool {
        match self.types.data(ty) {
            TypeData::Named { underlying, .. } => {
                if ty == target {
                    return true;
                }
                if !visited.insert(ty) || *underlying == PENDING {
                    return false;
                }
                path.push(ty);
                if self.contains(*underlying, target, path, visited) {
                    return true;
                }
                path.pop();
                false
            }
            TypeData::Struct(fields) => fields
                .iter()
                .any(|field| self.contains(field.ty, target, path, visited)),
            _ => false,
        }
    }

    pub(super) fn check_map_keys(&mut self) {
        for (key, file, range) in std::mem::take(&mut self.map_keys) {
            if !self.types.comparable(key) {
                let key = self.types.describe(key);
                self.report(file, DiagnosticKind::InvalidMapKey, range)
                    .message(key)
                    .emit();
            }
        }
    }
}

/// Field name of an embedded field: the type name, without `*` or qualifier.
fn embedded_name(ty: &ast::Type) -> Option<SyntaxToken> {
    match strip_parens(ty.clone())? {
        ast::Type::Name(name) => name.name(),
        ast::Type::Pointer(ptr) => match strip_parens(ptr.elem()?)? {
            ast::Type::Name(name) => name.name(),
            _ => None,
        },
        _ => None,
    }
}

fn strip_parens(ty: ast::Type) -> Option<ast::Type> {
    match ty {
        ast::Type::Paren(paren) => strip_parens(paren.inner()?),
        other => Some(other),
    }
}
