//! Variables, constants, functions and their initializers.
//!
//! Values resolve on demand, like types. A value that is reached again while
//! its own initializer is being checked closes an initialization cycle.

use canonpkg_core::BasicKind;
use rowan::TextRange;

use super::builder::Shape;
use super::constant::{ConstValue, Constant, UntypedKind};
use super::scope::{ObjectId, ObjectKind, State, universe_bool};
use super::{Checker, node_text};
use crate::diagnostics::DiagnosticKind;
use crate::parser::ast;
use crate::parser::cst::{SyntaxKind, SyntaxNode};
use crate::types::{DeclKind, TypeData, TypeId};

/// Resolved var, const or func.
#[derive(Clone, Debug)]
pub(super) struct Value {
    /// Declared or inferred type; the default type for untyped constants.
    pub ty: TypeId,
    pub untyped: Option<Constant>,
    pub constant: bool,
}

/// What an expression evaluates to.
#[derive(Clone, Debug)]
pub(super) enum Operand {
    Value { ty: TypeId, constant: bool },
    Untyped(Constant),
    Nil,
    /// Results of a call with zero or several of them.
    Tuple(Vec<TypeId>),
}

impl Operand {
    fn value(ty: TypeId) -> Self {
        Self::Value { ty, constant: false }
    }

    fn is_constant(&self) -> bool {
        matches!(self, Self::Untyped(_) | Self::Value { constant: true, .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Builtin {
    New,
    Make,
    Len,
}

impl Builtin {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "new" => Some(Self::New),
            "make" => Some(Self::Make),
            "len" => Some(Self::Len),
            _ => None,
        }
    }
}

/// What a called name denotes.
enum Callee {
    Type,
    Builtin(Builtin),
    Value,
}

impl Checker<'_> {
    pub(super) fn resolve_value(&mut self, id: ObjectId) -> Option<Value> {
        match &self.objects[id].state {
            State::Value(value) => return value.clone(),
            State::InProgress => {
                self.report_init_cycle(id);
                return None;
            }
            _ => {}
        }

        self.objects[id].state = State::InProgress;
        self.value_stack.push(id);
        let file = self.objects[id].file;
        let value = match self.objects[id].kind.clone() {
            ObjectKind::Var { spec, index } => {
                let saved = self.iota.take();
                let value = self.var_value(file, &spec, index);
                self.iota = saved;
                value
            }
            ObjectKind::Const {
                spec,
                source,
                index,
                iota,
            } => {
                let saved = self.iota.replace(iota);
                let value = self.const_value(file, &spec, &source, index);
                self.iota = saved;
                value
            }
            ObjectKind::Func(decl) => self
                .resolve_signature(file, decl.params(), decl.results())
                .map(|ty| Value {
                    ty,
                    untyped: None,
                    constant: false,
                }),
            ObjectKind::Type(_) => None,
        };
        self.value_stack.pop();
        self.objects[id].state = State::Value(value.clone());
        value
    }

    fn report_init_cycle(&mut self, id: ObjectId) {
        let Some(start) = self.value_stack.iter().position(|&o| o == id) else {
            return;
        };
        let mut chain: Vec<ObjectId> = self.value_stack[start..].to_vec();
        chain.push(id);

        let detail = if chain.len() == 2 {
            format!("`{}` refers to itself", self.objects[id].name)
        } else {
            chain
                .iter()
                .map(|&o| self.objects[o].name.as_str())
                .collect::<Vec<_>>()
                .join(" -> ")
        };
        let related: Vec<_> = chain
            .windows(2)
            .filter(|_| chain.len() > 2)
            .map(|pair| {
                let message = format!(
                    "`{}` refers to `{}`",
                    self.objects[pair[0]].name, self.objects[pair[1]].name
                );
                (message, self.object_span(pair[0]))
            })
            .collect();

        let (file, range) = (self.objects[id].file, self.objects[id].range);
        let mut builder = self
            .report(file, DiagnosticKind::InitializationCycle, range)
            .message(detail);
        for (message, span) in related {
            builder = builder.related_to(message, span);
        }
        builder.emit();
    }

    /// Declared type of a spec, resolved once for all its names.
    fn spec_type(&mut self, file: usize, spec: &ast::ValueSpec) -> Option<Option<TypeId>> {
        let ty = spec.ty()?;
        let key = (file, spec.as_cst().text_range().start());
        if let Some(&resolved) = self.spec_types.get(&key) {
            return Some(resolved);
        }
        let resolved = self.resolve_type(file, &ty);
        self.spec_types.insert(key, resolved);
        Some(resolved)
    }

    fn var_value(&mut self, file: usize, spec: &ast::ValueSpec, index: usize) -> Option<Value> {
        let declared = self.spec_type(file, spec);
        let values: Vec<ast::Expr> = spec.values().collect();
        let names = spec.names().count();

        let as_value = |ty| Value {
            ty,
            untyped: None,
            constant: false,
        };
        if values.is_empty() {
            return declared.flatten().map(as_value);
        }

        let (operand, expr) = if values.len() == names {
            let expr = values[index].clone();
            let operand = self.infer(file, &expr);
            let operand = operand.and_then(|op| self.single(file, op, expr.as_cst()))?;
            (operand, expr)
        } else if values.len() == 1 {
            let expr = values[0].clone();
            let results = self.spec_tuple(file, spec, &expr, names)?;
            (Operand::value(results[index]), expr)
        } else {
            if index == 0 {
                self.report_count_mismatch(file, spec, names, values.len(), "variable");
            }
            return declared.flatten().map(as_value);
        };

        match declared {
            Some(ty) => {
                let ty = ty?;
                self.assign(file, &operand, ty, expr.as_cst(), "variable declaration");
                Some(as_value(ty))
            }
            None => {
                let ty = self.default_type(file, &operand, expr.as_cst(), "variable declaration")?;
                Some(as_value(ty))
            }
        }
    }

    /// Results of the single multi-value call initializing all names of a spec.
    fn spec_tuple(
        &mut self,
        file: usize,
        spec: &ast::ValueSpec,
        expr: &ast::Expr,
        names: usize,
    ) -> Option<Vec<TypeId>> {
        let key = (file, spec.as_cst().text_range().start());
        if let Some(results) = self.spec_tuples.get(&key) {
            return results.clone();
        }

        let results = match self.infer(file, expr) {
            Some(Operand::Tuple(results)) if results.len() == names => Some(results),
            Some(Operand::Tuple(results)) => {
                let detail = format!(
                    "{} variables but {} returns {} value{}",
                    names,
                    node_text(expr.as_cst()),
                    results.len(),
                    plural(results.len())
                );
                self.report(file, DiagnosticKind::AssignmentMismatch, spec.as_cst().text_range())
                    .message(detail)
                    .emit();
                None
            }
            Some(_) => {
                self.report_count_mismatch(file, spec, names, 1, "variable");
                None
            }
            None => None,
        };
        self.spec_tuples.insert(key, results.clone());
        results
    }

    fn report_count_mismatch(
        &mut self,
        file: usize,
        spec: &ast::ValueSpec,
        names: usize,
        values: usize,
        noun: &str,
    ) {
        let detail = format!(
            "{} {}{} but {} value{}",
            names,
            noun,
            plural(names),
            values,
            plural(values)
        );
        self.report(file, DiagnosticKind::AssignmentMismatch, spec.as_cst().text_range())
            .message(detail)
            .emit();
    }

    fn const_value(
        &mut self,
        file: usize,
        spec: &ast::ValueSpec,
        source: &ast::ValueSpec,
        index: usize,
    ) -> Option<Value> {
        let values: Vec<ast::Expr> = source.values().collect();
        let names = spec.names().count();
        if values.len() != names && index == 0 {
            self.report_count_mismatch(file, spec, names, values.len(), "constant");
        }
        let expr = values.get(index)?.clone();
        let declared = self.spec_type(file, source);

        let operand = self.infer(file, &expr);
        let operand = operand.and_then(|op| self.single(file, op, expr.as_cst()))?;
        if !operand.is_constant() {
            self.report(file, DiagnosticKind::InvalidOperation, expr.as_cst().text_range())
                .message(format!("{} is not constant", node_text(expr.as_cst())))
                .emit();
            return None;
        }

        match declared {
            Some(ty) => {
                let ty = ty?;
                if !matches!(self.types.shape(ty), Shape::Basic(_)) {
                    let described = self.types.describe(ty);
                    let range = source.ty().map_or(spec.as_cst().text_range(), |t| t.as_cst().text_range());
                    self.report(file, DiagnosticKind::InvalidOperation, range)
                        .message(format!("invalid constant type {}", described))
                        .emit();
                    return None;
                }
                self.assign(file, &operand, ty, expr.as_cst(), "constant declaration");
                Some(Value {
                    ty,
                    untyped: None,
                    constant: true,
                })
            }
            None => match operand {
                Operand::Untyped(constant) => Some(Value {
                    ty: self.types.basic(constant.kind.default_type()),
                    untyped: Some(constant),
                    constant: true,
                }),
                Operand::Value { ty, .. } => Some(Value {
                    ty,
                    untyped: None,
                    constant: true,
                }),
                Operand::Nil | Operand::Tuple(_) => None,
            },
        }
    }

    /// Type a value takes when nothing declares one.
    fn default_type(
        &mut self,
        file: usize,
        operand: &Operand,
        node: &SyntaxNode,
        context: &str,
    ) -> Option<TypeId> {
        match operand {
            Operand::Value { ty, .. } => Some(*ty),
            Operand::Untyped(constant) => Some(self.types.basic(constant.kind.default_type())),
            Operand::Nil => {
                self.report(file, DiagnosticKind::UntypedNil, node.text_range())
                    .message(context)
                    .emit();
                None
            }
            Operand::Tuple(_) => None,
        }
    }

    /// Reject calls without exactly one result where one value is needed.
    fn single(&mut self, file: usize, operand: Operand, node: &SyntaxNode) -> Option<Operand> {
        let Operand::Tuple(results) = &operand else {
            return Some(operand);
        };
        let text = node_text(node);
        let detail = if results.is_empty() {
            format!("{} (no value) used as value", text)
        } else {
            let types: Vec<_> = results.iter().map(|&r| self.types.describe(r)).collect();
            format!(
                "multiple-value {} (value of type ({})) in single-value context",
                text,
                types.join(", ")
            )
        };
        self.report(file, DiagnosticKind::InvalidCall, node.text_range())
            .message(detail)
            .emit();
        None
    }

    /// Check that `operand` can be stored in a `target`. Reports when it can't.
    fn assign(
        &mut self,
        file: usize,
        operand: &Operand,
        target: TypeId,
        node: &SyntaxNode,
        context: &str,
    ) -> bool {
        let text = node_text(node);
        let target_name = self.types.describe(target);
        let reason = match operand {
            Operand::Value { ty, .. } => (!self.assignable(*ty, target)).then(|| {
                format!(
                    "{} (value of type {}) as {} value in {}",
                    text,
                    self.types.describe(*ty),
                    target_name,
                    context
                )
            }),
            Operand::Untyped(constant) => {
                let fits = match self.types.shape(target) {
                    Shape::Basic(kind) => constant.representable(kind),
                    Shape::Unknown => Ok(()),
                    _ => Err(super::constant::Unrepresentable::Mismatched),
                };
                fits.err().map(|why| {
                    format!(
                        "{} ({} constant) as {} value in {}{}",
                        text,
                        constant.kind.describe(),
                        target_name,
                        context,
                        why.suffix()
                    )
                })
            }
            Operand::Nil => match self.types.shape(target) {
                Shape::Pointer | Shape::Slice | Shape::Map | Shape::Signature | Shape::Unknown => None,
                _ => Some(format!("nil as {} value in {}", target_name, context)),
            },
            Operand::Tuple(_) => None,
        };

        let Some(reason) = reason else {
            return true;
        };
        self.report(file, DiagnosticKind::MismatchedTypes, node.text_range())
            .message(reason)
            .emit();
        false
    }

    /// Go assignability for typed values.
    fn assignable(&mut self, from: TypeId, to: TypeId) -> bool {
        if self.types.identical(from, to) {
            return true;
        }
        if self.types.is_defined(from) && self.types.is_defined(to) {
            return false;
        }
        match (self.types.underlying(from), self.types.underlying(to)) {
            (Some(a), Some(b)) => self.types.identical(a, b),
            _ => true,
        }
    }

    fn convertible(&mut self, from: TypeId, to: TypeId) -> bool {
        if self.assignable(from, to) {
            return true;
        }
        let (Some(a), Some(b)) = (self.types.underlying(from), self.types.underlying(to)) else {
            return true;
        };
        if self.types.identical(a, b) {
            return true;
        }
        match (self.types.shape(a), self.types.shape(b)) {
            (Shape::Basic(x), Shape::Basic(y)) => {
                (x.is_numeric() && y.is_numeric()) || (x.is_integer() && y == BasicKind::String)
            }
            (Shape::Basic(BasicKind::String), Shape::Slice) => self.is_byte_or_rune_slice(b),
            (Shape::Slice, Shape::Basic(BasicKind::String)) => self.is_byte_or_rune_slice(a),
            (Shape::Pointer, Shape::Pointer) => match (self.types.elem(a), self.types.elem(b)) {
                (Some(x), Some(y)) => match (self.types.underlying(x), self.types.underlying(y)) {
                    (Some(x), Some(y)) => self.types.identical(x, y),
                    _ => true,
                },
                _ => false,
            },
            _ => false,
        }
    }

    fn is_byte_or_rune_slice(&mut self, slice: TypeId) -> bool {
        let Some(elem) = self.types.elem(slice) else {
            return false;
        };
        matches!(
            self.types.shape(elem),
            Shape::Basic(BasicKind::Uint8 | BasicKind::Int32)
        )
    }

    pub(super) fn infer(&mut self, file: usize, expr: &ast::Expr) -> Option<Operand> {
        match expr {
            ast::Expr::Literal(lit) => {
                let token = lit.token()?;
                match Constant::from_literal(token.kind(), token.text()) {
                    Some(constant) => Some(Operand::Untyped(constant)),
                    None => {
                        self.report(file, DiagnosticKind::InvalidOperation, token.text_range())
                            .message(format!("malformed literal {}", token.text()))
                            .emit();
                        None
                    }
                }
            }
            ast::Expr::Name(name) => self.infer_name(file, name),
            ast::Expr::Composite(lit) => self.infer_composite(file, lit),
            ast::Expr::Unary(unary) => match unary.op()?.kind() {
                SyntaxKind::Minus => self.infer_sign(file, unary, true),
                SyntaxKind::Plus => self.infer_sign(file, unary, false),
                _ => self.infer_address(file, unary),
            },
            ast::Expr::Paren(paren) => self.infer(file, &paren.inner()?),
            ast::Expr::Call(call) => self.infer_call(file, call),
        }
    }

    fn infer_name(&mut self, file: usize, name_ref: &ast::NameRef) -> Option<Operand> {
        let name = name_ref.name()?;
        let range = name_ref.as_cst().text_range();

        if let Some(qualifier) = name_ref.qualifier() {
            let decl = self.qualified(file, &qualifier, &name)?;
            return match decl.kind {
                DeclKind::Type => {
                    self.report(file, DiagnosticKind::NotAnExpression, range)
                        .message(format!("{}.{}", qualifier.text(), name.text()))
                        .emit();
                    None
                }
                DeclKind::Const if decl.untyped => {
                    let kind = decl.ty.basic().map_or(UntypedKind::Int, UntypedKind::from_default);
                    Some(Operand::Untyped(Constant::new(kind, ConstValue::Unknown)))
                }
                kind => Some(Operand::Value {
                    ty: self.types.import(&decl.ty),
                    constant: kind == DeclKind::Const,
                }),
            };
        }

        let text = name.text();
        if let Some(&object) = self.scope.get(text) {
            if let ObjectKind::Type(_) = self.objects[object].kind {
                self.report(file, DiagnosticKind::NotAnExpression, range)
                    .message(text)
                    .emit();
                return None;
            }
            let value = self.resolve_value(object)?;
            return Some(match value.untyped {
                Some(constant) => Operand::Untyped(constant),
                None => Operand::Value {
                    ty: value.ty,
                    constant: value.constant,
                },
            });
        }

        if let Some(constant) = universe_bool(text) {
            return Some(Operand::Untyped(constant));
        }
        let problem = match text {
            "nil" => return Some(Operand::Nil),
            "iota" => match self.iota {
                Some(iota) => {
                    let value = ConstValue::Int(iota as i128);
                    return Some(Operand::Untyped(Constant::new(UntypedKind::Int, value)));
                }
                None => (
                    DiagnosticKind::InvalidOperation,
                    "cannot use iota outside constant declaration".to_string(),
                ),
            },
            "_" => (DiagnosticKind::InvalidOperation, "cannot use _ as value".to_string()),
            _ if BasicKind::from_name(text).is_some() => {
                (DiagnosticKind::NotAnExpression, text.to_string())
            }
            _ if Builtin::from_name(text).is_some() => (
                DiagnosticKind::InvalidOperation,
                format!("{} (built-in function) must be called", text),
            ),
            _ if self.use_import(file, text).is_some() => {
                (DiagnosticKind::NotAnExpression, text.to_string())
            }
            _ => (DiagnosticKind::Undefined, text.to_string()),
        };
        self.report(file, problem.0, range).message(problem.1).emit();
        None
    }

    fn infer_composite(&mut self, file: usize, lit: &ast::CompositeLit) -> Option<Operand> {
        let (ty, range) = if let Some(ty) = lit.ty() {
            (self.resolve_type(file, &ty)?, ty.as_cst().text_range())
        } else {
            let name = lit.type_name()?;
            let ty = self.resolve_type_name(file, name.qualifier(), name.name())?;
            (ty, name.as_cst().text_range())
        };
        match self.types.shape(ty) {
            Shape::Struct | Shape::Slice | Shape::Map | Shape::Unknown => Some(Operand::value(ty)),
            _ => {
                let described = self.types.describe(ty);
                self.report(file, DiagnosticKind::InvalidOperation, range)
                    .message(format!("invalid composite literal type {}", described))
                    .emit();
                None
            }
        }
    }

    /// `-x` or `+x` on a numeric operand. Untyped constants are folded.
    fn infer_sign(&mut self, file: usize, unary: &ast::UnaryExpr, negate: bool) -> Option<Operand> {
        let operand = unary.operand()?;
        let inner = self.infer(file, &operand)?;
        let inner = self.single(file, inner, operand.as_cst())?;

        let numeric = match &inner {
            Operand::Untyped(constant) => {
                !matches!(constant.kind, UntypedKind::Bool | UntypedKind::String)
            }
            Operand::Value { ty, .. } => match self.types.shape(*ty) {
                Shape::Basic(kind) => kind.is_numeric(),
                Shape::Unknown => true,
                _ => false,
            },
            _ => false,
        };
        if !numeric {
            let op = if negate { '-' } else { '+' };
            self.report(file, DiagnosticKind::InvalidOperation, unary.as_cst().text_range())
                .message(format!(
                    "operator {} not defined on {}",
                    op,
                    node_text(operand.as_cst())
                ))
                .emit();
            return None;
        }

        Some(match inner {
            Operand::Untyped(constant) if negate => Operand::Untyped(constant.negate()),
            other => other,
        })
    }

    /// `&T{...}` or `&v` for a package-level variable.
    fn infer_address(&mut self, file: usize, unary: &ast::UnaryExpr) -> Option<Operand> {
        let mut operand = unary.operand()?;
        while let ast::Expr::Paren(paren) = &operand {
            operand = paren.inner()?;
        }
        let addressable = match &operand {
            ast::Expr::Composite(_) => true,
            ast::Expr::Name(name) => self.is_variable(file, name),
            _ => false,
        };
        let inner = self.infer(file, &operand);
        let inner = inner.and_then(|op| self.single(file, op, operand.as_cst()))?;

        match inner {
            Operand::Value { ty, .. } if addressable => {
                Some(Operand::value(self.types.push(TypeData::Pointer(ty))))
            }
            _ => {
                self.report(file, DiagnosticKind::InvalidOperation, unary.as_cst().text_range())
                    .message(format!("cannot take address of {}", node_text(operand.as_cst())))
                    .emit();
                None
            }
        }
    }

    /// Whether a name denotes a variable. No diagnostics, no resolution.
    fn is_variable(&self, file: usize, name: &ast::NameRef) -> bool {
        let Some(token) = name.name() else {
            return false;
        };
        match name.qualifier() {
            Some(qualifier) => self.files[file]
                .imports
                .get(qualifier.text())
                .and_then(|import| import.package.decl(token.text()))
                .is_some_and(|decl| decl.kind == DeclKind::Var),
            None => self
                .scope
                .get(token.text())
                .is_some_and(|&o| matches!(self.objects[o].kind, ObjectKind::Var { .. })),
        }
    }

    fn classify(&self, file: usize, name: &ast::NameRef) -> Callee {
        let Some(token) = name.name() else {
            return Callee::Value;
        };
        if let Some(qualifier) = name.qualifier() {
            let is_type = self.files[file]
                .imports
                .get(qualifier.text())
                .and_then(|import| import.package.decl(token.text()))
                .is_some_and(|decl| decl.kind == DeclKind::Type);
            return if is_type { Callee::Type } else { Callee::Value };
        }
        match self.scope.get(token.text()) {
            Some(&o) if matches!(self.objects[o].kind, ObjectKind::Type(_)) => Callee::Type,
            Some(_) => Callee::Value,
            None if BasicKind::from_name(token.text()).is_some() => Callee::Type,
            None => Builtin::from_name(token.text()).map_or(Callee::Value, Callee::Builtin),
        }
    }

    fn infer_call(&mut self, file: usize, call: &ast::CallExpr) -> Option<Operand> {
        let callee = call.callee()?;
        let args = call.args();

        if let Some(ty) = ast::Type::cast(callee.clone()) {
            let target = self.resolve_type(file, &ty)?;
            return self.convert(file, call, target, &args);
        }
        let callee = ast::Expr::cast(callee)?;
        if let ast::Expr::Name(name) = &callee {
            match self.classify(file, name) {
                Callee::Type => {
                    let target = self.resolve_type_name(file, name.qualifier(), name.name())?;
                    return self.convert(file, call, target, &args);
                }
                Callee::Builtin(builtin) => return self.builtin(file, call, builtin, &args),
                Callee::Value => {}
            }
        }

        let callee_text = node_text(callee.as_cst());
        let operand = self.infer(file, &callee);
        let operand = operand.and_then(|op| self.single(file, op, callee.as_cst()))?;
        let signature = match &operand {
            Operand::Value { ty, .. } => self.types.signature(*ty),
            _ => None,
        };
        let Some((params, results, variadic)) = signature else {
            self.report(file, DiagnosticKind::InvalidCall, call.as_cst().text_range())
                .message(format!("cannot call non-function {}", callee_text))
                .emit();
            return None;
        };

        self.check_args(file, call, &args, &params, variadic, &callee_text);
        match results.as_slice() {
            [single] => Some(Operand::value(*single)),
            _ => Some(Operand::Tuple(results)),
        }
    }

    fn check_args(
        &mut self,
        file: usize,
        call: &ast::CallExpr,
        args: &[SyntaxNode],
        params: &[TypeId],
        variadic: bool,
        callee: &str,
    ) {
        let mut operands = Vec::new();
        for arg in args {
            let Some(expr) = ast::Expr::cast(arg.clone()) else {
                self.report(file, DiagnosticKind::NotAnExpression, arg.text_range())
                    .message(node_text(arg))
                    .emit();
                return;
            };
            let Some(operand) = self.infer(file, &expr) else {
                return;
            };
            operands.push((operand, arg.clone()));
        }

        // f(g()) passes all results of g.
        if let [(Operand::Tuple(results), node)] = operands.as_slice()
            && results.len() > 1
        {
            let expanded: Vec<_> = results
                .iter()
                .map(|&ty| (Operand::value(ty), node.clone()))
                .collect();
            operands = expanded;
        }

        let required = if variadic { params.len() - 1 } else { params.len() };
        if operands.len() < required || (!variadic && operands.len() > params.len()) {
            let detail = if operands.len() < required {
                format!("not enough arguments in call to {}", callee)
            } else {
                format!("too many arguments in call to {}", callee)
            };
            self.report(file, DiagnosticKind::InvalidCall, call.as_cst().text_range())
                .message(detail)
                .emit();
            return;
        }

        let context = format!("argument to {}", callee);
        for (i, (operand, node)) in operands.into_iter().enumerate() {
            let Some(operand) = self.single(file, operand, &node) else {
                continue;
            };
            let target = if variadic && i + 1 >= params.len() {
                let last = params[params.len() - 1];
                match self.types.elem(last) {
                    Some(elem) => elem,
                    None => continue,
                }
            } else {
                params[i]
            };
            self.assign(file, &operand, target, &node, &context);
        }
    }

    /// `T(x)`: a conversion.
    fn convert(
        &mut self,
        file: usize,
        call: &ast::CallExpr,
        target: TypeId,
        args: &[SyntaxNode],
    ) -> Option<Operand> {
        let target_name = self.types.describe(target);
        let [arg] = args else {
            let detail = if args.is_empty() {
                format!("missing argument in conversion to {}", target_name)
            } else {
                format!("too many arguments in conversion to {}", target_name)
            };
            self.report(file, DiagnosticKind::InvalidCall, call.as_cst().text_range())
                .message(detail)
                .emit();
            return None;
        };
        let Some(expr) = ast::Expr::cast(arg.clone()) else {
            self.report(file, DiagnosticKind::NotAnExpression, arg.text_range())
                .message(node_text(arg))
                .emit();
            return None;
        };
        let operand = self.infer(file, &expr);
        let operand = operand.and_then(|op| self.single(file, op, arg))?;

        let shape = self.types.shape(target);
        let ok = match &operand {
            Operand::Untyped(constant) => match shape {
                Shape::Basic(kind) => {
                    constant.representable(kind).is_ok()
                        || (kind == BasicKind::String
                            && matches!(constant.kind, UntypedKind::Int | UntypedKind::Rune))
                }
                Shape::Slice => {
                    constant.kind == UntypedKind::String && self.is_byte_or_rune_slice_of(target)
                }
                Shape::Unknown => true,
                _ => false,
            },
            Operand::Nil => matches!(
                shape,
                Shape::Pointer | Shape::Slice | Shape::Map | Shape::Signature | Shape::Unknown
            ),
            Operand::Value { ty, .. } => self.convertible(*ty, target),
            Operand::Tuple(_) => false,
        };
        if !ok {
            let text = node_text(arg);
            let from = match &operand {
                Operand::Value { ty, .. } => {
                    format!("{} (value of type {})", text, self.types.describe(*ty))
                }
                Operand::Untyped(constant) => format!("{} ({} constant)", text, constant.kind.describe()),
                _ => text,
            };
            let detail = format!("cannot convert {} to type {}", from, target_name);
            self.report(file, DiagnosticKind::InvalidOperation, call.as_cst().text_range())
                .message(detail)
                .emit();
            return None;
        }

        let constant = operand.is_constant() && matches!(shape, Shape::Basic(_));
        Some(Operand::Value {
            ty: target,
            constant,
        })
    }

    fn is_byte_or_rune_slice_of(&mut self, ty: TypeId) -> bool {
        match self.types.underlying(ty) {
            Some(slice) => self.is_byte_or_rune_slice(slice),
            None => false,
        }
    }

    fn builtin(
        &mut self,
        file: usize,
        call: &ast::CallExpr,
        builtin: Builtin,
        args: &[SyntaxNode],
    ) -> Option<Operand> {
        let range = call.as_cst().text_range();
        match builtin {
            Builtin::New => {
                let [arg] = args else {
                    self.report_arg_count(file, range, "new", args.len(), "1");
                    return None;
                };
                let ty = self.type_arg(file, arg)?;
                Some(Operand::value(self.types.push(TypeData::Pointer(ty))))
            }
            Builtin::Make => {
                let Some((first, rest)) = args.split_first() else {
                    self.report_arg_count(file, range, "make", 0, "at least 1");
                    return None;
                };
                let ty = self.type_arg(file, first)?;
                let (min, max) = match self.types.shape(ty) {
                    Shape::Slice => (1, 2),
                    Shape::Map => (0, 1),
                    _ => {
                        let described = self.types.describe(ty);
                        self.report(file, DiagnosticKind::InvalidCall, first.text_range())
                            .message(format!("cannot make {}; type must be slice or map", described))
                            .emit();
                        return None;
                    }
                };
                if rest.len() < min || rest.len() > max {
                    let expected = if min == max {
                        format!("{}", min + 1)
                    } else {
                        format!("{} or {}", min + 1, max + 1)
                    };
                    self.report_arg_count(file, range, "make", args.len(), &expected);
                    return None;
                }
                let int = self.types.basic(BasicKind::Int);
                for size in rest {
                    let Some(expr) = ast::Expr::cast(size.clone()) else {
                        continue;
                    };
                    let operand = self.infer(file, &expr);
                    if let Some(operand) = operand.and_then(|op| self.single(file, op, size)) {
                        self.check_size(file, &operand, int, size);
                    }
                }
                Some(Operand::value(ty))
            }
            Builtin::Len => {
                let [arg] = args else {
                    self.report_arg_count(file, range, "len", args.len(), "1");
                    return None;
                };
                let Some(expr) = ast::Expr::cast(arg.clone()) else {
                    self.report(file, DiagnosticKind::NotAnExpression, arg.text_range())
                        .message(node_text(arg))
                        .emit();
                    return None;
                };
                let operand = self.infer(file, &expr);
                let operand = operand.and_then(|op| self.single(file, op, arg))?;
                let int = self.types.basic(BasicKind::Int);
                let shape = match &operand {
                    Operand::Value { ty, .. } => self.types.shape(*ty),
                    _ => Shape::Unknown,
                };
                match (operand, shape) {
                    // len of a constant string is a constant.
                    (Operand::Untyped(constant), _) if constant.kind == UntypedKind::String => {
                        Some(Operand::Value {
                            ty: int,
                            constant: true,
                        })
                    }
                    (Operand::Value { constant, .. }, Shape::Basic(BasicKind::String)) => {
                        Some(Operand::Value { ty: int, constant })
                    }
                    (Operand::Value { .. }, Shape::Slice | Shape::Map | Shape::Unknown) => {
                        Some(Operand::value(int))
                    }
                    _ => {
                        self.report(file, DiagnosticKind::InvalidOperation, arg.text_range())
                            .message(format!("invalid argument {} for built-in len", node_text(arg)))
                            .emit();
                        None
                    }
                }
            }
        }
    }

    /// Sizes given to `make` are integers.
    fn check_size(&mut self, file: usize, operand: &Operand, int: TypeId, node: &SyntaxNode) {
        let is_integer = match operand {
            Operand::Untyped(constant) => constant.representable(BasicKind::Int).is_ok(),
            Operand::Value { ty, .. } => {
                matches!(self.types.shape(*ty), Shape::Basic(kind) if kind.is_integer())
            }
            _ => false,
        };
        if !is_integer {
            self.assign(file, operand, int, node, "argument to make");
        }
    }

    fn report_arg_count(&mut self, file: usize, range: TextRange, name: &str, found: usize, expected: &str) {
        self.report(file, DiagnosticKind::InvalidCall, range)
            .message(format!("{} expects {} arguments; found {}", name, expected, found))
            .emit();
    }

    /// A builtin argument in type position.
    fn type_arg(&mut self, file: usize, node: &SyntaxNode) -> Option<TypeId> {
        if let Some(ty) = ast::Type::cast(node.clone()) {
            return self.resolve_type(file, &ty);
        }
        match ast::Expr::cast(node.clone()) {
            Some(ast::Expr::Name(name)) => self.resolve_type_name(file, name.qualifier(), name.name()),
            _ => {
                self.report(file, DiagnosticKind::NotAType, node.text_range())
                    .message(node_text(node))
                    .emit();
                None
            }
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
