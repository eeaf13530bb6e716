//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(SourceFile, SourceFile);
ast_node!(PackageClause, PackageClause);
ast_node!(ImportDecl, ImportDecl);
ast_node!(ImportSpec, ImportSpec);
ast_node!(TypeDecl, TypeDecl);
ast_node!(TypeSpec, TypeSpec);
ast_node!(VarDecl, VarDecl);
ast_node!(ConstDecl, ConstDecl);
ast_node!(ValueSpec, ValueSpec);
ast_node!(FuncDecl, FuncDecl);
ast_node!(Receiver, Receiver);
ast_node!(ParamList, ParamList);
ast_node!(Param, Param);
ast_node!(Results, Results);
ast_node!(Block, Block);

ast_node!(TypeName, TypeName);
ast_node!(PointerType, PointerType);
ast_node!(SliceType, SliceType);
ast_node!(MapType, MapType);
ast_node!(StructType, StructType);
ast_node!(FieldDecl, FieldDecl);
ast_node!(FuncType, FuncType);
ast_node!(ParenType, ParenType);

ast_node!(Literal, Literal);
ast_node!(NameRef, NameRef);
ast_node!(CompositeLit, CompositeLit);
ast_node!(UnaryExpr, UnaryExpr);
ast_node!(ParenExpr, ParenExpr);
ast_node!(CallExpr, CallExpr);
ast_node!(ArgList, ArgList);

fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens().filter_map(|it| it.into_token())
}

fn token_of(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    tokens(node).find(|t| t.kind() == kind)
}

/// Top-level declaration other than imports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decl {
    Type(TypeDecl),
    Var(VarDecl),
    Const(ConstDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::TypeDecl => TypeDecl::cast(node).map(Decl::Type),
            SyntaxKind::VarDecl => VarDecl::cast(node).map(Decl::Var),
            SyntaxKind::ConstDecl => ConstDecl::cast(node).map(Decl::Const),
            SyntaxKind::FuncDecl => FuncDecl::cast(node).map(Decl::Func),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Decl::Type(n) => n.as_cst(),
            Decl::Var(n) => n.as_cst(),
            Decl::Const(n) => n.as_cst(),
            Decl::Func(n) => n.as_cst(),
        }
    }
}

/// Type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Name(TypeName),
    Pointer(PointerType),
    Slice(SliceType),
    Map(MapType),
    Struct(StructType),
    Func(FuncType),
    Paren(ParenType),
}

impl Type {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::TypeName => TypeName::cast(node).map(Type::Name),
            SyntaxKind::PointerType => PointerType::cast(node).map(Type::Pointer),
            SyntaxKind::SliceType => SliceType::cast(node).map(Type::Slice),
            SyntaxKind::MapType => MapType::cast(node).map(Type::Map),
            SyntaxKind::StructType => StructType::cast(node).map(Type::Struct),
            SyntaxKind::FuncType => FuncType::cast(node).map(Type::Func),
            SyntaxKind::ParenType => ParenType::cast(node).map(Type::Paren),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Type::Name(n) => n.as_cst(),
            Type::Pointer(n) => n.as_cst(),
            Type::Slice(n) => n.as_cst(),
            Type::Map(n) => n.as_cst(),
            Type::Struct(n) => n.as_cst(),
            Type::Func(n) => n.as_cst(),
            Type::Paren(n) => n.as_cst(),
        }
    }
}

/// Initializer expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    Name(NameRef),
    Composite(CompositeLit),
    Unary(UnaryExpr),
    Paren(ParenExpr),
    Call(CallExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Literal => Literal::cast(node).map(Expr::Literal),
            SyntaxKind::NameRef => NameRef::cast(node).map(Expr::Name),
            SyntaxKind::CompositeLit => CompositeLit::cast(node).map(Expr::Composite),
            SyntaxKind::UnaryExpr => UnaryExpr::cast(node).map(Expr::Unary),
            SyntaxKind::ParenExpr => ParenExpr::cast(node).map(Expr::Paren),
            SyntaxKind::CallExpr => CallExpr::cast(node).map(Expr::Call),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => n.as_cst(),
            Expr::Name(n) => n.as_cst(),
            Expr::Composite(n) => n.as_cst(),
            Expr::Unary(n) => n.as_cst(),
            Expr::Paren(n) => n.as_cst(),
            Expr::Call(n) => n.as_cst(),
        }
    }
}

impl SourceFile {
    pub fn package_clause(&self) -> Option<PackageClause> {
        self.0.children().find_map(PackageClause::cast)
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportDecl> + '_ {
        self.0.children().filter_map(ImportDecl::cast)
    }

    pub fn decls(&self) -> impl Iterator<Item = Decl> + '_ {
        self.0.children().filter_map(Decl::cast)
    }
}

impl PackageClause {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::Id)
    }
}

impl ImportDecl {
    pub fn specs(&self) -> impl Iterator<Item = ImportSpec> + '_ {
        self.0.children().filter_map(ImportSpec::cast)
    }
}

impl ImportSpec {
    /// Explicit local name, `_` included.
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::Id)
    }

    pub fn dot(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::Dot)
    }

    pub fn path(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::StringLit)
    }
}

impl TypeDecl {
    pub fn specs(&self) -> impl Iterator<Item = TypeSpec> + '_ {
        self.0.children().filter_map(TypeSpec::cast)
    }
}

impl TypeSpec {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::Id)
    }

    /// `type A = B` declares an alias rather than a new named type.
    pub fn is_alias(&self) -> bool {
        token_of(&self.0, SyntaxKind::Equals).is_some()
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

impl VarDecl {
    pub fn specs(&self) -> impl Iterator<Item = ValueSpec> + '_ {
        self.0.children().filter_map(ValueSpec::cast)
    }
}

impl ConstDecl {
    pub fn specs(&self) -> impl Iterator<Item = ValueSpec> + '_ {
        self.0.children().filter_map(ValueSpec::cast)
    }
}

impl ValueSpec {
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        tokens(&self.0).filter(|t| t.kind() == SyntaxKind::Id)
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }

    pub fn values(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }

    pub fn has_values(&self) -> bool {
        token_of(&self.0, SyntaxKind::Equals).is_some()
    }
}

impl FuncDecl {
    pub fn receiver(&self) -> Option<Receiver> {
        self.0.children().find_map(Receiver::cast)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::Id)
    }

    pub fn params(&self) -> Option<ParamList> {
        self.0.children().find_map(ParamList::cast)
    }

    pub fn results(&self) -> Option<Results> {
        self.0.children().find_map(Results::cast)
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

impl Receiver {
    pub fn param(&self) -> Option<Param> {
        self.0.children().find_map(Param::cast)
    }
}

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.0.children().filter_map(Param::cast)
    }
}

impl Param {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::Id)
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }

    pub fn is_variadic(&self) -> bool {
        token_of(&self.0, SyntaxKind::Ellipsis).is_some()
    }
}

impl Results {
    /// Parenthesized result list, possibly with names.
    pub fn list(&self) -> Option<ParamList> {
        self.0.children().find_map(ParamList::cast)
    }

    /// Single unparenthesized result type.
    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

impl TypeName {
    /// Package qualifier of `pkg.Name`.
    pub fn qualifier(&self) -> Option<SyntaxToken> {
        qualified_parts(&self.0).0
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        qualified_parts(&self.0).1
    }
}

impl NameRef {
    pub fn qualifier(&self) -> Option<SyntaxToken> {
        qualified_parts(&self.0).0
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        qualified_parts(&self.0).1
    }
}

fn qualified_parts(node: &SyntaxNode) -> (Option<SyntaxToken>, Option<SyntaxToken>) {
    let mut ids = tokens(node).filter(|t| t.kind() == SyntaxKind::Id);
    let first = ids.next();
    match ids.next() {
        Some(second) => (first, Some(second)),
        None => (None, first),
    }
}

impl PointerType {
    pub fn elem(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

impl SliceType {
    pub fn elem(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

impl MapType {
    pub fn key(&self) -> Option<Type> {
        self.0.children().filter_map(Type::cast).next()
    }

    pub fn value(&self) -> Option<Type> {
        self.0.children().filter_map(Type::cast).nth(1)
    }
}

impl StructType {
    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> + '_ {
        self.0.children().filter_map(FieldDecl::cast)
    }
}

impl FieldDecl {
    /// Field names; empty for an embedded field.
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        tokens(&self.0).filter(|t| t.kind() == SyntaxKind::Id)
    }

    pub fn is_embedded(&self) -> bool {
        self.names().next().is_none()
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }

    pub fn tag(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::StringLit)
    }
}

impl FuncType {
    pub fn params(&self) -> Option<ParamList> {
        self.0.children().find_map(ParamList::cast)
    }

    pub fn results(&self) -> Option<Results> {
        self.0.children().find_map(Results::cast)
    }
}

impl ParenType {
    pub fn inner(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        tokens(&self.0).find(|t| !t.kind().is_trivia())
    }
}

impl CompositeLit {
    /// Literal type written as a type expression: `[]int{}`, `struct{}{}`.
    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }

    /// Literal type written as a (possibly qualified) name: `T{}`, `sync.Mutex{}`.
    pub fn type_name(&self) -> Option<NameRef> {
        self.0.children().find_map(NameRef::cast)
    }
}

impl UnaryExpr {
    /// `&`, `-` or `+`.
    pub fn op(&self) -> Option<SyntaxToken> {
        tokens(&self.0).find(|t| !t.kind().is_trivia())
    }

    pub fn operand(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl CallExpr {
    /// The callee: an expression, or a type expression for conversions like `[]byte(s)`.
    pub fn callee(&self) -> Option<SyntaxNode> {
        self.0.children().next()
    }

    /// Argument nodes: expressions, or bare types for builtins like `new(T)`.
    pub fn args(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .find_map(ArgList::cast)
            .map(|list| {
                list.0
                    .children()
                    .filter(|n| Expr::cast(n.clone()).is_some() || Type::cast(n.clone()).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }
}
