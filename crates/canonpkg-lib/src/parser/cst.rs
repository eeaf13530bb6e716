//! Syntax kinds for the Go subset.
//!
//! One `SyntaxKind` enum covers lexer tokens and parser nodes. Only the
//! token variants carry logos attributes.
//! `GoLang` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

/// Tokens, then nodes, then the `__LAST` sentinel. `repr(u16)` backs the
/// conversion in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    #[token("...")]
    Ellipsis,

    #[token("*")]
    Star,

    #[token("&")]
    Amp,

    #[token("=")]
    Equals,

    #[token("-")]
    Minus,

    #[token("+")]
    Plus,

    /// Any other operator. Only meaningful inside function bodies, which are
    /// kept as raw token blocks. Operators led by `&` or `*` split into
    /// `Amp`/`Star` and a remainder.
    #[token("/")]
    #[token("%")]
    #[token("|")]
    #[token("^")]
    #[token("<<")]
    #[token(">>")]
    #[token("+=")]
    #[token("-=")]
    #[token("/=")]
    #[token("%=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("||")]
    #[token("<-")]
    #[token("++")]
    #[token("--")]
    #[token("==")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    #[token("!")]
    #[token(":=")]
    #[token(":")]
    #[token("~")]
    Operator,

    #[token("package")]
    KwPackage,

    #[token("import")]
    KwImport,

    #[token("type")]
    KwType,

    #[token("var")]
    KwVar,

    #[token("const")]
    KwConst,

    #[token("func")]
    KwFunc,

    #[token("struct")]
    KwStruct,

    #[token("map")]
    KwMap,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    IntLit,

    #[regex(r"[0-9]+\.[0-9]*(?:[eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    FloatLit,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    #[regex(r"`[^`]*`")]
    StringLit,

    #[regex(r"'(?:[^'\\\n]|\\.)*'")]
    CharLit,

    /// Identifier. Defined after keywords so they take precedence.
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Id,

    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    /// Run of characters no other token accepts.
    Garbage,
    Error,

    // Nodes
    SourceFile,
    PackageClause,
    ImportDecl,
    ImportSpec,
    TypeDecl,
    TypeSpec,
    VarDecl,
    ConstDecl,
    ValueSpec,
    FuncDecl,
    Receiver,
    ParamList,
    Param,
    Results,
    Block,

    TypeName,
    PointerType,
    SliceType,
    MapType,
    StructType,
    FieldDecl,
    FuncType,
    ParenType,

    Literal,
    NameRef,
    CompositeLit,
    LitBody,
    UnaryExpr,
    ParenExpr,
    CallExpr,
    ArgList,

    // Sentinel for `kind_from_raw` bounds checks.
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment | BlockComment)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            KwPackage | KwImport | KwType | KwVar | KwConst | KwFunc | KwStruct | KwMap
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Rowan language tag for Go-subset trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoLang {}

impl Language for GoLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: bounds checked above; SyntaxKind is repr(u16).
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<GoLang>;
pub type SyntaxToken = rowan::SyntaxToken<GoLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// Set of token kinds, one bit per kind.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Fails const evaluation for kinds past bit 63.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn single(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
        TokenSet(1 << kind)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..64u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

pub mod token_sets {
    use super::*;

    /// Tokens that start a top-level declaration. Recovery stops here.
    pub const DECL_FIRST: TokenSet = TokenSet::new(&[KwType, KwVar, KwConst, KwFunc, KwImport]);

    pub const TYPE_FIRST: TokenSet = TokenSet::new(&[
        Id,
        Star,
        BracketOpen,
        KwMap,
        KwStruct,
        KwFunc,
        ParenOpen,
    ]);

    pub const EXPR_FIRST: TokenSet = TokenSet::new(&[
        Id,
        IntLit,
        FloatLit,
        StringLit,
        CharLit,
        Amp,
        Minus,
        Plus,
        ParenOpen,
        BracketOpen,
        KwMap,
        KwStruct,
    ]);

    pub const LITERALS: TokenSet = TokenSet::new(&[IntLit, FloatLit, StringLit, CharLit]);

    /// Tokens that end a statement-like construct without a `;`.
    pub const CLOSERS: TokenSet = TokenSet::new(&[ParenClose, BraceClose]);

    pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, Newline, LineComment, BlockComment]);
}
