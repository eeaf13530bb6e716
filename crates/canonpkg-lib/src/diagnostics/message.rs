use rowan::TextRange;

use crate::source_map::SourceId;

/// Diagnostic kinds, grouped by the stage that reports them.
///
/// Parse kinds come first; a package with any of them never reaches the
/// checker, so the two groups never mix in one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Delimiters left open
    UnclosedBlock,
    UnclosedParen,

    // Something required is missing
    MissingPackageClause,
    ExpectedIdent,
    ExpectedType,
    ExpectedExpr,
    ExpectedImportPath,
    ExpectedDecl,
    ExpectedTerminator,

    // Something that doesn't belong
    UnexpectedToken,
    InvalidToken,

    // Package and import structure
    InvalidPackageName,
    PackageNameMismatch,
    InvalidImportPath,
    DotImport,
    DuplicateImport,
    UnusedImport,

    // Declarations
    Redeclared,
    ImportNameConflict,
    ShadowsPredeclared,
    InvalidRecursiveType,
    InvalidReceiver,
    DuplicateMethod,
    FieldMethodConflict,
    InvalidMapKey,
    InvalidParameters,

    // Name resolution
    Undefined,
    NotExported,
    NotAType,
    NotAnExpression,

    // Initializers
    MismatchedTypes,
    UntypedNil,
    AssignmentMismatch,
    InvalidCall,
    InvalidOperation,
    Unsupported,
    InitializationCycle,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::ShadowsPredeclared => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether the parser reports this kind.
    pub fn is_syntax_error(&self) -> bool {
        *self <= Self::InvalidToken
    }

    /// Default hint for this kind, included in rendered output.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingPackageClause => Some("every file starts with `package name`"),
            Self::DotImport => Some("import the package by name and qualify its members"),
            Self::UnusedImport => Some("remove the import or use `_` as its name"),
            Self::InvalidRecursiveType => Some("break the cycle with a pointer or slice"),
            _ => None,
        }
    }

    /// Base message, used when no detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedBlock => "missing closing `}`",
            Self::UnclosedParen => "missing closing `)`",

            Self::MissingPackageClause => "expected `package` clause",
            Self::ExpectedIdent => "expected identifier",
            Self::ExpectedType => "expected type",
            Self::ExpectedExpr => "expected expression",
            Self::ExpectedImportPath => "expected import path string",
            Self::ExpectedDecl => "expected declaration",
            Self::ExpectedTerminator => "expected `;` or newline",

            Self::UnexpectedToken => "unexpected token",
            Self::InvalidToken => "invalid character",

            Self::InvalidPackageName => "invalid package name",
            Self::PackageNameMismatch => "mismatched package names",
            Self::InvalidImportPath => "invalid import path",
            Self::DotImport => "dot imports are not supported",
            Self::DuplicateImport => "import name declared twice",
            Self::UnusedImport => "imported and not used",

            Self::Redeclared => "redeclared in this block",
            Self::ImportNameConflict => "already declared through import",
            Self::ShadowsPredeclared => "declaration shadows a predeclared type",
            Self::InvalidRecursiveType => "invalid recursive type",
            Self::InvalidReceiver => "invalid receiver type",
            Self::DuplicateMethod => "method already declared",
            Self::FieldMethodConflict => "field and method with the same name",
            Self::InvalidMapKey => "invalid map key type",
            Self::InvalidParameters => "invalid parameter list",

            Self::Undefined => "undefined",
            Self::NotExported => "name not exported by package",
            Self::NotAType => "not a type",
            Self::NotAnExpression => "not an expression",

            Self::MismatchedTypes => "mismatched types",
            Self::UntypedNil => "use of untyped nil",
            Self::AssignmentMismatch => "assignment mismatch",
            Self::InvalidCall => "invalid call",
            Self::InvalidOperation => "invalid operation",
            Self::Unsupported => "not supported",
            Self::InitializationCycle => "initialization cycle",
        }
    }

    /// Template for custom messages. `{}` is replaced by the caller's detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnclosedBlock | Self::UnclosedParen => {
                format!("{}; {{}}", self.fallback_message())
            }

            Self::UnusedImport => "\"{}\" imported and not used".to_string(),
            Self::DuplicateImport => "`{}` redeclared in this file".to_string(),
            Self::Redeclared => "`{}` redeclared in this block".to_string(),
            Self::ImportNameConflict => "`{}` already declared through import of package".to_string(),
            Self::ShadowsPredeclared => "`{}` shadows a predeclared type".to_string(),
            Self::InvalidRecursiveType => "invalid recursive type `{}`".to_string(),
            Self::DuplicateMethod => "method `{}` already declared".to_string(),
            Self::FieldMethodConflict => "field and method with the same name `{}`".to_string(),
            Self::InvalidMapKey => "invalid map key type {}".to_string(),

            Self::Undefined => "undefined: {}".to_string(),
            Self::NotExported => "`{}` is not exported by its package".to_string(),
            Self::NotAType => "`{}` is not a type".to_string(),
            Self::NotAnExpression => "`{}` is not an expression".to_string(),

            Self::MismatchedTypes => "cannot use {}".to_string(),
            Self::UntypedNil => "use of untyped nil in {}".to_string(),
            Self::Unsupported => "{} is not supported".to_string(),
            Self::InitializationCycle => "initialization cycle: {}".to_string(),

            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → `fallback_message()`
    /// - `Some(detail)` → `custom_message()` with `{}` replaced by detail
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Location of a diagnostic: which file, which bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub source: SourceId,
    pub range: TextRange,
}

impl Span {
    pub fn new(source: SourceId, range: TextRange) -> Self {
        Self { source, range }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) span: Span,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
            related: Vec::new(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, span: Span) -> Self {
        Self::new(kind, span, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.span.range.start()),
            u32::from(self.span.range.end()),
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.span.range.start()),
                u32::from(related.span.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
