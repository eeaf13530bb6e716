//! Parser for the Go declaration subset.
//!
//! # Architecture
//!
//! The parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder:
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Checkpoint-based wrapping: calls and composite literals wrap their operand retroactively
//! - Statement termination follows Go: `;`, a line break, a closing delimiter or EOF
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree.
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. At top level, recovery skips to the next declaration keyword
//! 4. On the recursion limit, the offending token goes into an Error node

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;


use std::fmt::Write;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

use core::Parser;

use crate::diagnostics::Diagnostics;
use crate::source_map::SourceId;
use lexer::{lex, token_text};

/// Parse result containing the green tree.
///
/// The tree is always complete. Diagnostics are returned separately.
#[derive(Debug, Clone)]
pub struct Parse {
    cst: rowan::GreenNode,
}

impl Parse {
    pub fn as_cst(&self) -> &rowan::GreenNode {
        &self.cst
    }

    /// Creates a typed view over the immutable green tree.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.cst.clone())
    }

    pub fn file(&self) -> ast::SourceFile {
        ast::SourceFile::cast(self.syntax()).expect("parser always produces SourceFile")
    }

    /// Indented CST without trivia.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        format_cst(&self.syntax(), 0, false, &mut out).expect("String write never fails");
        out
    }

    /// Indented CST including whitespace and comments.
    pub fn dump_full(&self) -> String {
        let mut out = String::new();
        format_cst(&self.syntax(), 0, true, &mut out).expect("String write never fails");
        out
    }
}

fn format_cst(
    node: &SyntaxNode,
    indent: usize,
    trivia: bool,
    w: &mut impl Write,
) -> std::fmt::Result {
    writeln!(w, "{:indent$}{:?}", "", node.kind(), indent = indent * 2)?;
    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => format_cst(&n, indent + 1, trivia, w)?,
            rowan::NodeOrToken::Token(t) => {
                if !trivia && t.kind().is_trivia() {
                    continue;
                }
                writeln!(
                    w,
                    "{:indent$}{:?} {:?}",
                    "",
                    t.kind(),
                    t.text(),
                    indent = (indent + 1) * 2
                )?;
            }
        }
    }
    Ok(())
}

/// Main entry point.
pub fn parse(source: &str, source_id: SourceId) -> (Parse, Diagnostics) {
    let mut parser = Parser::new(source, source_id, lex(source));
    parser.parse_root();
    let (cst, diagnostics) = parser.finish();
    (Parse { cst }, diagnostics)
}

/// Name from the leading `package` clause, without building a tree.
///
/// Used to name inline packages before they are resolved.
pub fn package_name(source: &str) -> Option<String> {
    let tokens = lex(source);
    let mut significant = tokens.iter().filter(|t| !t.kind.is_trivia());
    let first = significant.next()?;
    if first.kind != SyntaxKind::KwPackage {
        return None;
    }
    let name = significant.next()?;
    (name.kind == SyntaxKind::Id).then(|| token_text(source, name).to_string())
}
