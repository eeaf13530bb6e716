//! Lexer for the Go subset.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive error characters into single `Garbage` tokens rather
//! than producing one error per character. This keeps the token stream manageable for malformed input.

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

use super::cst::SyntaxKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

const BYTE_ORDER_MARK: char = '\u{feff}';

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens.
///
/// Consecutive lexer errors are coalesced into single `Garbage` tokens.
/// A leading byte order mark becomes whitespace.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let offset = if source.starts_with(BYTE_ORDER_MARK) {
        let len = BYTE_ORDER_MARK.len_utf8();
        tokens.push(Token::new(SyntaxKind::Whitespace, range_to_text_range(0..len)));
        len
    } else {
        0
    };
    let span = |range: Range<usize>| range_to_text_range(range.start + offset..range.end + offset);

    let mut lexer = SyntaxKind::lexer(&source[offset..]);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(SyntaxKind::Garbage, span(start..end)));
                }
                tokens.push(Token::new(kind, span(lexer.span())));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        span(start..source.len() - offset),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[std::ops::Range::<usize>::from(token.span)]
}

/// Whether a trivia token ends a line, for automatic statement termination.
#[inline]
pub fn breaks_line(source: &str, token: &Token) -> bool {
    match token.kind {
        SyntaxKind::Newline => true,
        SyntaxKind::LineComment => false,
        SyntaxKind::BlockComment => token_text(source, token).contains('\n'),
        _ => false,
    }
}
