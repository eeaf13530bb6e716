//! Token cursor, tree builder and error reporting shared by the grammar.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::cst::token_sets::CLOSERS;
use super::cst::{SyntaxKind, TokenSet};
use super::lexer::{Token, breaks_line, token_text};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};
use crate::source_map::SourceId;

/// Nesting depth at which type and expression parsing gives up.
const RECURSION_LIMIT: u32 = 256;

#[derive(Debug, Clone, Copy)]
pub(super) struct OpenDelimiter {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

/// Trivia is held back until the next node starts, so it attaches outside it.
pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) source_id: SourceId,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) trivia_buffer: Vec<Token>,
    pub(super) builder: GreenNodeBuilder<'static>,
    pub(super) diagnostics: Diagnostics,
    pub(super) depth: u32,
    pub(super) last_diagnostic_pos: Option<TextSize>,
    pub(super) delimiter_stack: Vec<OpenDelimiter>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, source_id: SourceId, tokens: Vec<Token>) -> Self {
        Self {
            source,
            source_id,
            tokens,
            pos: 0,
            trivia_buffer: Vec::with_capacity(4),
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_diagnostic_pos: None,
            delimiter_stack: Vec::with_capacity(8),
        }
    }

    pub(super) fn finish(mut self) -> (GreenNode, Diagnostics) {
        self.drain_trivia();
        (self.builder.finish(), self.diagnostics)
    }

    pub(super) fn current(&mut self) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        self.nth_raw(0)
    }

    pub(super) fn nth_raw(&self, lookahead: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + lookahead)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        self.skip_trivia_to_buffer();
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    pub(super) fn current_text(&mut self) -> &'src str {
        self.skip_trivia_to_buffer();
        match self.tokens.get(self.pos) {
            Some(token) => token_text(self.source, token),
            None => "",
        }
    }

    pub(super) fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    pub(super) fn eof(&mut self) -> bool {
        self.skip_trivia_to_buffer();
        self.pos >= self.tokens.len()
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        !self.eof() && self.current() == kind
    }

    pub(super) fn currently_is_one_of(&mut self, set: TokenSet) -> bool {
        !self.eof() && set.contains(self.current())
    }

    /// Kind of the `n`th non-trivia token ahead.
    pub(super) fn peek_nth(&mut self, n: usize) -> SyntaxKind {
        self.peek_nth_with_break(n).0
    }

    /// LL(k) lookahead that also reports whether a line break precedes the token.
    pub(super) fn peek_nth_with_break(&mut self, n: usize) -> (SyntaxKind, bool) {
        self.skip_trivia_to_buffer();
        let mut count = 0;
        let mut pos = self.pos;
        let mut line_break = false;
        while pos < self.tokens.len() {
            let token = &self.tokens[pos];
            if token.kind.is_trivia() {
                line_break |= breaks_line(self.source, token);
            } else {
                if count == n {
                    return (token.kind, line_break);
                }
                count += 1;
                line_break = false;
            }
            pos += 1;
        }
        (SyntaxKind::Error, line_break)
    }

    pub(super) fn next_is(&mut self, kind: SyntaxKind) -> bool {
        self.peek_nth(1) == kind
    }

    /// Whether a line break separates the current token from the previous one.
    pub(super) fn line_break_before(&mut self) -> bool {
        self.skip_trivia_to_buffer();
        self.tokens[..self.pos]
            .iter()
            .rev()
            .take_while(|t| t.kind.is_trivia())
            .any(|t| breaks_line(self.source, t))
    }

    pub(super) fn skip_trivia_to_buffer(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.trivia_buffer.push(self.tokens[self.pos]);
            self.pos += 1;
        }
    }

    pub(super) fn drain_trivia(&mut self) {
        for token in self.trivia_buffer.drain(..) {
            let text = token_text(self.source, &token);
            self.builder.token(token.kind.into(), text);
        }
    }

    pub(super) fn eat_trivia(&mut self) {
        self.skip_trivia_to_buffer();
        self.drain_trivia();
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.drain_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.drain_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn bump(&mut self) {
        self.skip_trivia_to_buffer();
        assert!(self.pos < self.tokens.len(), "bump called at EOF");

        self.drain_trivia();

        let token = self.tokens[self.pos];
        let text = token_text(self.source, &token);
        self.builder.token(token.kind.into(), text);
        self.pos += 1;
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        if self.currently_is(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Reports `what` as missing and leaves the token in place.
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat_token(kind) {
            return true;
        }
        self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {}", what));
        false
    }

    /// Consume an identifier or report `ExpectedIdent` with context.
    pub(super) fn expect_ident(&mut self, context: &str) -> bool {
        if self.eat_token(SyntaxKind::Id) {
            return true;
        }
        self.error_msg(DiagnosticKind::ExpectedIdent, context);
        false
    }

    /// A declaration ends at `;`, a line break, a closing delimiter or EOF.
    pub(super) fn expect_terminator(&mut self) {
        if self.eat_token(SyntaxKind::Semicolon) {
            return;
        }
        if self.eof() || self.line_break_before() || self.currently_is_one_of(CLOSERS) {
            return;
        }
        self.error(DiagnosticKind::ExpectedTerminator);
    }

    fn should_report(&mut self, pos: TextSize) -> bool {
        if self.last_diagnostic_pos == Some(pos) {
            return false;
        }
        self.last_diagnostic_pos = Some(pos);
        true
    }

    pub(super) fn bump_as_error(&mut self) {
        if !self.eof() {
            self.start_node(SyntaxKind::Error);
            self.bump();
            self.finish_node();
        }
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let range = self.current_span();
        if !self.should_report(range.start()) {
            return;
        }
        self.diagnostics.report(self.source_id, kind, range).emit();
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_span();
        if !self.should_report(range.start()) {
            return;
        }
        self.diagnostics
            .report(self.source_id, kind, range)
            .message(message)
            .emit();
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind) {
        self.error(kind);
        self.bump_as_error();
    }

    /// Report, then wrap everything up to a recovery token in an `Error` node.
    pub(super) fn error_recover(
        &mut self,
        kind: DiagnosticKind,
        message: &str,
        recovery: TokenSet,
    ) {
        if self.currently_is_one_of(recovery) || self.eof() {
            self.error_msg(kind, message);
            return;
        }

        self.start_node(SyntaxKind::Error);
        self.error_msg(kind, message);
        while !self.currently_is_one_of(recovery) && !self.eof() {
            self.bump();
        }
        self.finish_node();
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.depth >= RECURSION_LIMIT {
            self.error_msg(DiagnosticKind::UnexpectedToken, "nesting too deep");
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(super) fn push_delimiter(&mut self, kind: SyntaxKind) {
        let span = self.current_span();
        self.delimiter_stack.push(OpenDelimiter { kind, span });
    }

    pub(super) fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.delimiter_stack.pop()
    }

    /// Close the innermost delimiter, or report it as unclosed.
    pub(super) fn close_delimiter(&mut self, close: SyntaxKind) -> bool {
        let open = self.pop_delimiter();
        if self.eat_token(close) {
            return true;
        }
        let Some(open) = open else {
            self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {close:?}"));
            return false;
        };
        let (kind, what) = match open.kind {
            SyntaxKind::BraceOpen => (DiagnosticKind::UnclosedBlock, "`{` opened here"),
            _ => (DiagnosticKind::UnclosedParen, "delimiter opened here"),
        };
        self.error_unclosed_delimiter(kind, what, open.span);
        false
    }

    fn error_unclosed_delimiter(
        &mut self,
        kind: DiagnosticKind,
        related_msg: &str,
        open_range: TextRange,
    ) {
        let current = self.current_span();
        if !self.should_report(current.start()) {
            return;
        }
        let found = if self.eof() {
            "found end of file".to_string()
        } else {
            format!("found `{}`", self.current_text())
        };
        let full_range = TextRange::new(open_range.start(), current.end());
        self.diagnostics
            .report(self.source_id, kind, full_range)
            .message(found)
            .related_to(related_msg, Span::new(self.source_id, open_range))
            .emit();
    }
}
