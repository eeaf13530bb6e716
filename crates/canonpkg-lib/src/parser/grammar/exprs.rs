use crate::diagnostics::DiagnosticKind;
use crate::parser::core::Parser;
use crate::parser::cst::token_sets::{EXPR_FIRST, LITERALS};
use crate::parser::cst::{SyntaxKind, TokenSet};

/// Tokens that would continue an expression with a binary operator.
const BINARY_OPERATORS: TokenSet = TokenSet::new(&[
    SyntaxKind::Operator,
    SyntaxKind::Star,
    SyntaxKind::Amp,
    SyntaxKind::Minus,
    SyntaxKind::Plus,
]);

impl Parser<'_> {
    pub(super) fn parse_expr_list(&mut self) {
        self.parse_expr_or_error("after `=`");
        while self.eat_token(SyntaxKind::Comma) {
            self.parse_expr_or_error("after `,`");
        }
    }

    pub(super) fn parse_expr_or_error(&mut self, context: &str) -> bool {
        if self.currently_is_one_of(EXPR_FIRST) {
            self.parse_expr();
            true
        } else {
            self.error_msg(DiagnosticKind::ExpectedExpr, context);
            false
        }
    }

    /// Initializers are limited to operands, composite literals, `&x`, `-x`,
    /// calls and conversions. Binary expressions are rejected by the caller.
    pub(super) fn parse_expr(&mut self) {
        self.parse_operand(false);
    }

    /// Call arguments may also be bare types, as in `make([]int, 3)`.
    fn parse_arg(&mut self) -> bool {
        if self.currently_is_one_of(EXPR_FIRST) {
            self.parse_operand(true);
            true
        } else {
            self.error_msg(DiagnosticKind::ExpectedExpr, "in argument list");
            false
        }
    }

    fn parse_operand(&mut self, allow_bare_type: bool) {
        if !self.enter_recursion() {
            self.bump_as_error();
            return;
        }

        let checkpoint = self.checkpoint();
        let mut composite_allowed = false;

        match self.current() {
            SyntaxKind::Amp | SyntaxKind::Minus | SyntaxKind::Plus => {
                self.start_node(SyntaxKind::UnaryExpr);
                let context = format!("after `{}`", self.current_text());
                self.bump();
                self.parse_expr_or_error(&context);
                self.finish_node();
                self.exit_recursion();
                return;
            }
            kind if LITERALS.contains(kind) => {
                self.start_node(SyntaxKind::Literal);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::Id => {
                self.parse_qualified_name(SyntaxKind::NameRef);
                composite_allowed = true;
            }
            SyntaxKind::ParenOpen => {
                self.start_node(SyntaxKind::ParenExpr);
                self.push_delimiter(SyntaxKind::ParenOpen);
                self.bump();
                self.parse_expr_or_error("inside parentheses");
                self.close_delimiter(SyntaxKind::ParenClose);
                self.finish_node();
            }
            SyntaxKind::BracketOpen | SyntaxKind::KwMap | SyntaxKind::KwStruct => {
                // Type-led operand: composite literal or conversion.
                self.parse_type();
                if self.currently_is(SyntaxKind::BraceOpen) {
                    self.start_node_at(checkpoint, SyntaxKind::CompositeLit);
                    self.parse_balanced(SyntaxKind::LitBody);
                    self.finish_node();
                } else if !allow_bare_type && !self.currently_is(SyntaxKind::ParenOpen) {
                    self.error_msg(
                        DiagnosticKind::ExpectedExpr,
                        "type must be followed by `{` or `(`",
                    );
                }
            }
            _ => self.error(DiagnosticKind::ExpectedExpr),
        }

        loop {
            if self.currently_is(SyntaxKind::ParenOpen) && !self.line_break_before() {
                self.start_node_at(checkpoint, SyntaxKind::CallExpr);
                self.parse_arg_list();
                self.finish_node();
                composite_allowed = false;
            } else if composite_allowed && self.currently_is(SyntaxKind::BraceOpen) {
                self.start_node_at(checkpoint, SyntaxKind::CompositeLit);
                self.parse_balanced(SyntaxKind::LitBody);
                self.finish_node();
                composite_allowed = false;
            } else {
                break;
            }
        }

        self.exit_recursion();
    }

    fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ArgList);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();

        while !self.eof() && !self.currently_is(SyntaxKind::ParenClose) {
            if !self.parse_arg() {
                break;
            }
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }

        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    /// Consume the rest of the line after an unsupported operator.
    pub(super) fn reject_operators(&mut self) {
        if !self.currently_is_one_of(BINARY_OPERATORS) || self.line_break_before() {
            return;
        }

        self.start_node(SyntaxKind::Error);
        self.error_msg(
            DiagnosticKind::UnexpectedToken,
            "operators are not supported in package-level initializers",
        );
        while !self.eof()
            && !self.currently_is(SyntaxKind::Semicolon)
            && !self.currently_is(SyntaxKind::ParenClose)
            && !self.line_break_before()
        {
            self.bump();
        }
        self.finish_node();
    }
}
