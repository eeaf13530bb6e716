use crate::diagnostics::DiagnosticKind;
use crate::parser::core::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::TYPE_FIRST;

impl Parser<'_> {
    pub(super) fn parse_type_or_error(&mut self, context: &str) -> bool {
        if self.currently_is_one_of(TYPE_FIRST) {
            self.parse_type();
            true
        } else {
            self.error_msg(DiagnosticKind::ExpectedType, context);
            false
        }
    }

    pub(super) fn parse_type(&mut self) {
        if !self.enter_recursion() {
            self.bump_as_error();
            return;
        }

        match self.current() {
            SyntaxKind::Id => self.parse_qualified_name(SyntaxKind::TypeName),
            SyntaxKind::Star => {
                self.start_node(SyntaxKind::PointerType);
                self.bump();
                self.parse_type_or_error("after `*`");
                self.finish_node();
            }
            SyntaxKind::BracketOpen => self.parse_slice_type(),
            SyntaxKind::KwMap => self.parse_map_type(),
            SyntaxKind::KwStruct => self.parse_struct_type(),
            SyntaxKind::KwFunc => {
                self.start_node(SyntaxKind::FuncType);
                self.bump();
                if self.currently_is(SyntaxKind::ParenOpen) {
                    self.parse_param_list();
                } else {
                    self.error_msg(
                        DiagnosticKind::UnexpectedToken,
                        "expected `(` after `func`",
                    );
                }
                self.parse_results();
                self.finish_node();
            }
            SyntaxKind::ParenOpen => {
                self.start_node(SyntaxKind::ParenType);
                self.push_delimiter(SyntaxKind::ParenOpen);
                self.bump();
                self.parse_type_or_error("inside parentheses");
                self.close_delimiter(SyntaxKind::ParenClose);
                self.finish_node();
            }
            _ => self.error(DiagnosticKind::ExpectedType),
        }

        self.exit_recursion();
    }

    /// `Name` or `pkg.Name`, as a `TypeName` or `NameRef` node.
    pub(super) fn parse_qualified_name(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if self.currently_is(SyntaxKind::Dot) && self.next_is(SyntaxKind::Id) {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    fn parse_slice_type(&mut self) {
        self.start_node(SyntaxKind::SliceType);
        self.bump();
        if !self.eat_token(SyntaxKind::BracketClose) {
            self.start_node(SyntaxKind::Error);
            self.error_msg(DiagnosticKind::UnexpectedToken, "array types are not supported");
            while !self.eof()
                && !self.currently_is(SyntaxKind::BracketClose)
                && !self.line_break_before()
            {
                self.bump();
            }
            self.finish_node();
            self.eat_token(SyntaxKind::BracketClose);
        }
        self.parse_type_or_error("for slice element");
        self.finish_node();
    }

    fn parse_map_type(&mut self) {
        self.start_node(SyntaxKind::MapType);
        self.bump();
        self.expect(SyntaxKind::BracketOpen, "`[` after `map`");
        self.parse_type_or_error("for map key");
        self.expect(SyntaxKind::BracketClose, "`]` after map key");
        self.parse_type_or_error("for map value");
        self.finish_node();
    }

    fn parse_struct_type(&mut self) {
        self.start_node(SyntaxKind::StructType);
        self.bump();

        if !self.currently_is(SyntaxKind::BraceOpen) {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected `{` after `struct`");
            self.finish_node();
            return;
        }
        self.push_delimiter(SyntaxKind::BraceOpen);
        self.bump();

        while !self.eof() && !self.currently_is(SyntaxKind::BraceClose) {
            let before = self.pos;
            self.parse_field_decl();
            self.expect_terminator();
            if self.pos == before {
                self.bump_as_error();
            }
        }

        self.close_delimiter(SyntaxKind::BraceClose);
        self.finish_node();
    }

    /// `a, b T "tag"`, or an embedded `T`, `*T`, `pkg.T`.
    fn parse_field_decl(&mut self) {
        self.start_node(SyntaxKind::FieldDecl);

        match self.current() {
            SyntaxKind::Star => self.parse_type(),
            SyntaxKind::Id => {
                let (next, line_break) = self.peek_nth_with_break(1);
                let embedded = line_break
                    || matches!(
                        next,
                        SyntaxKind::Semicolon
                            | SyntaxKind::BraceClose
                            | SyntaxKind::StringLit
                            | SyntaxKind::Dot
                            | SyntaxKind::Error
                    );
                if embedded {
                    self.parse_qualified_name(SyntaxKind::TypeName);
                } else {
                    self.bump();
                    while self.eat_token(SyntaxKind::Comma) {
                        self.expect_ident("after `,` in field list");
                    }
                    self.parse_type_or_error("for struct field");
                }
            }
            _ => self.error_msg(DiagnosticKind::ExpectedIdent, "in struct field"),
        }

        self.eat_token(SyntaxKind::StringLit);
        self.finish_node();
    }

    /// `( [name] [...]Type, ... )`
    pub(super) fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::ParamList);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();

        while !self.eof() && !self.currently_is(SyntaxKind::ParenClose) {
            let before = self.pos;
            self.parse_param();
            if self.pos == before || !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }

        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    /// A bare identifier is parsed as a type name; the checker regroups
    /// `a, b int` once it has seen the whole list.
    pub(super) fn parse_param(&mut self) {
        self.start_node(SyntaxKind::Param);

        if self.currently_is(SyntaxKind::Id) {
            let next = self.peek_nth(1);
            let named = next == SyntaxKind::Ellipsis
                || (next != SyntaxKind::Dot && TYPE_FIRST.contains(next));
            if named {
                self.bump();
            }
        }
        self.eat_token(SyntaxKind::Ellipsis);
        self.parse_type_or_error("in parameter list");

        self.finish_node();
    }

    /// Optional result: a parenthesized list or a single type on the same line.
    pub(super) fn parse_results(&mut self) {
        if self.currently_is(SyntaxKind::ParenOpen) {
            self.start_node(SyntaxKind::Results);
            self.parse_param_list();
            self.finish_node();
        } else if self.currently_is_one_of(TYPE_FIRST) && !self.line_break_before() {
            self.start_node(SyntaxKind::Results);
            self.parse_type();
            self.finish_node();
        }
    }
}
