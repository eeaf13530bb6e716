use crate::diagnostics::DiagnosticKind;
use crate::parser::core::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{DECL_FIRST, TYPE_FIRST};

impl Parser<'_> {
    pub fn parse_root(&mut self) {
        self.start_node(SyntaxKind::SourceFile);

        if self.currently_is(SyntaxKind::KwPackage) {
            self.parse_package_clause();
        } else {
            self.error(DiagnosticKind::MissingPackageClause);
        }

        let mut seen_decl = false;
        while !self.eof() {
            match self.current() {
                SyntaxKind::KwImport => {
                    if seen_decl {
                        self.error_msg(
                            DiagnosticKind::UnexpectedToken,
                            "imports must appear before other declarations",
                        );
                    }
                    self.parse_import_decl();
                }
                SyntaxKind::KwType => {
                    seen_decl = true;
                    self.parse_type_decl();
                }
                SyntaxKind::KwVar => {
                    seen_decl = true;
                    self.parse_value_decl(SyntaxKind::VarDecl);
                }
                SyntaxKind::KwConst => {
                    seen_decl = true;
                    self.parse_value_decl(SyntaxKind::ConstDecl);
                }
                SyntaxKind::KwFunc => {
                    seen_decl = true;
                    self.parse_func_decl();
                }
                SyntaxKind::Semicolon => self.bump(),
                SyntaxKind::KwPackage => self.error_recover(
                    DiagnosticKind::UnexpectedToken,
                    "duplicate `package` clause",
                    DECL_FIRST,
                ),
                SyntaxKind::Garbage => self.error_and_bump(DiagnosticKind::InvalidToken),
                _ => {
                    let found = format!("found `{}`", self.current_text());
                    self.error_recover(DiagnosticKind::ExpectedDecl, &found, DECL_FIRST);
                }
            }
        }

        self.eat_trivia();
        self.finish_node();
    }

    /// `package name`
    fn parse_package_clause(&mut self) {
        self.start_node(SyntaxKind::PackageClause);
        self.bump();
        self.expect_ident("after `package`");
        self.finish_node();
        self.expect_terminator();
    }

    /// `import "path"`, `import name "path"` or a parenthesized group.
    fn parse_import_decl(&mut self) {
        self.start_node(SyntaxKind::ImportDecl);
        self.bump();
        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_group(|p, _| p.parse_import_spec());
        } else {
            self.parse_import_spec();
        }
        self.finish_node();
        self.expect_terminator();
    }

    fn parse_import_spec(&mut self) {
        self.start_node(SyntaxKind::ImportSpec);
        if self.currently_is(SyntaxKind::Id) || self.currently_is(SyntaxKind::Dot) {
            self.bump();
        }
        if !self.eat_token(SyntaxKind::StringLit) {
            self.error(DiagnosticKind::ExpectedImportPath);
        }
        self.finish_node();
    }

    /// `( spec ; spec ; ... )`. The callback receives the spec's index in the group.
    fn parse_group(&mut self, mut spec: impl FnMut(&mut Self, usize)) {
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();

        let mut index = 0;
        while !self.eof() && !self.currently_is(SyntaxKind::ParenClose) {
            let before = self.pos;
            spec(self, index);
            self.expect_terminator();
            if self.pos == before {
                self.bump_as_error();
            }
            index += 1;
        }

        self.close_delimiter(SyntaxKind::ParenClose);
    }

    fn parse_type_decl(&mut self) {
        self.start_node(SyntaxKind::TypeDecl);
        self.bump();
        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_group(|p, _| p.parse_type_spec());
        } else {
            self.parse_type_spec();
        }
        self.finish_node();
        self.expect_terminator();
    }

    /// `Name Type` or `Name = Type`
    fn parse_type_spec(&mut self) {
        self.start_node(SyntaxKind::TypeSpec);
        if self.expect_ident("in type declaration") {
            self.eat_token(SyntaxKind::Equals);
            self.parse_type_or_error("in type declaration");
        }
        self.finish_node();
    }

    /// `var`/`const` declarations; `kind` is the node kind to produce.
    fn parse_value_decl(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_group(|p, index| p.parse_value_spec(kind, index > 0));
        } else {
            self.parse_value_spec(kind, false);
        }
        self.finish_node();
        self.expect_terminator();
    }

    /// `a, b T = x, y`. Constants later in a group may omit both type and values.
    fn parse_value_spec(&mut self, kind: SyntaxKind, may_repeat: bool) {
        self.start_node(SyntaxKind::ValueSpec);

        if !self.expect_ident("in declaration") {
            self.finish_node();
            return;
        }
        while self.eat_token(SyntaxKind::Comma) {
            self.expect_ident("after `,`");
        }

        let has_type =
            !self.currently_is(SyntaxKind::Equals) && self.currently_is_one_of(TYPE_FIRST);
        if has_type {
            self.parse_type();
        }

        if self.eat_token(SyntaxKind::Equals) {
            self.parse_expr_list();
            self.reject_operators();
        } else if !has_type {
            match kind {
                SyntaxKind::ConstDecl if may_repeat => {}
                SyntaxKind::ConstDecl => self.error_msg(
                    DiagnosticKind::ExpectedExpr,
                    "constant declaration needs a value",
                ),
                _ => self.error_msg(
                    DiagnosticKind::ExpectedType,
                    "declaration needs a type or `=`",
                ),
            }
        }

        self.finish_node();
    }

    /// `func Name(params) results { body }` with an optional receiver.
    fn parse_func_decl(&mut self) {
        self.start_node(SyntaxKind::FuncDecl);
        self.bump();

        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_receiver();
        }
        self.expect_ident("in function declaration");

        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_param_list();
        } else {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected `(`");
        }
        self.parse_results();

        if self.currently_is(SyntaxKind::BraceOpen) {
            self.parse_balanced(SyntaxKind::Block);
        }

        self.finish_node();
        self.expect_terminator();
    }

    fn parse_receiver(&mut self) {
        self.start_node(SyntaxKind::Receiver);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();
        self.parse_param();
        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    /// Raw `{ ... }` block with balanced braces.
    pub(super) fn parse_balanced(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.push_delimiter(SyntaxKind::BraceOpen);
        self.bump();

        let mut depth = 0u32;
        while !self.eof() {
            match self.current() {
                SyntaxKind::BraceOpen => depth += 1,
                SyntaxKind::BraceClose if depth == 0 => break,
                SyntaxKind::BraceClose => depth -= 1,
                SyntaxKind::Garbage => self.error(DiagnosticKind::InvalidToken),
                _ => {}
            }
            self.bump();
        }

        self.close_delimiter(SyntaxKind::BraceClose);
        self.finish_node();
    }
}
