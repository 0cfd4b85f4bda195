// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use super::Parser;
use crate::token::TokenKind;
use crate::tree::{NodeId, SyntaxKind};

impl Parser {
    pub(super) fn parse_block(&mut self) -> NodeId {
        let start = self.start();
        self.expect_punct("{");
        let mut statements = Vec::new();
        while !self.at_punct("}") && !self.at_eof() {
            let before = self.pos;
            statements.push(self.parse_statement());
            if self.pos == before {
                self.bump();
            }
        }
        self.expect_punct("}");
        let span = self.span_from(start);
        self.node(SyntaxKind::Block, span, None, statements)
    }

    pub(super) fn parse_statement(&mut self) -> NodeId {
        let start = self.start();
        let token = self.current().clone();

        match token.kind {
            TokenKind::Punctuation if token.text == "{" => return self.parse_block(),
            TokenKind::Punctuation if token.text == ";" => {
                self.bump();
                return self.leaf(SyntaxKind::EmptyStatement, &token);
            }
            TokenKind::Keyword => {
                if let Some(statement) = self.parse_keyword_statement(start, &token.text) {
                    return statement;
                }
            }
            TokenKind::Identifier => {
                if token.text == "yield" && (self.nth(1).is_keyword("return") || self.nth(1).is_keyword("break")) {
                    return self.parse_yield(start);
                }
                if token.text == "await" && (self.nth(1).is_keyword("foreach") || self.nth(1).is_keyword("using")) {
                    self.bump();
                    return self.parse_statement_from(start);
                }
                if self.nth(1).is_punct(":") {
                    self.bump();
                    self.bump();
                    let inner = self.parse_statement();
                    let span = self.span_from(start);
                    return self.node(SyntaxKind::LabeledStatement, span, Some(token.text), vec![inner]);
                }
            }
            _ => {}
        }

        if self.at_local_declaration() {
            return self.parse_local_declaration_statement(start);
        }
        self.parse_expression_statement(start)
    }

    /// Continue a statement whose leading contextual keyword was consumed.
    fn parse_statement_from(&mut self, start: usize) -> NodeId {
        let keyword = self.current().text.clone();
        match self.parse_keyword_statement(start, &keyword) {
            Some(statement) => statement,
            None => self.parse_expression_statement(start),
        }
    }

    fn parse_keyword_statement(&mut self, start: usize, keyword: &str) -> Option<NodeId> {
        let statement = match keyword {
            "return" | "throw" => {
                let keyword_token = self.bump();
                let mut children = Vec::new();
                if !self.at_punct(";") {
                    children.push(self.parse_expression());
                }
                let kind = if keyword_token.text == "return" {
                    SyntaxKind::ReturnStatement
                } else {
                    SyntaxKind::ThrowStatement
                };
                self.finish_statement(start, kind, children)
            }
            "break" | "continue" => {
                self.bump();
                let kind = if keyword == "break" {
                    SyntaxKind::BreakStatement
                } else {
                    SyntaxKind::ContinueStatement
                };
                self.finish_statement(start, kind, Vec::new())
            }
            "goto" => {
                self.bump();
                self.skip_until(&[";"]);
                self.finish_statement(start, SyntaxKind::GotoStatement, Vec::new())
            }
            "if" => {
                self.bump();
                let condition = self.parse_parenthesized_condition();
                let mut children = vec![condition, self.parse_statement()];
                if self.eat_keyword("else") {
                    children.push(self.parse_statement());
                }
                let span = self.span_from(start);
                self.node(SyntaxKind::IfStatement, span, None, children)
            }
            "while" => {
                self.bump();
                let condition = self.parse_parenthesized_condition();
                let body = self.parse_statement();
                let span = self.span_from(start);
                self.node(SyntaxKind::WhileStatement, span, None, vec![condition, body])
            }
            "do" => {
                self.bump();
                let body = self.parse_statement();
                let mut children = vec![body];
                if !self.eat_keyword("while") {
                    children.push(self.missing("expected `while`"));
                }
                children.push(self.parse_parenthesized_condition());
                self.finish_statement(start, SyntaxKind::DoStatement, children)
            }
            "for" => self.parse_for(start),
            "foreach" => self.parse_foreach(start),
            "try" => self.parse_try(start),
            "using" => self.parse_using(start),
            "lock" => {
                self.bump();
                let target = self.parse_parenthesized_condition();
                let body = self.parse_statement();
                let span = self.span_from(start);
                self.node(SyntaxKind::LockStatement, span, None, vec![target, body])
            }
            "switch" => self.parse_switch_statement(start),
            "checked" | "unchecked" | "unsafe" if self.nth(1).is_punct("{") => {
                self.bump();
                self.parse_block()
            }
            "fixed" => {
                self.bump();
                self.skip_group();
                let body = self.parse_statement();
                let span = self.span_from(start);
                self.node(SyntaxKind::Block, span, None, vec![body])
            }
            "const" | "static" | "unsafe" | "extern" | "readonly" | "volatile" => {
                self.bump();
                if self.at_contextual("async") {
                    self.bump();
                }
                return Some(self.parse_local_declaration_statement(start));
            }
            _ => return None,
        };
        Some(statement)
    }

    fn parse_parenthesized_condition(&mut self) -> NodeId {
        self.expect_punct("(");
        let condition = self.parse_expression();
        self.expect_punct(")");
        condition
    }

    /// Expect the closing `;`, recovering to the next statement boundary
    /// when it is missing.
    fn finish_statement(&mut self, start: usize, kind: SyntaxKind, mut children: Vec<NodeId>) -> NodeId {
        if !self.eat_punct(";") {
            let message = format!("expected `;`, found {}", self.describe_current());
            let error_start = self.start();
            children.push(self.recover(error_start, message));
        }
        let span = self.span_from(start);
        self.node(kind, span, None, children)
    }

    fn parse_expression_statement(&mut self, start: usize) -> NodeId {
        let before = self.pos;
        let expression = self.parse_expression();
        if self.pos == before {
            // Nothing parsed; `parse_expression` has already reported why.
            return self.recover(start, "expected a statement");
        }
        self.finish_statement(start, SyntaxKind::ExpressionStatement, vec![expression])
    }

    fn parse_yield(&mut self, start: usize) -> NodeId {
        self.bump();
        let mut children = Vec::new();
        if self.eat_keyword("return") {
            children.push(self.parse_expression());
        } else {
            self.bump();
        }
        self.finish_statement(start, SyntaxKind::YieldStatement, children)
    }

    // === Declarations inside bodies === //

    /// `Type name =`, `Type name;`, `Type name,` or a local function
    /// `Type Name(` / `Type Name<`.
    pub(super) fn at_local_declaration(&self) -> bool {
        let first = self.current();
        if first.kind == TokenKind::Identifier && first.text == "await" {
            return false;
        }
        let mut index = self.pos;
        if first.is(TokenKind::Identifier, "async") && self.nth(1).kind != TokenKind::Punctuation {
            index += 1;
        }
        let Some(end) = self.scan_type(index) else {
            return false;
        };
        let name = self.token_at(end);
        if name.kind != TokenKind::Identifier {
            return false;
        }
        let after = self.token_at(end + 1);
        after.kind == TokenKind::Punctuation && matches!(after.text.as_str(), "=" | ";" | "," | "(" | "<")
    }

    fn parse_local_declaration_statement(&mut self, start: usize) -> NodeId {
        if self.at_contextual("async") && self.nth(1).kind != TokenKind::Punctuation {
            self.bump();
        }
        let ty = self.parse_type();
        if self.at_identifier() && (self.nth(1).is_punct("(") || self.nth(1).is_punct("<")) {
            let name = self.bump();
            return self.parse_method_rest(start, ty, name.text);
        }
        let mut children = vec![ty];
        self.parse_declarators(&mut children);
        self.finish_statement(start, SyntaxKind::LocalDeclarationStatement, children)
    }

    /// A variable declaration without its terminator, as it appears in
    /// `for` and `using` headers.
    fn parse_variable_declaration(&mut self) -> NodeId {
        let start = self.start();
        let mut children = vec![self.parse_type()];
        self.parse_declarators(&mut children);
        let span = self.span_from(start);
        self.node(SyntaxKind::LocalDeclarationStatement, span, None, children)
    }

    /// `a = 1, b, c = x` appended to `into`.
    pub(super) fn parse_declarators(&mut self, into: &mut Vec<NodeId>) {
        loop {
            let start = self.start();
            if !self.at_identifier() {
                into.push(self.missing("expected a variable name"));
                return;
            }
            let name = self.bump();
            let mut children = Vec::new();
            // Fixed-size buffers and C-style array declarators.
            if self.at_punct("[") {
                self.skip_group();
            }
            if self.eat_punct("=") {
                let value = if self.at_punct("{") {
                    self.parse_initializer()
                } else {
                    self.parse_expression()
                };
                children.push(value);
            }
            let span = self.span_from(start);
            into.push(self.node(SyntaxKind::VariableDeclarator, span, Some(name.text), children));
            if !self.eat_punct(",") {
                return;
            }
        }
    }

    // === Compound statements === //

    fn parse_for(&mut self, start: usize) -> NodeId {
        self.bump();
        self.expect_punct("(");
        let mut children = Vec::new();
        if !self.at_punct(";") {
            if self.at_local_declaration() {
                children.push(self.parse_variable_declaration());
            } else {
                self.parse_expression_list(&mut children);
            }
        }
        self.expect_punct(";");
        if !self.at_punct(";") {
            children.push(self.parse_expression());
        }
        self.expect_punct(";");
        if !self.at_punct(")") {
            self.parse_expression_list(&mut children);
        }
        self.expect_punct(")");
        children.push(self.parse_statement());
        let span = self.span_from(start);
        self.node(SyntaxKind::ForStatement, span, None, children)
    }

    fn parse_expression_list(&mut self, into: &mut Vec<NodeId>) {
        loop {
            into.push(self.parse_expression());
            if !self.eat_punct(",") {
                return;
            }
        }
    }

    fn parse_foreach(&mut self, start: usize) -> NodeId {
        self.bump();
        self.expect_punct("(");
        let mut children = Vec::new();
        if self.at_punct("(") {
            // Deconstruction: foreach (var (a, b) in ...)
            self.skip_group();
        } else {
            children.push(self.parse_type());
            if self.at_punct("(") {
                self.skip_group();
            } else if self.at_identifier() {
                let name = self.bump();
                children.push(self.leaf(SyntaxKind::VariableDeclarator, &name));
            }
        }
        if !self.eat_keyword("in") {
            children.push(self.missing("expected `in`"));
        }
        children.push(self.parse_expression());
        self.expect_punct(")");
        children.push(self.parse_statement());
        let span = self.span_from(start);
        self.node(SyntaxKind::ForEachStatement, span, None, children)
    }

    fn parse_try(&mut self, start: usize) -> NodeId {
        self.bump();
        let mut children = vec![self.parse_block()];
        while self.at_keyword("catch") {
            let clause_start = self.start();
            self.bump();
            let mut clause = Vec::new();
            if self.eat_punct("(") {
                clause.push(self.parse_type());
                if self.at_identifier() {
                    let name = self.bump();
                    clause.push(self.leaf(SyntaxKind::VariableDeclarator, &name));
                }
                self.expect_punct(")");
            }
            if self.at_contextual("when") {
                self.bump();
                clause.push(self.parse_parenthesized_condition());
            }
            clause.push(self.parse_block());
            let span = self.span_from(clause_start);
            children.push(self.node(SyntaxKind::CatchClause, span, None, clause));
        }
        if self.at_keyword("finally") {
            let clause_start = self.start();
            self.bump();
            let block = self.parse_block();
            let span = self.span_from(clause_start);
            children.push(self.node(SyntaxKind::FinallyClause, span, None, vec![block]));
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::TryStatement, span, None, children)
    }

    fn parse_using(&mut self, start: usize) -> NodeId {
        self.bump();
        if self.eat_punct("(") {
            let resource = if self.at_local_declaration() {
                self.parse_variable_declaration()
            } else {
                self.parse_expression()
            };
            self.expect_punct(")");
            let body = self.parse_statement();
            let span = self.span_from(start);
            return self.node(SyntaxKind::UsingStatement, span, None, vec![resource, body]);
        }
        // using var x = ...;
        let declaration_start = self.start();
        let declaration = self.parse_local_declaration_statement(declaration_start);
        let span = self.span_from(start);
        self.node(SyntaxKind::UsingStatement, span, None, vec![declaration])
    }

    fn parse_switch_statement(&mut self, start: usize) -> NodeId {
        self.bump();
        let mut children = vec![self.parse_parenthesized_condition()];
        if self.expect_punct("{") {
            while !self.at_punct("}") && !self.at_eof() {
                let before = self.pos;
                children.push(self.parse_switch_section());
                if self.pos == before {
                    self.bump();
                }
            }
            self.expect_punct("}");
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::SwitchStatement, span, None, children)
    }

    fn parse_switch_section(&mut self) -> NodeId {
        let start = self.start();
        let mut statements = Vec::new();
        while self.at_switch_label() {
            self.bump();
            self.skip_pattern_until(&[":"]);
            if self.at_contextual("when") {
                self.bump();
                statements.push(self.parse_guard());
            }
            self.expect_punct(":");
        }
        while !self.at_punct("}") && !self.at_eof() && !self.at_switch_label() {
            let before = self.pos;
            statements.push(self.parse_statement());
            if self.pos == before {
                self.bump();
            }
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::SwitchSection, span, None, statements)
    }

    /// Skip a case pattern, stopping before its `when` guard or one of
    /// `stops` at depth zero.
    pub(super) fn skip_pattern_until(&mut self, stops: &[&str]) {
        loop {
            if self.at_eof() || self.at_contextual("when") {
                return;
            }
            let token = self.current();
            if token.kind == TokenKind::Punctuation {
                let text = token.text.as_str();
                if stops.contains(&text) || matches!(text, ")" | "]" | "}") {
                    return;
                }
                if matches!(text, "(" | "[" | "{") {
                    self.skip_group();
                    continue;
                }
            }
            self.bump();
        }
    }

    fn at_switch_label(&self) -> bool {
        self.at_keyword("case") || (self.at_keyword("default") && self.nth(1).is_punct(":"))
    }
}
