// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use super::Parser;
use crate::text::Span;
use crate::token::{CONTEXTUAL_MODIFIERS, MODIFIERS, Token, TokenKind};
use crate::tree::{NodeId, SyntaxKind};

const TYPE_KEYWORDS: &[&str] = &["class", "struct", "interface", "enum"];

impl Parser {
    pub(super) fn parse_compilation_unit(&mut self) -> NodeId {
        let mut members = Vec::new();
        while !self.at_eof() {
            let before = self.pos;
            if let Some(member) = self.parse_namespace_member(true) {
                members.push(member);
            }
            if self.pos == before {
                let start = self.start();
                self.bump();
                members.push(self.recover_unexpected(start));
            }
        }
        let span = Span::new(0, self.tree.source().len());
        self.node(SyntaxKind::CompilationUnit, span, None, members)
    }

    fn recover_unexpected(&mut self, start: usize) -> NodeId {
        let span = self.span_from(start);
        let text = self.tree.source().slice(span).to_string();
        self.tree.push_error(format!("unexpected `{text}`"), span);
        self.node(SyntaxKind::Error, span, None, Vec::new())
    }

    /// Members allowed directly in a compilation unit or namespace body.
    /// Top-level statements are only accepted at file level.
    fn parse_namespace_member(&mut self, top_level: bool) -> Option<NodeId> {
        let start = self.start();

        if self.at_contextual("global") && self.nth(1).is_keyword("using") {
            self.bump();
            return Some(self.parse_using_directive(start));
        }
        if self.at_keyword("using") && self.at_using_directive() {
            return Some(self.parse_using_directive(start));
        }
        if self.at_keyword("namespace") {
            return Some(self.parse_namespace(start));
        }
        if self.at_punct("[") {
            self.skip_attributes();
            return None;
        }
        if self.at_type_declaration() {
            self.skip_modifiers();
            return Some(self.parse_type_declaration(start));
        }
        if top_level {
            return Some(self.parse_statement());
        }
        if self.at_punct("}") {
            return None;
        }
        Some(self.recover(start, "expected a type or namespace declaration"))
    }

    /// `using X;`, `using static X;` and `using A = X;` as opposed to
    /// `using (...)` and `using var x = ...;`.
    fn at_using_directive(&self) -> bool {
        let next = self.nth(1);
        if next.is_punct("(") {
            return false;
        }
        if next.is_keyword("static") || next.is(TokenKind::Identifier, "unsafe") {
            return true;
        }
        if next.kind == TokenKind::Identifier && self.nth(2).is_punct("=") {
            return true;
        }
        match self.scan_type(self.pos + 1) {
            Some(end) => self.token_at(end).is_punct(";"),
            None => false,
        }
    }

    fn parse_using_directive(&mut self, start: usize) -> NodeId {
        self.bump();
        self.eat_keyword("static");
        let name_start = self.start();
        self.skip_until(&[";"]);
        let name = self.tree.source().slice(self.span_from(name_start)).to_string();
        self.expect_punct(";");
        let span = self.span_from(start);
        self.node(SyntaxKind::UsingDirective, span, Some(name), Vec::new())
    }

    fn parse_namespace(&mut self, start: usize) -> NodeId {
        self.bump();
        let mut name = String::new();
        while self.at_identifier() {
            name.push_str(&self.bump().text);
            if !self.eat_punct(".") {
                break;
            }
            name.push('.');
        }
        if name.is_empty() {
            let at = self.current().span;
            self.tree.push_error("expected a namespace name", at);
        }

        if self.eat_punct(";") {
            let mut members = Vec::new();
            while !self.at_eof() {
                let before = self.pos;
                if let Some(member) = self.parse_namespace_member(false) {
                    members.push(member);
                }
                if self.pos == before {
                    let error_start = self.start();
                    self.bump();
                    members.push(self.recover_unexpected(error_start));
                }
            }
            let span = self.span_from(start);
            return self.node(SyntaxKind::FileScopedNamespaceDeclaration, span, Some(name), members);
        }

        let mut members = Vec::new();
        if self.expect_punct("{") {
            while !self.at_punct("}") && !self.at_eof() {
                let before = self.pos;
                if let Some(member) = self.parse_namespace_member(false) {
                    members.push(member);
                }
                if self.pos == before {
                    self.bump();
                }
            }
            self.expect_punct("}");
            self.eat_punct(";");
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::NamespaceDeclaration, span, Some(name), members)
    }

    // === Types === //

    fn is_modifier_at(&self, index: usize) -> bool {
        let token = self.token_at(index);
        match token.kind {
            TokenKind::Keyword => MODIFIERS.contains(&token.text.as_str()),
            TokenKind::Identifier => {
                CONTEXTUAL_MODIFIERS.contains(&token.text.as_str())
                    && matches!(self.token_at(index + 1).kind, TokenKind::Identifier | TokenKind::Keyword)
            }
            _ => false,
        }
    }

    fn is_type_keyword_at(&self, index: usize) -> bool {
        let token = self.token_at(index);
        if token.kind == TokenKind::Keyword {
            return TYPE_KEYWORDS.contains(&token.text.as_str()) || token.text == "delegate";
        }
        token.is(TokenKind::Identifier, "record")
            && (self.token_at(index + 1).kind == TokenKind::Identifier
                || self.token_at(index + 1).is_keyword("class")
                || self.token_at(index + 1).is_keyword("struct"))
    }

    /// Modifiers followed by a type keyword.
    fn at_type_declaration(&self) -> bool {
        let mut i = self.pos;
        while self.is_modifier_at(i) {
            i += 1;
        }
        if !self.is_type_keyword_at(i) {
            return false;
        }
        // `delegate (x) { }` at statement level is an anonymous method.
        !self.token_at(i).is_keyword("delegate") || !self.token_at(i + 1).is_punct("(")
    }

    fn skip_modifiers(&mut self) {
        while self.is_modifier_at(self.pos) {
            self.bump();
        }
    }

    fn parse_type_declaration(&mut self, start: usize) -> NodeId {
        let keyword = self.bump();
        let mut keyword_text = keyword.text;
        if keyword_text == "record" && (self.at_keyword("class") || self.at_keyword("struct")) {
            keyword_text = format!("record {}", self.bump().text);
        }

        if keyword_text == "delegate" {
            self.skip_until(&[";"]);
            self.expect_punct(";");
            let span = self.span_from(start);
            return self.node(SyntaxKind::TypeDeclaration, span, Some(keyword_text), Vec::new());
        }

        let mut children = Vec::new();
        if self.at_identifier() {
            let name = self.bump();
            children.push(self.leaf(SyntaxKind::IdentifierName, &name));
        } else {
            children.push(self.missing("expected a type name"));
        }
        children.extend(self.parse_type_parameter_list());
        // Primary constructor, base list and constraints.
        self.skip_until(&["{", ";"]);

        if self.eat_punct(";") {
            let span = self.span_from(start);
            return self.node(SyntaxKind::TypeDeclaration, span, Some(keyword_text), children);
        }

        if self.expect_punct("{") {
            let is_enum = keyword_text == "enum";
            while !self.at_punct("}") && !self.at_eof() {
                let before = self.pos;
                let member = if is_enum {
                    self.parse_enum_member()
                } else {
                    self.parse_member()
                };
                children.extend(member);
                if self.pos == before {
                    self.bump();
                }
            }
            self.expect_punct("}");
            self.eat_punct(";");
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::TypeDeclaration, span, Some(keyword_text), children)
    }

    fn parse_enum_member(&mut self) -> Option<NodeId> {
        self.skip_attributes();
        if !self.at_identifier() {
            return None;
        }
        let start = self.start();
        let name = self.bump();
        let mut children = Vec::new();
        if self.eat_punct("=") {
            children.push(self.parse_expression());
        }
        self.eat_punct(",");
        let span = self.span_from(start);
        Some(self.node(SyntaxKind::VariableDeclarator, span, Some(name.text), children))
    }

    // === Members === //

    fn parse_member(&mut self) -> Option<NodeId> {
        self.skip_attributes();
        let start = self.start();

        if self.at_type_declaration() {
            self.skip_modifiers();
            return Some(self.parse_type_declaration(start));
        }
        self.skip_modifiers();

        if self.at_punct("}") || self.at_eof() {
            return None;
        }
        if self.at_keyword("event") {
            return Some(self.parse_event(start));
        }
        if self.at_keyword("implicit") || self.at_keyword("explicit") {
            return Some(self.parse_conversion_operator(start));
        }
        if self.at_punct("~") {
            self.bump();
        }
        if self.at_identifier() && self.nth(1).is_punct("(") {
            return Some(self.parse_constructor(start));
        }

        let ty = self.parse_type();
        if self.at_keyword("operator") {
            return Some(self.parse_operator(start, ty));
        }
        if self.at_keyword("this") {
            return Some(self.parse_indexer(start, ty));
        }
        if !self.at_identifier() {
            return Some(self.recover(start, "expected a member name"));
        }

        let mut name = self.bump();
        // Explicit interface implementation: IFoo.Bar
        while self.at_punct(".") && self.nth(1).kind == TokenKind::Identifier {
            self.bump();
            name = self.bump();
        }
        if self.at_punct(".") && self.nth(1).is_keyword("this") {
            self.bump();
            return Some(self.parse_indexer(start, ty));
        }

        if self.at_punct("(") || self.at_punct("<") {
            return Some(self.parse_method_rest(start, ty, name.text));
        }
        if self.at_punct("{") || self.at_punct("=>") {
            return Some(self.parse_property_rest(start, ty, name.text));
        }
        Some(self.parse_field_rest(start, ty, name))
    }

    /// `this[...]` followed by accessors or `=> expr;`.
    fn parse_indexer(&mut self, start: usize, ty: NodeId) -> NodeId {
        let keyword = self.bump();
        let params_start = self.start();
        if self.at_punct("[") {
            self.skip_group();
        } else {
            self.expect_punct("[");
        }
        let params_span = self.span_from(params_start);
        let params = self.node(SyntaxKind::ParameterList, params_span, None, Vec::new());

        let mut children = vec![ty, params];
        if self.at_punct("=>") {
            children.push(self.parse_arrow_clause());
            self.expect_punct(";");
        } else if self.at_punct("{") {
            self.parse_accessor_list(&mut children);
        } else {
            let error_start = self.start();
            children.push(self.recover(error_start, "expected indexer accessors"));
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::IndexerDeclaration, span, Some(keyword.text), children)
    }

    /// `T operator +(...)` and friends, after the return type.
    fn parse_operator(&mut self, start: usize, return_type: NodeId) -> NodeId {
        self.bump();
        self.eat_keyword("checked");
        let symbol_start = self.start();
        self.skip_until(&["(", "{", ";"]);
        let symbol = self.tree.source().slice(self.span_from(symbol_start)).to_string();

        let mut children = vec![return_type, self.parse_parameter_list()];
        children.extend(self.parse_body());
        let span = self.span_from(start);
        self.node(SyntaxKind::OperatorDeclaration, span, Some(symbol), children)
    }

    /// `implicit operator T(...)` or `explicit operator T(...)`.
    fn parse_conversion_operator(&mut self, start: usize) -> NodeId {
        let keyword = self.bump();
        let mut children = Vec::new();
        if !self.eat_keyword("operator") {
            children.push(self.missing("expected `operator`"));
        }
        self.eat_keyword("checked");
        children.push(self.parse_type());
        children.push(self.parse_parameter_list());
        children.extend(self.parse_body());
        let span = self.span_from(start);
        self.node(SyntaxKind::ConversionOperatorDeclaration, span, Some(keyword.text), children)
    }

    /// `event T Name { add ... remove ... }`, or a field-like event.
    fn parse_event(&mut self, start: usize) -> NodeId {
        self.bump();
        let ty = self.parse_type();
        if !self.at_identifier() {
            return self.recover(start, "expected an event name");
        }
        let mut name = self.bump();
        while self.at_punct(".") && self.nth(1).kind == TokenKind::Identifier {
            self.bump();
            name = self.bump();
        }
        if !self.at_punct("{") {
            return self.parse_field_rest(start, ty, name);
        }
        let mut children = vec![ty];
        self.parse_accessor_list(&mut children);
        let span = self.span_from(start);
        self.node(SyntaxKind::EventDeclaration, span, Some(name.text), children)
    }

    fn parse_constructor(&mut self, start: usize) -> NodeId {
        let name = self.bump();
        let mut children = vec![self.parse_parameter_list()];
        if self.eat_punct(":") {
            if self.at_keyword("base") || self.at_keyword("this") {
                self.bump();
            } else {
                children.push(self.missing("expected `base` or `this`"));
            }
            if self.at_punct("(") {
                children.push(self.parse_argument_list());
            }
        }
        children.extend(self.parse_body());
        let span = self.span_from(start);
        self.node(SyntaxKind::ConstructorDeclaration, span, Some(name.text), children)
    }

    /// The part of a method or local function after its name.
    pub(super) fn parse_method_rest(&mut self, start: usize, return_type: NodeId, name: String) -> NodeId {
        let mut children = vec![return_type];
        children.extend(self.parse_type_parameter_list());
        children.push(self.parse_parameter_list());
        // Constraints
        if self.at_contextual("where") {
            self.skip_until(&["{", "=>", ";"]);
        }
        children.extend(self.parse_body());
        let span = self.span_from(start);
        self.node(SyntaxKind::MethodDeclaration, span, Some(name), children)
    }

    /// `<T, in U, [Marker] out V>` after a type or method name.
    fn parse_type_parameter_list(&mut self) -> Option<NodeId> {
        if !self.at_punct("<") {
            return None;
        }
        let start = self.start();
        self.bump();
        let mut parameters = Vec::new();
        loop {
            self.skip_attributes();
            if self.at_keyword("in") || self.at_keyword("out") {
                self.bump();
            }
            if !self.at_identifier() {
                break;
            }
            let name = self.bump();
            parameters.push(self.leaf(SyntaxKind::IdentifierName, &name));
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(">");
        let span = self.span_from(start);
        Some(self.node(SyntaxKind::TypeParameterList, span, None, parameters))
    }

    /// `{ ... }`, `=> expr;` or `;`
    fn parse_body(&mut self) -> Option<NodeId> {
        if self.at_punct("{") {
            return Some(self.parse_block());
        }
        if self.at_punct("=>") {
            let clause = self.parse_arrow_clause();
            self.expect_punct(";");
            return Some(clause);
        }
        if !self.eat_punct(";") {
            let start = self.start();
            return Some(self.recover(start, "expected a method body"));
        }
        None
    }

    fn parse_arrow_clause(&mut self) -> NodeId {
        let start = self.start();
        self.bump();
        let expression = self.parse_expression();
        let span = self.span_from(start);
        self.node(SyntaxKind::ArrowExpressionClause, span, None, vec![expression])
    }

    fn parse_property_rest(&mut self, start: usize, ty: NodeId, name: String) -> NodeId {
        let mut children = vec![ty];
        if self.at_punct("=>") {
            children.push(self.parse_arrow_clause());
            self.expect_punct(";");
        } else {
            self.parse_accessor_list(&mut children);
            if self.eat_punct("=") {
                children.push(if self.at_punct("{") {
                    self.parse_initializer()
                } else {
                    self.parse_expression()
                });
                self.expect_punct(";");
            }
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::PropertyDeclaration, span, Some(name), children)
    }

    /// `{ get; set => ...; }`, appending one node per accessor.
    fn parse_accessor_list(&mut self, into: &mut Vec<NodeId>) {
        self.expect_punct("{");
        while !self.at_punct("}") && !self.at_eof() {
            let before = self.pos;
            if let Some(accessor) = self.parse_accessor() {
                into.push(accessor);
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect_punct("}");
    }

    fn parse_accessor(&mut self) -> Option<NodeId> {
        self.skip_attributes();
        self.skip_modifiers();
        let start = self.start();
        if !self.at_identifier() {
            return None;
        }
        let keyword = self.bump();
        let body: Vec<NodeId> = self.parse_body().into_iter().collect();
        let span = self.span_from(start);
        Some(self.node(SyntaxKind::AccessorDeclaration, span, Some(keyword.text), body))
    }

    fn parse_field_rest(&mut self, start: usize, ty: NodeId, name: Token) -> NodeId {
        let mut children = vec![ty];
        let mut first = Vec::new();
        if self.at_punct("[") {
            self.skip_group();
        }
        if self.eat_punct("=") {
            first.push(if self.at_punct("{") {
                self.parse_initializer()
            } else {
                self.parse_expression()
            });
        }
        let span = self.span_from(name.span.start);
        children.push(self.node(SyntaxKind::VariableDeclarator, span, Some(name.text), first));
        if self.eat_punct(",") {
            self.parse_declarators(&mut children);
        }
        if !self.eat_punct(";") {
            let message = format!("expected `;`, found {}", self.describe_current());
            let error_start = self.start();
            children.push(self.recover(error_start, message));
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::FieldDeclaration, span, None, children)
    }
}
