// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use super::Parser;
use crate::lexer::{interpolation_holes, tokenize};
use crate::text::Span;
use crate::token::{Token, TokenKind};
use crate::tree::{NodeId, SyntaxKind};

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", "??=",
];

const SHIFT_PRECEDENCE: u8 = 9;
const RANGE_PRECEDENCE: u8 = 12;

/// Binding power of each binary operator. `??` is the only right
/// associative one.
fn precedence(op: &str) -> Option<u8> {
    let prec = match op {
        "??" => 1,
        "||" => 2,
        "&&" => 3,
        "|" => 4,
        "^" => 5,
        "&" => 6,
        "==" | "!=" => 7,
        "<" | ">" | "<=" | ">=" | "is" | "as" => 8,
        "<<" | ">>" => SHIFT_PRECEDENCE,
        "+" | "-" => 10,
        "*" | "/" | "%" => 11,
        ".." => RANGE_PRECEDENCE,
        _ => return None,
    };
    Some(prec)
}

/// Tokens that may follow `Name<...>` when the angle brackets are type
/// arguments rather than comparisons.
const GENERIC_FOLLOWERS: &[&str] = &[
    "(", ")", "]", "}", ":", ";", ",", ".", "?", "?.", "==", "!=", "|", "^", "&&", "||", "&", "[",
];

fn starts_expression(token: &Token) -> bool {
    match token.kind {
        TokenKind::Identifier
        | TokenKind::IntegerLiteral
        | TokenKind::RealLiteral
        | TokenKind::StringLiteral
        | TokenKind::CharLiteral => true,
        TokenKind::Keyword => {
            token.is_predefined_type()
                || matches!(
                    token.text.as_str(),
                    "this" | "base" | "new" | "typeof" | "default" | "true" | "false" | "null"
                        | "checked" | "unchecked" | "sizeof" | "delegate" | "stackalloc"
                )
        }
        TokenKind::Punctuation => matches!(
            token.text.as_str(),
            "(" | "!" | "-" | "+" | "~" | "++" | "--" | "^" | "[" | ".." | "&" | "*"
        ),
        TokenKind::Unknown | TokenKind::Eof => false,
    }
}

impl Parser {
    pub(super) fn parse_expression(&mut self) -> NodeId {
        if self.at_lambda() {
            return self.parse_lambda();
        }
        let start = self.start();
        let left = self.parse_conditional();
        let Some((op, count)) = self.assignment_operator() else {
            return left;
        };
        for _ in 0..count {
            self.bump();
        }
        let right = self.parse_expression();
        let span = self.span_from(start);
        self.node(SyntaxKind::AssignmentExpression, span, Some(op), vec![left, right])
    }

    fn assignment_operator(&self) -> Option<(String, usize)> {
        let token = self.current();
        if token.kind != TokenKind::Punctuation {
            return None;
        }
        if ASSIGNMENT_OPERATORS.contains(&token.text.as_str()) {
            return Some((token.text.clone(), 1));
        }
        // `>>=` arrives as `>` `>=` so that nested generics close cleanly.
        if token.text == ">" && self.adjacent_punct(">=") {
            return Some((">>=".to_string(), 2));
        }
        None
    }

    fn adjacent_punct(&self, text: &str) -> bool {
        let next = self.nth(1);
        next.is_punct(text) && next.span.start == self.current().span.end
    }

    fn parse_conditional(&mut self) -> NodeId {
        let start = self.start();
        let condition = self.parse_binary(0);
        if !self.eat_punct("?") {
            return condition;
        }
        let when_true = self.parse_expression();
        self.expect_punct(":");
        let when_false = self.parse_expression();
        let span = self.span_from(start);
        self.node(
            SyntaxKind::ConditionalExpression,
            span,
            None,
            vec![condition, when_true, when_false],
        )
    }

    /// A `when` guard. Never read as a lambda, since the `=>` after it
    /// belongs to the arm.
    pub(super) fn parse_guard(&mut self) -> NodeId {
        self.parse_conditional()
    }

    fn binary_operator(&self) -> Option<(String, usize)> {
        let token = self.current();
        match token.kind {
            TokenKind::Keyword if matches!(token.text.as_str(), "is" | "as") => Some((token.text.clone(), 1)),
            TokenKind::Punctuation if token.text == ">" && self.adjacent_punct(">") => Some((">>".to_string(), 2)),
            TokenKind::Punctuation if token.text == ">" && self.adjacent_punct(">=") => None,
            TokenKind::Punctuation if precedence(&token.text).is_some() => Some((token.text.clone(), 1)),
            _ => None,
        }
    }

    fn parse_binary(&mut self, min_precedence: u8) -> NodeId {
        let start = self.start();
        let mut left = self.parse_unary();
        loop {
            let Some((op, count)) = self.binary_operator() else {
                break;
            };
            let Some(prec) = precedence(&op) else {
                break;
            };
            if prec < min_precedence {
                break;
            }
            for _ in 0..count {
                self.bump();
            }

            left = match op.as_str() {
                "is" => {
                    let pattern = self.parse_pattern();
                    let span = self.span_from(start);
                    self.node(SyntaxKind::BinaryExpression, span, Some(op), vec![left, pattern])
                }
                "as" => {
                    let ty = self.parse_pattern_type();
                    let span = self.span_from(start);
                    self.node(SyntaxKind::BinaryExpression, span, Some(op), vec![left, ty])
                }
                ".." if !starts_expression(self.current()) => {
                    let span = self.span_from(start);
                    self.node(SyntaxKind::PostfixUnaryExpression, span, Some(op), vec![left])
                }
                _ => {
                    let next_min = if op == "??" { prec } else { prec + 1 };
                    let right = self.parse_binary(next_min);
                    let span = self.span_from(start);
                    self.node(SyntaxKind::BinaryExpression, span, Some(op), vec![left, right])
                }
            };
        }
        left
    }

    fn parse_unary(&mut self) -> NodeId {
        let start = self.start();
        let token = self.current().clone();

        let prefix = match token.kind {
            TokenKind::Punctuation => matches!(
                token.text.as_str(),
                "!" | "-" | "+" | "~" | "++" | "--" | "&" | "*" | "^"
            ),
            TokenKind::Keyword => matches!(token.text.as_str(), "throw" | "ref"),
            TokenKind::Identifier => token.text == "await" && starts_expression(self.nth(1)),
            _ => false,
        };
        if prefix {
            self.bump();
            let operand = if token.text == "throw" {
                self.parse_expression()
            } else {
                self.parse_unary()
            };
            let span = self.span_from(start);
            return self.node(SyntaxKind::PrefixUnaryExpression, span, Some(token.text), vec![operand]);
        }

        if token.is_punct("..") {
            self.bump();
            let mut children = Vec::new();
            if starts_expression(self.current()) {
                children.push(self.parse_binary(RANGE_PRECEDENCE + 1));
            }
            let span = self.span_from(start);
            return self.node(SyntaxKind::PrefixUnaryExpression, span, Some(token.text), children);
        }

        if token.is_punct("(") && self.at_cast() {
            self.bump();
            let ty = self.parse_type();
            self.expect_punct(")");
            let operand = self.parse_unary();
            let span = self.span_from(start);
            return self.node(SyntaxKind::CastExpression, span, None, vec![ty, operand]);
        }

        let primary = self.parse_primary();
        self.parse_postfix(start, primary)
    }

    /// `(T)x`: the parenthesised tokens form a type and what follows can
    /// only be an operand.
    fn at_cast(&self) -> bool {
        let Some(end) = self.scan_type(self.pos + 1) else {
            return false;
        };
        if !self.token_at(end).is_punct(")") {
            return false;
        }
        // `(int)-1` is a cast, `(x)-1` is a subtraction.
        if self.nth(1).is_predefined_type() && end == self.pos + 2 {
            return starts_expression(self.token_at(end + 1));
        }
        let next = self.token_at(end + 1);
        match next.kind {
            TokenKind::Identifier
            | TokenKind::IntegerLiteral
            | TokenKind::RealLiteral
            | TokenKind::StringLiteral
            | TokenKind::CharLiteral => true,
            TokenKind::Keyword => starts_expression(next),
            TokenKind::Punctuation => matches!(next.text.as_str(), "(" | "!" | "~"),
            _ => false,
        }
    }

    fn parse_postfix(&mut self, start: usize, mut expr: NodeId) -> NodeId {
        loop {
            let token = self.current().clone();
            if token.kind != TokenKind::Punctuation && !token.is_keyword("switch") {
                return expr;
            }
            expr = match token.text.as_str() {
                "." | "->" => {
                    self.bump();
                    let generic = self.at_generic_name();
                    let name = self.parse_simple_name(generic);
                    let span = self.span_from(start);
                    self.node(SyntaxKind::MemberAccessExpression, span, Some(token.text), vec![expr, name])
                }
                "?." => {
                    self.bump();
                    let access = if self.at_punct("[") {
                        self.parse_bracketed_argument_list()
                    } else {
                        let generic = self.at_generic_name();
                        self.parse_simple_name(generic)
                    };
                    let span = self.span_from(start);
                    self.node(SyntaxKind::ConditionalAccessExpression, span, None, vec![expr, access])
                }
                "(" => {
                    let args = self.parse_argument_list();
                    let span = self.span_from(start);
                    self.node(SyntaxKind::InvocationExpression, span, None, vec![expr, args])
                }
                "[" => {
                    let args = self.parse_bracketed_argument_list();
                    let span = self.span_from(start);
                    self.node(SyntaxKind::ElementAccessExpression, span, None, vec![expr, args])
                }
                "++" | "--" | "!" => {
                    self.bump();
                    let span = self.span_from(start);
                    self.node(SyntaxKind::PostfixUnaryExpression, span, Some(token.text), vec![expr])
                }
                "switch" => self.parse_switch_expression(start, expr),
                _ => return expr,
            };
        }
    }

    /// `Name<...>` in expression context, where the `<` is not a comparison.
    pub(super) fn at_generic_name(&self) -> bool {
        if !(self.at_identifier() && self.nth(1).is_punct("<")) {
            return false;
        }
        let Some(end) = self.scan_type_argument_list(self.pos + 1) else {
            return false;
        };
        let next = self.token_at(end);
        next.kind == TokenKind::Eof
            || (next.kind == TokenKind::Punctuation && GENERIC_FOLLOWERS.contains(&next.text.as_str()))
    }

    fn parse_primary(&mut self) -> NodeId {
        let start = self.start();
        let token = self.current().clone();

        if token.kind == TokenKind::StringLiteral && (token.text.starts_with('$') || token.text.starts_with("@$")) {
            return self.parse_interpolated_string();
        }
        if token.is_literal() {
            self.bump();
            return self.leaf(SyntaxKind::LiteralExpression, &token);
        }

        match token.kind {
            TokenKind::Keyword => match token.text.as_str() {
                "typeof" => self.parse_typeof(),
                "this" => {
                    self.bump();
                    self.leaf(SyntaxKind::ThisExpression, &token)
                }
                "base" => {
                    self.bump();
                    self.leaf(SyntaxKind::BaseExpression, &token)
                }
                "default" => {
                    self.bump();
                    let mut children = Vec::new();
                    if self.eat_punct("(") {
                        children.push(self.parse_type());
                        self.expect_punct(")");
                    }
                    let span = self.span_from(start);
                    self.node(SyntaxKind::DefaultExpression, span, None, children)
                }
                "new" | "stackalloc" => self.parse_creation(),
                "delegate" => {
                    self.bump();
                    let params = self.parse_parameter_list_if_present();
                    let body = self.parse_block();
                    let mut children: Vec<NodeId> = params.into_iter().collect();
                    children.push(body);
                    let span = self.span_from(start);
                    self.node(SyntaxKind::LambdaExpression, span, Some(token.text), children)
                }
                // `sizeof(T)`, `checked(x)`: the invocation postfix picks up the parens.
                "sizeof" | "checked" | "unchecked" => {
                    self.bump();
                    self.leaf(SyntaxKind::IdentifierName, &token)
                }
                _ if token.is_predefined_type() => {
                    self.bump();
                    self.leaf(SyntaxKind::PredefinedType, &token)
                }
                _ => self.missing("expected an expression"),
            },
            TokenKind::Identifier => {
                if token.text == "nameof" && self.nth(1).is_punct("(") {
                    return self.parse_nameof();
                }
                if self.nth(1).is_punct("::") {
                    return self.parse_pattern_type();
                }
                let generic = self.at_generic_name();
                self.parse_simple_name(generic)
            }
            TokenKind::Punctuation if token.text == "(" => self.parse_parenthesized(),
            TokenKind::Punctuation if token.text == "[" => {
                // Collection expression
                let elements = self.parse_bracketed_argument_list();
                let span = self.span_from(start);
                self.node(SyntaxKind::InitializerExpression, span, None, vec![elements])
            }
            _ => self.missing("expected an expression"),
        }
    }

    /// `$"..."`: one child expression per hole.
    fn parse_interpolated_string(&mut self) -> NodeId {
        let token = self.bump();
        let holes: Vec<NodeId> = interpolation_holes(&token.text)
            .into_iter()
            .map(|hole| {
                let offset = token.span.start;
                self.parse_hole(Span::new(hole.start + offset, hole.end + offset))
            })
            .collect();
        self.node(SyntaxKind::InterpolatedStringExpression, token.span, None, holes)
    }

    /// Parse the expression of one hole with its own token stream, then
    /// hand the outer stream back.
    fn parse_hole(&mut self, span: Span) -> NodeId {
        let text = self.tree.source().slice(span).to_string();
        let tokens = tokenize(&text)
            .into_iter()
            .map(|mut token| {
                token.span = Span::new(token.span.start + span.start, token.span.end + span.start);
                token
            })
            .collect();
        let outer_tokens = std::mem::replace(&mut self.tokens, tokens);
        let outer_pos = std::mem::replace(&mut self.pos, 0);
        let outer_prev_end = std::mem::replace(&mut self.prev_end, span.start);

        let expression = if self.at_eof() {
            self.missing("expected an expression in interpolation")
        } else {
            self.parse_expression()
        };
        if !self.at_eof() {
            let at = self.current().span;
            self.tree.push_error("unexpected tokens in interpolation", Span::new(at.start, span.end));
        }

        self.tokens = outer_tokens;
        self.pos = outer_pos;
        self.prev_end = outer_prev_end;
        expression
    }

    fn parse_typeof(&mut self) -> NodeId {
        let start = self.start();
        let keyword = self.bump();
        self.expect_punct("(");
        let ty = self.parse_type();
        self.expect_punct(")");
        let span = self.span_from(start);
        self.node(SyntaxKind::TypeOfExpression, span, Some(keyword.text), vec![ty])
    }

    fn parse_nameof(&mut self) -> NodeId {
        let start = self.start();
        let keyword = self.bump();
        self.expect_punct("(");
        let operand = self.parse_expression();
        self.expect_punct(")");
        let span = self.span_from(start);
        self.node(SyntaxKind::NameOfExpression, span, Some(keyword.text), vec![operand])
    }

    /// `(x)`, or a tuple literal such as `(1, name: x)`.
    fn parse_parenthesized(&mut self) -> NodeId {
        let start = self.start();
        self.bump();
        let mut named = self.eat_tuple_element_name();
        let mut children = vec![self.parse_expression()];
        while self.eat_punct(",") {
            named |= self.eat_tuple_element_name();
            children.push(self.parse_expression());
        }
        self.expect_punct(")");
        let span = self.span_from(start);
        let kind = if named || children.len() > 1 {
            SyntaxKind::TupleExpression
        } else {
            SyntaxKind::ParenthesizedExpression
        };
        self.node(kind, span, None, children)
    }

    fn eat_tuple_element_name(&mut self) -> bool {
        if self.at_identifier() && self.nth(1).is_punct(":") {
            self.bump();
            self.bump();
            return true;
        }
        false
    }

    /// `new T(...) { ... }`, `new T[n]`, `new[] { ... }`, `new { ... }`,
    /// `new(...)` and `stackalloc T[n]`.
    fn parse_creation(&mut self) -> NodeId {
        let start = self.start();
        let keyword = self.bump();
        let mut children = Vec::new();

        if self.at_punct("[") {
            self.skip_group();
        } else if !self.at_punct("(") && !self.at_punct("{") {
            children.push(self.parse_type());
            while self.at_punct("[") {
                children.push(self.parse_bracketed_argument_list());
            }
        }
        if self.at_punct("(") {
            children.push(self.parse_argument_list());
        }
        if self.at_punct("{") {
            children.push(self.parse_initializer());
        }

        let span = self.span_from(start);
        self.node(SyntaxKind::ObjectCreationExpression, span, Some(keyword.text), children)
    }

    pub(super) fn parse_initializer(&mut self) -> NodeId {
        let start = self.start();
        self.expect_punct("{");
        let mut elements = Vec::new();
        while !self.at_punct("}") && !self.at_eof() {
            let before = self.pos;
            if self.at_punct("{") {
                elements.push(self.parse_initializer());
            } else {
                elements.push(self.parse_expression());
            }
            if self.eat_punct(",") {
                continue;
            }
            if self.pos == before || !self.at_punct("}") {
                let error_start = self.start();
                self.skip_until(&[",", "}"]);
                if self.pos == before {
                    self.bump();
                }
                elements.push(self.recover_error(error_start, "malformed initializer"));
                self.eat_punct(",");
            }
        }
        self.expect_punct("}");
        let span = self.span_from(start);
        self.node(SyntaxKind::InitializerExpression, span, None, elements)
    }

    fn recover_error(&mut self, start: usize, message: &str) -> NodeId {
        let span = self.span_from(start);
        self.tree.push_error(message, span);
        self.node(SyntaxKind::Error, span, None, Vec::new())
    }

    pub(super) fn parse_argument_list(&mut self) -> NodeId {
        self.parse_arguments("(", ")")
    }

    fn parse_bracketed_argument_list(&mut self) -> NodeId {
        self.parse_arguments("[", "]")
    }

    fn parse_arguments(&mut self, open: &str, close: &str) -> NodeId {
        let start = self.start();
        self.expect_punct(open);
        let mut args = Vec::new();
        if !self.at_punct(close) {
            loop {
                args.push(self.parse_argument());
                if !self.eat_punct(",") {
                    break;
                }
            }
        }
        self.expect_punct(close);
        let span = self.span_from(start);
        self.node(SyntaxKind::ArgumentList, span, None, args)
    }

    fn parse_argument(&mut self) -> NodeId {
        // Named argument
        if self.at_identifier() && self.nth(1).is_punct(":") {
            self.bump();
            self.bump();
        }
        if self.at_keyword("out") || self.at_keyword("ref") || self.at_keyword("in") {
            let start = self.start();
            self.bump();
            if let Some(end) = self.scan_type(self.pos) {
                let name = self.token_at(end);
                let closes = self.token_at(end + 1);
                if name.kind == TokenKind::Identifier && (closes.is_punct(")") || closes.is_punct(",")) {
                    let ty = self.parse_type();
                    let name = self.bump();
                    let declarator = self.leaf(SyntaxKind::VariableDeclarator, &name);
                    let span = self.span_from(start);
                    return self.node(SyntaxKind::DeclarationExpression, span, None, vec![ty, declarator]);
                }
            }
            return self.parse_expression();
        }
        self.parse_expression()
    }

    fn at_lambda(&self) -> bool {
        let mut i = self.pos;
        let first = self.token_at(i);
        if first.is(TokenKind::Identifier, "async") {
            let next = self.token_at(i + 1);
            if next.kind == TokenKind::Identifier || next.is_punct("(") {
                i += 1;
            }
        }
        if self.token_at(i).is_keyword("static") {
            i += 1;
        }
        let head = self.token_at(i);
        if head.kind == TokenKind::Identifier {
            return self.token_at(i + 1).is_punct("=>");
        }
        if head.is_punct("(") {
            return self
                .scan_group(i)
                .is_some_and(|end| self.token_at(end).is_punct("=>"));
        }
        false
    }

    fn parse_lambda(&mut self) -> NodeId {
        let start = self.start();
        if self.at_contextual("async") && !self.nth(1).is_punct("=>") {
            self.bump();
        }
        self.eat_keyword("static");

        let params = if self.at_punct("(") {
            self.parse_parameter_list()
        } else {
            let name = self.bump();
            let id = self.leaf(SyntaxKind::IdentifierName, &name);
            let span = name.span;
            self.node(SyntaxKind::ParameterList, span, None, vec![id])
        };
        self.expect_punct("=>");
        let body = if self.at_punct("{") {
            self.parse_block()
        } else {
            self.parse_expression()
        };
        let span = self.span_from(start);
        self.node(SyntaxKind::LambdaExpression, span, None, vec![params, body])
    }

    /// Parameter lists are kept as an opaque span; default values are
    /// constants and never interesting to analyse.
    pub(super) fn parse_parameter_list(&mut self) -> NodeId {
        let start = self.start();
        if self.at_punct("(") {
            self.skip_group();
        } else {
            self.expect_punct("(");
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::ParameterList, span, None, Vec::new())
    }

    fn parse_parameter_list_if_present(&mut self) -> Option<NodeId> {
        self.at_punct("(").then(|| self.parse_parameter_list())
    }

    /// Patterns after `is`. Only the parts that are ordinary expressions or
    /// types become child nodes; property and positional sub-patterns are
    /// skipped.
    pub(super) fn parse_pattern(&mut self) -> NodeId {
        let start = self.start();
        let before = self.pos;
        let mut children = Vec::new();
        loop {
            while self.at_contextual("not") {
                self.bump();
            }
            let token = self.current().clone();
            if token.kind == TokenKind::Punctuation && matches!(token.text.as_str(), "<" | "<=" | ">" | ">=") {
                self.bump();
                children.push(self.parse_binary(SHIFT_PRECEDENCE));
            } else if token.is_punct("{") || token.is_punct("(") || token.is_punct("[") {
                self.skip_group();
            } else if token.is_literal() || token.is_punct("-") || token.is_keyword("typeof") {
                children.push(self.parse_unary());
            } else if self.scan_type(self.pos).is_some() {
                children.push(self.parse_pattern_type());
                if self.at_punct("{") || self.at_punct("(") {
                    self.skip_group();
                }
                if self.at_identifier() && !self.at_pattern_combinator() && !self.at_contextual("when") {
                    self.bump();
                }
            } else {
                break;
            }
            if self.at_pattern_combinator() {
                self.bump();
            } else {
                break;
            }
        }
        if self.pos == before {
            return self.missing("expected a pattern");
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::Pattern, span, None, children)
    }

    fn at_pattern_combinator(&self) -> bool {
        self.at_contextual("and") || self.at_contextual("or")
    }

    fn parse_switch_expression(&mut self, start: usize, governing: NodeId) -> NodeId {
        self.bump();
        let mut children = vec![governing];
        if self.expect_punct("{") {
            while !self.at_punct("}") && !self.at_eof() {
                let before = self.pos;
                self.skip_pattern_until(&["=>", ",", "}"]);
                if self.at_contextual("when") {
                    self.bump();
                    children.push(self.parse_guard());
                }
                if self.eat_punct("=>") {
                    children.push(self.parse_expression());
                }
                if !self.eat_punct(",") && self.pos == before {
                    self.bump();
                }
            }
            self.expect_punct("}");
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::SwitchExpression, span, None, children)
    }
}
