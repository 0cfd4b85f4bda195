// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use super::Parser;
use crate::text::Span;
use crate::token::TokenKind;
use crate::tree::{NodeId, SyntaxKind};

impl Parser {
    /// Parse a type: predefined, (alias-)qualified, generic, array, nullable.
    pub(super) fn parse_type(&mut self) -> NodeId {
        self.parse_type_in(true)
    }

    /// A type on the right of `is`/`as`, where a trailing `?` may open a
    /// conditional expression instead.
    pub(super) fn parse_pattern_type(&mut self) -> NodeId {
        self.parse_type_in(false)
    }

    fn parse_type_in(&mut self, declaration: bool) -> NodeId {
        let start = self.start();
        let mut ty = if self.current().is_predefined_type() {
            let token = self.bump();
            self.leaf(SyntaxKind::PredefinedType, &token)
        } else if self.at_identifier() && self.nth(1).is_punct("::") {
            let alias_token = self.bump();
            let alias = self.leaf(SyntaxKind::IdentifierName, &alias_token);
            self.bump();
            let name = self.parse_simple_name(true);
            let span = self.span_from(start);
            self.node(SyntaxKind::AliasQualifiedName, span, None, vec![alias, name])
        } else if self.at_identifier() {
            self.parse_simple_name(true)
        } else {
            return self.missing("expected a type");
        };

        while self.at_punct(".") && self.nth(1).kind == TokenKind::Identifier {
            self.bump();
            let right = self.parse_simple_name(true);
            let span = self.span_from(start);
            ty = self.node(SyntaxKind::QualifiedName, span, None, vec![ty, right]);
        }

        self.parse_type_suffixes(start, ty, declaration)
    }

    fn parse_type_suffixes(&mut self, start: usize, mut ty: NodeId, declaration: bool) -> NodeId {
        loop {
            if self.at_punct("?") && (declaration || self.question_is_nullable()) {
                self.bump();
                let span = self.span_from(start);
                ty = self.node(SyntaxKind::NullableType, span, None, vec![ty]);
            } else if self.at_punct("[") && self.scan_rank_specifier(self.pos).is_some() {
                let mut rank = String::from("[");
                self.bump();
                while self.eat_punct(",") {
                    rank.push(',');
                }
                self.bump();
                rank.push(']');
                let span = self.span_from(start);
                ty = self.node(SyntaxKind::ArrayType, span, Some(rank), vec![ty]);
            } else {
                return ty;
            }
        }
    }

    /// An identifier, optionally followed by a type argument list. In
    /// expression context the caller has already checked the `<` really
    /// opens type arguments.
    pub(super) fn parse_simple_name(&mut self, allow_generic: bool) -> NodeId {
        if !self.at_identifier() {
            return self.missing("expected an identifier");
        }
        let token = self.bump();
        if !(allow_generic && self.at_punct("<")) {
            return self.leaf(SyntaxKind::IdentifierName, &token);
        }
        if self.scan_type_argument_list(self.pos).is_none() {
            return self.leaf(SyntaxKind::IdentifierName, &token);
        }
        let args = self.parse_type_argument_list();
        let span = Span::new(token.span.start, self.prev_end);
        self.node(SyntaxKind::GenericName, span, Some(token.text), vec![args])
    }

    fn parse_type_argument_list(&mut self) -> NodeId {
        let start = self.start();
        self.bump();
        let mut args = Vec::new();
        loop {
            if self.at_punct(",") || self.at_punct(">") {
                // Unbound generic: Foo<> or Foo<,>
                let at = self.start();
                args.push(self.node(SyntaxKind::OmittedTypeArgument, Span::empty(at), None, Vec::new()));
            } else {
                args.push(self.parse_type());
            }
            if self.eat_punct(",") {
                continue;
            }
            self.expect_punct(">");
            break;
        }
        let span = self.span_from(start);
        self.node(SyntaxKind::TypeArgumentList, span, None, args)
    }

    fn question_is_nullable(&self) -> bool {
        let next = self.nth(1);
        match next.kind {
            TokenKind::Eof => true,
            TokenKind::Punctuation => !matches!(
                next.text.as_str(),
                "(" | "[" | "!" | "-" | "+" | "~" | "++" | "--" | "^" | ".."
            ),
            _ => false,
        }
    }

    // === Lookahead without building nodes === //

    /// Index just past a type starting at `index`, if one starts there.
    pub(super) fn scan_type(&self, index: usize) -> Option<usize> {
        let mut i = index;
        let first = self.token_at(i);
        if first.is_predefined_type() {
            i += 1;
        } else if first.kind == TokenKind::Identifier {
            i += 1;
            if self.token_at(i).is_punct("::") && self.token_at(i + 1).kind == TokenKind::Identifier {
                i += 2;
            }
            i = self.scan_optional_type_arguments(i);
            while self.token_at(i).is_punct(".") && self.token_at(i + 1).kind == TokenKind::Identifier {
                i = self.scan_optional_type_arguments(i + 2);
            }
        } else {
            return None;
        }

        loop {
            if self.token_at(i).is_punct("?") {
                i += 1;
            } else if let Some(end) = self.scan_rank_specifier(i) {
                i = end;
            } else {
                return Some(i);
            }
        }
    }

    fn scan_optional_type_arguments(&self, index: usize) -> usize {
        if self.token_at(index).is_punct("<") {
            self.scan_type_argument_list(index).unwrap_or(index)
        } else {
            index
        }
    }

    /// Index just past `<...>` starting at `index`.
    pub(super) fn scan_type_argument_list(&self, index: usize) -> Option<usize> {
        if !self.token_at(index).is_punct("<") {
            return None;
        }
        let mut i = index + 1;
        loop {
            let token = self.token_at(i);
            if token.is_punct(">") {
                return Some(i + 1);
            }
            if token.is_punct(",") {
                i += 1;
                continue;
            }
            i = self.scan_type(i)?;
            let next = self.token_at(i);
            if next.is_punct(",") {
                i += 1;
            } else if !next.is_punct(">") {
                return None;
            }
        }
    }

    /// `[]`, `[,]`, ... starting at `index`.
    fn scan_rank_specifier(&self, index: usize) -> Option<usize> {
        if !self.token_at(index).is_punct("[") {
            return None;
        }
        let mut i = index + 1;
        while self.token_at(i).is_punct(",") {
            i += 1;
        }
        self.token_at(i).is_punct("]").then_some(i + 1)
    }
}
