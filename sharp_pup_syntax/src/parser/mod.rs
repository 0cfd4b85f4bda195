// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Recursive-descent parser for the subset of C# sharp-pup analyses.
//!
//! The parser never fails. Anything it cannot make sense of is wrapped in
//! an `Error` node and recorded in [`SyntaxTree::errors`], then parsing
//! resumes at the next statement or member boundary.

mod declarations;
mod expressions;
mod statements;
mod types;


use crate::lexer::tokenize;
use crate::text::{SourceText, Span};
use crate::token::{Token, TokenKind};
use crate::tree::{NodeId, ParseOptions, SyntaxKind, SyntaxTree};
use std::path::PathBuf;

/// Parse a whole C# source file.
pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>, options: ParseOptions) -> SyntaxTree {
    let source = SourceText::new(source);
    let tokens = tokenize(source.as_str());
    let path = path.into();
    tracing::trace!(path = %path.display(), tokens = tokens.len(), "parsing");

    let mut parser = Parser {
        tokens,
        pos: 0,
        prev_end: 0,
        tree: SyntaxTree::new(path, source, options),
    };
    let root = parser.parse_compilation_unit();
    parser.tree.set_root(root);
    parser.tree
}

/// Parse a snippet that has no file behind it.
pub fn parse_text(source: impl Into<String>, options: ParseOptions) -> SyntaxTree {
    parse("<text>", source, options)
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    prev_end: usize,
    tree: SyntaxTree,
}

impl Parser {
    // === Token cursor === //

    fn current(&self) -> &Token {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> &Token {
        self.token_at(self.pos + n)
    }

    fn token_at(&self, index: usize) -> &Token {
        // The lexer always terminates the stream with Eof.
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn at_punct(&self, text: &str) -> bool {
        self.current().is_punct(text)
    }

    fn at_keyword(&self, text: &str) -> bool {
        self.current().is_keyword(text)
    }

    fn at_identifier(&self) -> bool {
        self.current().kind == TokenKind::Identifier
    }

    fn at_contextual(&self, text: &str) -> bool {
        self.current().is(TokenKind::Identifier, text)
    }

    fn start(&self) -> usize {
        self.current().span.start
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
            self.prev_end = token.span.end;
        }
        token
    }

    fn eat_punct(&mut self, text: &str) -> bool {
        if self.at_punct(text) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, text: &str) -> bool {
        if self.at_keyword(text) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, text: &str) -> bool {
        if self.eat_punct(text) {
            return true;
        }
        let found = self.describe_current();
        let span = self.current().span;
        self.tree.push_error(format!("expected `{text}`, found {found}"), span);
        false
    }

    fn describe_current(&self) -> String {
        match self.current().kind {
            TokenKind::Eof => "end of file".to_string(),
            _ => format!("`{}`", self.current().text),
        }
    }

    // === Tree construction === //

    fn node(&mut self, kind: SyntaxKind, span: Span, text: Option<String>, children: Vec<NodeId>) -> NodeId {
        self.tree.alloc(kind, span, text, children)
    }

    fn leaf(&mut self, kind: SyntaxKind, token: &Token) -> NodeId {
        self.tree.alloc(kind, token.span, Some(token.text.clone()), Vec::new())
    }

    fn missing(&mut self, message: impl Into<String>) -> NodeId {
        let at = self.current().span;
        let message = format!("{}, found {}", message.into(), self.describe_current());
        self.tree.push_error(message, at);
        self.tree.alloc(SyntaxKind::Error, Span::empty(at.start), None, Vec::new())
    }

    // === Recovery === //

    /// Skip to the end of the current statement or member: past a `;` at
    /// depth zero, or up to (not past) a closing `}` at depth zero.
    fn recover(&mut self, start: usize, message: impl Into<String>) -> NodeId {
        let error_at = self.current().span;
        let mut depth = 0usize;
        loop {
            let token = self.current().clone();
            if token.kind == TokenKind::Eof {
                break;
            }
            if token.kind == TokenKind::Punctuation {
                match token.text.as_str() {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" => depth = depth.saturating_sub(1),
                    "}" if depth == 0 => break,
                    "}" => {
                        depth -= 1;
                        self.bump();
                        if depth == 0 && !self.at_punct(";") {
                            break;
                        }
                        continue;
                    }
                    ";" if depth == 0 => {
                        self.bump();
                        break;
                    }
                    _ => {}
                }
            }
            self.bump();
        }
        self.tree.push_error(message, error_at);
        let span = self.span_from(start);
        self.node(SyntaxKind::Error, span, None, Vec::new())
    }

    /// Consume a bracketed group starting at the current opener.
    fn skip_group(&mut self) {
        if let Some(end) = self.scan_group(self.pos) {
            self.skip_to(end);
        } else {
            while !self.at_eof() {
                self.bump();
            }
        }
    }

    /// Index just past the group opened at `index`, if it closes.
    fn scan_group(&self, index: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = index;
        loop {
            let token = self.token_at(i);
            match token.kind {
                TokenKind::Eof => return None,
                TokenKind::Punctuation => match token.text.as_str() {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => {
                        depth = depth.checked_sub(1)?;
                        if depth == 0 {
                            return Some(i + 1);
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
            i += 1;
        }
    }

    /// Consume tokens up to (not including) one of `stops` at depth zero.
    /// Also stops before an unbalanced closer.
    fn skip_until(&mut self, stops: &[&str]) {
        let mut depth = 0usize;
        loop {
            let token = self.current();
            if token.kind == TokenKind::Eof {
                return;
            }
            if token.kind == TokenKind::Punctuation {
                let text = token.text.as_str();
                if depth == 0 && stops.contains(&text) {
                    return;
                }
                match text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" if depth == 0 => return,
                    ")" | "]" | "}" => depth -= 1,
                    _ => {}
                }
            }
            self.bump();
        }
    }

    /// Advance the cursor to `end`, a token index found by a scan.
    fn skip_to(&mut self, end: usize) {
        while self.pos < end && !self.at_eof() {
            self.bump();
        }
    }

    fn skip_attributes(&mut self) {
        while self.at_punct("[") {
            self.skip_group();
        }
    }
}
