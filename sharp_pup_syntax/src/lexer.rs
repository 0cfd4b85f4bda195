// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Turns C# source text into a flat token stream. Trivia (whitespace,
//! comments, preprocessor lines) is dropped; spans keep tokens anchored
//! to the source text.

use crate::text::Span;
use crate::token::{KEYWORDS, PUNCTUATORS, Token, TokenKind};

pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.peek() {
            if c == '\n' {
                self.pos += 1;
                self.at_line_start = true;
                continue;
            }
            if c.is_whitespace() {
                self.pos += c.len_utf8();
                continue;
            }
            if c == '#' && self.at_line_start {
                self.skip_line();
                continue;
            }
            self.at_line_start = false;

            if self.rest().starts_with("//") {
                self.skip_line();
                continue;
            }
            if self.rest().starts_with("/*") {
                self.skip_block_comment();
                continue;
            }

            let start = self.pos;
            let kind = self.lex_token(c);
            self.push(kind, start);
        }

        let end = self.source.len();
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span: Span::empty(end),
        });
        self.tokens
    }

    fn lex_token(&mut self, c: char) -> TokenKind {
        let rest = self.rest();
        if let Some(prefix) = interpolated_prefix(rest) {
            let (consumed, _) = scan_interpolated_body(&rest[prefix..], prefix == 3);
            self.pos += prefix + consumed;
            return TokenKind::StringLiteral;
        }
        if rest.starts_with("@\"") {
            self.pos += 2;
            self.lex_verbatim_string_body();
            return TokenKind::StringLiteral;
        }
        if c == '"' {
            self.pos += 1;
            self.lex_quoted_body('"');
            return TokenKind::StringLiteral;
        }
        if c == '\'' {
            self.pos += 1;
            self.lex_quoted_body('\'');
            return TokenKind::CharLiteral;
        }
        if c == '@' && rest[1..].starts_with(is_identifier_start) {
            self.pos += 1;
            self.eat_while(is_identifier_part);
            return TokenKind::Identifier;
        }
        if is_identifier_start(c) {
            let start = self.pos;
            self.eat_while(is_identifier_part);
            let word = &self.source[start..self.pos];
            return if KEYWORDS.contains(&word) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
        }
        if c.is_ascii_digit() || (c == '.' && rest[1..].starts_with(|d: char| d.is_ascii_digit())) {
            return self.lex_number();
        }
        if let Some(punct) = PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) {
            self.pos += punct.len();
            return TokenKind::Punctuation;
        }
        self.pos += c.len_utf8();
        TokenKind::Unknown
    }

    fn lex_number(&mut self) -> TokenKind {
        let rest = self.rest();
        if rest.starts_with("0x") || rest.starts_with("0X") || rest.starts_with("0b") || rest.starts_with("0B") {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            self.eat_while(is_integer_suffix);
            return TokenKind::IntegerLiteral;
        }

        let mut kind = TokenKind::IntegerLiteral;
        self.eat_while(|c| c.is_ascii_digit() || c == '_');
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            kind = TokenKind::RealLiteral;
            self.pos += 1;
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
            if self.peek_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                kind = TokenKind::RealLiteral;
                self.pos += 1 + sign;
                self.eat_while(|c| c.is_ascii_digit());
            }
        }
        if matches!(self.peek(), Some('f' | 'F' | 'd' | 'D' | 'm' | 'M')) {
            kind = TokenKind::RealLiteral;
            self.pos += 1;
        } else {
            self.eat_while(is_integer_suffix);
        }
        kind
    }

    fn lex_quoted_body(&mut self, quote: char) {
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek() {
                        self.pos += escaped.len_utf8();
                    }
                }
                '\n' => return,
                _ if c == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += c.len_utf8(),
            }
        }
    }

    fn lex_verbatim_string_body(&mut self) {
        while let Some(c) = self.peek() {
            self.pos += c.len_utf8();
            if c == '"' {
                if self.peek() == Some('"') {
                    self.pos += 1;
                } else {
                    return;
                }
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                return;
            }
            self.pos += c.len_utf8();
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        match self.rest().find("*/") {
            Some(offset) => self.pos += offset + 2,
            None => self.pos = self.source.len(),
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            text: self.source[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        });
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }
}

/// Length of the `$"`, `$@"` or `@$"` opening an interpolated string.
fn interpolated_prefix(text: &str) -> Option<usize> {
    if text.starts_with("$@\"") || text.starts_with("@$\"") {
        Some(3)
    } else if text.starts_with("$\"") {
        Some(2)
    } else {
        None
    }
}

/// Ranges of the expression inside each hole of an interpolated string
/// token, relative to the token text. Alignment and format specifiers are
/// left out. Anything that is not an interpolated string has no holes.
pub(crate) fn interpolation_holes(text: &str) -> Vec<Span> {
    let Some(prefix) = interpolated_prefix(text) else {
        return Vec::new();
    };
    let (_, holes) = scan_interpolated_body(&text[prefix..], prefix == 3);
    holes
        .into_iter()
        .map(|hole| Span::new(hole.start + prefix, hole.end + prefix))
        .collect()
}

/// Scan an interpolated string body that starts after the opening quote.
/// Returns the bytes consumed (closing quote included) and the expression
/// range of every hole. Delimiters are all ASCII, so scanning bytes never
/// stops inside a multi-byte character.
fn scan_interpolated_body(body: &str, verbatim: bool) -> (usize, Vec<Span>) {
    let bytes = body.as_bytes();
    let mut holes = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if !verbatim => i += 2,
            b'"' if verbatim && bytes.get(i + 1) == Some(&b'"') => i += 2,
            b'"' => return (i + 1, holes),
            b'\n' if !verbatim => return (i, holes),
            b'{' if bytes.get(i + 1) == Some(&b'{') => i += 2,
            b'{' => {
                let (end, hole) = scan_hole(bytes, i + 1, verbatim);
                holes.push(hole);
                i = end;
            }
            _ => i += 1,
        }
    }
    (bytes.len(), holes)
}

/// Scan one hole starting just after its `{`. Returns the index past the
/// closing `}` and the range of the expression before any `,alignment` or
/// `:format` suffix.
fn scan_hole(bytes: &[u8], start: usize, verbatim: bool) -> (usize, Span) {
    let mut depth = 0usize;
    let mut expression_end = None;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' if expression_end.is_none() => i = skip_quoted(bytes, i),
            b'(' | b'[' | b'{' => {
                depth += 1;
                i += 1;
            }
            b')' | b']' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b'}' if depth == 0 => return (i + 1, Span::new(start, expression_end.unwrap_or(i))),
            b'}' => {
                depth -= 1;
                i += 1;
            }
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b',' | b':' if depth == 0 && expression_end.is_none() => {
                expression_end = Some(i);
                i += 1;
            }
            b'\n' if !verbatim => return (i, Span::new(start, expression_end.unwrap_or(i))),
            _ => i += 1,
        }
    }
    let end = bytes.len();
    (end, Span::new(start, expression_end.unwrap_or(end)))
}

/// Index past the string or char literal opened at `open`.
fn skip_quoted(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let verbatim = quote == b'"' && open > 0 && bytes[open - 1] == b'@';
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if !verbatim => i += 2,
            b'\n' if !verbatim => return i,
            c if c == quote && verbatim && bytes.get(i + 1) == Some(&quote) => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_integer_suffix(c: char) -> bool {
    matches!(c, 'u' | 'U' | 'l' | 'L')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_text(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn lexes_typeof_member_access() {
        let tokens = kinds_and_text("typeof(Foo).Name;");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "typeof".into()),
                (TokenKind::Punctuation, "(".into()),
                (TokenKind::Identifier, "Foo".into()),
                (TokenKind::Punctuation, ")".into()),
                (TokenKind::Punctuation, ".".into()),
                (TokenKind::Identifier, "Name".into()),
                (TokenKind::Punctuation, ";".into()),
                (TokenKind::Eof, "".into()),
            ]
        );
    }

    #[test]
    fn drops_comments_and_directives() {
        let source = "#if DEBUG\n// comment\nx /* inline */ = 1;\n#endif\n";
        let texts: Vec<String> = tokenize(source).into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["x", "=", "1", ";", ""]);
    }

    #[test]
    fn lexes_literals() {
        let tokens = kinds_and_text(r#"1 2.5 3e10 4f 0xFF 10UL "a\"b" 'c' @"x""y" $"{a} b""#);
        let kinds: Vec<TokenKind> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::IntegerLiteral,
                TokenKind::RealLiteral,
                TokenKind::RealLiteral,
                TokenKind::RealLiteral,
                TokenKind::IntegerLiteral,
                TokenKind::IntegerLiteral,
                TokenKind::StringLiteral,
                TokenKind::CharLiteral,
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[8].1, r#"@"x""y""#);
    }

    #[test]
    fn verbatim_identifiers_and_contextual_keywords() {
        let tokens = kinds_and_text("@class nameof var");
        assert_eq!(tokens[0], (TokenKind::Identifier, "@class".into()));
        assert_eq!(tokens[1], (TokenKind::Identifier, "nameof".into()));
        assert_eq!(tokens[2], (TokenKind::Identifier, "var".into()));
    }

    #[test]
    fn punctuators_are_greedy() {
        let texts: Vec<String> = tokenize("a ?? b => c?.d :: e")
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["a", "??", "b", "=>", "c", "?.", "d", "::", "e", ""]);
    }

    #[test]
    fn spans_point_into_source() {
        let source = "  typeof(Foo)";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].span, Span::new(2, 8));
        assert_eq!(&source[tokens[2].span.start..tokens[2].span.end], "Foo");
    }

    #[test]
    fn interpolated_strings_are_one_token() {
        let source = r#"$"a {Call("}", x):N2} {{b}}" + 1"#;
        let texts: Vec<String> = tokenize(source).into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec![r#"$"a {Call("}", x):N2} {{b}}""#, "+", "1", ""]);
    }

    #[test]
    fn interpolation_holes_cover_the_expression_only() {
        let text = r#"$"T {typeof(Foo).Name,-10} {x ?? y:D2} {{skip}} {Map[k]}""#;
        let holes: Vec<&str> = interpolation_holes(text)
            .into_iter()
            .map(|hole| &text[hole.start..hole.end])
            .collect();
        assert_eq!(holes, vec!["typeof(Foo).Name", "x ?? y", "Map[k]"]);
    }

    #[test]
    fn verbatim_interpolation_spans_lines() {
        let text = "$@\"line {A}\n\"\"quoted\"\" {global::B.C}\"";
        let tokens = tokenize(text);
        assert_eq!(tokens.len(), 2);
        let holes: Vec<&str> = interpolation_holes(text)
            .into_iter()
            .map(|hole| &text[hole.start..hole.end])
            .collect();
        assert_eq!(holes, vec!["A", "global::B.C"]);
        assert!(interpolation_holes(r#""{not a hole}""#).is_empty());
    }

    #[test]
    fn unknown_characters_are_kept() {
        let tokens = kinds_and_text("a ` b");
        assert_eq!(tokens[1], (TokenKind::Unknown, "`".into()));
    }
}
