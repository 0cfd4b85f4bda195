// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::text::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    IntegerLiteral,
    RealLiteral,
    StringLiteral,
    CharLiteral,
    Punctuation,
    /// A character the lexer does not understand; kept so the parser can
    /// report it at the right place.
    Unknown,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.is(TokenKind::Punctuation, text)
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.is(TokenKind::Keyword, text)
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::IntegerLiteral
                | TokenKind::RealLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
        ) || (self.kind == TokenKind::Keyword
            && matches!(self.text.as_str(), "true" | "false" | "null"))
    }

    pub fn is_predefined_type(&self) -> bool {
        self.kind == TokenKind::Keyword && PREDEFINED_TYPES.contains(&self.text.as_str())
    }
}

/// Reserved C# keywords. Contextual keywords (`var`, `nameof`, `record`,
/// `global`, `get`, `set`, ...) lex as identifiers.
pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

pub const PREDEFINED_TYPES: &[&str] = &[
    "bool", "byte", "char", "decimal", "double", "float", "int", "long", "object", "sbyte",
    "short", "string", "uint", "ulong", "ushort", "void",
];

pub const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "readonly", "sealed", "abstract",
    "virtual", "override", "extern", "unsafe", "new", "const", "volatile",
];

/// Contextual modifiers that lex as identifiers.
pub const CONTEXTUAL_MODIFIERS: &[&str] = &["async", "partial", "required", "file"];

/// Punctuators, longest first so the lexer can match greedily.
pub const PUNCTUATORS: &[&str] = &[
    "<<=", "??=", "...", "..", "=>", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=",
    "*=", "/=", "%=", "&=", "|=", "^=", "<<", "??", "?.", "::", "->", "{", "}", "(", ")", "[",
    "]", ";", ",", ".", "?", ":", "+", "-", "*", "/", "%", "&", "|", "^", "!", "~", "=", "<",
    ">", "@", "#",
];
