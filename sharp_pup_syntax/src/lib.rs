// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Syntax layer for sharp-pup: a tolerant C# lexer and parser producing an
//! arena syntax tree with parent links.

pub mod lexer;
pub mod parser;
pub mod text;
pub mod token;
pub mod tree;

pub use parser::{parse, parse_text};
pub use text::{LineCol, SourceText, Span};
pub use tree::{NodeId, ParseOptions, SyntaxError, SyntaxKind, SyntaxNode, SyntaxTree};
