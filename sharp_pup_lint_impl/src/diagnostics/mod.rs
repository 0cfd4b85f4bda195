// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Diagnostics produced by the host, and the descriptors they are built from.

mod registry;

pub use registry::DescriptorRegistry;

use serde::Serialize;
use sharp_pup_common::Dialect;
use sharp_pup_lint_config::Severity;
use sharp_pup_syntax::{LineCol, Span, SyntaxTree};

use crate::host::display_path;

/// Rule id used for files the parser had to skip parts of.
pub const SYNTAX_RULE_ID: &str = "syntax";

/// Static description of a diagnostic: which rule, for which dialect, at
/// which severity, and the message template shown to the user.
#[derive(Debug, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    pub id: &'static str,
    pub dialect: Dialect,
    pub severity: Severity,
    pub title: &'static str,
    pub message: &'static str,
}

/// A replacement the user could apply. sharp-pup never applies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub span: Span,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule_id: String,
    /// The configured lint that produced this, if any
    pub lint_name: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub path: String,
    pub span: Span,
    pub start: LineCol,
    pub end: LineCol,
    /// Text of the line the diagnostic starts on
    pub source_line: String,
    pub help: Option<String>,
    pub suggestion: Option<Suggestion>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// A diagnostic anchored at `span` in `tree`.
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        tree: &SyntaxTree,
        span: Span,
    ) -> Self {
        let source = tree.source();
        let fallback = LineCol { line: 1, column: 1 };
        let start = source.line_col(span.start).unwrap_or(fallback);
        let end = source.line_col(span.end).unwrap_or(start);
        Self {
            rule_id: rule_id.into(),
            lint_name: None,
            severity,
            message: message.into(),
            path: display_path(tree.path()),
            span,
            start,
            end,
            source_line: source.line(start.line).unwrap_or_default().to_string(),
            help: None,
            suggestion: None,
            notes: Vec::new(),
        }
    }

    pub fn from_descriptor(descriptor: &DiagnosticDescriptor, tree: &SyntaxTree, span: Span) -> Self {
        Self::new(descriptor.id, descriptor.severity, descriptor.message, tree, span)
    }

    pub fn with_lint_name(mut self, name: impl Into<String>) -> Self {
        self.lint_name = Some(name.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: Option<Suggestion>) -> Self {
        self.suggestion = suggestion;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Ordering used for output: file, then position, then rule.
    pub fn sort_key(&self) -> (&str, usize, usize, &str, Option<&str>) {
        (
            self.path.as_str(),
            self.span.start,
            self.span.end,
            self.rule_id.as_str(),
            self.lint_name.as_deref(),
        )
    }
}

/// Sort diagnostics into their output order.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// One warning per file summarising the regions the parser skipped.
pub fn syntax_diagnostic(tree: &SyntaxTree) -> Option<Diagnostic> {
    let first = tree.errors().first()?;
    let skipped = tree.errors().len();
    let mut diagnostic = Diagnostic::new(
        SYNTAX_RULE_ID,
        Severity::Warn,
        format!("could not parse part of this file: {}", first.message),
        tree,
        first.span,
    )
    .with_note("Code in unparsed regions was not analysed; the rest of the file was.");
    if skipped > 1 {
        diagnostic = diagnostic.with_note(format!("{} syntax errors in total.", skipped));
    }
    Some(diagnostic)
}
