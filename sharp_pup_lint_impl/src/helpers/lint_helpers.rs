// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! sharp-pup wrappers for emitting diagnostics from a lint handler.

use crate::diagnostics::{Diagnostic, DiagnosticDescriptor, Suggestion};
use crate::host::LintContext;
use sharp_pup_syntax::Span;

/// Emit a diagnostic with an extra `help` message, and optionally a
/// replacement the user can apply.
///
/// Every diagnostic notes the configured rule it came from, so users can
/// find the entry in pup.ron that produced it.
pub fn span_lint_and_help(
    cx: &LintContext<'_>,
    descriptor: &'static DiagnosticDescriptor,
    rule_name: &str,
    span: Span,
    help: impl Into<String>,
    suggestion: Option<Suggestion>,
) {
    let diagnostic = Diagnostic::from_descriptor(descriptor, cx.tree(), span)
        .with_lint_name(rule_name)
        .with_help(help)
        .with_suggestion(suggestion)
        .with_note(format!("Applied by sharp-pup rule '{}'.", rule_name));
    cx.emit(diagnostic);
}
