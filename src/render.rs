// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Turns diagnostics into the text the user sees.

use ansi_term::Colour::{Blue, Cyan, Green, Red, Yellow};
use ansi_term::Style;
use sharp_pup_common::project_context::ProjectContext;
use sharp_pup_lint_config::Severity;
use sharp_pup_lint_impl::Diagnostic;

use crate::cli::OutputFormat;

/// Paints text when colour is on, and passes it through untouched otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn severity_style(severity: Severity) -> Style {
        match severity {
            Severity::Error => Red.bold(),
            Severity::Warn => Yellow.bold(),
        }
    }
}

pub fn render(diagnostics: &[Diagnostic], format: OutputFormat, painter: Painter) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Human => diagnostics.iter().map(|d| human(d, painter)).collect(),
        OutputFormat::Short => diagnostics.iter().map(|d| short(d, painter) + "\n").collect(),
        OutputFormat::Json => serde_json::to_string_pretty(diagnostics)? + "\n",
    })
}

/// `path:line:col: warning[ID]: message`
pub fn short(diagnostic: &Diagnostic, painter: Painter) -> String {
    format!(
        "{}:{}:{}: {}: {}",
        diagnostic.path,
        diagnostic.start.line,
        diagnostic.start.column,
        painter.paint(
            Painter::severity_style(diagnostic.severity),
            &format!("{}[{}]", diagnostic.severity, diagnostic.rule_id)
        ),
        diagnostic.message
    )
}

///
/// A compiler-style block: header, location, the offending line with
/// carets under the span, then help and notes.
///
pub fn human(diagnostic: &Diagnostic, painter: Painter) -> String {
    let gutter_width = diagnostic.start.line.to_string().len();
    let pad = " ".repeat(gutter_width);
    let bar = painter.paint(Blue.bold(), "|");
    let severity_style = Painter::severity_style(diagnostic.severity);

    let mut out = String::new();
    out.push_str(&format!(
        "{}{} {}\n",
        painter.paint(severity_style, &format!("{}[{}]", diagnostic.severity, diagnostic.rule_id)),
        painter.paint(Style::new().bold(), ":"),
        painter.paint(Style::new().bold(), &diagnostic.message)
    ));
    out.push_str(&format!(
        "{}{} {}:{}:{}\n",
        pad,
        painter.paint(Blue.bold(), "-->"),
        diagnostic.path,
        diagnostic.start.line,
        diagnostic.start.column
    ));
    out.push_str(&format!("{pad} {bar}\n"));
    out.push_str(&format!(
        "{} {} {}\n",
        painter.paint(Blue.bold(), &diagnostic.start.line.to_string()),
        bar,
        diagnostic.source_line
    ));
    out.push_str(&format!(
        "{pad} {bar} {}{}\n",
        caret_indent(diagnostic),
        painter.paint(severity_style, &"^".repeat(caret_width(diagnostic)))
    ));

    if diagnostic.help.is_some() || !diagnostic.notes.is_empty() {
        out.push_str(&format!("{pad} {bar}\n"));
    }
    if let Some(help) = &diagnostic.help {
        out.push_str(&format!("{pad} {} {}: {help}\n", painter.paint(Blue.bold(), "="), painter.paint(Style::new().bold(), "help")));
    }
    for note in &diagnostic.notes {
        out.push_str(&format!("{pad} {} {}: {note}\n", painter.paint(Blue.bold(), "="), painter.paint(Style::new().bold(), "note")));
    }
    out.push('\n');
    out
}

// Tabs stay tabs so the carets line up with the source line above.
fn caret_indent(diagnostic: &Diagnostic) -> String {
    diagnostic
        .source_line
        .chars()
        .take(diagnostic.start.column.saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect()
}

fn caret_width(diagnostic: &Diagnostic) -> usize {
    let start = diagnostic.start.column;
    let width = if diagnostic.end.line == diagnostic.start.line {
        diagnostic.end.column.saturating_sub(start)
    } else {
        (diagnostic.source_line.chars().count() + 1).saturating_sub(start)
    };
    width.max(1)
}

/// The closing line, e.g. `1 error, 2 warnings in 14 files`.
pub fn summary(errors: usize, warnings: usize, files: usize, painter: Painter) -> String {
    let plural = |n: usize, word: &str| if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") };
    if errors == 0 && warnings == 0 {
        return painter.paint(Green.bold(), &format!("No issues found in {}", plural(files, "file")));
    }
    let style = if errors > 0 { Red.bold() } else { Yellow.bold() };
    painter.paint(
        style,
        &format!(
            "{}, {} in {}",
            plural(errors, "error"),
            plural(warnings, "warning"),
            plural(files, "file")
        ),
    )
}

/// One line per file: `root::path [namespaces] [lints]`.
pub fn project_files(context: &ProjectContext, roots: &[String], painter: Painter) -> String {
    let root_label = roots.join(", ");
    let mut output = String::new();
    for file in &context.files {
        output.push_str(&format!(
            "{}::{} {} [{}]\n",
            painter.paint(Blue.normal(), &root_label),
            file.path,
            painter.paint(Cyan.normal(), &format!("({})", file.namespaces.join(", "))),
            painter.paint(Green.normal(), &file.applicable_lints.join(", "))
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharp_pup_syntax::{LineCol, Span};

    fn diagnostic() -> Diagnostic {
        Diagnostic {
            rule_id: "IDE0082".to_string(),
            lint_name: Some("domain".to_string()),
            severity: Severity::Warn,
            message: "`typeof` can be converted to `nameof`".to_string(),
            path: "src/Order.cs".to_string(),
            span: Span { start: 30, end: 48 },
            start: LineCol { line: 12, column: 10 },
            end: LineCol { line: 12, column: 28 },
            source_line: "\tvar n = typeof(Order).Name;".to_string(),
            help: Some("use `nameof(Order)` instead".to_string()),
            suggestion: None,
            notes: vec!["Applied by sharp-pup rule 'domain'.".to_string()],
        }
    }

    #[test]
    fn short_format_is_one_line() {
        assert_eq!(
            short(&diagnostic(), Painter::new(false)),
            "src/Order.cs:12:10: warning[IDE0082]: `typeof` can be converted to `nameof`"
        );
    }

    #[test]
    fn human_format_underlines_the_span() {
        let text = human(&diagnostic(), Painter::new(false));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "warning[IDE0082]: `typeof` can be converted to `nameof`");
        assert_eq!(lines[1], "  --> src/Order.cs:12:10");
        assert_eq!(lines[2], "   |");
        assert_eq!(lines[3], "12 | \tvar n = typeof(Order).Name;");
        assert_eq!(lines[4], format!("   | \t        {}", "^".repeat(18)));
        assert_eq!(lines[6], "   = help: use `nameof(Order)` instead");
        assert_eq!(lines[7], "   = note: Applied by sharp-pup rule 'domain'.");
    }

    #[test]
    fn multi_line_spans_underline_to_end_of_line() {
        let mut d = diagnostic();
        d.end = LineCol { line: 13, column: 4 };
        assert_eq!(caret_width(&d), "typeof(Order).Name;".len());
    }

    #[test]
    fn colour_is_only_added_when_enabled() {
        let plain = short(&diagnostic(), Painter::new(false));
        let coloured = short(&diagnostic(), Painter::new(true));
        assert!(!plain.contains('\u{1b}'));
        assert!(coloured.contains('\u{1b}'));
    }

    #[test]
    fn json_format_is_an_array() {
        let text = render(&[diagnostic()], OutputFormat::Json, Painter::new(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["lint_name"], "domain");
        assert_eq!(value[0]["start"]["column"], 10);
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn summary_counts() {
        let painter = Painter::new(false);
        assert_eq!(summary(0, 0, 3, painter), "No issues found in 3 files");
        assert_eq!(summary(1, 2, 1, painter), "1 error, 2 warnings in 1 file");
    }
}
