// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use std::sync::Arc;

use regex::Regex;
use sharp_pup_common::Dialect;
use sharp_pup_lint_config::{ConfiguredLint, TypeofLint, TypeofMatch, TypeofRule};
use sharp_pup_syntax::{NodeId, Span};

use super::matcher::{is_eligible, locate_diagnostic};
use super::nameof_rewrite::NameofRewrite;
use crate::LintRule;
use crate::declare_variable_severity_lint;
use crate::diagnostics::{DiagnosticDescriptor, Suggestion};
use crate::helpers::lint_helpers::span_lint_and_help;
use crate::host::{LintContext, LintStore};

pub const RULE_ID: &str = "IDE0082";

const TITLE: &str = "Convert `typeof` to `nameof`";

declare_variable_severity_lint!(
    /// `typeof(T).Name` in C# sources
    pub,
    TYPEOF_TO_NAMEOF,
    TYPEOF_TO_NAMEOF_DENY,
    TYPEOF_TO_NAMEOF_WARN,
    RULE_ID,
    Dialect::CSharp,
    TITLE,
    "`typeof` can be converted to `nameof`"
);

declare_variable_severity_lint!(
    /// `GetType(T).Name` in Visual Basic sources
    pub,
    GETTYPE_TO_NAMEOF,
    GETTYPE_TO_NAMEOF_DENY,
    GETTYPE_TO_NAMEOF_WARN,
    RULE_ID,
    Dialect::VisualBasic,
    TITLE,
    "`GetType` can be converted to `NameOf`"
);

/// Every descriptor this lint can report with.
pub fn descriptors() -> impl Iterator<Item = &'static DiagnosticDescriptor> {
    TYPEOF_TO_NAMEOF::all()
        .into_iter()
        .chain(GETTYPE_TO_NAMEOF::all())
}

pub struct TypeofLintRule {
    name: String,
    matches: Arc<SiteMatch>,
    rules: Vec<TypeofRule>,
}

impl TypeofLintRule {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(config: &ConfiguredLint) -> Box<dyn LintRule + Send> {
        match config {
            ConfiguredLint::Typeof(lint) => Box::new(Self::from_lint(lint)),
        }
    }

    pub fn from_lint(lint: &TypeofLint) -> Self {
        Self {
            name: lint.name.clone(),
            matches: Arc::new(SiteMatch::compile(&lint.matches)),
            rules: lint.rules.clone(),
        }
    }
}

impl LintRule for TypeofLintRule {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn applies_to_site(&self, path: &str, namespace: &str) -> bool {
        self.matches.is_match(path, namespace)
    }

    fn register(&self, lint_store: &mut LintStore) {
        let name = self.name.clone();
        let matches = Arc::clone(&self.matches);
        let rules = self.rules.clone();
        lint_store.register(RULE_ID, is_eligible, locate_diagnostic, move |cx, node, span| {
            let namespace = cx.tree().enclosing_namespace(node).unwrap_or_default();
            if !matches.is_match(cx.path(), &namespace) {
                return;
            }
            check_site(cx, &name, &rules, node, span);
        });
    }
}

fn check_site(cx: &LintContext<'_>, name: &str, rules: &[TypeofRule], node: NodeId, span: Span) {
    let rewrite = NameofRewrite::for_site(cx.tree(), node);
    let nameof = cx.dialect().nameof_keyword();

    for rule in rules {
        if matches!(rule, TypeofRule::PreferNameofForTypeName(_)) && rewrite.is_none() {
            continue;
        }
        let Some(descriptor) = cx.descriptor(RULE_ID, rule.severity()) else {
            tracing::warn!(rule = RULE_ID, dialect = ?cx.dialect(), "no descriptor registered");
            continue;
        };
        match &rewrite {
            Some(rewrite) => span_lint_and_help(
                cx,
                descriptor,
                name,
                span,
                format!("use `{}` instead", rewrite.replacement),
                Some(Suggestion {
                    span: rewrite.span,
                    replacement: rewrite.replacement.clone(),
                }),
            ),
            None => span_lint_and_help(
                cx,
                descriptor,
                name,
                span,
                format!("`{nameof}(...)` only matches `.Name` on a non-generic type; rewrite the lookup if that is what you need"),
                None,
            ),
        }
    }
}

/// A [`TypeofMatch`] with its regexes compiled once up front.
enum SiteMatch {
    Path(Pattern),
    Namespace(Pattern),
    And(Box<SiteMatch>, Box<SiteMatch>),
    Or(Box<SiteMatch>, Box<SiteMatch>),
    Not(Box<SiteMatch>),
}

enum Pattern {
    Regex(Regex),
    // Not a valid regex: compare the text directly
    Exact(String),
}

impl Pattern {
    fn new(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => Pattern::Regex(regex),
            Err(err) => {
                tracing::warn!(pattern, %err, "invalid regex in typeof lint; matching it literally");
                Pattern::Exact(pattern.to_string())
            }
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Pattern::Regex(regex) => regex.is_match(text),
            Pattern::Exact(exact) => exact == text,
        }
    }
}

impl SiteMatch {
    fn compile(matches: &TypeofMatch) -> Self {
        match matches {
            TypeofMatch::Path(pattern) => SiteMatch::Path(Pattern::new(pattern)),
            TypeofMatch::Namespace(pattern) => SiteMatch::Namespace(Pattern::new(pattern)),
            TypeofMatch::AndMatches(left, right) => {
                SiteMatch::And(Box::new(Self::compile(left)), Box::new(Self::compile(right)))
            }
            TypeofMatch::OrMatches(left, right) => {
                SiteMatch::Or(Box::new(Self::compile(left)), Box::new(Self::compile(right)))
            }
            TypeofMatch::NotMatch(inner) => SiteMatch::Not(Box::new(Self::compile(inner))),
        }
    }

    fn is_match(&self, path: &str, namespace: &str) -> bool {
        match self {
            SiteMatch::Path(pattern) => pattern.is_match(path),
            SiteMatch::Namespace(pattern) => pattern.is_match(namespace),
            SiteMatch::And(left, right) => left.is_match(path, namespace) && right.is_match(path, namespace),
            SiteMatch::Or(left, right) => left.is_match(path, namespace) || right.is_match(path, namespace),
            SiteMatch::Not(inner) => !inner.is_match(path, namespace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DescriptorRegistry;
    use sharp_pup_common::LanguageVersion;
    use sharp_pup_lint_config::{LintBuilder, Severity, TypeofLintExt};
    use sharp_pup_syntax::{ParseOptions, parse};

    fn rule_from(builder: LintBuilder) -> Box<dyn LintRule + Send> {
        let lints = builder.build();
        assert_eq!(lints.len(), 1);
        TypeofLintRule::new(&lints[0])
    }

    fn check(rule: &dyn LintRule, path: &str, source: &str, version: LanguageVersion) -> Vec<crate::Diagnostic> {
        let mut store = LintStore::new();
        rule.register(&mut store);
        let tree = parse(path, source, ParseOptions::new(version));
        store.check_tree(&tree, &DescriptorRegistry::with_builtin())
    }

    #[test]
    fn reports_with_suggestion_and_rule_note() {
        let mut builder = LintBuilder::new();
        builder
            .typeof_lint()
            .lint_named("prefer_nameof")
            .matching(|m| m.everything())
            .prefer_nameof()
            .build();
        let rule = rule_from(builder);

        let diagnostics = check(
            rule.as_ref(),
            "src/Widget.cs",
            "class Widget { string N => typeof(Widget).Name; }",
            LanguageVersion::LATEST,
        );
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.rule_id, RULE_ID);
        assert_eq!(diagnostic.severity, Severity::Warn);
        assert_eq!(diagnostic.message, "`typeof` can be converted to `nameof`");
        assert_eq!(diagnostic.lint_name.as_deref(), Some("prefer_nameof"));
        assert_eq!(
            diagnostic.suggestion.as_ref().map(|s| s.replacement.as_str()),
            Some("nameof(Widget)")
        );
        assert!(diagnostic.notes.contains(&"Applied by sharp-pup rule 'prefer_nameof'.".to_string()));
    }

    #[test]
    fn other_members_report_without_suggestion() {
        let mut builder = LintBuilder::new();
        builder
            .typeof_lint()
            .lint_named("prefer_nameof")
            .matches(TypeofMatch::everything())
            .with_severity(Severity::Error)
            .prefer_nameof()
            .build();
        let rule = rule_from(builder);

        let diagnostics = check(rule.as_ref(), "a.cs", "var n = typeof(Foo).FullName;", LanguageVersion::LATEST);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert!(diagnostics[0].suggestion.is_none());
        assert!(diagnostics[0].help.as_deref().unwrap_or_default().contains("nameof(...)"));
    }

    #[test]
    fn type_name_rule_skips_sites_nameof_cannot_replace() {
        let mut builder = LintBuilder::new();
        builder
            .typeof_lint()
            .lint_named("type_names")
            .matches(TypeofMatch::everything())
            .prefer_nameof_for_type_name()
            .build();
        let rule = rule_from(builder);

        let source = "var a = typeof(Foo).Name; var b = typeof(Foo).FullName; var c = typeof(List<int>).Name;";
        let diagnostics = check(rule.as_ref(), "a.cs", source, LanguageVersion::LATEST);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].suggestion.as_ref().unwrap().replacement, "nameof(Foo)");
    }

    #[test]
    fn older_language_versions_report_nothing() {
        let mut builder = LintBuilder::new();
        builder
            .typeof_lint()
            .lint_named("prefer_nameof")
            .matches(TypeofMatch::everything())
            .prefer_nameof()
            .build();
        let rule = rule_from(builder);

        let diagnostics = check(rule.as_ref(), "a.cs", "var n = typeof(Foo).Name;", LanguageVersion::CSharp5);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn matcher_selects_sites_by_path_and_namespace() {
        let mut builder = LintBuilder::new();
        builder
            .typeof_lint()
            .lint_named("core_only")
            .matching(|m| m.path("^src/").and(m.namespace("^Shop\\.Core").and(m.namespace("Tests$").not())))
            .prefer_nameof()
            .build();
        let rule = rule_from(builder);
        let source = "namespace Shop.Core { class A { string N => typeof(A).Name; } }\n\
                      namespace Shop.Core.Tests { class B { string N => typeof(B).Name; } }\n\
                      namespace Shop.Web { class C { string N => typeof(C).Name; } }";

        let diagnostics = check(rule.as_ref(), "src/Mixed.cs", source, LanguageVersion::LATEST);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].suggestion.as_ref().unwrap().replacement, "nameof(A)");

        assert!(check(rule.as_ref(), "test/Mixed.cs", source, LanguageVersion::LATEST).is_empty());

        assert!(rule.applies_to_site("src/Mixed.cs", "Shop.Core"));
        assert!(!rule.applies_to_site("src/Mixed.cs", "Shop.Core.Tests"));
        assert!(rule.applies_to_file("src/Mixed.cs", &["Shop.Web".to_string(), "Shop.Core".to_string()]));
        assert!(!rule.applies_to_file("src/Top.cs", &[]));
    }

    #[test]
    fn invalid_regex_matches_literally() {
        let lint = TypeofLint {
            name: "literal".to_string(),
            matches: TypeofMatch::Path("src/(Broken.cs".to_string()),
            rules: vec![TypeofRule::PreferNameof(Severity::Warn)],
        };
        let rule = TypeofLintRule::from_lint(&lint);
        assert!(rule.applies_to_site("src/(Broken.cs", ""));
        assert!(!rule.applies_to_site("src/Broken.cs", ""));
    }

    #[test]
    fn every_rule_reports_separately() {
        let mut builder = LintBuilder::new();
        builder
            .typeof_lint()
            .lint_named("both")
            .matches(TypeofMatch::everything())
            .prefer_nameof()
            .with_severity(Severity::Error)
            .prefer_nameof_for_type_name()
            .build();
        let rule = rule_from(builder);

        let diagnostics = check(rule.as_ref(), "a.cs", "var n = typeof(Foo).Name;", LanguageVersion::LATEST);
        let severities: Vec<Severity> = diagnostics.iter().map(|d| d.severity).collect();
        assert_eq!(severities, vec![Severity::Warn, Severity::Error]);
    }

    #[test]
    fn descriptors_cover_both_dialects() {
        let all: Vec<_> = descriptors().collect();
        assert_eq!(all.len(), 4);
        assert_eq!(TYPEOF_TO_NAMEOF::all(), [TYPEOF_TO_NAMEOF_WARN, TYPEOF_TO_NAMEOF_DENY]);
        assert!(GETTYPE_TO_NAMEOF::all().iter().all(|d| d.dialect == Dialect::VisualBasic));
    }
}
