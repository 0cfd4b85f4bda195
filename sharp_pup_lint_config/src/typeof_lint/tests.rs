// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::typeof_lint::{TypeofLint, TypeofLintExt, TypeofMatch, TypeofRule};
use crate::{ConfiguredLint, GenerateFromContext, LintBuilder, Severity};
use sharp_pup_common::project_context::{FileInfo, ProjectContext};

fn typeof_lints(builder: LintBuilder) -> Vec<TypeofLint> {
    builder
        .build()
        .into_iter()
        .map(|lint| match lint {
            ConfiguredLint::Typeof(lint) => lint,
        })
        .collect()
}

fn context_with(root: &str, files: Vec<(&str, Vec<&str>)>) -> ProjectContext {
    let mut context = ProjectContext::new();
    context.project_root = root.to_string();
    context.files = files
        .into_iter()
        .map(|(path, namespaces)| FileInfo {
            path: path.to_string(),
            namespaces: namespaces.into_iter().map(str::to_string).collect(),
            applicable_lints: vec![],
        })
        .collect();
    context
}

#[test]
fn test_builder_defaults_to_warn() {
    let mut builder = LintBuilder::new();
    builder
        .typeof_lint()
        .lint_named("everywhere")
        .matching(|m| m.everything())
        .prefer_nameof()
        .build();

    let lints = typeof_lints(builder);
    assert_eq!(lints.len(), 1);
    assert_eq!(lints[0].name, "everywhere");
    assert_eq!(lints[0].matches, TypeofMatch::Path(".*".into()));
    assert_eq!(lints[0].rules, vec![TypeofRule::PreferNameof(Severity::Warn)]);
}

#[test]
fn test_severity_applies_to_following_rules() {
    let mut builder = LintBuilder::new();
    builder
        .typeof_lint()
        .lint_named("mixed")
        .matching(|m| m.namespace("^Acme"))
        .prefer_nameof_for_type_name()
        .with_severity(Severity::Error)
        .prefer_nameof()
        .build();

    let lints = typeof_lints(builder);
    assert_eq!(
        lints[0].rules,
        vec![
            TypeofRule::PreferNameofForTypeName(Severity::Warn),
            TypeofRule::PreferNameof(Severity::Error),
        ]
    );
    assert_eq!(lints[0].rules[1].severity(), Severity::Error);
}

#[test]
fn test_matcher_dsl_builds_nested_matches() {
    let mut builder = LintBuilder::new();
    builder
        .typeof_lint()
        .lint_named("nested")
        .matching(|m| m.path("src/").and(m.namespace("Tests").not()).or(m.path("legacy/")))
        .prefer_nameof()
        .build();

    let lints = typeof_lints(builder);
    let expected = TypeofMatch::OrMatches(
        Box::new(TypeofMatch::AndMatches(
            Box::new(TypeofMatch::Path("src/".into())),
            Box::new(TypeofMatch::NotMatch(Box::new(TypeofMatch::Namespace("Tests".into())))),
        )),
        Box::new(TypeofMatch::Path("legacy/".into())),
    );
    assert_eq!(lints[0].matches, expected);
}

#[test]
fn test_generate_from_empty_contexts() {
    let mut builder = LintBuilder::new();
    TypeofLint::generate_from_contexts(&[], &mut builder);

    let lints = typeof_lints(builder);
    assert_eq!(lints.len(), 1);
    assert_eq!(lints[0].name, "prefer_nameof");
    assert_eq!(lints[0].matches, TypeofMatch::everything());
}

#[test]
fn test_generate_one_lint_per_top_level_namespace() {
    let context = context_with(
        "/work/app",
        vec![
            ("src/Domain/Order.cs", vec!["Acme.Domain", "Acme.Domain.Orders"]),
            ("src/Api/Controller.cs", vec!["Acme.Api"]),
            ("tools/Gen.cs", vec!["Tooling"]),
            ("Program.cs", vec![]),
        ],
    );

    let mut builder = LintBuilder::new();
    TypeofLint::generate_from_contexts(&[context], &mut builder);

    let lints = typeof_lints(builder);
    let names: Vec<&str> = lints.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["prefer_nameof_in_acme", "prefer_nameof_in_tooling"]);
    assert_eq!(lints[0].matches, TypeofMatch::Namespace("^Acme(\\..*)?$".into()));
    assert!(lints
        .iter()
        .all(|l| l.rules == vec![TypeofRule::PreferNameof(Severity::Warn)]));
}

#[test]
fn test_generate_merges_multiple_contexts() {
    let first = context_with("/a", vec![("A.cs", vec!["Shared.Core"])]);
    let second = context_with("/b", vec![("B.cs", vec!["Shared.Web", "Other"])]);

    let mut builder = LintBuilder::new();
    TypeofLint::generate_from_contexts(&[first, second], &mut builder);

    let lints = typeof_lints(builder);
    assert_eq!(lints.len(), 2);
    assert!(lints.iter().any(|l| l.name == "prefer_nameof_in_shared"));
    assert!(lints.iter().any(|l| l.name == "prefer_nameof_in_other"));
}
