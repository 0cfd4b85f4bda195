// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Drives `LintBuilderExt::assert_lints` against the freshly built binary.

use sharp_pup_lint_config::{LintBuilder, LintBuilderExt, Severity, TypeofLintExt};
use std::fs;
use tempfile::TempDir;

#[test]
fn assert_lints_runs_the_configured_check() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("Widget.cs"),
        "namespace App.Ui { class Widget { string N => typeof(Widget).Name; } }",
    )
    .unwrap();

    let mut builder = LintBuilder::new();
    builder
        .typeof_lint()
        .lint_named("ui_type_names")
        .matching(|m| m.namespace("^App\\.Ui"))
        .with_severity(Severity::Warn)
        .prefer_nameof_for_type_name()
        .build();

    // SAFETY: the only test in this binary; nothing else reads the environment.
    unsafe { std::env::set_var("SHARP_PUP_BIN", env!("CARGO_BIN_EXE_sharp-pup")) };
    let root = temp.path().to_string_lossy().into_owned();
    let output = builder.assert_lints(Some(&root)).expect("sharp-pup runs");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("IDE0082"), "{stdout}");
    assert!(stdout.contains("nameof(Widget)"), "{stdout}");
}
