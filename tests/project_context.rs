// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! `print-files` and `generate-config` over a small multi-namespace project.

use sharp_pup_lint_config::{ConfiguredLint, LintBuilder, TypeofMatch};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn sharp_pup(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sharp-pup"))
        .args(args)
        .args(["--color", "never"])
        .current_dir(dir)
        .output()
        .expect("failed to run sharp-pup")
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(src.join("Domain")).unwrap();
    fs::create_dir_all(temp.path().join("bin")).unwrap();
    fs::write(
        src.join("Domain/Order.cs"),
        "namespace Acme.Domain { class Order { string N => typeof(Order).Name; } }",
    )
    .unwrap();
    fs::write(
        src.join("Tool.cs"),
        "namespace Tooling.Cli;\nclass Tool { }\n",
    )
    .unwrap();
    fs::write(temp.path().join("bin/Ignored.cs"), "namespace Ignored { }").unwrap();
    temp
}

#[test]
fn print_files_lists_files_namespaces_and_lints() {
    let temp = project();
    let output = sharp_pup(temp.path(), &["print-files"]);
    let text = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{text}");
    let order = text.lines().find(|l| l.contains("src/Domain/Order.cs")).expect("Order.cs listed");
    assert!(order.contains("(Acme.Domain)"), "{order}");
    assert!(order.ends_with("[prefer_nameof]"), "{order}");
    assert!(text.lines().any(|l| l.contains("src/Tool.cs") && l.contains("(Tooling.Cli)")));
    assert!(!text.contains("Ignored"));

    // Context files are scratch data only.
    let leftovers = fs::read_dir(temp.path().join(".pup"))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
}

#[test]
fn generate_config_writes_one_lint_per_top_level_namespace() {
    let temp = project();
    let output = sharp_pup(temp.path(), &["generate-config"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let generated = LintBuilder::read_from_file(temp.path().join("pup.generated.ron")).unwrap();
    let lints: Vec<(String, TypeofMatch)> = generated
        .lints
        .into_iter()
        .map(|lint| match lint {
            ConfiguredLint::Typeof(lint) => (lint.name, lint.matches),
        })
        .collect();
    assert_eq!(
        lints,
        vec![
            (
                "prefer_nameof_in_acme".to_string(),
                TypeofMatch::Namespace("^Acme(\\..*)?$".to_string())
            ),
            (
                "prefer_nameof_in_tooling".to_string(),
                TypeofMatch::Namespace("^Tooling(\\..*)?$".to_string())
            ),
        ]
    );

    // The generated file is a working configuration.
    let check = sharp_pup(
        temp.path(),
        &["check", "--pup-config", "pup.generated.ron", "--format", "short"],
    );
    let text = String::from_utf8_lossy(&check.stdout);
    assert!(text.contains("src/Domain/Order.cs:1:"), "{text}");
}

#[test]
fn generate_config_refuses_to_overwrite() {
    let temp = project();
    fs::write(temp.path().join("pup.generated.ron"), "[]").unwrap();

    let output = sharp_pup(temp.path(), &["generate-config"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("already exists"));
    assert_eq!(fs::read_to_string(temp.path().join("pup.generated.ron")).unwrap(), "[]");
}
