// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! End-to-end runs of `sharp-pup check` over fixture projects.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const PROGRAM: &str = "namespace Shop.Core;

class Program
{
    static string A => typeof(Program).Name;
    static string B => typeof(Program).FullName;
    static System.Type C => typeof(Program);
    static string D => typeof(System.Collections.Generic.List<int>).Name;
}
";

fn sharp_pup(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sharp-pup"))
        .args(args)
        .arg("--color")
        .arg("never")
        .current_dir(dir)
        .env_remove("PUP_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run sharp-pup")
}

fn fixture() -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(temp.path().join("src/Program.cs"), PROGRAM).unwrap();
    temp
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn default_lint_warns_on_each_member_access() {
    let temp = fixture();
    let output = sharp_pup(temp.path(), &["check", "--format", "short"]);
    let text = stdout(&output);

    assert!(output.status.success(), "{text}");
    let lines: Vec<&str> = text.lines().filter(|l| l.contains("IDE0082")).collect();
    assert_eq!(lines.len(), 3, "{text}");
    assert!(lines[0].starts_with("src/Program.cs:5:24: warning[IDE0082]"), "{text}");
    assert!(lines[1].starts_with("src/Program.cs:6:24:"), "{text}");
    assert!(lines[2].starts_with("src/Program.cs:8:24:"), "{text}");
    assert!(text.contains("0 errors, 3 warnings in 1 file"), "{text}");
}

#[test]
fn human_output_shows_source_and_suggestion() {
    let temp = fixture();
    let output = sharp_pup(temp.path(), &[]);
    let text = stdout(&output);

    assert!(text.contains("warning[IDE0082]: `typeof` can be converted to `nameof`"), "{text}");
    assert!(text.contains("--> src/Program.cs:5:24"), "{text}");
    assert!(text.contains("5 |     static string A => typeof(Program).Name;"), "{text}");
    assert!(text.contains("help: use `nameof(Program)` instead"), "{text}");
    assert!(text.contains("note: Applied by sharp-pup rule 'prefer_nameof'."), "{text}");
}

#[test]
fn csharp5_has_no_nameof() {
    let temp = fixture();
    let output = sharp_pup(temp.path(), &["check", "--lang-version", "5"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(!text.contains("IDE0082"), "{text}");
    assert!(text.contains("No issues found in 1 file"), "{text}");
}

#[test]
fn error_severity_fails_the_run() {
    let temp = fixture();
    fs::write(
        temp.path().join("pup.ron"),
        r#"[
    Typeof((
        name: "core_type_names",
        matches: Namespace("^Shop\\.Core$"),
        rules: [PreferNameofForTypeName(Error)],
    )),
]"#,
    )
    .unwrap();

    let output = sharp_pup(temp.path(), &["check", "--format", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let diagnostics: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    let diagnostics = diagnostics.as_array().expect("array");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["severity"], "Error");
    assert_eq!(diagnostics[0]["lint_name"], "core_type_names");
    assert_eq!(diagnostics[0]["suggestion"]["replacement"], "nameof(Program)");
}

#[test]
fn explicit_paths_and_config() {
    let temp = fixture();
    fs::write(temp.path().join("src/Other.cs"), "class Other { string N => typeof(Other).Name; }").unwrap();
    fs::write(temp.path().join("quiet.ron"), "[]").unwrap();

    let only_other = sharp_pup(temp.path(), &["check", "src/Other.cs", "--format", "short"]);
    let text = stdout(&only_other);
    assert_eq!(text.lines().filter(|l| l.contains("IDE0082")).count(), 1, "{text}");
    assert!(text.contains("src/Other.cs:1:27:"), "{text}");

    let quiet = sharp_pup(temp.path(), &["check", "--pup-config", "quiet.ron"]);
    assert!(stdout(&quiet).contains("No issues found in 2 files"));
}

#[test]
fn syntax_errors_do_not_stop_analysis() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("Broken.cs"),
        "class Broken { string N => typeof(Broken).Name; void M( { }",
    )
    .unwrap();

    let output = sharp_pup(temp.path(), &["check", "--format", "short"]);
    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.contains("warning[syntax]: could not parse part of this file"), "{text}");
    assert!(text.contains("Broken.cs:1:28: warning[IDE0082]"), "{text}");
}

#[test]
fn missing_config_is_reported() {
    let temp = fixture();
    let output = sharp_pup(temp.path(), &["check", "--pup-config", "nope.ron"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read lint configuration"));
}
