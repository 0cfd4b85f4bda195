// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use anyhow::{Context, Result};
use std::process::{Command, Output};
use tempfile::NamedTempFile;

use crate::LintBuilder;

/// Extension trait for LintBuilder that adds runtime linting capabilities
pub trait LintBuilderExt {
    /// Writes the current builder configuration to a temporary file and runs
    /// `sharp-pup check` against it, panicking when the check fails.
    ///
    /// # Arguments
    ///
    /// * `project_path` - Optional directory to analyse instead of the
    ///   current one
    fn assert_lints(&self, project_path: Option<&str>) -> Result<Output>;
}

impl LintBuilderExt for LintBuilder {
    fn assert_lints(&self, project_path: Option<&str>) -> Result<Output> {
        let args: Vec<&str> = project_path.into_iter().collect();
        let output = run_command(self, "check", &args)?;

        if !output.status.success() {
            if !output.stdout.is_empty() {
                println!("Lint stdout:\n{}", String::from_utf8_lossy(&output.stdout));
            }
            if !output.stderr.is_empty() {
                eprintln!("Lint stderr:\n{}", String::from_utf8_lossy(&output.stderr));
            }
            panic!("sharp-pup checks failed!");
        }

        Ok(output)
    }
}

fn run_command(lint_builder: &LintBuilder, command: &str, args: &[&str]) -> Result<Output> {
    let temp_file = NamedTempFile::new().context("Failed to create temporary configuration file")?;
    let config_path = temp_file.path().to_path_buf();

    lint_builder
        .write_to_file(&config_path)
        .context("Failed to write configuration to temporary file")?;

    let binary = std::env::var("SHARP_PUP_BIN").unwrap_or_else(|_| "sharp-pup".to_string());
    let mut cmd = Command::new(binary);
    cmd.arg(command);
    cmd.arg("--pup-config");
    cmd.arg(&config_path);
    cmd.args(args);

    cmd.output().context("Failed to execute sharp-pup")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeofLintExt;

    #[test]
    fn test_missing_binary_is_an_error() {
        let mut builder = LintBuilder::new();
        builder
            .typeof_lint()
            .lint_named("test_rule")
            .matching(|m| m.everything())
            .prefer_nameof()
            .build();

        // SAFETY: tests in this module do not read the variable concurrently.
        unsafe { std::env::set_var("SHARP_PUP_BIN", "/nonexistent/sharp-pup") };
        let result = run_command(&builder, "check", &[]);
        unsafe { std::env::remove_var("SHARP_PUP_BIN") };

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to execute sharp-pup"));
    }
}
