// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sharp_pup_common::project_context::ProjectContext;
use sharp_pup_common::workspace::find_workspace_pup_ron;
use sharp_pup_lint_config::{
    ConfiguredLint, GenerateFromContext, LintBuilder, TypeofLint, TypeofLintExt, TypeofMatch,
};

use crate::LintRule;
use crate::lints::create_rules;

/// Name of the lint used when no pup.ron is found.
pub const DEFAULT_LINT_NAME: &str = "prefer_nameof";

/// Turns lint configuration into runnable [`LintRule`]s.
pub struct LintConfigurationFactory;

impl LintConfigurationFactory {
    /// Load lints from a pup.ron file.
    pub fn from_file(path: &Path) -> Result<Vec<Box<dyn LintRule + Send>>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lint configuration {}", path.display()))?;
        Self::from_content(&content)
            .with_context(|| format!("Invalid lint configuration in {}", path.display()))
    }

    /// Load lints from RON text.
    pub fn from_content(content: &str) -> Result<Vec<Box<dyn LintRule + Send>>> {
        let lint_builder =
            LintBuilder::read_from_str(content).context("Failed to parse RON lint configuration")?;
        tracing::debug!(lints = lint_builder.lints.len(), "loaded lint configuration");
        Ok(Self::from_configured(&lint_builder.lints))
    }

    pub fn from_configured(lints: &[ConfiguredLint]) -> Vec<Box<dyn LintRule + Send>> {
        create_rules(lints)
    }

    /// The configuration we run with when the user hasn't written one:
    /// `prefer_nameof` everywhere, as a warning.
    pub fn default_configuration() -> LintBuilder {
        let mut builder = LintBuilder::new();
        builder
            .typeof_lint()
            .lint_named(DEFAULT_LINT_NAME)
            .matches(TypeofMatch::everything())
            .prefer_nameof()
            .build();
        builder
    }

    ///
    /// Work out which lints to run. An explicit `--pup-config` wins;
    /// otherwise the nearest pup.ron at or above `start_dir`; otherwise
    /// the default configuration. Also returns the file that was used.
    ///
    pub fn setup_lints(
        explicit: Option<&Path>,
        start_dir: &Path,
    ) -> Result<(Vec<Box<dyn LintRule + Send>>, Option<PathBuf>)> {
        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_workspace_pup_ron(start_dir),
        };

        match config_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using lint configuration");
                let lints = Self::from_file(&path)?;
                Ok((lints, Some(path)))
            }
            None => {
                tracing::debug!("no pup.ron found; using the default configuration");
                let lints = Self::from_configured(&Self::default_configuration().build());
                Ok((lints, None))
            }
        }
    }

    /// Propose a configuration for the projects described by `contexts`.
    pub fn generate_config(contexts: &[ProjectContext]) -> LintBuilder {
        let mut builder = LintBuilder::new();
        TypeofLint::generate_from_contexts(contexts, &mut builder);
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharp_pup_common::project_context::FileInfo;
    use sharp_pup_lint_config::{Severity, TypeofRule};
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"[
    Typeof((
        name: "domain_nameof",
        matches: Namespace("^Acme\\.Domain"),
        rules: [PreferNameof(Error)],
    )),
    Typeof((
        name: "everything",
        matches: Path(".*"),
        rules: [PreferNameofForTypeName(Warn)],
    )),
]"#;

    #[test]
    fn loads_rules_from_content() {
        let lints = LintConfigurationFactory::from_content(CONFIG).expect("valid config");
        let names: Vec<String> = lints.iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["domain_nameof", "everything"]);
        assert!(lints[0].applies_to_site("src/Order.cs", "Acme.Domain.Orders"));
        assert!(!lints[0].applies_to_site("src/Order.cs", "Acme.Web"));
    }

    #[test]
    fn reports_malformed_content() {
        let err = LintConfigurationFactory::from_content("[Bogus(())]")
            .err()
            .expect("should fail");
        assert!(format!("{err:#}").contains("Failed to parse RON"));
    }

    #[test]
    fn explicit_config_wins_over_discovery() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pup.ron"), "[]").unwrap();
        let explicit = temp.path().join("custom.ron");
        fs::write(&explicit, CONFIG).unwrap();

        let (lints, used) = LintConfigurationFactory::setup_lints(Some(&explicit), temp.path()).unwrap();
        assert_eq!(lints.len(), 2);
        assert_eq!(used, Some(explicit));
    }

    #[test]
    fn discovers_pup_ron_upwards() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("src").join("Domain");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("pup.ron"), CONFIG).unwrap();

        let (lints, used) = LintConfigurationFactory::setup_lints(None, &nested).unwrap();
        assert_eq!(lints.len(), 2);
        assert_eq!(used, Some(temp.path().join("pup.ron")));
    }

    #[test]
    fn falls_back_to_default_configuration() {
        let temp = TempDir::new().unwrap();
        let (lints, used) = LintConfigurationFactory::setup_lints(None, temp.path()).unwrap();
        assert!(used.is_none());
        assert_eq!(lints.len(), 1);
        assert_eq!(lints[0].name(), DEFAULT_LINT_NAME);
        assert!(lints[0].applies_to_site("anything.cs", ""));

        let default = LintConfigurationFactory::default_configuration().build();
        let ConfiguredLint::Typeof(lint) = &default[0];
        assert_eq!(lint.rules, vec![TypeofRule::PreferNameof(Severity::Warn)]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.ron");
        let err = LintConfigurationFactory::setup_lints(Some(&missing), temp.path())
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("Failed to read lint configuration"));
    }

    #[test]
    fn generated_config_loads_back() {
        let mut context = ProjectContext::new();
        context.project_root = "acme".to_string();
        context.files = vec![FileInfo {
            path: "src/Order.cs".to_string(),
            namespaces: vec!["Acme.Domain".to_string()],
            applicable_lints: vec![],
        }];

        let builder = LintConfigurationFactory::generate_config(&[context]);
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pup.generated.ron");
        builder.write_to_file(&path).unwrap();

        let lints = LintConfigurationFactory::from_file(&path).unwrap();
        assert_eq!(lints.len(), 1);
        assert_eq!(lints[0].name(), "prefer_nameof_in_acme");
        assert!(lints[0].applies_to_site("src/Order.cs", "Acme.Domain"));
    }
}
