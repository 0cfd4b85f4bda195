// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::ConfiguredLint;
use ron::de::from_reader;
use ron::ser::{PrettyConfig, to_writer_pretty};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LintBuilder {
    pub lints: Vec<ConfiguredLint>,
}

impl LintBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, lint: ConfiguredLint) {
        self.lints.push(lint);
    }

    /// Consume the builder, returning the configured lints.
    pub fn build(self) -> Vec<ConfiguredLint> {
        self.lints
    }

    // Write the configured lints as a pretty-printed RON list
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        to_writer_pretty(file, &self.lints, PrettyConfig::default()).map_err(io::Error::other)?;
        Ok(())
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let lints: Vec<ConfiguredLint> = from_reader(file).map_err(io::Error::other)?;
        Ok(LintBuilder { lints })
    }

    /// Parse a RON list of lints held in memory.
    pub fn read_from_str(content: &str) -> io::Result<Self> {
        let lints: Vec<ConfiguredLint> = ron::from_str(content).map_err(io::Error::other)?;
        Ok(LintBuilder { lints })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Severity, TypeofLintExt, TypeofMatch, TypeofRule};
    use tempfile::NamedTempFile;

    fn sample_builder() -> LintBuilder {
        let mut builder = LintBuilder::new();
        builder
            .typeof_lint()
            .lint_named("domain_nameof")
            .matching(|m| {
                m.namespace("^Acme\\.Domain")
                    .and(m.path("src/domain"))
                    .or(m.namespace("^Acme\\.Api").and(m.path("Tests").not()))
            })
            .with_severity(Severity::Error)
            .prefer_nameof()
            .build();
        builder
    }

    #[test]
    fn test_write_to_file() {
        let builder = sample_builder();
        let temp_file = NamedTempFile::new().unwrap();

        builder.write_to_file(temp_file.path()).unwrap();

        let written = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(written.contains("Typeof"));
        assert!(written.contains("domain_nameof"));
    }

    #[test]
    fn test_read_from_file() {
        let builder = sample_builder();
        let temp_file = NamedTempFile::new().unwrap();
        builder.write_to_file(temp_file.path()).unwrap();

        let loaded = LintBuilder::read_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.lints.len(), 1);
        let ConfiguredLint::Typeof(lint) = &loaded.lints[0];
        assert_eq!(lint.name, "domain_nameof");
        let TypeofMatch::OrMatches(left, right) = &lint.matches else {
            panic!("Expected OrMatches at top level, got {:?}", lint.matches);
        };
        assert!(matches!(**left, TypeofMatch::AndMatches(_, _)));
        assert!(matches!(**right, TypeofMatch::AndMatches(_, _)));
        assert!(matches!(lint.rules[..], [TypeofRule::PreferNameof(Severity::Error)]));
    }

    #[test]
    fn test_read_from_str() {
        let content = r#"[
            Typeof((
                name: "type_names_only",
                matches: Path(".*"),
                rules: [PreferNameofForTypeName(Warn)],
            )),
        ]"#;
        let loaded = LintBuilder::read_from_str(content).unwrap();
        assert_eq!(loaded.lints.len(), 1);
        assert_eq!(loaded.lints[0].name(), "type_names_only");
    }

    #[test]
    fn test_read_from_str_rejects_garbage() {
        let err = LintBuilder::read_from_str("[ Nope(()) ]").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = LintBuilder::read_from_file(dir.path().join("missing.ron"));
        assert!(result.is_err());
    }
}
