// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

pub mod lint_builder;
pub mod lint_builder_ext;
pub mod typeof_lint;

// Make sure our extensions are visible
pub use lint_builder::LintBuilder;
pub use lint_builder_ext::LintBuilderExt;
pub use typeof_lint::{
    TypeofLint, TypeofLintExt, TypeofMatch, TypeofMatchNode, TypeofMatcher, TypeofRule,
    matcher as typeof_matcher,
};

use serde::{Deserialize, Serialize};
use sharp_pup_common::project_context::ProjectContext;
use std::fmt;

/// Severity of a configured rule. `Error` diagnostics fail `sharp-pup check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warn => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfiguredLint {
    Typeof(TypeofLint),
}

impl ConfiguredLint {
    pub fn name(&self) -> &str {
        match self {
            ConfiguredLint::Typeof(lint) => &lint.name,
        }
    }
}

/// Lint families that can propose a starting configuration from what
/// `print-files` discovered about a project.
pub trait GenerateFromContext {
    fn generate_from_contexts(contexts: &[ProjectContext], builder: &mut LintBuilder);
}
