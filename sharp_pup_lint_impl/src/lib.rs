// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Lint implementations for sharp-pup, and the host that runs them over
//! parsed C# syntax trees.

pub mod diagnostics;
pub mod helpers;
pub mod host;
pub mod lints;

mod configuration_factory;
mod lint_rule;

// Re-export our public API
pub use configuration_factory::LintConfigurationFactory;
pub use diagnostics::{DescriptorRegistry, Diagnostic, DiagnosticDescriptor, Suggestion};
pub use helpers::lint_collection::LintCollection;
pub use helpers::lint_runner::{LintRunner, Mode, RunReport};
pub use host::{LintContext, LintStore};
pub use lint_rule::LintRule;
