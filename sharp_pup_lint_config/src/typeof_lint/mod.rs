// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

mod builder;
mod generate_config;
mod matcher;
#[cfg(test)]
mod tests;
/// Typeof lint module provides tools for configuring the `typeof` to
/// `nameof` lint.
///
/// A lint selects sites by file path and enclosing namespace, then applies
/// one or more rules to every `typeof(T).Member` it finds there.
///
/// # Example
/// ```
/// use sharp_pup_lint_config::{LintBuilder, Severity, TypeofLintExt};
///
/// let mut builder = LintBuilder::new();
///
/// builder.typeof_lint()
///     .lint_named("domain_type_names")
///     .matching(|m| m.namespace("^Acme\\.Domain").and(m.path("Generated").not()))
///     .with_severity(Severity::Error)
///     .prefer_nameof_for_type_name()
///     .build();
/// ```
mod types;

pub use types::{TypeofLint, TypeofMatch, TypeofRule};

pub use matcher::{TypeofMatchNode, TypeofMatcher, matcher};

pub use builder::{TypeofConstraintBuilder, TypeofLintBuilder, TypeofLintExt, TypeofNamedBuilder};
