// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use super::matcher::{TypeofMatchNode, TypeofMatcher, matcher};
use super::types::{TypeofLint, TypeofMatch, TypeofRule};
use crate::lint_builder::LintBuilder;
use crate::{ConfiguredLint, Severity};

/// Extension trait that adds typeof linting capabilities to LintBuilder
pub trait TypeofLintExt {
    fn typeof_lint(&mut self) -> TypeofLintBuilder<'_>;
}

impl TypeofLintExt for LintBuilder {
    fn typeof_lint(&mut self) -> TypeofLintBuilder<'_> {
        TypeofLintBuilder { parent: self }
    }
}

/// Initial builder for creating a typeof lint
pub struct TypeofLintBuilder<'a> {
    parent: &'a mut LintBuilder,
}

impl<'a> TypeofLintBuilder<'a> {
    pub fn lint_named(self, name: impl Into<String>) -> TypeofNamedBuilder<'a> {
        TypeofNamedBuilder {
            parent: self.parent,
            name: name.into(),
        }
    }
}

/// Builder used after naming the lint
pub struct TypeofNamedBuilder<'a> {
    parent: &'a mut LintBuilder,
    name: String,
}

impl<'a> TypeofNamedBuilder<'a> {
    pub fn matches(self, m: TypeofMatch) -> TypeofConstraintBuilder<'a> {
        TypeofConstraintBuilder {
            parent: self.parent,
            match_: m,
            rules: Vec::new(),
            current_severity: Severity::default(),
            name: self.name,
        }
    }

    /// Define site matching using the fluent DSL
    pub fn matching<F>(self, f: F) -> TypeofConstraintBuilder<'a>
    where
        F: FnOnce(&TypeofMatcher) -> TypeofMatchNode,
    {
        let matcher = matcher(f);
        self.matches(matcher)
    }
}

/// Builder for adding rules to a typeof lint
pub struct TypeofConstraintBuilder<'a> {
    parent: &'a mut LintBuilder,
    match_: TypeofMatch,
    rules: Vec<TypeofRule>,
    current_severity: Severity,
    name: String,
}

impl<'a> TypeofConstraintBuilder<'a> {
    pub fn add_rule(mut self, rule: TypeofRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the severity level for all subsequently added rules
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.current_severity = severity;
        self
    }

    /// Flag every `typeof(T).Member` that could be written with `nameof`
    pub fn prefer_nameof(self) -> Self {
        let rule = TypeofRule::PreferNameof(self.current_severity);
        self.add_rule(rule)
    }

    /// Flag only `typeof(T).Name` on plain type names
    pub fn prefer_nameof_for_type_name(self) -> Self {
        let rule = TypeofRule::PreferNameofForTypeName(self.current_severity);
        self.add_rule(rule)
    }

    /// Finalize the typeof lint and return to the parent builder
    pub fn build(self) -> &'a mut LintBuilder {
        let lint = ConfiguredLint::Typeof(TypeofLint {
            name: self.name,
            matches: self.match_,
            rules: self.rules,
        });
        self.parent.push(lint);
        self.parent
    }
}
