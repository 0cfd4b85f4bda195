// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use super::DiagnosticDescriptor;
use sharp_pup_common::Dialect;
use sharp_pup_lint_config::Severity;

/// Looks up the descriptor for a rule id in a given dialect and severity.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    descriptors: Vec<&'static DiagnosticDescriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the descriptors of every lint we ship.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        crate::lints::register_descriptors(&mut registry);
        registry
    }

    pub fn add(&mut self, descriptor: &'static DiagnosticDescriptor) {
        if !self.descriptors.contains(&descriptor) {
            self.descriptors.push(descriptor);
        }
    }

    pub fn lookup(
        &self,
        rule_id: &str,
        dialect: Dialect,
        severity: Severity,
    ) -> Option<&'static DiagnosticDescriptor> {
        self.descriptors
            .iter()
            .copied()
            .find(|d| d.id == rule_id && d.dialect == dialect && d.severity == severity)
    }

    /// Distinct rule ids, in registration order.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = Vec::new();
        for descriptor in &self.descriptors {
            if !ids.contains(&descriptor.id) {
                ids.push(descriptor.id);
            }
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
