// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::LintRule;
use crate::diagnostics::DescriptorRegistry;
use sharp_pup_lint_config::ConfiguredLint;

pub mod typeof_lint;

/// Turn configured lints into runnable rules.
pub fn create_rules(lints: &[ConfiguredLint]) -> Vec<Box<dyn LintRule + Send>> {
    lints
        .iter()
        .map(|lint| match lint {
            ConfiguredLint::Typeof(_) => typeof_lint::TypeofLintRule::new(lint),
        })
        .collect()
}

/// Add the descriptors of every lint we ship.
pub fn register_descriptors(registry: &mut DescriptorRegistry) {
    for descriptor in typeof_lint::descriptors() {
        registry.add(descriptor);
    }
}
