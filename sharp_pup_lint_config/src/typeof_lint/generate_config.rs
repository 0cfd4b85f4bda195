// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use super::types::{TypeofLint, TypeofMatch, TypeofRule};
use crate::{ConfiguredLint, GenerateFromContext, LintBuilder, Severity};
use sharp_pup_common::project_context::ProjectContext;
use std::collections::BTreeSet;

impl GenerateFromContext for TypeofLint {
    fn generate_from_contexts(contexts: &[ProjectContext], builder: &mut LintBuilder) {
        let roots: BTreeSet<String> = contexts
            .iter()
            .flat_map(|context| context.namespaces())
            .filter_map(|namespace| namespace.split('.').next().map(str::to_string))
            .filter(|root| !root.is_empty())
            .collect();

        // Nothing to group by; fall back to a single project-wide lint.
        if roots.is_empty() {
            builder.push(ConfiguredLint::Typeof(TypeofLint {
                name: "prefer_nameof".to_string(),
                matches: TypeofMatch::everything(),
                rules: vec![TypeofRule::PreferNameof(Severity::Warn)],
            }));
            return;
        }

        for root in roots {
            builder.push(ConfiguredLint::Typeof(TypeofLint {
                name: format!("prefer_nameof_in_{}", root.to_lowercase()),
                matches: TypeofMatch::Namespace(format!("^{root}(\\..*)?$")),
                rules: vec![TypeofRule::PreferNameof(Severity::Warn)],
            }));
        }
    }
}
