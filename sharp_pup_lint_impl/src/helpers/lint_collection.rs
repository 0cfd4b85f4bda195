// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::LintRule;
use crate::host::LintStore;

///
/// Collects a set of lints configured
/// and ready to run.
///
pub struct LintCollection {
    lints: Vec<Box<dyn LintRule + Send>>,
}

impl LintCollection {
    pub fn new(lints: Vec<Box<dyn LintRule + Send>>) -> LintCollection {
        LintCollection { lints }
    }

    pub fn lints(&self) -> &Vec<Box<dyn LintRule + Send>> {
        &self.lints
    }

    /// A store with every lint in the collection registered.
    pub fn build_store(&self) -> LintStore {
        let mut store = LintStore::new();
        for lint in &self.lints {
            lint.register(&mut store);
        }
        store
    }

    /// Names of the lints that target any code in the file.
    pub fn applicable_to_file(&self, path: &str, namespaces: &[String]) -> Vec<String> {
        self.lints
            .iter()
            .filter(|lint| lint.applies_to_file(path, namespaces))
            .map(|lint| lint.name())
            .collect()
    }
}
