// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::host::LintStore;

///
/// One of our configured lints. These sit on top of the [`LintStore`],
/// which does the actual tree walking and hands candidate nodes to the
/// predicates each lint registers.
///
/// They add:
/// * A name, which is used in the diagnostics to refer back to the configuration
///   item.
/// * The ability to check if certain files and namespaces are targeted by the
///   lint, so that `sharp-pup print-files` can show what our rules are actually
///   doing.
pub trait LintRule: Sync + Send {
    ///
    /// Returns the name of the lint rule. This is the name specified
    /// in pup.ron
    ///
    fn name(&self) -> String;

    ///
    /// Returns true if the lint constrains code in `namespace` of the file at
    /// `path`. Code outside any namespace passes an empty string.
    ///
    fn applies_to_site(&self, path: &str, namespace: &str) -> bool;

    ///
    /// Returns true if the lint constrains any code in the file. Used to
    /// annotate the file list of `sharp-pup print-files`.
    ///
    fn applies_to_file(&self, path: &str, namespaces: &[String]) -> bool {
        if namespaces.is_empty() {
            return self.applies_to_site(path, "");
        }
        namespaces
            .iter()
            .any(|namespace| self.applies_to_site(path, namespace))
    }

    fn register(&self, _lint_store: &mut LintStore) {}
}
