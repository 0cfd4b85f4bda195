// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! The analysis host. It walks a syntax tree, picks out the runtime
//! type-metadata queries, and offers each one to every registered rule.
//! Rules supply a predicate deciding eligibility and a locator choosing
//! where the diagnostic goes; their handler then decides what to emit.

use std::cell::RefCell;
use std::path::Path;

use sharp_pup_common::{Dialect, LanguageVersion};
use sharp_pup_lint_config::Severity;
use sharp_pup_syntax::{NodeId, Span, SyntaxKind, SyntaxTree};

use crate::diagnostics::{DescriptorRegistry, Diagnostic, DiagnosticDescriptor};

/// Decides whether a candidate node is eligible for a rule.
pub type Predicate = fn(&SyntaxTree, NodeId, LanguageVersion) -> bool;

/// Picks the span a diagnostic for an approved node is anchored at.
pub type Locator = fn(&SyntaxTree, NodeId) -> Span;

type Handler = Box<dyn Fn(&LintContext<'_>, NodeId, Span) + Send + Sync>;

struct Registration {
    rule_id: &'static str,
    predicate: Predicate,
    locator: Locator,
    handler: Handler,
}

/// The rules registered for a run. Shared read-only across worker threads.
#[derive(Default)]
pub struct LintStore {
    registrations: Vec<Registration>,
}

impl LintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, rule_id: &'static str, predicate: Predicate, locator: Locator, handler: H)
    where
        H: Fn(&LintContext<'_>, NodeId, Span) + Send + Sync + 'static,
    {
        self.registrations.push(Registration {
            rule_id,
            predicate,
            locator,
            handler: Box::new(handler),
        });
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Run every registration over `tree`, returning what the handlers emitted.
    pub fn check_tree(&self, tree: &SyntaxTree, registry: &DescriptorRegistry) -> Vec<Diagnostic> {
        let cx = LintContext::new(tree, registry, Dialect::CSharp);
        let version = tree.language_version();
        let mut candidates = 0usize;

        for node in tree.walk() {
            if !is_metadata_query(tree, node) {
                continue;
            }
            candidates += 1;
            for registration in &self.registrations {
                if !(registration.predicate)(tree, node, version) {
                    continue;
                }
                let span = (registration.locator)(tree, node);
                tracing::trace!(rule = registration.rule_id, %node, %span, "rule approved candidate");
                (registration.handler)(&cx, node, span);
            }
        }

        let diagnostics = cx.into_diagnostics();
        tracing::debug!(
            path = %tree.path().display(),
            candidates,
            diagnostics = diagnostics.len(),
            "checked tree"
        );
        diagnostics
    }
}

/// What a handler sees while one tree is being checked.
pub struct LintContext<'a> {
    tree: &'a SyntaxTree,
    registry: &'a DescriptorRegistry,
    dialect: Dialect,
    path: String,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl<'a> LintContext<'a> {
    pub fn new(tree: &'a SyntaxTree, registry: &'a DescriptorRegistry, dialect: Dialect) -> Self {
        Self {
            tree,
            registry,
            dialect,
            path: display_path(tree.path()),
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Path of the file under analysis, with `/` separators.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn descriptor(&self, rule_id: &str, severity: Severity) -> Option<&'static DiagnosticDescriptor> {
        self.registry.lookup(rule_id, self.dialect, severity)
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}

/// Is `node` a runtime type-metadata query: `typeof(T)` or a zero-argument
/// `GetType()` call?
pub fn is_metadata_query(tree: &SyntaxTree, node: NodeId) -> bool {
    match tree.kind(node) {
        Some(SyntaxKind::TypeOfExpression) => true,
        Some(SyntaxKind::InvocationExpression) => is_get_type_call(tree, node),
        _ => false,
    }
}

fn is_get_type_call(tree: &SyntaxTree, node: NodeId) -> bool {
    let (Some(callee), Some(arguments)) = (tree.child(node, 0), tree.child(node, 1)) else {
        return false;
    };
    let name = match tree.kind(callee) {
        Some(SyntaxKind::IdentifierName) => Some(callee),
        Some(SyntaxKind::MemberAccessExpression) => tree.child(callee, 1),
        _ => None,
    };
    let Some(name) = name else {
        return false;
    };
    tree.kind(name) == Some(SyntaxKind::IdentifierName)
        && tree.node_text(name) == Some("GetType")
        && tree.children(arguments).is_empty()
}

/// A path as we print and match it: `/` separators, no leading `./`.
pub fn display_path(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    match text.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
