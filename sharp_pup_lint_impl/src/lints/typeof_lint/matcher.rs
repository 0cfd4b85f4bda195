// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Decides whether a `typeof` expression could be written with `nameof`.
//!
//! Both functions are pure: they read the tree and nothing else, so the
//! host may call them from any thread, in any order, any number of times.

use sharp_pup_common::LanguageVersion;
use sharp_pup_syntax::{NodeId, Span, SyntaxKind, SyntaxTree};

///
/// True when `node` is a `typeof(T)` that is the receiver of a member
/// access, e.g. `typeof(T).Name`, and the language version has `nameof`.
///
/// Which member is accessed is not checked here; see
/// [`NameofRewrite`](super::NameofRewrite) for the narrower test.
/// Anything malformed or out of range is simply not eligible.
///
pub fn is_eligible(tree: &SyntaxTree, node: NodeId, version: LanguageVersion) -> bool {
    if !version.supports_nameof() {
        return false;
    }
    if tree.kind(node) != Some(SyntaxKind::TypeOfExpression) {
        return false;
    }
    let Some(access) = tree.parent(node) else {
        return false;
    };
    tree.kind(access) == Some(SyntaxKind::MemberAccessExpression)
        && tree.child(access, 0) == Some(node)
        && tree
            .child(access, 1)
            .and_then(|member| tree.kind(member))
            .is_some_and(|kind| kind != SyntaxKind::Error)
}

///
/// Where the diagnostic for an eligible node goes: the whole member
/// access, from the start of `typeof` to the end of the member name.
/// A node with no member-access parent gets its own span.
///
pub fn locate_diagnostic(tree: &SyntaxTree, node: NodeId) -> Span {
    let target = tree
        .parent(node)
        .filter(|parent| tree.kind(*parent) == Some(SyntaxKind::MemberAccessExpression))
        .unwrap_or(node);
    tree.span(target).unwrap_or_default()
}
