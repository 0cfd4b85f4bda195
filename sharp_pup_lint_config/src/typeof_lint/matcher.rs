// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use super::types::TypeofMatch;

// === Typeof Matcher DSL === //
pub struct TypeofMatcher;

impl TypeofMatcher {
    /// Matches source files whose path matches the regex
    pub fn path(&self, pattern: impl Into<String>) -> TypeofMatchNode {
        TypeofMatchNode::Leaf(TypeofMatch::Path(pattern.into()))
    }

    /// Matches sites whose enclosing namespace matches the regex, e.g.
    /// `"^Acme\\.Domain(\\..*)?$"`
    pub fn namespace(&self, pattern: impl Into<String>) -> TypeofMatchNode {
        TypeofMatchNode::Leaf(TypeofMatch::Namespace(pattern.into()))
    }

    pub fn everything(&self) -> TypeofMatchNode {
        TypeofMatchNode::Leaf(TypeofMatch::everything())
    }
}

#[derive(Clone)]
pub enum TypeofMatchNode {
    Leaf(TypeofMatch),
    And(Box<TypeofMatchNode>, Box<TypeofMatchNode>),
    Or(Box<TypeofMatchNode>, Box<TypeofMatchNode>),
    Not(Box<TypeofMatchNode>),
}

impl TypeofMatchNode {
    pub fn and(self, other: TypeofMatchNode) -> Self {
        TypeofMatchNode::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: TypeofMatchNode) -> Self {
        TypeofMatchNode::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        TypeofMatchNode::Not(Box::new(self))
    }

    // Converts the DSL tree to the actual TypeofMatch
    pub fn build(self) -> TypeofMatch {
        match self {
            TypeofMatchNode::Leaf(matcher) => matcher,
            TypeofMatchNode::And(a, b) => TypeofMatch::AndMatches(Box::new(a.build()), Box::new(b.build())),
            TypeofMatchNode::Or(a, b) => TypeofMatch::OrMatches(Box::new(a.build()), Box::new(b.build())),
            TypeofMatchNode::Not(m) => TypeofMatch::NotMatch(Box::new(m.build())),
        }
    }
}

// Factory function to create a matcher DSL
pub fn matcher<F>(f: F) -> TypeofMatch
where
    F: FnOnce(&TypeofMatcher) -> TypeofMatchNode,
{
    let matcher = TypeofMatcher;
    let node = f(&matcher);
    node.build()
}
