// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::Severity;
use serde::{Deserialize, Serialize};

/// Selects the sites a typeof lint applies to
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum TypeofMatch {
    /// Source file path matches this regex
    Path(String),
    /// Fully qualified enclosing namespace matches this regex. Sites
    /// outside any namespace only match patterns that accept "".
    Namespace(String),
    /// Logical AND - both patterns must match
    AndMatches(Box<TypeofMatch>, Box<TypeofMatch>),
    /// Logical OR - either pattern must match
    OrMatches(Box<TypeofMatch>, Box<TypeofMatch>),
    /// Logical NOT - inverts the match
    NotMatch(Box<TypeofMatch>),
}

impl TypeofMatch {
    /// Matches every file.
    pub fn everything() -> Self {
        TypeofMatch::Path(".*".to_string())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TypeofLint {
    pub name: String,
    pub matches: TypeofMatch,
    pub rules: Vec<TypeofRule>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TypeofRule {
    /// Report every `typeof(T).Member` that could use `nameof`
    PreferNameof(Severity),
    /// Report only `typeof(T).Name` where `T` is a plain, non-generic type
    /// name, which is exactly what `nameof(T)` produces
    PreferNameofForTypeName(Severity),
}

impl TypeofRule {
    pub fn severity(&self) -> Severity {
        match self {
            TypeofRule::PreferNameof(severity) | TypeofRule::PreferNameofForTypeName(severity) => *severity,
        }
    }
}
