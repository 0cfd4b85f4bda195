// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Flags `typeof(T).<member>` where `nameof(T)` could be used instead.
//!
//! [`matcher`] holds the recognition logic the host calls for every
//! `typeof` it finds. [`nameof_rewrite`] narrows that down to the sites
//! where `nameof` is a drop-in replacement and builds the suggestion.

mod lint;
pub mod matcher;
pub mod nameof_rewrite;

pub use lint::{RULE_ID, TypeofLintRule, descriptors};
pub use nameof_rewrite::NameofRewrite;
