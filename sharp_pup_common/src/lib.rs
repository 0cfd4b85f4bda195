// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

pub mod language_version;
pub mod project_context;
pub mod workspace;

pub use language_version::{Dialect, LanguageVersion, NAMEOF_INTRODUCED};
