// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

/// Declares two diagnostic descriptors for the same rule and dialect, one
/// at Error severity and one at Warn. We also emit a struct that lists
/// both, so that several declarations can live in the same file and be
/// handed to the registry together.
///
/// The host then picks the severity at runtime based on the user's
/// configuration.
#[macro_export]
macro_rules! declare_variable_severity_lint {
    ($(#[$attr: meta])* $vis: vis, $NAME: ident, $NAME_DENY: ident, $NAME_WARN: ident, $id: expr, $dialect: expr, $title: expr, $message: expr) => (
        $(#[$attr])*
        $vis static $NAME_DENY: &$crate::diagnostics::DiagnosticDescriptor = &$crate::diagnostics::DiagnosticDescriptor {
            id: $id,
            dialect: $dialect,
            severity: sharp_pup_lint_config::Severity::Error,
            title: $title,
            message: $message,
        };

        $(#[$attr])*
        $vis static $NAME_WARN: &$crate::diagnostics::DiagnosticDescriptor = &$crate::diagnostics::DiagnosticDescriptor {
            id: $id,
            dialect: $dialect,
            severity: sharp_pup_lint_config::Severity::Warn,
            title: $title,
            message: $message,
        };

        // Keep the BIG_CAPS name so it reads like the statics it wraps
        #[allow(non_camel_case_types)]
        $vis struct $NAME;

        impl $NAME {
            pub fn all() -> [&'static $crate::diagnostics::DiagnosticDescriptor; 2] {
                [$NAME_WARN, $NAME_DENY]
            }
        }
    );
}
