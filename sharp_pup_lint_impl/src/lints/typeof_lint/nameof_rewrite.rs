// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use sharp_pup_syntax::{NodeId, Span, SyntaxKind, SyntaxTree};

/// A `typeof(T).Name` that `nameof(T)` replaces exactly, with the
/// replacement text.
///
/// `nameof` gives the name as written, while `Type.Name` gives the runtime
/// name. They only agree when the member is `Name` and `T` is a plain type
/// name: generic types report `List`1`, arrays report `Int32[]`, and a type
/// parameter reports whatever it is instantiated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameofRewrite {
    /// The whole `typeof(T).Name` member access
    pub span: Span,
    pub replacement: String,
}

impl NameofRewrite {
    pub fn for_site(tree: &SyntaxTree, typeof_node: NodeId) -> Option<Self> {
        if tree.kind(typeof_node)? != SyntaxKind::TypeOfExpression {
            return None;
        }
        let access = tree.parent(typeof_node)?;
        if tree.kind(access)? != SyntaxKind::MemberAccessExpression
            || tree.node_text(access)? != "."
            || tree.child(access, 0)? != typeof_node
        {
            return None;
        }
        let member = tree.child(access, 1)?;
        if tree.kind(member)? != SyntaxKind::IdentifierName || tree.node_text(member)? != "Name" {
            return None;
        }
        // `typeof(T).Name(...)` is not the property
        if let Some(outer) = tree.parent(access)
            && tree.kind(outer) == Some(SyntaxKind::InvocationExpression)
            && tree.child(outer, 0) == Some(access)
        {
            return None;
        }

        let operand = tree.child(typeof_node, 0)?;
        let type_name = nameable_type(tree, operand)?;
        if is_type_parameter_in_scope(tree, typeof_node, &type_name) {
            return None;
        }

        Some(Self {
            span: tree.span(access)?,
            replacement: format!("nameof({type_name})"),
        })
    }
}

/// The operand as it should appear inside `nameof(...)`, if it can.
fn nameable_type(tree: &SyntaxTree, operand: NodeId) -> Option<String> {
    match tree.kind(operand)? {
        SyntaxKind::PredefinedType => {
            let keyword = tree.node_text(operand).unwrap_or_else(|| tree.text(operand));
            framework_name(keyword).map(|name| format!("System.{name}"))
        }
        SyntaxKind::IdentifierName | SyntaxKind::QualifiedName | SyntaxKind::AliasQualifiedName => {
            let plain = tree.descendants(operand).all(|id| {
                matches!(
                    tree.kind(id),
                    Some(SyntaxKind::IdentifierName | SyntaxKind::QualifiedName | SyntaxKind::AliasQualifiedName)
                )
            });
            if !plain {
                return None;
            }
            let written: String = tree
                .text(operand)
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if written.is_empty() {
                return None;
            }
            Some(match written.strip_prefix("global::") {
                Some(rest) => rest.to_string(),
                None => written,
            })
        }
        _ => None,
    }
}

/// `nameof(int)` does not compile; name the framework type instead.
fn framework_name(keyword: &str) -> Option<&'static str> {
    Some(match keyword {
        "bool" => "Boolean",
        "byte" => "Byte",
        "sbyte" => "SByte",
        "char" => "Char",
        "decimal" => "Decimal",
        "double" => "Double",
        "float" => "Single",
        "int" => "Int32",
        "uint" => "UInt32",
        "long" => "Int64",
        "ulong" => "UInt64",
        "short" => "Int16",
        "ushort" => "UInt16",
        "object" => "Object",
        "string" => "String",
        _ => return None,
    })
}

fn is_type_parameter_in_scope(tree: &SyntaxTree, node: NodeId, name: &str) -> bool {
    if name.contains('.') || name.contains("::") {
        return false;
    }
    tree.ancestors(node)
        .filter(|a| {
            matches!(
                tree.kind(*a),
                Some(SyntaxKind::TypeDeclaration | SyntaxKind::MethodDeclaration)
            )
        })
        .flat_map(|declaration| tree.children(declaration).iter().copied())
        .filter(|child| tree.kind(*child) == Some(SyntaxKind::TypeParameterList))
        .flat_map(|list| tree.children(list).iter().copied())
        .any(|parameter| tree.node_text(parameter) == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharp_pup_syntax::{ParseOptions, parse_text};

    fn rewrite(source: &str) -> Option<String> {
        let tree = parse_text(source, ParseOptions::default());
        let node = tree
            .walk()
            .find(|id| tree.kind(*id) == Some(SyntaxKind::TypeOfExpression))
            .expect("typeof in source");
        NameofRewrite::for_site(&tree, node).map(|r| {
            assert_eq!(tree.source().slice(r.span).trim_start().get(..6), Some("typeof"));
            r.replacement
        })
    }

    #[test]
    fn plain_type_names_rewrite() {
        assert_eq!(rewrite("var n = typeof(Foo).Name;").as_deref(), Some("nameof(Foo)"));
        assert_eq!(
            rewrite("var n = typeof(System.IO.Stream).Name;").as_deref(),
            Some("nameof(System.IO.Stream)")
        );
        assert_eq!(
            rewrite("var n = typeof(global::App.Widget).Name;").as_deref(),
            Some("nameof(App.Widget)")
        );
        assert_eq!(
            rewrite("var n = typeof( Outer . Inner ).Name;").as_deref(),
            Some("nameof(Outer.Inner)")
        );
    }

    #[test]
    fn predefined_types_use_framework_names() {
        assert_eq!(rewrite("var n = typeof(int).Name;").as_deref(), Some("nameof(System.Int32)"));
        assert_eq!(rewrite("var n = typeof(string).Name;").as_deref(), Some("nameof(System.String)"));
        assert_eq!(rewrite("var n = typeof(void).Name;"), None);
    }

    #[test]
    fn other_members_do_not_rewrite() {
        assert_eq!(rewrite("var n = typeof(Foo).FullName;"), None);
        assert_eq!(rewrite("var n = typeof(Foo).ToString();"), None);
        assert_eq!(rewrite("var n = typeof(Foo).Name();"), None);
    }

    #[test]
    fn constructed_types_do_not_rewrite() {
        assert_eq!(rewrite("var n = typeof(List<int>).Name;"), None);
        assert_eq!(rewrite("var n = typeof(Dictionary<,>).Name;"), None);
        assert_eq!(rewrite("var n = typeof(Outer<int>.Inner).Name;"), None);
        assert_eq!(rewrite("var n = typeof(int[]).Name;"), None);
        assert_eq!(rewrite("var n = typeof(int?).Name;"), None);
    }

    #[test]
    fn type_parameters_do_not_rewrite() {
        assert_eq!(rewrite("class Box<T> { string N => typeof(T).Name; }"), None);
        assert_eq!(rewrite("class Box { string N<T>() => typeof(T).Name; }"), None);
        assert_eq!(
            rewrite("class Box<T> { string N => typeof(U).Name; }").as_deref(),
            Some("nameof(U)")
        );
    }

    #[test]
    fn only_the_direct_receiver_rewrites() {
        assert_eq!(rewrite("var n = (typeof(Foo)).Name;"), None);
        assert_eq!(rewrite("var n = typeof(Foo)?.Name;"), None);
        assert_eq!(rewrite("var n = typeof(Foo);"), None);
    }
}
