// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//! Arena-backed syntax tree. Nodes are addressed by [`NodeId`] and carry
//! their parent, so rules can look upwards from any node without walking
//! down from the root again.

use crate::text::{Span, SourceText};
use sharp_pup_common::LanguageVersion;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    CompilationUnit,
    UsingDirective,
    NamespaceDeclaration,
    FileScopedNamespaceDeclaration,
    /// class, struct, interface, record; the keyword is kept as node text
    TypeDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    FieldDeclaration,
    PropertyDeclaration,
    /// `this[...]`, with accessors or an arrow body
    IndexerDeclaration,
    /// User-defined operator; the operator token is kept as node text
    OperatorDeclaration,
    /// `implicit operator T(...)` or `explicit operator T(...)`
    ConversionOperatorDeclaration,
    /// Event with `add`/`remove` accessors. Field-like events parse as fields.
    EventDeclaration,
    AccessorDeclaration,
    ParameterList,
    /// Generic parameters of a type or method; one `IdentifierName` per parameter
    TypeParameterList,
    ArrowExpressionClause,

    Block,
    ExpressionStatement,
    LocalDeclarationStatement,
    VariableDeclarator,
    ReturnStatement,
    ThrowStatement,
    IfStatement,
    WhileStatement,
    ForEachStatement,
    ForStatement,
    DoStatement,
    TryStatement,
    CatchClause,
    FinallyClause,
    UsingStatement,
    LockStatement,
    SwitchStatement,
    SwitchSection,
    BreakStatement,
    ContinueStatement,
    YieldStatement,
    GotoStatement,
    LabeledStatement,
    EmptyStatement,

    IdentifierName,
    GenericName,
    QualifiedName,
    AliasQualifiedName,
    PredefinedType,
    TypeArgumentList,
    OmittedTypeArgument,
    ArrayType,
    NullableType,

    LiteralExpression,
    ThisExpression,
    BaseExpression,
    TypeOfExpression,
    NameOfExpression,
    ObjectCreationExpression,
    ParenthesizedExpression,
    TupleExpression,
    /// `$"..."`; one child expression per interpolation hole
    InterpolatedStringExpression,
    CastExpression,
    MemberAccessExpression,
    ConditionalAccessExpression,
    InvocationExpression,
    ElementAccessExpression,
    ArgumentList,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    BinaryExpression,
    ConditionalExpression,
    AssignmentExpression,
    LambdaExpression,
    InitializerExpression,
    DefaultExpression,
    DeclarationExpression,
    SwitchExpression,
    /// Pattern after `is`, in a switch arm or a case label
    Pattern,

    /// Recovery node covering text the parser could not make sense of
    Error,
}

impl SyntaxKind {
    pub fn is_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
                | SyntaxKind::QualifiedName
                | SyntaxKind::AliasQualifiedName
                | SyntaxKind::PredefinedType
                | SyntaxKind::ArrayType
                | SyntaxKind::NullableType
        )
    }

    pub fn is_namespace(self) -> bool {
        matches!(
            self,
            SyntaxKind::NamespaceDeclaration | SyntaxKind::FileScopedNamespaceDeclaration
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Span,
    /// Identifier, operator or keyword text, depending on the kind
    pub text: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub language_version: LanguageVersion,
}

impl ParseOptions {
    pub fn new(language_version: LanguageVersion) -> Self {
        Self { language_version }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    path: PathBuf,
    source: SourceText,
    options: ParseOptions,
    nodes: Vec<SyntaxNode>,
    root: Option<NodeId>,
    errors: Vec<SyntaxError>,
}

impl SyntaxTree {
    pub(crate) fn new(path: PathBuf, source: SourceText, options: ParseOptions) -> Self {
        Self {
            path,
            source,
            options,
            nodes: Vec::new(),
            root: None,
            errors: Vec::new(),
        }
    }

    /// Allocate a node and adopt `children`.
    pub(crate) fn alloc(
        &mut self,
        kind: SyntaxKind,
        span: Span,
        text: Option<String>,
        children: Vec<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in &children {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = Some(id);
            }
        }
        self.nodes.push(SyntaxNode {
            kind,
            span,
            text,
            parent: None,
            children,
        });
        id
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub(crate) fn push_error(&mut self, message: impl Into<String>, span: Span) {
        self.errors.push(SyntaxError {
            message: message.into(),
            span,
        });
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    pub fn language_version(&self) -> LanguageVersion {
        self.options.language_version
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `None` for ids that don't belong to this tree.
    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Option<SyntaxKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.node(id).map(|n| n.span)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.text.as_deref())
    }

    /// The source text a node covers.
    pub fn text(&self, id: NodeId) -> &str {
        self.span(id).map(|s| self.source.slice(s)).unwrap_or("")
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Pre-order walk of `id` and everything under it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.node(id).is_some() { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Every node in the tree, root first.
    pub fn walk(&self) -> Descendants<'_> {
        match self.root {
            Some(root) => self.descendants(root),
            None => Descendants {
                tree: self,
                stack: Vec::new(),
            },
        }
    }

    /// Fully qualified name of the namespace enclosing `id`, if any.
    pub fn enclosing_namespace(&self, id: NodeId) -> Option<String> {
        let parts: Vec<&str> = self
            .ancestors(id)
            .filter(|a| self.kind(*a).is_some_and(SyntaxKind::is_namespace))
            .filter_map(|a| self.node_text(a))
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(parts.into_iter().rev().collect::<Vec<_>>().join("."))
    }

    /// All namespaces declared in the file, fully qualified, in source order.
    pub fn declared_namespaces(&self) -> Vec<String> {
        let mut namespaces = Vec::new();
        for id in self.walk() {
            if self.kind(id).is_some_and(SyntaxKind::is_namespace) {
                let own = self.node_text(id).unwrap_or_default();
                let full = match self.enclosing_namespace(id) {
                    Some(outer) => format!("{outer}.{own}"),
                    None => own.to_string(),
                };
                if !namespaces.contains(&full) {
                    namespaces.push(full);
                }
            }
        }
        namespaces
    }
}

pub struct Descendants<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
