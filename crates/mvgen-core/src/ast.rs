//! Declaration syntax trees.
//!
//! Only the declaration surface is modelled: namespaces, type declarations,
//! and the fields, methods and properties inside them. Method bodies and
//! initializers are never kept, since nothing downstream needs them.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::types::{PredefinedType, RefKind};

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    /// Path the source was read from (used for diagnostics and hint names)
    pub path: Arc<str>,
    /// `using` directives at file level
    pub usings: Vec<String>,
    /// `[assembly: ...]` attributes
    pub assembly_attributes: Vec<AttributeSyntax>,
    /// Top-level type declarations (namespaced types included)
    pub types: Vec<TypeDecl>,
}

impl SyntaxTree {
    /// Create an empty tree for the given path.
    pub fn new(path: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            usings: Vec::new(),
            assembly_attributes: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Every declaration node in document order.
    ///
    /// A type declaration is yielded before its members; nested types are
    /// visited where they appear among the members.
    pub fn descendant_nodes(&self) -> Vec<SyntaxNode<'_>> {
        let mut nodes = Vec::new();
        for decl in &self.types {
            collect_nodes(decl, &mut nodes);
        }
        nodes
    }

    /// Location of a span inside this tree.
    pub fn location(&self, span: Span) -> Location {
        Location {
            path: Arc::clone(&self.path),
            span,
        }
    }
}

fn collect_nodes<'a>(decl: &'a TypeDecl, nodes: &mut Vec<SyntaxNode<'a>>) {
    nodes.push(SyntaxNode::Type(decl));
    for member in &decl.members {
        match member {
            MemberDecl::Field(field) => nodes.push(SyntaxNode::Field { decl: field, parent: decl }),
            MemberDecl::Method(method) => nodes.push(SyntaxNode::Method { decl: method, parent: decl }),
            MemberDecl::Property(property) => {
                nodes.push(SyntaxNode::Property { decl: property, parent: decl })
            }
            MemberDecl::Type(nested) => collect_nodes(nested, nodes),
        }
    }
}

/// A borrowed view of one declaration node together with its enclosing type.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'a> {
    Type(&'a TypeDecl),
    Field { decl: &'a FieldDecl, parent: &'a TypeDecl },
    Method { decl: &'a MethodDecl, parent: &'a TypeDecl },
    Property { decl: &'a PropertyDecl, parent: &'a TypeDecl },
}

impl<'a> SyntaxNode<'a> {
    /// Source span of the node.
    pub fn span(&self) -> Span {
        match self {
            Self::Type(decl) => decl.span,
            Self::Field { decl, .. } => decl.span,
            Self::Method { decl, .. } => decl.span,
            Self::Property { decl, .. } => decl.span,
        }
    }

    /// The type declaration that provides the binding context for this node.
    pub fn context(&self) -> &'a TypeDecl {
        match *self {
            Self::Type(decl) => decl,
            Self::Field { parent, .. }
            | Self::Method { parent, .. }
            | Self::Property { parent, .. } => parent,
        }
    }
}

/// Source span for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    /// Span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }
}

/// A span inside a named source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub path: Arc<str>,
    pub span: Span,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.span.line, self.span.column)
    }
}

/// The keyword that introduced a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKeyword {
    Class,
    Struct,
    Interface,
    Enum,
    Record,
    RecordStruct,
}

impl TypeKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::RecordStruct => "record struct",
        }
    }
}

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Readonly,
    Partial,
    Sealed,
    Abstract,
    Virtual,
    Override,
    New,
    Extern,
    Unsafe,
    Async,
    Const,
    Volatile,
    Required,
    File,
}

impl Modifier {
    /// Map a keyword to a modifier.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "public" => Self::Public,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "internal" => Self::Internal,
            "static" => Self::Static,
            "readonly" => Self::Readonly,
            "partial" => Self::Partial,
            "sealed" => Self::Sealed,
            "abstract" => Self::Abstract,
            "virtual" => Self::Virtual,
            "override" => Self::Override,
            "new" => Self::New,
            "extern" => Self::Extern,
            "unsafe" => Self::Unsafe,
            "async" => Self::Async,
            "const" => Self::Const,
            "volatile" => Self::Volatile,
            "required" => Self::Required,
            "file" => Self::File,
            _ => return None,
        })
    }
}

/// Modifier list of a declaration.
pub type Modifiers = SmallVec<[Modifier; 4]>;

/// Lexical scope of a type declaration.
///
/// Carried on every declaration so that type binding never has to walk
/// back up the tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclScope {
    /// Enclosing namespace, dotted (`None` for the global namespace)
    pub namespace: Option<String>,
    /// `using` directives visible at the declaration, innermost last
    pub usings: Vec<String>,
    /// Enclosing type declarations, outermost first
    pub containing_types: Vec<ContainingType>,
}

/// An enclosing type of a nested declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainingType {
    pub keyword: TypeKeyword,
    pub name: String,
    pub type_parameters: Vec<String>,
}

/// A class, struct, interface, enum or record declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub keyword: TypeKeyword,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub modifiers: Modifiers,
    pub attributes: Vec<AttributeSyntax>,
    pub base_list: Vec<TypeSyntax>,
    pub members: Vec<MemberDecl>,
    pub scope: DeclScope,
    pub span: Span,
}

impl TypeDecl {
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Metadata-style name: `Namespace.Outer+Inner` with `` `N `` arity suffixes.
    pub fn metadata_name(&self) -> String {
        let mut name = String::new();
        if let Some(ns) = &self.scope.namespace {
            name.push_str(ns);
            name.push('.');
        }
        for outer in &self.scope.containing_types {
            name.push_str(&outer.name);
            push_arity(&mut name, outer.type_parameters.len());
            name.push('+');
        }
        name.push_str(&self.name);
        push_arity(&mut name, self.type_parameters.len());
        name
    }

    /// Methods declared directly in this declaration.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Method(method) => Some(method),
            _ => None,
        })
    }
}

fn push_arity(name: &mut String, arity: usize) {
    if arity > 0 {
        name.push('`');
        name.push_str(&arity.to_string());
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberDecl {
    Field(FieldDecl),
    Method(MethodDecl),
    Property(PropertyDecl),
    Type(TypeDecl),
}

/// A field declaration; one declaration may introduce several variables.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub attributes: Vec<AttributeSyntax>,
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub variables: SmallVec<[Identifier; 1]>,
    pub span: Span,
}

/// A name with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// A method declaration. The body, if any, is not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub attributes: Vec<AttributeSyntax>,
    pub modifiers: Modifiers,
    pub return_type: TypeSyntax,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<ParameterSyntax>,
    pub has_body: bool,
    pub span: Span,
}

impl MethodDecl {
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSyntax {
    pub attributes: Vec<AttributeSyntax>,
    pub ref_kind: RefKind,
    pub is_params: bool,
    pub ty: TypeSyntax,
    pub name: String,
    pub span: Span,
}

/// A property declaration. Accessors are not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub attributes: Vec<AttributeSyntax>,
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub name: String,
    pub span: Span,
}

/// Explicit target of an attribute (`[field: Foo]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeTarget {
    Assembly,
    Module,
    Field,
    Property,
    Method,
    Param,
    Return,
    Type,
    Event,
}

impl AttributeTarget {
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "assembly" => Self::Assembly,
            "module" => Self::Module,
            "field" => Self::Field,
            "property" => Self::Property,
            "method" => Self::Method,
            "param" => Self::Param,
            "return" => Self::Return,
            "type" => Self::Type,
            "event" => Self::Event,
            _ => return None,
        })
    }
}

/// One attribute application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSyntax {
    pub target: Option<AttributeTarget>,
    /// Name as written, e.g. `BindingProperty` or `global::UnityEngine.HideInInspector`
    pub name: String,
    /// Raw argument texts, in order
    pub arguments: SmallVec<[String; 2]>,
    pub span: Span,
}

impl AttributeSyntax {
    /// Whether this attribute syntactically names `name` in `namespace`.
    ///
    /// Accepts the short and `Attribute`-suffixed spellings, optionally
    /// namespace-qualified and optionally prefixed with `global::`.
    pub fn is_candidate(&self, namespace: &str, name: &str) -> bool {
        let written = self.name.strip_prefix("global::").unwrap_or(&self.name);
        let simple = match written.strip_prefix(namespace) {
            Some(rest) => match rest.strip_prefix('.') {
                Some(rest) => rest,
                None => written,
            },
            None => written,
        };
        simple == name
            || simple
                .strip_suffix("Attribute")
                .map_or(false, |stem| stem == name)
    }
}

/// Whether any attribute in `attributes` is a syntactic candidate for `namespace.name`.
pub fn has_attribute_candidate(attributes: &[AttributeSyntax], namespace: &str, name: &str) -> bool {
    attributes.iter().any(|a| a.is_candidate(namespace, name))
}

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSyntax {
    /// `void`
    Void(Span),
    /// `int`, `string`, ...
    Predefined(PredefinedType, Span),
    /// `A.B<C>.D`, optionally `global::`-qualified
    Named(NameSyntax),
    /// `T[]`, `T[,]`
    Array { element: Box<TypeSyntax>, rank: u8, span: Span },
    /// `T?`
    Nullable { inner: Box<TypeSyntax>, span: Span },
}

impl TypeSyntax {
    pub fn span(&self) -> Span {
        match self {
            Self::Void(span) | Self::Predefined(_, span) => *span,
            Self::Named(name) => name.span,
            Self::Array { span, .. } | Self::Nullable { span, .. } => *span,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void(_))
    }
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void(_) => f.write_str("void"),
            Self::Predefined(ty, _) => f.write_str(ty.keyword()),
            Self::Named(name) => write!(f, "{name}"),
            Self::Array { element, rank, .. } => {
                write!(f, "{element}[")?;
                for _ in 1..*rank {
                    f.write_str(",")?;
                }
                f.write_str("]")
            }
            Self::Nullable { inner, .. } => write!(f, "{inner}?"),
        }
    }
}

/// A possibly qualified, possibly generic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSyntax {
    pub global: bool,
    pub segments: SmallVec<[NameSegment; 2]>,
    pub span: Span,
}

/// One dotted segment of a name, with its type arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSegment {
    pub name: String,
    pub type_arguments: Vec<TypeSyntax>,
}

impl fmt::Display for NameSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            f.write_str("global::")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name)?;
            if !segment.type_arguments.is_empty() {
                f.write_str("<")?;
                for (j, arg) in segment.type_arguments.iter().enumerate() {
                    if j > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn attribute(name: &str) -> AttributeSyntax {
        AttributeSyntax {
            target: None,
            name: name.to_string(),
            arguments: SmallVec::new(),
            span: Span::default(),
        }
    }

    #[test]
    fn test_attribute_candidate_spellings() {
        let ns = "ZBase.Foundation.Mvvm.ViewBinding";
        for written in [
            "BindingProperty",
            "BindingPropertyAttribute",
            "ZBase.Foundation.Mvvm.ViewBinding.BindingProperty",
            "global::ZBase.Foundation.Mvvm.ViewBinding.BindingPropertyAttribute",
        ] {
            assert!(attribute(written).is_candidate(ns, "BindingProperty"), "{written}");
        }
        assert!(!attribute("BindingCommand").is_candidate(ns, "BindingProperty"));
        assert!(!attribute("Other.BindingProperty").is_candidate(ns, "BindingProperty"));
    }

    #[test]
    fn test_metadata_name_includes_arity_and_nesting() {
        let decl = TypeDecl {
            keyword: TypeKeyword::Struct,
            name: "Inner".to_string(),
            type_parameters: vec!["T".to_string()],
            modifiers: smallvec![Modifier::Public],
            attributes: Vec::new(),
            base_list: Vec::new(),
            members: Vec::new(),
            scope: DeclScope {
                namespace: Some("Game.Ui".to_string()),
                usings: Vec::new(),
                containing_types: vec![ContainingType {
                    keyword: TypeKeyword::Class,
                    name: "Outer".to_string(),
                    type_parameters: Vec::new(),
                }],
            },
            span: Span::default(),
        };
        assert_eq!(decl.metadata_name(), "Game.Ui.Outer+Inner`1");
    }

    #[test]
    fn test_type_syntax_display() {
        let name = TypeSyntax::Named(NameSyntax {
            global: true,
            segments: smallvec![NameSegment {
                name: "IUnion".to_string(),
                type_arguments: vec![TypeSyntax::Predefined(PredefinedType::Int, Span::default())],
            }],
            span: Span::default(),
        });
        let array = TypeSyntax::Array { element: Box::new(name), rank: 2, span: Span::default() };
        assert_eq!(array.to_string(), "global::IUnion<int>[,]");
    }
}
