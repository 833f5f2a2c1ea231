//! Syntactic candidate selection.
//!
//! Every predicate here looks at one node's own syntax only, so nodes can be
//! tested in any order and on any thread. The marker that made a node a
//! candidate is recorded once, as a [`Marker`] tag, and later stages never
//! look at attribute syntax again to recover it.

use mvgen_core::{has_attribute_candidate, AttributeSyntax, SyntaxNode, SyntaxTree, TypeDecl, TypeKeyword};

use crate::constants::markers;

/// Marker attributes the scanner recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    ObservableProperty,
    RelayCommand,
    BindingProperty,
    BindingCommand,
}

impl Marker {
    /// Markers that make a single-parameter method a candidate, in check order.
    pub const METHOD_MARKERS: [Marker; 3] = [Self::RelayCommand, Self::BindingProperty, Self::BindingCommand];

    pub fn namespace(&self) -> &'static str {
        match self {
            Self::ObservableProperty => markers::COMPONENT_MODEL_NAMESPACE,
            Self::RelayCommand => markers::INPUT_NAMESPACE,
            Self::BindingProperty | Self::BindingCommand => markers::VIEW_BINDING_NAMESPACE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ObservableProperty => markers::OBSERVABLE_PROPERTY,
            Self::RelayCommand => markers::RELAY_COMMAND,
            Self::BindingProperty => markers::BINDING_PROPERTY,
            Self::BindingCommand => markers::BINDING_COMMAND,
        }
    }

    pub fn is_present(&self, attributes: &[AttributeSyntax]) -> bool {
        has_attribute_candidate(attributes, self.namespace(), self.name())
    }
}

/// Coarse classification of a candidate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// A field carrying the observable-property marker
    Field(Marker),
    /// A single-parameter method carrying a command or binding marker
    Method(Marker),
    /// A property of a class with a base list
    Property,
    /// A struct with a base list, possibly a hand-written union
    Struct,
}

/// A node that passed the syntactic filter.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub node: SyntaxNode<'a>,
    pub kind: CandidateKind,
}

/// Classify a node for the union generator.
pub fn classify(node: SyntaxNode<'_>) -> Option<CandidateKind> {
    match node {
        SyntaxNode::Field { decl, .. } => Marker::ObservableProperty
            .is_present(&decl.attributes)
            .then_some(CandidateKind::Field(Marker::ObservableProperty)),
        SyntaxNode::Method { decl, .. } => {
            if decl.parameters.len() != 1 {
                return None;
            }
            Marker::METHOD_MARKERS
                .into_iter()
                .find(|marker| marker.is_present(&decl.attributes))
                .map(CandidateKind::Method)
        }
        SyntaxNode::Property { parent, .. } => {
            is_class_with_bases(parent).then_some(CandidateKind::Property)
        }
        SyntaxNode::Type(decl) => is_struct_with_bases(decl).then_some(CandidateKind::Struct),
    }
}

pub fn is_syntax_match(node: SyntaxNode<'_>) -> bool {
    classify(node).is_some()
}

fn is_class_with_bases(decl: &TypeDecl) -> bool {
    matches!(decl.keyword, TypeKeyword::Class | TypeKeyword::Record) && !decl.base_list.is_empty()
}

fn is_struct_with_bases(decl: &TypeDecl) -> bool {
    matches!(decl.keyword, TypeKeyword::Struct | TypeKeyword::RecordStruct) && !decl.base_list.is_empty()
}

/// A class with a base list and at least one binding-marked method.
pub fn is_binder_syntax_match(node: SyntaxNode<'_>) -> bool {
    let SyntaxNode::Type(decl) = node else {
        return false;
    };
    matches!(decl.keyword, TypeKeyword::Class | TypeKeyword::Record)
        && !decl.base_list.is_empty()
        && decl.methods().any(|method| {
            Marker::BindingProperty.is_present(&method.attributes)
                || Marker::BindingCommand.is_present(&method.attributes)
        })
}

/// Union-generator candidates of every tree, in document order.
pub fn scan_union_candidates(trees: &[SyntaxTree]) -> Vec<Candidate<'_>> {
    trees
        .iter()
        .flat_map(SyntaxTree::descendant_nodes)
        .filter_map(|node| classify(node).map(|kind| Candidate { node, kind }))
        .collect()
}

/// Binder class candidates of every tree, in document order.
pub fn scan_binder_candidates(trees: &[SyntaxTree]) -> Vec<&TypeDecl> {
    trees
        .iter()
        .flat_map(SyntaxTree::descendant_nodes)
        .filter(|node| is_binder_syntax_match(*node))
        .filter_map(|node| match node {
            SyntaxNode::Type(decl) => Some(decl),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(source: &str) -> SyntaxTree {
        mvgen_parser::parse("Test.cs", source).unwrap()
    }

    fn kinds(source: &str) -> Vec<CandidateKind> {
        let trees = vec![tree(source)];
        scan_union_candidates(&trees).into_iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_observable_field() {
        let found = kinds(
            r#"
            partial class Vm : ObservableObject
            {
                [ObservableProperty] private int _health;
                [ZBase.Foundation.Mvvm.ComponentModel.ObservablePropertyAttribute] private string _name;
                private float _speed;
            }
            "#,
        );
        assert_eq!(
            found,
            vec![
                CandidateKind::Field(Marker::ObservableProperty),
                CandidateKind::Field(Marker::ObservableProperty),
            ]
        );
    }

    #[test]
    fn test_method_needs_one_parameter() {
        let found = kinds(
            r#"
            class Binder
            {
                [BindingProperty] void SetText(string value) { }
                [BindingProperty] void SetBoth(string a, string b) { }
                [BindingCommand] partial void OnClick();
                [RelayCommand] void Heal(int amount) { }
                [global::ZBase.Foundation.Mvvm.ViewBinding.BindingCommand] partial void OnPick(int index);
            }
            "#,
        );
        assert_eq!(
            found,
            vec![
                CandidateKind::Method(Marker::BindingProperty),
                CandidateKind::Method(Marker::RelayCommand),
                CandidateKind::Method(Marker::BindingCommand),
            ]
        );
    }

    #[test]
    fn test_property_needs_class_with_base_list() {
        let found = kinds(
            r#"
            class Plain { public int A { get; set; } }
            class Derived : Base { public int B { get; set; } }
            struct Value : IObservableObject { public int C { get; set; } }
            interface IView : IObservableObject { int D { get; } }
            "#,
        );
        assert_eq!(found, vec![CandidateKind::Property, CandidateKind::Struct]);
    }

    #[test]
    fn test_struct_needs_base_list() {
        let found = kinds(
            r#"
            struct Plain { }
            struct Wrapped : IUnion<Plain> { }
            class NotAStruct : IUnion<Plain> { }
            "#,
        );
        assert_eq!(found, vec![CandidateKind::Struct]);
    }

    #[test]
    fn test_match_is_per_node() {
        let tree = tree(
            r#"
            class Vm : IObservableObject
            {
                [ObservableProperty] int _hp;
                int _mp;
            }
            "#,
        );
        let matches: Vec<bool> = tree.descendant_nodes().into_iter().map(is_syntax_match).collect();
        assert_eq!(matches, vec![false, true, false]);
    }

    #[test]
    fn test_unrelated_attribute_is_ignored() {
        let found = kinds("class A { [Obsolete] void Run(int x) { } [SerializeField] int _x; }");
        assert!(found.is_empty());
    }

    #[test]
    fn test_binder_syntax_match() {
        let trees = vec![tree(
            r#"
            partial class TextBinder : MonoBinder<Text>
            {
                [BindingProperty] void SetText(string value) { }
            }
            partial class NoBase
            {
                [BindingProperty] void SetText(string value) { }
            }
            partial class NoMarkers : MonoBinder<Text>
            {
                void SetText(string value) { }
            }
            partial class ButtonBinder : MonoBinder<Button>
            {
                [BindingCommand] partial void OnClick();
            }
            "#,
        )];
        let names: Vec<&str> = scan_binder_candidates(&trees).iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["TextBinder", "ButtonBinder"]);
    }

    #[test]
    fn test_nested_types_are_scanned() {
        let found = kinds(
            r#"
            class Outer
            {
                struct Inner : IUnion<int> { }
                class Vm { [ObservableProperty] int _value; }
            }
            "#,
        );
        assert_eq!(
            found,
            vec![CandidateKind::Struct, CandidateKind::Field(Marker::ObservableProperty)]
        );
    }
}
