//! The compilation-wide set of types that need a synthesized union.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use mvgen_core::{PredefinedType, SemanticModel, TypeId, TypeKind};

use crate::binder::references_ui_framework;
use crate::constants::UNION_TYPE;
use crate::model::TypeRef;
use crate::output::identifier;

/// A type that gets a union wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub symbol: TypeId,
    pub full_name: String,
    /// Identifier-safe form of the full name
    pub identifier: String,
}

impl UnionType {
    /// Name of the generated union struct.
    pub fn union_name(&self) -> String {
        format!("Union__{}", self.identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalUnionDeclaration {
    pub assembly_name: String,
    pub value_types: Vec<UnionType>,
    pub ref_types: Vec<UnionType>,
    pub references_ui_framework: bool,
}

impl InternalUnionDeclaration {
    /// Deduplicate the candidates by full name, drop the ignored and
    /// natively supported ones, and split the rest by kind.
    pub fn new(model: &dyn SemanticModel, candidates: &[TypeRef], ignored: &[TypeId]) -> Self {
        let ignored: FxHashSet<&str> = ignored.iter().map(|id| model.full_name(*id)).collect();

        let mut distinct: IndexMap<&str, TypeId> = IndexMap::new();
        for candidate in candidates {
            let Some(id) = candidate.symbol else {
                continue;
            };
            distinct.entry(model.full_name(id)).or_insert(id);
        }

        let mut value_types = Vec::new();
        let mut ref_types = Vec::new();
        for (full_name, id) in distinct {
            if ignored.contains(full_name) || !needs_union(model, id) {
                continue;
            }
            let union_type = UnionType {
                symbol: id,
                full_name: full_name.to_string(),
                identifier: identifier(full_name),
            };
            let kind = model.type_symbol(id).kind;
            if kind.is_value_type() {
                value_types.push(union_type);
            } else if kind.is_reference_type() {
                ref_types.push(union_type);
            }
        }

        Self {
            assembly_name: model.assembly_name().to_string(),
            value_types,
            ref_types,
            references_ui_framework: references_ui_framework(model),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value_types.is_empty() && self.ref_types.is_empty()
    }
}

/// Types the runtime union cannot already hold by itself.
fn needs_union(model: &dyn SemanticModel, id: TypeId) -> bool {
    let symbol = model.type_symbol(id);
    !matches!(symbol.kind, TypeKind::TypeParameter | TypeKind::Error)
        && symbol.full_name != UNION_TYPE
        && PredefinedType::from_keyword(&symbol.full_name).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvgen_resolver::{standard_references, unity_engine, Compilation};

    use crate::scanner::{scan_union_candidates, CandidateKind};
    use crate::semantic::{resolve_ignored_type, resolve_type_ref};

    fn declaration(source: &str) -> InternalUnionDeclaration {
        let compilation = Compilation::builder("Game.Ui")
            .references(standard_references())
            .reference(unity_engine())
            .source("Test.cs", source)
            .build()
            .unwrap();
        let candidates = scan_union_candidates(compilation.syntax_trees());
        let (structs, others): (Vec<_>, Vec<_>) =
            candidates.iter().partition(|c| c.kind == CandidateKind::Struct);
        let refs: Vec<TypeRef> = others.iter().filter_map(|c| resolve_type_ref(&compilation, c)).collect();
        let ignored: Vec<TypeId> = structs.iter().filter_map(|c| resolve_ignored_type(&compilation, c)).collect();
        InternalUnionDeclaration::new(&compilation, &refs, &ignored)
    }

    fn names(types: &[UnionType]) -> Vec<&str> {
        types.iter().map(|t| t.full_name.as_str()).collect()
    }

    #[test]
    fn test_partitions_by_kind_in_encounter_order() {
        let decl = declaration(
            r#"
            using System.Collections.Generic;
            using UnityEngine;
            using ZBase.Foundation.Mvvm.ComponentModel;
            using ZBase.Foundation.Mvvm.ViewBinding;
            namespace Game
            {
                public enum Mode { A, B }
                public partial class Vm : IObservableObject
                {
                    [ObservableProperty] private Vector3 _position;
                    [ObservableProperty] private List<int> _scores;
                    [ObservableProperty] private Mode _mode;
                    public Sprite Icon { get; set; }
                }
                public partial class B : MonoBinder<UnityEngine.UI.Image>
                {
                    [BindingProperty] private void SetPosition(Vector3 value) { }
                    [BindingProperty] private void SetSprite(Sprite sprite) { }
                    [BindingProperty] private void SetTint(int? tint) { }
                }
            }
            "#,
        );

        assert_eq!(decl.assembly_name, "Game.Ui");
        assert!(decl.references_ui_framework);
        assert_eq!(
            names(&decl.value_types),
            vec!["global::UnityEngine.Vector3", "global::Game.Mode", "global::System.Nullable<int>"]
        );
        assert_eq!(
            names(&decl.ref_types),
            vec!["global::System.Collections.Generic.List<int>", "global::UnityEngine.Sprite"]
        );
        assert_eq!(decl.value_types[0].union_name(), "Union__UnityEngine_Vector3");
    }

    #[test]
    fn test_skips_native_and_unresolved_types() {
        let decl = declaration(
            r#"
            using ZBase.Foundation.Mvvm.Unions;
            using ZBase.Foundation.Mvvm.ViewBinding;
            namespace Game
            {
                public partial class B<T> : MonoBinder<UnityEngine.UI.Text>
                {
                    [BindingProperty] private void SetInt(int value) { }
                    [BindingProperty] private void SetText(string value) { }
                    [BindingProperty] private void SetObject(object value) { }
                    [BindingProperty] private void SetUnion(Union value) { }
                    [BindingProperty] private void SetGeneric(T value) { }
                    [BindingProperty] private void SetMissing(Missing value) { }
                }
            }
            "#,
        );
        assert!(decl.is_empty());
    }

    #[test]
    fn test_hand_written_unions_are_ignored() {
        let decl = declaration(
            r#"
            using UnityEngine;
            using ZBase.Foundation.Mvvm.Unions;
            using ZBase.Foundation.Mvvm.ViewBinding;
            namespace Game
            {
                public struct ColorUnion : IUnion<Color> { }
                public struct SpriteUnion : IUnion<Sprite> { }

                public partial class B : MonoBinder<UnityEngine.UI.Image>
                {
                    [BindingProperty] private void SetColor(Color value) { }
                    [BindingProperty] private void SetSprite(Sprite value) { }
                    [BindingProperty] private void SetRect(Rect value) { }
                }
            }
            "#,
        );
        assert_eq!(names(&decl.value_types), vec!["global::UnityEngine.Rect"]);
        assert!(decl.ref_types.is_empty());
    }
}
