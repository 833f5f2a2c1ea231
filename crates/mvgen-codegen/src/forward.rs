//! Attributes written on an endpoint method for its generated members.
//!
//! `[field: X]` on a binding method is re-emitted on the backing field the
//! generator creates for it. `[property: X]` is collected the same way.

use mvgen_core::{AttributeTarget, Diagnostic, DiagnosticDescriptor, Location, MethodSymbol, SemanticModel, TypeDecl};

use crate::model::AttributeInfo;

/// Attributes gathered from one method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForwardedAttributes {
    pub field: Vec<AttributeInfo>,
    pub property: Vec<AttributeInfo>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Bind every `field:`/`property:` attribute on `method` inside `context`.
///
/// An attribute whose class does not resolve is reported with `descriptor`
/// at the attribute and left out; the others are kept in source order.
pub fn gather_forwarded_attributes(
    model: &dyn SemanticModel,
    context: &TypeDecl,
    method: &MethodSymbol,
    descriptor: &'static DiagnosticDescriptor,
) -> ForwardedAttributes {
    let mut forwarded = ForwardedAttributes::default();

    for attribute in &method.attribute_syntax {
        let target = match attribute.target {
            Some(AttributeTarget::Field) => &mut forwarded.field,
            Some(AttributeTarget::Property) => &mut forwarded.property,
            _ => continue,
        };

        match model.bind_attribute(context, attribute) {
            Some(class) => target.push(AttributeInfo {
                type_full_name: model.full_name(class).to_string(),
                arguments: attribute.arguments.clone(),
            }),
            None => {
                let location = Location {
                    path: method.location.path.clone(),
                    span: attribute.span,
                };
                forwarded
                    .diagnostics
                    .push(Diagnostic::create(descriptor, Some(location), &[&method.name, &attribute.name]));
            }
        }
    }

    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvgen_resolver::{standard_references, unity_engine, Compilation};

    use crate::diagnostics::INVALID_FIELD_ATTRIBUTE_ON_BINDING_PROPERTY;

    #[test]
    fn test_field_and_property_targets() {
        let compilation = Compilation::builder("Game")
            .references(standard_references())
            .reference(unity_engine())
            .source(
                "TextBinder.cs",
                r#"
                using UnityEngine;
                using ZBase.Foundation.Mvvm.ViewBinding;
                namespace Game
                {
                    public partial class TextBinder : MonoBinder<UnityEngine.UI.Text>
                    {
                        [BindingProperty]
                        [field: HideInInspector]
                        [field: Label("Text", "Color")]
                        [property: Tooltip("shown")]
                        [field: DoesNotExist]
                        [Obsolete]
                        private void SetText(string value) { }
                    }
                }
                "#,
            )
            .build()
            .unwrap();

        let decl = &compilation.syntax_trees()[0].types[0];
        let id = compilation.declared_type(decl).unwrap();
        let method = compilation.type_symbol(id).methods().find(|m| m.name == "SetText").unwrap();

        let forwarded =
            gather_forwarded_attributes(&compilation, decl, method, &INVALID_FIELD_ATTRIBUTE_ON_BINDING_PROPERTY);

        let field: Vec<String> = forwarded.field.iter().map(AttributeInfo::to_source).collect();
        assert_eq!(
            field,
            vec![
                "[global::UnityEngine.HideInInspector]".to_string(),
                "[global::ZBase.Foundation.Mvvm.ViewBinding.LabelAttribute(\"Text\", \"Color\")]".to_string(),
            ]
        );
        assert_eq!(forwarded.property.len(), 1);
        assert_eq!(forwarded.property[0].type_full_name, "global::UnityEngine.TooltipAttribute");

        assert_eq!(forwarded.diagnostics.len(), 1);
        let diagnostic = &forwarded.diagnostics[0];
        assert_eq!(diagnostic.code(), "MVGEN0001");
        assert!(diagnostic.message.contains("'SetText'"));
        assert!(diagnostic.message.contains("'DoesNotExist'"));
        let location = diagnostic.location.as_ref().unwrap();
        assert_eq!(&*location.path, "TextBinder.cs");
        assert_eq!(location.span.line, 12);
    }
}
