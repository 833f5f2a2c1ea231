//! Semantic symbols produced by a semantic model.

use crate::ast::{AttributeSyntax, Location, TypeSyntax};
use crate::types::{Accessibility, RefKind, TypeId, TypeKind};

/// A named, constructed, array or type-parameter type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSymbol {
    pub id: TypeId,
    /// Simple name, e.g. `IUnion`
    pub name: String,
    /// Fully-qualified display name, e.g. `global::ZBase.Foundation.Mvvm.Unions.IUnion<int>`
    pub full_name: String,
    /// Metadata name of the definition, e.g. ``ZBase.Foundation.Mvvm.Unions.IUnion`1``
    pub metadata_name: String,
    pub kind: TypeKind,
    pub type_parameters: Vec<String>,
    pub type_arguments: Vec<TypeId>,
    /// The unconstructed definition (`self.id` when not constructed)
    pub definition: TypeId,
    pub base_type: Option<TypeId>,
    /// Directly declared interfaces
    pub interfaces: Vec<TypeId>,
    pub members: Vec<MemberSymbol>,
    pub attributes: Vec<AttributeData>,
    /// Name of the assembly declaring the type
    pub assembly: String,
}

impl TypeSymbol {
    pub fn is_value_type(&self) -> bool {
        self.kind.is_value_type()
    }

    pub fn is_reference_type(&self) -> bool {
        self.kind.is_reference_type()
    }

    /// Whether the type has type parameters (constructed or not).
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn is_constructed(&self) -> bool {
        self.definition != self.id
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSymbol> {
        self.members.iter().filter_map(|m| match m {
            MemberSymbol::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodSymbol> {
        self.members.iter().filter_map(|m| match m {
            MemberSymbol::Method(method) => Some(method),
            _ => None,
        })
    }
}

/// A member of a named type.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberSymbol {
    Field(FieldSymbol),
    Method(MethodSymbol),
    Property(PropertySymbol),
}

impl MemberSymbol {
    pub fn name(&self) -> &str {
        match self {
            Self::Field(field) => &field.name,
            Self::Method(method) => &method.name,
            Self::Property(property) => &property.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSymbol {
    pub name: String,
    pub ty: Option<TypeId>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySymbol {
    pub name: String,
    pub ty: Option<TypeId>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSymbol {
    pub name: String,
    pub accessibility: Accessibility,
    /// Whether an access modifier was written on the declaration
    pub has_explicit_accessibility: bool,
    pub returns_void: bool,
    pub return_type: Option<TypeId>,
    pub parameters: Vec<ParameterSymbol>,
    /// Declared `partial` without a body
    pub is_partial_definition: bool,
    pub is_static: bool,
    /// Attributes that apply to the method itself
    pub attributes: Vec<AttributeData>,
    /// Every attribute written on the declaration, targeted ones included
    pub attribute_syntax: Vec<AttributeSyntax>,
    pub location: Location,
}

impl MethodSymbol {
    /// The attribute of the given class applied to this method, if any.
    pub fn attribute(&self, full_name: &str) -> Option<&AttributeData> {
        self.attributes.iter().find(|a| a.is(full_name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSymbol {
    pub name: String,
    pub ty: Option<TypeId>,
    pub ref_kind: RefKind,
    pub type_syntax: TypeSyntax,
}

/// An applied attribute with its bound class.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeData {
    pub class: Option<TypeId>,
    /// Fully-qualified name of the bound class
    pub class_name: Option<String>,
    pub syntax: AttributeSyntax,
}

impl AttributeData {
    pub fn is(&self, full_name: &str) -> bool {
        self.class_name.as_deref() == Some(full_name)
    }
}

/// Identity of a referenced assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyIdentity {
    pub name: String,
    pub version: String,
    pub culture: String,
    pub public_key_token: Option<String>,
}

impl AssemblyIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.0.0.0".to_string(),
            culture: "neutral".to_string(),
            public_key_token: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Display string, e.g. `UnityEngine, Version=0.0.0.0, Culture=neutral, PublicKeyToken=null`.
    pub fn display_name(&self) -> String {
        format!(
            "{}, Version={}, Culture={}, PublicKeyToken={}",
            self.name,
            self.version,
            self.culture,
            self.public_key_token.as_deref().unwrap_or("null"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_display_name() {
        let identity = AssemblyIdentity::new("UnityEngine").with_version("1.2.3.4");
        assert_eq!(
            identity.display_name(),
            "UnityEngine, Version=1.2.3.4, Culture=neutral, PublicKeyToken=null"
        );
    }
}
