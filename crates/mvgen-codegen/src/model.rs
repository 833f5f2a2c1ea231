//! Resolved reference records shared by the generators.

use smallvec::SmallVec;

use mvgen_core::{MethodSymbol, ParameterSymbol, SemanticModel, TypeId, TypeSyntax};

/// One occurrence of a type in annotated source.
///
/// Many refs can resolve to the same type; consumers dedupe by
/// [`TypeRef::full_name`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub syntax: TypeSyntax,
    pub symbol: Option<TypeId>,
}

impl TypeRef {
    pub fn new(syntax: TypeSyntax, symbol: Option<TypeId>) -> Self {
        Self { syntax, symbol }
    }

    /// Fully-qualified name of the resolved type, or the type as written.
    pub fn full_name(&self, model: &dyn SemanticModel) -> String {
        match self.symbol {
            Some(id) => model.full_name(id).to_string(),
            None => self.syntax.to_string(),
        }
    }
}

/// An attribute to re-emit on a generated member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    /// Fully-qualified name of the attribute class
    pub type_full_name: String,
    /// Arguments as written
    pub arguments: SmallVec<[String; 2]>,
}

impl AttributeInfo {
    /// The attribute as it appears in generated source, brackets included.
    pub fn to_source(&self) -> String {
        if self.arguments.is_empty() {
            format!("[{}]", self.type_full_name)
        } else {
            format!("[{}({})]", self.type_full_name, self.arguments.join(", "))
        }
    }
}

/// An annotated single-parameter method that becomes a bindable property.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingPropertyRef {
    pub method: MethodSymbol,
    pub parameter: ParameterSymbol,
    /// Fully-qualified name of the parameter type
    pub parameter_type: String,
    pub is_parameter_not_union: bool,
    pub skip_binding_property: bool,
    pub skip_converter: bool,
    pub forwarded_field_attributes: Vec<AttributeInfo>,
}

/// An annotated partial void method that becomes a command endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingCommandRef {
    pub method: MethodSymbol,
    pub parameter: Option<ParameterSymbol>,
    /// Fully-qualified name of the parameter type, when there is a parameter
    pub parameter_type: Option<String>,
    pub skip_binding_command: bool,
    pub forwarded_field_attributes: Vec<AttributeInfo>,
}
