//! The declaration model of one binder class.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use mvgen_core::{
    Diagnostic, FieldSymbol, Location, MemberSymbol, MethodSymbol, ParameterSymbol, SemanticModel, SyntaxNode,
    TypeDecl, TypeId,
};

use super::{binding_command_field_name, binding_field_name, converter_field_name};
use crate::constants::{BINDING_COMMAND, BINDING_PROPERTY, CONVERTER, UNION_TYPE, UNITY_ASSEMBLY_PREFIX};
use crate::diagnostics::{INVALID_FIELD_ATTRIBUTE_ON_BINDING_COMMAND, INVALID_FIELD_ATTRIBUTE_ON_BINDING_PROPERTY};
use crate::error::{GeneratorError, Result};
use crate::forward::gather_forwarded_attributes;
use crate::model::{BindingCommandRef, BindingPropertyRef, TypeRef};
use crate::semantic::{is_binder_base, resolve_endpoint, Endpoint};

/// Everything the binder emitter needs for one class.
#[derive(Debug, Clone)]
pub struct BinderDeclaration<'a> {
    pub syntax: &'a TypeDecl,
    pub symbol: TypeId,
    pub full_name: String,
    /// The direct base class is itself a binder
    pub is_base_binder: bool,
    /// The compilation references the UI framework
    pub references_ui_framework: bool,
    pub binding_property_refs: Vec<BindingPropertyRef>,
    pub binding_command_refs: Vec<BindingCommandRef>,
    /// Non-union parameter types of the property endpoints, by full name
    pub non_union_types: IndexMap<String, TypeRef>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Names of hand-declared fields, by their exact field type.
#[derive(Debug, Default)]
struct DeclaredFields {
    binding_properties: FxHashSet<String>,
    converters: FxHashSet<String>,
    binding_commands: FxHashSet<String>,
}

impl DeclaredFields {
    fn record(&mut self, model: &dyn SemanticModel, field: &FieldSymbol) {
        let Some(ty) = field.ty else {
            return;
        };
        let set = match model.full_name(ty) {
            BINDING_PROPERTY => &mut self.binding_properties,
            CONVERTER => &mut self.converters,
            BINDING_COMMAND => &mut self.binding_commands,
            _ => return,
        };
        set.insert(field.name.clone());
    }
}

struct RawProperty<'m> {
    method: &'m MethodSymbol,
    parameter: &'m ParameterSymbol,
    parameter_type: String,
    is_not_union: bool,
}

struct RawCommand<'m> {
    method: &'m MethodSymbol,
    parameter: Option<&'m ParameterSymbol>,
    parameter_type: Option<String>,
}

impl<'a> BinderDeclaration<'a> {
    /// Build the model for the binder declared by `syntax`.
    ///
    /// Endpoints are collected first; skip flags and forwarded attributes
    /// are then computed into fresh refs.
    pub fn build(model: &'a dyn SemanticModel, syntax: &'a TypeDecl) -> Result<Self> {
        let symbol_id = model
            .declared_type(syntax)
            .ok_or_else(|| GeneratorError::MissingSymbol(syntax.metadata_name()))?;
        let symbol = model.type_symbol(symbol_id);

        let is_base_binder = symbol.base_type.map_or(false, |base| is_binder_base(model, base));

        let mut fields = DeclaredFields::default();
        let mut properties = Vec::new();
        let mut commands = Vec::new();
        let mut non_union_types = IndexMap::new();

        for member in &symbol.members {
            match member {
                MemberSymbol::Field(field) => fields.record(model, field),
                MemberSymbol::Method(method) => match resolve_endpoint(method) {
                    Some(Endpoint::Property(parameter)) => {
                        let parameter_type = parameter_type_name(model, parameter);
                        let is_not_union = parameter_type != UNION_TYPE;
                        if is_not_union {
                            non_union_types
                                .entry(parameter_type.clone())
                                .or_insert_with(|| TypeRef::new(parameter.type_syntax.clone(), parameter.ty));
                        }
                        properties.push(RawProperty { method, parameter, parameter_type, is_not_union });
                    }
                    Some(Endpoint::Command(parameter)) => commands.push(RawCommand {
                        method,
                        parameter,
                        parameter_type: parameter.map(|p| parameter_type_name(model, p)),
                    }),
                    None => {}
                },
                MemberSymbol::Property(_) => {}
            }
        }

        let parts = declaration_parts(model, symbol_id);
        let context_of = |location: &Location| -> &'a TypeDecl {
            parts
                .iter()
                .find(|(path, decl)| {
                    **path == *location.path
                        && decl.span.start <= location.span.start
                        && location.span.end <= decl.span.end
                })
                .map_or(syntax, |(_, decl)| *decl)
        };

        let mut diagnostics = Vec::new();

        let binding_property_refs = properties
            .into_iter()
            .map(|raw| {
                let forwarded = gather_forwarded_attributes(
                    model,
                    context_of(&raw.method.location),
                    raw.method,
                    &INVALID_FIELD_ATTRIBUTE_ON_BINDING_PROPERTY,
                );
                diagnostics.extend(forwarded.diagnostics);
                BindingPropertyRef {
                    skip_binding_property: fields.binding_properties.contains(&binding_field_name(&raw.method.name)),
                    skip_converter: fields.converters.contains(&converter_field_name(&raw.method.name)),
                    method: raw.method.clone(),
                    parameter: raw.parameter.clone(),
                    parameter_type: raw.parameter_type,
                    is_parameter_not_union: raw.is_not_union,
                    forwarded_field_attributes: forwarded.field,
                }
            })
            .collect();

        let binding_command_refs = commands
            .into_iter()
            .map(|raw| {
                let forwarded = gather_forwarded_attributes(
                    model,
                    context_of(&raw.method.location),
                    raw.method,
                    &INVALID_FIELD_ATTRIBUTE_ON_BINDING_COMMAND,
                );
                diagnostics.extend(forwarded.diagnostics);
                BindingCommandRef {
                    skip_binding_command: fields
                        .binding_commands
                        .contains(&binding_command_field_name(&raw.method.name)),
                    method: raw.method.clone(),
                    parameter: raw.parameter.cloned(),
                    parameter_type: raw.parameter_type,
                    forwarded_field_attributes: forwarded.field,
                }
            })
            .collect();

        Ok(Self {
            syntax,
            symbol: symbol_id,
            full_name: symbol.full_name.clone(),
            is_base_binder,
            references_ui_framework: references_ui_framework(model),
            binding_property_refs,
            binding_command_refs,
            non_union_types,
            diagnostics,
        })
    }
}

/// Whether any referenced assembly is the UI framework.
pub fn references_ui_framework(model: &dyn SemanticModel) -> bool {
    model
        .referenced_assemblies()
        .iter()
        .any(|identity| identity.display_name().starts_with(UNITY_ASSEMBLY_PREFIX))
}

fn parameter_type_name(model: &dyn SemanticModel, parameter: &ParameterSymbol) -> String {
    TypeRef::new(parameter.type_syntax.clone(), parameter.ty).full_name(model)
}

/// Every partial declaration of `id`, with the path of its tree.
fn declaration_parts(model: &dyn SemanticModel, id: TypeId) -> Vec<(&str, &TypeDecl)> {
    model
        .syntax_trees()
        .iter()
        .flat_map(|tree| {
            tree.descendant_nodes().into_iter().filter_map(move |node| match node {
                SyntaxNode::Type(decl) => Some((&*tree.path, decl)),
                _ => None,
            })
        })
        .filter(|(_, decl)| model.declared_type(decl) == Some(id))
        .collect()
}
