//! Semantic refinement of syntactic candidates.
//!
//! Every entry point first checks that the compilation has not opted out
//! of generation. Candidates that fail a semantic constraint are dropped
//! without a diagnostic.

use mvgen_core::{MethodSymbol, ParameterSymbol, SemanticModel, SyntaxNode, TypeDecl, TypeId, TypeKeyword, TypeKind};

use crate::constants::{
    BINDING_COMMAND_ATTRIBUTE, BINDING_PROPERTY_ATTRIBUTE, IBINDER, IOBSERVABLE_OBJECT, IUNION_T,
    SKIP_GENERATOR_ATTRIBUTE,
};
use crate::model::TypeRef;
use crate::scanner::{Candidate, CandidateKind};

/// Whether generation is enabled for the compilation.
pub fn is_valid_compilation(model: &dyn SemanticModel) -> bool {
    !model.assembly_has_attribute(SKIP_GENERATOR_ATTRIBUTE)
}

/// Whether any base of `decl` is, implements, or lists `interface`.
///
/// Bases are tried in declaration order; for each one the exact name, then
/// transitive implementation, then its interface lists are checked.
pub fn does_semantic_match(model: &dyn SemanticModel, decl: &TypeDecl, interface: &str) -> bool {
    decl.base_list.iter().any(|base| {
        let Some(id) = model.bind_type(decl, base) else {
            return false;
        };
        if model.full_name(id) == interface || model.implements_interface(id, interface) {
            return true;
        }
        let symbol = model.type_symbol(id);
        symbol.interfaces.iter().any(|i| model.full_name(*i) == interface)
            || model.all_interfaces(id).iter().any(|i| model.full_name(*i) == interface)
    })
}

/// Resolve a union-generator candidate to the type it contributes.
pub fn resolve_type_ref(model: &dyn SemanticModel, candidate: &Candidate<'_>) -> Option<TypeRef> {
    if !is_valid_compilation(model) {
        return None;
    }

    match (candidate.kind, candidate.node) {
        (CandidateKind::Field(_), SyntaxNode::Field { decl, parent }) => {
            Some(TypeRef::new(decl.ty.clone(), model.bind_type(parent, &decl.ty)))
        }
        (CandidateKind::Method(_), SyntaxNode::Method { decl, parent }) => {
            let parameter = decl.parameters.first()?;
            Some(TypeRef::new(parameter.ty.clone(), model.bind_type(parent, &parameter.ty)))
        }
        (CandidateKind::Property, SyntaxNode::Property { decl, parent }) => {
            (is_class(parent) && does_semantic_match(model, parent, IOBSERVABLE_OBJECT))
                .then(|| TypeRef::new(decl.ty.clone(), model.bind_type(parent, &decl.ty)))
        }
        _ => None,
    }
}

fn is_class(decl: &TypeDecl) -> bool {
    matches!(decl.keyword, TypeKeyword::Class | TypeKeyword::Record)
}

/// The `T` of a hand-written union struct implementing `IUnion<T>`.
///
/// Direct bases are checked first, then each base's declared interfaces,
/// then its transitive interfaces.
pub fn resolve_ignored_type(model: &dyn SemanticModel, candidate: &Candidate<'_>) -> Option<TypeId> {
    if !is_valid_compilation(model) {
        return None;
    }
    let (CandidateKind::Struct, SyntaxNode::Type(decl)) = (candidate.kind, candidate.node) else {
        return None;
    };

    for base in &decl.base_list {
        let Some(id) = model.bind_type(decl, base) else {
            continue;
        };
        if let Some(argument) = union_argument(model, id) {
            return Some(argument);
        }
        let direct = &model.type_symbol(id).interfaces;
        if let Some(argument) = direct.iter().find_map(|i| union_argument(model, *i)) {
            return Some(argument);
        }
        if let Some(argument) = model.all_interfaces(id).into_iter().find_map(|i| union_argument(model, i)) {
            return Some(argument);
        }
    }
    None
}

fn union_argument(model: &dyn SemanticModel, id: TypeId) -> Option<TypeId> {
    let symbol = model.type_symbol(id);
    if symbol.type_parameters.len() == 1 && symbol.full_name.starts_with(IUNION_T) {
        symbol.type_arguments.first().copied()
    } else {
        None
    }
}

/// Whether a binder candidate class implements the binder capability.
pub fn is_binder_class(model: &dyn SemanticModel, decl: &TypeDecl) -> bool {
    is_valid_compilation(model) && does_semantic_match(model, decl, IBINDER)
}

/// Whether `id` is a class that itself implements the binder capability.
pub fn is_binder_base(model: &dyn SemanticModel, id: TypeId) -> bool {
    model.type_symbol(id).kind == TypeKind::Class && model.implements_interface(id, IBINDER)
}

/// How a binder method takes part in binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint<'m> {
    Property(&'m ParameterSymbol),
    Command(Option<&'m ParameterSymbol>),
}

/// Classify a binder method as a property or command endpoint.
///
/// A binding property takes exactly one parameter that is not `out`. A
/// binding command is a partial definition returning void with at most
/// one parameter, which is not `out`. A method marked as a property but
/// with another arity is still considered as a command.
pub fn resolve_endpoint(method: &MethodSymbol) -> Option<Endpoint<'_>> {
    if let (Some(_), [parameter]) = (method.attribute(BINDING_PROPERTY_ATTRIBUTE), method.parameters.as_slice()) {
        return parameter.ref_kind.accepts_value().then_some(Endpoint::Property(parameter));
    }

    if method.attribute(BINDING_COMMAND_ATTRIBUTE).is_some()
        && method.is_partial_definition
        && method.returns_void
    {
        return match method.parameters.as_slice() {
            [] => Some(Endpoint::Command(None)),
            [parameter] if parameter.ref_kind.accepts_value() => Some(Endpoint::Command(Some(parameter))),
            _ => None,
        };
    }

    None
}
