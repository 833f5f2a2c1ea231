//! Compilations.
//!
//! A [`Compilation`] owns the source syntax trees of one assembly together
//! with the symbols of everything it can see: its own declarations and the
//! declarations of its metadata references. Building happens in phases:
//!
//! 1. declare every type definition (partial declarations merge by metadata name)
//! 2. bind type-level attributes
//! 3. bind base lists, then intern them; constructed generics get substituted bases
//! 4. bind members (fields, properties, methods)
//! 5. bind `[assembly: ...]` attributes of the source trees
//!
//! Every type written in a declaration is interned while building, so
//! queries afterwards only ever look types up.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use mvgen_core::{
    Accessibility, AssemblyIdentity, AttributeData, AttributeSyntax, AttributeTarget, FieldSymbol,
    Location, MemberDecl, MemberSymbol, MethodDecl, MethodSymbol, Modifier, ParameterSymbol,
    PredefinedType, PropertySymbol, SemanticModel, SyntaxTree, TypeDecl, TypeId, TypeKeyword,
    TypeKind, TypeSymbol, TypeSyntax,
};

use crate::error::CompilationError;
use crate::lookup::{Lookup, LookupScope};
use crate::metadata::MetadataReference;
use crate::table::{BaseExprs, TypeExpr, TypeTable};

const OBJECT: &str = "System.Object";
const VALUE_TYPE: &str = "System.ValueType";
const ENUM: &str = "System.Enum";

enum Input {
    Tree(SyntaxTree),
    Source { path: String, text: String },
}

/// Collects the inputs of a [`Compilation`].
pub struct CompilationBuilder {
    assembly: String,
    references: Vec<MetadataReference>,
    inputs: Vec<Input>,
}

impl CompilationBuilder {
    pub fn reference(mut self, reference: MetadataReference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn references(mut self, references: impl IntoIterator<Item = MetadataReference>) -> Self {
        self.references.extend(references);
        self
    }

    /// Add an already parsed tree.
    pub fn tree(mut self, tree: SyntaxTree) -> Self {
        self.inputs.push(Input::Tree(tree));
        self
    }

    /// Add source text, parsed when the compilation is built.
    pub fn source(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.inputs.push(Input::Source {
            path: path.into(),
            text: text.into(),
        });
        self
    }

    pub fn build(self) -> Result<Compilation, CompilationError> {
        // A source that fails to parse is left out; the rest still compile
        let mut trees = Vec::with_capacity(self.inputs.len());
        let mut parse_errors = Vec::new();
        for input in self.inputs {
            match input {
                Input::Tree(tree) => trees.push(tree),
                Input::Source { path, text } => match mvgen_parser::parse(&path, &text) {
                    Ok(tree) => trees.push(tree),
                    Err(source) => {
                        let error = CompilationError::Parse { path, source };
                        warn!(%error, "skipping source");
                        parse_errors.push(error);
                    }
                },
            }
        }

        let reference_trees = self
            .references
            .iter()
            .map(|reference| {
                mvgen_parser::parse(&reference.display_path(), &reference.source).map_err(|source| {
                    CompilationError::Metadata {
                        assembly: reference.identity.name.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut table = TypeTable::default();
        let mut namespaces = FxHashSet::default();
        let mut entries = Vec::new();

        // Source declarations first: they shadow same-named metadata types
        for tree in &trees {
            declare_tree(&mut table, &mut namespaces, tree, &self.assembly, &mut entries);
        }
        for (reference, tree) in self.references.iter().zip(&reference_trees) {
            declare_tree(&mut table, &mut namespaces, tree, &reference.identity.name, &mut entries);
        }

        bind_type_attributes(&mut table, &namespaces, &entries);
        bind_bases(&mut table, &namespaces, &entries);
        bind_members(&mut table, &namespaces, &entries);
        let assembly_attributes = bind_assembly_attributes(&table, &namespaces, &trees);

        debug!(
            assembly = %self.assembly,
            trees = trees.len(),
            references = self.references.len(),
            types = table.symbols.len(),
            "built compilation"
        );

        Ok(Compilation {
            assembly: self.assembly,
            trees,
            references: self.references.into_iter().map(|r| r.identity).collect(),
            table,
            namespaces,
            assembly_attributes,
            parse_errors,
        })
    }
}

/// One assembly's declarations plus everything they reference.
pub struct Compilation {
    assembly: String,
    trees: Vec<SyntaxTree>,
    references: Vec<AssemblyIdentity>,
    table: TypeTable,
    namespaces: FxHashSet<String>,
    assembly_attributes: Vec<AttributeData>,
    parse_errors: Vec<CompilationError>,
}

impl Compilation {
    pub fn builder(assembly: impl Into<String>) -> CompilationBuilder {
        CompilationBuilder {
            assembly: assembly.into(),
            references: Vec::new(),
            inputs: Vec::new(),
        }
    }

    /// A type definition by metadata name, e.g. ``System.Collections.Generic.List`1``.
    pub fn type_by_metadata_name(&self, metadata_name: &str) -> Option<TypeId> {
        self.table.lookup(metadata_name)
    }

    pub fn assembly_attributes(&self) -> &[AttributeData] {
        &self.assembly_attributes
    }

    /// Sources left out of the compilation because they failed to parse.
    pub fn parse_errors(&self) -> &[CompilationError] {
        &self.parse_errors
    }

    fn lookup(&self) -> Lookup<'_> {
        Lookup::new(&self.table, &self.namespaces)
    }
}

impl SemanticModel for Compilation {
    fn assembly_name(&self) -> &str {
        &self.assembly
    }

    fn syntax_trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    fn referenced_assemblies(&self) -> &[AssemblyIdentity] {
        &self.references
    }

    fn assembly_has_attribute(&self, full_name: &str) -> bool {
        self.assembly_attributes.iter().any(|a| a.is(full_name))
    }

    fn type_symbol(&self, id: TypeId) -> &TypeSymbol {
        self.table.get(id)
    }

    fn declared_type(&self, decl: &TypeDecl) -> Option<TypeId> {
        self.table
            .lookup(&decl.metadata_name())
            .filter(|id| self.table.get(*id).assembly == self.assembly)
    }

    fn bind_type(&self, context: &TypeDecl, syntax: &TypeSyntax) -> Option<TypeId> {
        let scope = scope_for(&self.table, context);
        let expr = self.lookup().bind(&scope, syntax)?;
        self.table.find(&expr)
    }

    fn bind_attribute(&self, context: &TypeDecl, attribute: &AttributeSyntax) -> Option<TypeId> {
        let scope = scope_for(&self.table, context);
        self.lookup().bind_attribute(&scope, &attribute.name, attribute.span)
    }
}

/// A type declaration together with the symbol it contributes to.
struct DeclEntry<'t> {
    id: TypeId,
    decl: &'t TypeDecl,
    path: &'t Arc<str>,
}

fn declare_tree<'t>(
    table: &mut TypeTable,
    namespaces: &mut FxHashSet<String>,
    tree: &'t SyntaxTree,
    assembly: &str,
    entries: &mut Vec<DeclEntry<'t>>,
) {
    for decl in &tree.types {
        declare(table, namespaces, decl, &tree.path, assembly, entries);
    }
}

fn declare<'t>(
    table: &mut TypeTable,
    namespaces: &mut FxHashSet<String>,
    decl: &'t TypeDecl,
    path: &'t Arc<str>,
    assembly: &str,
    entries: &mut Vec<DeclEntry<'t>>,
) {
    if let Some(namespace) = &decl.scope.namespace {
        register_namespace(namespaces, namespace);
    }

    let metadata_name = decl.metadata_name();
    let id = match table.lookup(&metadata_name) {
        Some(existing) if table.get(existing).assembly == assembly => existing,
        Some(_) => {
            trace!(name = %metadata_name, assembly, "declaration shadowed by an earlier assembly");
            return;
        }
        None => define(table, decl, metadata_name, assembly),
    };
    entries.push(DeclEntry { id, decl, path });

    for member in &decl.members {
        if let MemberDecl::Type(nested) = member {
            declare(table, namespaces, nested, path, assembly, entries);
        }
    }
}

fn register_namespace(namespaces: &mut FxHashSet<String>, namespace: &str) {
    let mut end = namespace.len();
    loop {
        namespaces.insert(namespace[..end].to_string());
        match namespace[..end].rfind('.') {
            Some(dot) => end = dot,
            None => break,
        }
    }
}

fn define(table: &mut TypeTable, decl: &TypeDecl, metadata_name: String, assembly: &str) -> TypeId {
    let id = table.next_id();
    table.push(TypeSymbol {
        id,
        name: decl.name.clone(),
        full_name: definition_full_name(decl, &metadata_name),
        metadata_name: metadata_name.clone(),
        kind: type_kind(decl.keyword),
        type_parameters: decl.type_parameters.clone(),
        type_arguments: Vec::new(),
        definition: id,
        base_type: None,
        interfaces: Vec::new(),
        members: Vec::new(),
        attributes: Vec::new(),
        assembly: assembly.to_string(),
    });
    table.by_metadata_name.insert(metadata_name, id);

    if !decl.type_parameters.is_empty() {
        let mut parameters = Vec::with_capacity(decl.type_parameters.len());
        for name in &decl.type_parameters {
            let parameter = table.next_id();
            table.push(TypeSymbol {
                id: parameter,
                name: name.clone(),
                full_name: name.clone(),
                metadata_name: name.clone(),
                kind: TypeKind::TypeParameter,
                type_parameters: Vec::new(),
                type_arguments: Vec::new(),
                definition: parameter,
                base_type: None,
                interfaces: Vec::new(),
                members: Vec::new(),
                attributes: Vec::new(),
                assembly: assembly.to_string(),
            });
            parameters.push(parameter);
        }
        table.type_parameters.insert(id, parameters);
    }

    id
}

fn type_kind(keyword: TypeKeyword) -> TypeKind {
    match keyword {
        TypeKeyword::Class | TypeKeyword::Record => TypeKind::Class,
        TypeKeyword::Struct | TypeKeyword::RecordStruct => TypeKind::Struct,
        TypeKeyword::Interface => TypeKind::Interface,
        TypeKeyword::Enum => TypeKind::Enum,
    }
}

/// `global::Ns.Outer<T>.Inner`, or the keyword for predefined types.
fn definition_full_name(decl: &TypeDecl, metadata_name: &str) -> String {
    if let Some(predefined) = PredefinedType::from_metadata_name(metadata_name) {
        return predefined.keyword().to_string();
    }

    let mut name = String::from("global::");
    if let Some(namespace) = &decl.scope.namespace {
        name.push_str(namespace);
        name.push('.');
    }
    for outer in &decl.scope.containing_types {
        push_generic_name(&mut name, &outer.name, &outer.type_parameters);
        name.push('.');
    }
    push_generic_name(&mut name, &decl.name, &decl.type_parameters);
    name
}

fn push_generic_name(out: &mut String, name: &str, type_parameters: &[String]) {
    out.push_str(name);
    if !type_parameters.is_empty() {
        out.push('<');
        out.push_str(&type_parameters.join(", "));
        out.push('>');
    }
}

/// Lookup scope inside `decl`: the type itself, then its containing types.
fn scope_for<'d>(table: &TypeTable, decl: &'d TypeDecl) -> LookupScope<'d> {
    let mut containing: SmallVec<[TypeId; 4]> = SmallVec::new();
    let mut prefix = match &decl.scope.namespace {
        Some(namespace) => format!("{namespace}."),
        None => String::new(),
    };
    for outer in &decl.scope.containing_types {
        let mut name = format!("{prefix}{}", outer.name);
        if !outer.type_parameters.is_empty() {
            name.push_str(&format!("`{}", outer.type_parameters.len()));
        }
        if let Some(id) = table.lookup(&name) {
            containing.push(id);
        }
        prefix = format!("{name}+");
    }

    let mut types: SmallVec<[TypeId; 4]> = SmallVec::new();
    if let Some(id) = table.lookup(&decl.metadata_name()) {
        types.push(id);
    }
    types.extend(containing.into_iter().rev());

    LookupScope {
        namespace: decl.scope.namespace.as_deref(),
        usings: &decl.scope.usings,
        types,
    }
}

fn attribute_data(
    table: &TypeTable,
    lookup: &Lookup<'_>,
    scope: &LookupScope<'_>,
    syntax: &AttributeSyntax,
) -> AttributeData {
    let class = lookup.bind_attribute(scope, &syntax.name, syntax.span);
    AttributeData {
        class,
        class_name: class.map(|id| table.get(id).full_name.clone()),
        syntax: syntax.clone(),
    }
}

fn bind_type_attributes(table: &mut TypeTable, namespaces: &FxHashSet<String>, entries: &[DeclEntry<'_>]) {
    for entry in entries {
        let scope = scope_for(table, entry.decl);
        let lookup = Lookup::new(table, namespaces);
        let attributes: Vec<AttributeData> = entry
            .decl
            .attributes
            .iter()
            .filter(|a| matches!(a.target, None | Some(AttributeTarget::Type)))
            .map(|a| attribute_data(table, &lookup, &scope, a))
            .collect();
        table.get_mut(entry.id).attributes.extend(attributes);
    }
}

fn bind_bases(table: &mut TypeTable, namespaces: &FxHashSet<String>, entries: &[DeclEntry<'_>]) {
    let mut bases: IndexMap<TypeId, BaseExprs> = IndexMap::new();

    {
        let lookup = Lookup::new(table, namespaces);
        for entry in entries {
            let scope = scope_for(table, entry.decl);
            let exprs = bases.entry(entry.id).or_default();
            if entry.decl.keyword == TypeKeyword::Enum {
                continue;
            }

            for (index, syntax) in entry.decl.base_list.iter().enumerate() {
                let Some(expr) = lookup.bind(&scope, syntax) else {
                    trace!(base = %syntax, ty = %entry.decl.name, "unresolved base type");
                    continue;
                };
                let Some(kind) = expr.head().map(|head| table.get(head).kind) else {
                    continue;
                };
                let is_class = matches!(entry.decl.keyword, TypeKeyword::Class | TypeKeyword::Record);
                match kind {
                    TypeKind::Class if is_class && index == 0 => exprs.base_type = Some(expr),
                    TypeKind::Interface => {
                        if !exprs.interfaces.contains(&expr) {
                            exprs.interfaces.push(expr);
                        }
                    }
                    _ => {}
                }
            }
        }

        for (id, exprs) in bases.iter_mut() {
            if exprs.base_type.is_some() {
                continue;
            }
            let symbol = table.get(*id);
            let default = match symbol.kind {
                TypeKind::Class if symbol.metadata_name != OBJECT => table.lookup(OBJECT),
                TypeKind::Struct => table.lookup(VALUE_TYPE),
                TypeKind::Enum => table.lookup(ENUM),
                _ => None,
            };
            exprs.base_type = default.map(TypeExpr::Symbol);
        }
    }

    for (id, exprs) in &bases {
        table.bases.insert(*id, exprs.clone());
    }

    for (id, exprs) in bases {
        let base_type = exprs.base_type.as_ref().and_then(|expr| table.intern(expr));
        let interfaces = exprs
            .interfaces
            .iter()
            .filter_map(|expr| table.intern(expr))
            .collect();
        let symbol = table.get_mut(id);
        symbol.base_type = base_type;
        symbol.interfaces = interfaces;
    }
}

fn bind_and_intern(
    table: &mut TypeTable,
    namespaces: &FxHashSet<String>,
    scope: &LookupScope<'_>,
    syntax: &TypeSyntax,
) -> Option<TypeId> {
    let expr = Lookup::new(table, namespaces).bind(scope, syntax)?;
    table.intern(&expr)
}

fn bind_members(table: &mut TypeTable, namespaces: &FxHashSet<String>, entries: &[DeclEntry<'_>]) {
    // (member, is a partial method implementation)
    let mut members: IndexMap<TypeId, Vec<(MemberSymbol, bool)>> = IndexMap::new();

    for entry in entries {
        let scope = scope_for(table, entry.decl);
        let in_interface = entry.decl.keyword == TypeKeyword::Interface;
        let mut symbols = Vec::new();

        for member in &entry.decl.members {
            match member {
                MemberDecl::Field(field) => {
                    let ty = bind_and_intern(table, namespaces, &scope, &field.ty);
                    for variable in &field.variables {
                        symbols.push((
                            MemberSymbol::Field(FieldSymbol {
                                name: variable.name.clone(),
                                ty,
                                location: location(entry.path, variable.span),
                            }),
                            false,
                        ));
                    }
                }
                MemberDecl::Property(property) => {
                    let ty = bind_and_intern(table, namespaces, &scope, &property.ty);
                    symbols.push((
                        MemberSymbol::Property(PropertySymbol {
                            name: property.name.clone(),
                            ty,
                            location: location(entry.path, property.span),
                        }),
                        false,
                    ));
                }
                MemberDecl::Method(method) => {
                    let symbol = method_symbol(table, namespaces, &scope, method, entry.path, in_interface);
                    let partial_implementation = method.has_modifier(Modifier::Partial) && method.has_body;
                    symbols.push((MemberSymbol::Method(symbol), partial_implementation));
                }
                MemberDecl::Type(_) => {}
            }
        }

        members.entry(entry.id).or_default().extend(symbols);
    }

    for (id, list) in members {
        // A partial method with both parts is represented by its definition
        let definitions: FxHashSet<(String, usize)> = list
            .iter()
            .filter_map(|(member, _)| match member {
                MemberSymbol::Method(m) if m.is_partial_definition => {
                    Some((m.name.clone(), m.parameters.len()))
                }
                _ => None,
            })
            .collect();

        table.get_mut(id).members = list
            .into_iter()
            .filter(|(member, partial_implementation)| match member {
                MemberSymbol::Method(m) if *partial_implementation => {
                    !definitions.contains(&(m.name.clone(), m.parameters.len()))
                }
                _ => true,
            })
            .map(|(member, _)| member)
            .collect();
    }
}

fn method_symbol(
    table: &mut TypeTable,
    namespaces: &FxHashSet<String>,
    scope: &LookupScope<'_>,
    method: &MethodDecl,
    path: &Arc<str>,
    in_interface: bool,
) -> MethodSymbol {
    let return_type = bind_and_intern(table, namespaces, scope, &method.return_type);
    let parameters = method
        .parameters
        .iter()
        .map(|parameter| ParameterSymbol {
            name: parameter.name.clone(),
            ty: bind_and_intern(table, namespaces, scope, &parameter.ty),
            ref_kind: parameter.ref_kind,
            type_syntax: parameter.ty.clone(),
        })
        .collect();

    let lookup = Lookup::new(table, namespaces);
    let attributes = method
        .attributes
        .iter()
        .filter(|a| matches!(a.target, None | Some(AttributeTarget::Method)))
        .map(|a| attribute_data(table, &lookup, scope, a))
        .collect();

    MethodSymbol {
        name: method.name.clone(),
        accessibility: accessibility(method, in_interface),
        has_explicit_accessibility: [Modifier::Public, Modifier::Protected, Modifier::Internal, Modifier::Private]
            .into_iter()
            .any(|m| method.has_modifier(m)),
        returns_void: method.return_type.is_void(),
        return_type,
        parameters,
        is_partial_definition: method.has_modifier(Modifier::Partial) && !method.has_body,
        is_static: method.has_modifier(Modifier::Static),
        attributes,
        attribute_syntax: method.attributes.clone(),
        location: location(path, method.span),
    }
}

fn accessibility(method: &MethodDecl, in_interface: bool) -> Accessibility {
    let has = |m| method.has_modifier(m);
    match (
        has(Modifier::Public),
        has(Modifier::Protected),
        has(Modifier::Internal),
        has(Modifier::Private),
    ) {
        (true, ..) => Accessibility::Public,
        (_, true, true, _) => Accessibility::ProtectedOrInternal,
        (_, true, _, true) => Accessibility::ProtectedAndInternal,
        (_, true, ..) => Accessibility::Protected,
        (_, _, true, _) => Accessibility::Internal,
        _ if in_interface => Accessibility::Public,
        _ => Accessibility::Private,
    }
}

fn bind_assembly_attributes(
    table: &TypeTable,
    namespaces: &FxHashSet<String>,
    trees: &[SyntaxTree],
) -> Vec<AttributeData> {
    let lookup = Lookup::new(table, namespaces);
    trees
        .iter()
        .flat_map(|tree| {
            let scope = LookupScope {
                namespace: None,
                usings: &tree.usings,
                types: SmallVec::new(),
            };
            tree.assembly_attributes
                .iter()
                .filter(|a| a.target == Some(AttributeTarget::Assembly))
                .map(|a| attribute_data(table, &lookup, &scope, a))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn location(path: &Arc<str>, span: mvgen_core::Span) -> Location {
    Location {
        path: Arc::clone(path),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{standard_references, unity_engine};

    fn compile(source: &str) -> Compilation {
        Compilation::builder("Game")
            .references(standard_references())
            .reference(unity_engine())
            .source("Game.cs", source)
            .build()
            .unwrap()
    }

    fn declared<'c>(compilation: &'c Compilation, metadata_name: &str) -> &'c TypeSymbol {
        let id = compilation.type_by_metadata_name(metadata_name).unwrap();
        compilation.type_symbol(id)
    }

    const SOURCE: &str = r#"
using System.Collections.Generic;
using UnityEngine;
using ZBase.Foundation.Mvvm.ViewBinding;
using ZBase.Foundation.Mvvm.Unions;

[assembly: ZBase.Foundation.Mvvm.SkipGeneratorForAssembly]

namespace Game.Ui
{
    public interface IScore<T> : IUnion<T> { }

    public struct Score : IScore<int> { }

    public partial class HealthBinder : MonoBinder<RectTransform>
    {
        private BindingProperty _bindingFieldForSetValue;
        private List<Vector2> _points, _extra;

        public int Count { get; set; }

        [BindingProperty]
        [field: Label("Value")]
        private void SetValue(in float value) { }

        [BindingCommand]
        partial void OnClick();

        partial void OnClick() { }

        public class Nested
        {
            private Mode _mode;
            private Nested _self;
        }

        public enum Mode { On, Off }
    }
}
"#;

    #[test]
    fn test_declared_type_full_names() {
        let compilation = compile(SOURCE);
        let binder = declared(&compilation, "Game.Ui.HealthBinder");
        assert_eq!(binder.full_name, "global::Game.Ui.HealthBinder");
        assert_eq!(binder.kind, TypeKind::Class);
        assert_eq!(binder.assembly, "Game");

        let nested = declared(&compilation, "Game.Ui.HealthBinder+Nested");
        assert_eq!(nested.full_name, "global::Game.Ui.HealthBinder.Nested");

        let int = declared(&compilation, "System.Int32");
        assert_eq!(int.full_name, "int");
        assert!(int.is_value_type());
    }

    #[test]
    fn test_base_types_and_interfaces() {
        let compilation = compile(SOURCE);
        let binder = declared(&compilation, "Game.Ui.HealthBinder");
        let base = compilation.type_symbol(binder.base_type.unwrap());
        assert_eq!(
            base.full_name,
            "global::ZBase.Foundation.Mvvm.ViewBinding.MonoBinder<global::UnityEngine.RectTransform>"
        );
        assert!(compilation.implements_interface(binder.id, "global::ZBase.Foundation.Mvvm.ViewBinding.IBinder"));

        let mono_behaviour = compilation.type_symbol(base.base_type.unwrap());
        assert_eq!(mono_behaviour.full_name, "global::UnityEngine.MonoBehaviour");
    }

    #[test]
    fn test_generic_interfaces_are_substituted() {
        let compilation = compile(SOURCE);
        let score = declared(&compilation, "Game.Ui.Score");
        let interfaces: Vec<&str> = compilation
            .all_interfaces(score.id)
            .into_iter()
            .map(|id| compilation.full_name(id))
            .collect();
        assert_eq!(
            interfaces,
            vec![
                "global::Game.Ui.IScore<int>",
                "global::ZBase.Foundation.Mvvm.Unions.IUnion<int>",
            ]
        );
    }

    #[test]
    fn test_members() {
        let compilation = compile(SOURCE);
        let binder = declared(&compilation, "Game.Ui.HealthBinder");

        let fields: Vec<(&str, &str)> = binder
            .fields()
            .map(|f| (f.name.as_str(), compilation.full_name(f.ty.unwrap())))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("_bindingFieldForSetValue", "global::ZBase.Foundation.Mvvm.ViewBinding.BindingProperty"),
                ("_points", "global::System.Collections.Generic.List<global::UnityEngine.Vector2>"),
                ("_extra", "global::System.Collections.Generic.List<global::UnityEngine.Vector2>"),
            ]
        );

        let methods: Vec<&MethodSymbol> = binder.methods().collect();
        assert_eq!(methods.len(), 2);

        let set_value = methods[0];
        assert_eq!(set_value.accessibility, Accessibility::Private);
        assert!(set_value.returns_void);
        assert_eq!(set_value.parameters[0].ref_kind, mvgen_core::RefKind::In);
        assert_eq!(compilation.full_name(set_value.parameters[0].ty.unwrap()), "float");
        assert!(set_value
            .attribute("global::ZBase.Foundation.Mvvm.ViewBinding.BindingPropertyAttribute")
            .is_some());
        // field-targeted attributes are not method attributes
        assert_eq!(set_value.attributes.len(), 1);
        assert_eq!(set_value.attribute_syntax.len(), 2);

        let on_click = methods[1];
        assert_eq!(on_click.name, "OnClick");
        assert!(on_click.is_partial_definition);
    }

    #[test]
    fn test_nested_lookup() {
        let compilation = compile(SOURCE);
        let nested = declared(&compilation, "Game.Ui.HealthBinder+Nested");
        let types: Vec<&str> = nested.fields().map(|f| compilation.full_name(f.ty.unwrap())).collect();
        assert_eq!(
            types,
            vec!["global::Game.Ui.HealthBinder.Mode", "global::Game.Ui.HealthBinder.Nested"]
        );
    }

    #[test]
    fn test_assembly_attributes() {
        let compilation = compile(SOURCE);
        assert!(compilation.assembly_has_attribute("global::ZBase.Foundation.Mvvm.SkipGeneratorForAssemblyAttribute"));
        assert!(!compilation.assembly_has_attribute("global::System.ObsoleteAttribute"));
    }

    #[test]
    fn test_bind_type_query() {
        let compilation = compile(SOURCE);
        let tree = &compilation.syntax_trees()[0];
        let binder = &tree.types[2];
        assert_eq!(binder.name, "HealthBinder");

        let MemberDecl::Field(field) = &binder.members[1] else {
            panic!("expected field");
        };
        let id = compilation.bind_type(binder, &field.ty).unwrap();
        assert_eq!(compilation.full_name(id), "global::System.Collections.Generic.List<global::UnityEngine.Vector2>");
        assert_eq!(compilation.declared_type(binder), compilation.type_by_metadata_name("Game.Ui.HealthBinder"));

        let MemberDecl::Method(method) = &binder.members[3] else {
            panic!("expected method");
        };
        let label = compilation.bind_attribute(binder, &method.attributes[1]).unwrap();
        assert_eq!(compilation.full_name(label), "global::ZBase.Foundation.Mvvm.ViewBinding.LabelAttribute");
    }

    #[test]
    fn test_nullable_and_arrays() {
        let compilation = compile(
            "namespace N { class C { int? _a; string? _b; UnityEngine.Color[] _c; Missing _d; } }",
        );
        let c = declared(&compilation, "N.C");
        let types: Vec<Option<&str>> = c
            .fields()
            .map(|f| f.ty.map(|id| compilation.full_name(id)))
            .collect();
        assert_eq!(
            types,
            vec![
                Some("global::System.Nullable<int>"),
                Some("string"),
                Some("global::UnityEngine.Color[]"),
                None,
            ]
        );
    }

    #[test]
    fn test_referenced_assemblies() {
        let compilation = compile("class A { }");
        let names: Vec<String> = compilation
            .referenced_assemblies()
            .iter()
            .map(|a| a.display_name())
            .collect();
        assert!(names.iter().any(|n| n.starts_with("UnityEngine,")));
        assert_eq!(compilation.assembly_name(), "Game");
    }

    #[test]
    fn test_unparsable_source_is_skipped() {
        let compilation = Compilation::builder("Game")
            .references(standard_references())
            .source("Broken.cs", "class A {")
            .source("Good.cs", "namespace Game { public class B { } }")
            .build()
            .unwrap();

        assert_eq!(compilation.syntax_trees().len(), 1);
        assert!(compilation.type_by_metadata_name("Game.B").is_some());
        assert_eq!(compilation.parse_errors().len(), 1);
        assert!(compilation.parse_errors()[0].to_string().starts_with("Failed to parse Broken.cs"));
    }
}
