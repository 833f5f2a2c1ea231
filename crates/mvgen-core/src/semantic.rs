//! The query interface a host compilation offers to the generators.

use indexmap::IndexSet;

use crate::ast::{AttributeSyntax, SyntaxTree, TypeDecl, TypeSyntax};
use crate::symbols::{AssemblyIdentity, TypeSymbol};
use crate::types::TypeId;

/// Read-only view of one compilation snapshot.
///
/// Implementations must be immutable once built: every query is a pure
/// function of the snapshot, which is what lets the generators evaluate
/// candidates on several threads at once.
pub trait SemanticModel: Sync {
    /// Name of the assembly being compiled.
    fn assembly_name(&self) -> &str;

    /// Source trees of the compilation, in input order.
    fn syntax_trees(&self) -> &[SyntaxTree];

    /// Identities of every referenced assembly.
    fn referenced_assemblies(&self) -> &[AssemblyIdentity];

    /// Whether the compiled assembly carries an attribute of the given class.
    fn assembly_has_attribute(&self, full_name: &str) -> bool;

    fn type_symbol(&self, id: TypeId) -> &TypeSymbol;

    /// The symbol declared by a source type declaration.
    fn declared_type(&self, decl: &TypeDecl) -> Option<TypeId>;

    /// Bind a type written inside `context` to its symbol.
    fn bind_type(&self, context: &TypeDecl, syntax: &TypeSyntax) -> Option<TypeId>;

    /// Bind an attribute written inside `context` to its attribute class.
    fn bind_attribute(&self, context: &TypeDecl, attribute: &AttributeSyntax) -> Option<TypeId>;

    fn full_name(&self, id: TypeId) -> &str {
        &self.type_symbol(id).full_name
    }

    /// Every interface the type implements, directly or through its bases
    /// and other interfaces. Each interface appears once.
    fn all_interfaces(&self, id: TypeId) -> Vec<TypeId> {
        let mut seen = IndexSet::new();
        let mut visited_bases = IndexSet::new();
        let mut current = Some(id);

        while let Some(ty) = current {
            if !visited_bases.insert(ty) {
                break;
            }
            let symbol = self.type_symbol(ty);
            let mut stack: Vec<TypeId> = symbol.interfaces.iter().rev().copied().collect();
            while let Some(interface) = stack.pop() {
                if seen.insert(interface) {
                    let nested = &self.type_symbol(interface).interfaces;
                    stack.extend(nested.iter().rev().copied());
                }
            }
            current = symbol.base_type;
        }

        seen.into_iter().collect()
    }

    /// Whether the type implements the interface with the given full name.
    fn implements_interface(&self, id: TypeId, full_name: &str) -> bool {
        self.all_interfaces(id)
            .into_iter()
            .any(|interface| self.full_name(interface) == full_name)
    }
}
