//! Name lookup.
//!
//! Binding is split in two: lookup here turns syntax into a [`TypeExpr`]
//! using only immutable tables, and the caller decides whether to intern
//! the result (while building) or merely find it (when answering queries).

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use mvgen_core::{NameSegment, NameSyntax, Span, TypeId, TypeKind, TypeSyntax};

use crate::table::{TypeExpr, TypeTable};

const NULLABLE: &str = "System.Nullable`1";
const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// What a name is looked up against.
#[derive(Debug, Clone, Default)]
pub(crate) struct LookupScope<'s> {
    /// Enclosing namespace, dotted
    pub namespace: Option<&'s str>,
    /// Visible `using` namespaces
    pub usings: &'s [String],
    /// Enclosing type definitions, innermost first
    pub types: SmallVec<[TypeId; 4]>,
}

/// A partially resolved qualified name.
enum Resolved {
    Namespace(String),
    Type(TypeExpr),
}

pub(crate) struct Lookup<'t> {
    table: &'t TypeTable,
    namespaces: &'t FxHashSet<String>,
}

impl<'t> Lookup<'t> {
    pub fn new(table: &'t TypeTable, namespaces: &'t FxHashSet<String>) -> Self {
        Self { table, namespaces }
    }

    /// Bind a type as written. `void` binds to nothing.
    pub fn bind(&self, scope: &LookupScope<'_>, syntax: &TypeSyntax) -> Option<TypeExpr> {
        match syntax {
            TypeSyntax::Void(_) => None,
            TypeSyntax::Predefined(ty, _) => self.table.predefined(*ty).map(TypeExpr::Symbol),
            TypeSyntax::Named(name) => self.bind_name(scope, name),
            TypeSyntax::Array { element, rank, .. } => Some(TypeExpr::Array {
                element: Box::new(self.bind(scope, element)?),
                rank: *rank,
            }),
            TypeSyntax::Nullable { inner, .. } => {
                let inner = self.bind(scope, inner)?;
                if !self.is_value_type(&inner) {
                    return Some(inner);
                }
                match self.table.lookup(NULLABLE) {
                    Some(definition) => Some(TypeExpr::Constructed {
                        definition,
                        arguments: vec![inner],
                    }),
                    None => Some(inner),
                }
            }
        }
    }

    /// Bind an attribute name: `Name` + `Attribute` first, then `Name` itself.
    pub fn bind_attribute(&self, scope: &LookupScope<'_>, written: &str, span: Span) -> Option<TypeId> {
        let name = attribute_name_syntax(written, span)?;

        let mut suffixed = name.clone();
        if let Some(last) = suffixed.segments.last_mut() {
            last.name.push_str(ATTRIBUTE_SUFFIX);
        }

        [suffixed, name]
            .iter()
            .filter_map(|candidate| match self.bind_name(scope, candidate)? {
                TypeExpr::Symbol(id) => Some(id),
                _ => None,
            })
            .find(|id| self.table.get(*id).kind == TypeKind::Class)
    }

    fn is_value_type(&self, expr: &TypeExpr) -> bool {
        match expr {
            TypeExpr::Symbol(id) => self.table.get(*id).is_value_type(),
            TypeExpr::Constructed { definition, .. } => self.table.get(*definition).is_value_type(),
            TypeExpr::Array { .. } => false,
        }
    }

    fn bind_name(&self, scope: &LookupScope<'_>, name: &NameSyntax) -> Option<TypeExpr> {
        let (mut current, rest) = if name.global {
            (Resolved::Namespace(String::new()), &name.segments[..])
        } else {
            let (head, rest) = name.segments.split_first()?;
            (self.resolve_head(scope, head)?, rest)
        };

        for segment in rest {
            current = self.resolve_member(scope, &current, segment)?;
        }

        match current {
            Resolved::Type(expr) => Some(expr),
            Resolved::Namespace(_) => None,
        }
    }

    /// First segment of an unqualified name: a type in scope, else a namespace.
    fn resolve_head(&self, scope: &LookupScope<'_>, segment: &NameSegment) -> Option<Resolved> {
        let arity = segment.type_arguments.len();
        if let Some(id) = self.find_simple_type(scope, &segment.name, arity) {
            return self.apply_arguments(scope, id, segment).map(Resolved::Type);
        }

        namespace_chain(scope.namespace)
            .map(|ns| join(ns, &segment.name))
            .find(|candidate| self.namespaces.contains(candidate))
            .map(Resolved::Namespace)
    }

    fn resolve_member(
        &self,
        scope: &LookupScope<'_>,
        current: &Resolved,
        segment: &NameSegment,
    ) -> Option<Resolved> {
        let arity = segment.type_arguments.len();
        match current {
            Resolved::Namespace(ns) => {
                let qualified = join(ns, &segment.name);
                if let Some(id) = self.table.lookup(&with_arity(&qualified, arity)) {
                    return self.apply_arguments(scope, id, segment).map(Resolved::Type);
                }
                self.namespaces
                    .contains(&qualified)
                    .then_some(Resolved::Namespace(qualified))
            }
            Resolved::Type(expr) => {
                let owner = match expr {
                    TypeExpr::Symbol(id) => *id,
                    TypeExpr::Constructed { definition, .. } => *definition,
                    TypeExpr::Array { .. } => return None,
                };
                let id = self.find_nested(owner, &segment.name, arity)?;
                self.apply_arguments(scope, id, segment).map(Resolved::Type)
            }
        }
    }

    fn apply_arguments(
        &self,
        scope: &LookupScope<'_>,
        definition: TypeId,
        segment: &NameSegment,
    ) -> Option<TypeExpr> {
        if segment.type_arguments.is_empty() {
            return Some(TypeExpr::Symbol(definition));
        }
        let arguments = segment
            .type_arguments
            .iter()
            .map(|a| self.bind(scope, a))
            .collect::<Option<Vec<_>>>()?;
        Some(TypeExpr::Constructed { definition, arguments })
    }

    /// Simple name lookup: type parameters, nested types, enclosing
    /// namespaces (innermost first), then `using` namespaces.
    fn find_simple_type(&self, scope: &LookupScope<'_>, name: &str, arity: usize) -> Option<TypeId> {
        if arity == 0 {
            for ty in &scope.types {
                let parameters = self.table.type_parameters.get(ty).into_iter().flatten();
                for parameter in parameters {
                    if self.table.get(*parameter).name == name {
                        return Some(*parameter);
                    }
                }
            }
        }

        for ty in &scope.types {
            if let Some(id) = self.find_nested(*ty, name, arity) {
                return Some(id);
            }
        }

        let simple = with_arity(name, arity);
        namespace_chain(scope.namespace)
            .chain(scope.usings.iter().map(String::as_str))
            .find_map(|ns| self.table.lookup(&join(ns, &simple)))
    }

    /// A nested type of `owner` or of one of its base classes.
    fn find_nested(&self, owner: TypeId, name: &str, arity: usize) -> Option<TypeId> {
        let mut visited = FxHashSet::default();
        let mut current = Some(owner);
        while let Some(ty) = current {
            if !visited.insert(ty) {
                break;
            }
            let symbol = self.table.get(self.table.get(ty).definition);
            let nested = format!("{}+{}", symbol.metadata_name, with_arity(name, arity));
            if let Some(id) = self.table.lookup(&nested) {
                return Some(id);
            }
            current = symbol.base_type;
        }
        None
    }
}

/// `A.B.C` → `A.B.C`, `A.B`, `A`, then the global namespace (`""`).
fn namespace_chain(namespace: Option<&str>) -> impl Iterator<Item = &str> {
    let mut next = namespace;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        match next {
            Some(ns) => {
                next = ns.rfind('.').map(|i| &ns[..i]);
                Some(ns)
            }
            None => {
                done = true;
                Some("")
            }
        }
    })
}

fn join(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

fn with_arity(name: &str, arity: usize) -> String {
    if arity == 0 {
        name.to_string()
    } else {
        format!("{name}`{arity}")
    }
}

/// Attribute names are kept as text; turn one back into a name.
fn attribute_name_syntax(written: &str, span: Span) -> Option<NameSyntax> {
    let (global, rest) = match written.strip_prefix("global::") {
        Some(rest) => (true, rest),
        None => (false, written),
    };
    let segments: SmallVec<[NameSegment; 2]> = rest
        .split('.')
        .map(|part| NameSegment { name: part.trim().to_string(), type_arguments: Vec::new() })
        .collect();
    if segments.iter().any(|s| s.name.is_empty()) {
        return None;
    }
    Some(NameSyntax { global, segments, span })
}
