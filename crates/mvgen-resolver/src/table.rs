//! Type arena.
//!
//! Every type the compilation knows about lives in one `Vec<TypeSymbol>`
//! indexed by [`TypeId`]. Constructed generic types and array types are
//! interned, so `List<int>` written twice in two files is one symbol.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use mvgen_core::{PredefinedType, TypeId, TypeKind, TypeSymbol};

/// Upper bound on nested type arguments; deeper expansions are left unbound.
const MAX_EXPANSION_DEPTH: usize = 16;

/// A bound type before interning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum TypeExpr {
    Symbol(TypeId),
    Constructed {
        definition: TypeId,
        arguments: Vec<TypeExpr>,
    },
    Array {
        element: Box<TypeExpr>,
        rank: u8,
    },
}

impl TypeExpr {
    /// The named symbol or generic definition this expression is built on.
    pub fn head(&self) -> Option<TypeId> {
        match self {
            Self::Symbol(id) => Some(*id),
            Self::Constructed { definition, .. } => Some(*definition),
            Self::Array { .. } => None,
        }
    }

    /// Replace type parameters according to `map`.
    fn substitute(&self, map: &FxHashMap<TypeId, TypeId>) -> TypeExpr {
        match self {
            Self::Symbol(id) => Self::Symbol(map.get(id).copied().unwrap_or(*id)),
            Self::Constructed { definition, arguments } => Self::Constructed {
                definition: *definition,
                arguments: arguments.iter().map(|a| a.substitute(map)).collect(),
            },
            Self::Array { element, rank } => Self::Array {
                element: Box::new(element.substitute(map)),
                rank: *rank,
            },
        }
    }
}

/// Declared base type and interfaces of a definition, kept unbound so that
/// constructed types can substitute their arguments.
#[derive(Debug, Clone, Default)]
pub(crate) struct BaseExprs {
    pub base_type: Option<TypeExpr>,
    pub interfaces: Vec<TypeExpr>,
}

#[derive(Debug, Default)]
pub(crate) struct TypeTable {
    pub symbols: Vec<TypeSymbol>,
    /// Definitions keyed by metadata name (`Ns.Outer+Inner`1`)
    pub by_metadata_name: FxHashMap<String, TypeId>,
    /// Type parameter symbols of each generic definition, in declaration order
    pub type_parameters: FxHashMap<TypeId, Vec<TypeId>>,
    pub bases: FxHashMap<TypeId, BaseExprs>,
    constructed: FxHashMap<(TypeId, SmallVec<[TypeId; 2]>), TypeId>,
    arrays: FxHashMap<(TypeId, u8), TypeId>,
    pending: Vec<TypeId>,
}

impl TypeTable {
    pub fn get(&self, id: TypeId) -> &TypeSymbol {
        &self.symbols[id.index()]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeSymbol {
        &mut self.symbols[id.index()]
    }

    pub fn next_id(&self) -> TypeId {
        TypeId(self.symbols.len() as u32)
    }

    pub fn push(&mut self, symbol: TypeSymbol) -> TypeId {
        let id = symbol.id;
        debug_assert_eq!(id, self.next_id());
        self.symbols.push(symbol);
        id
    }

    pub fn lookup(&self, metadata_name: &str) -> Option<TypeId> {
        self.by_metadata_name.get(metadata_name).copied()
    }

    pub fn predefined(&self, ty: PredefinedType) -> Option<TypeId> {
        self.lookup(ty.metadata_name())
    }

    /// Find an already interned type without creating anything.
    pub fn find(&self, expr: &TypeExpr) -> Option<TypeId> {
        match expr {
            TypeExpr::Symbol(id) => Some(*id),
            TypeExpr::Constructed { definition, arguments } => {
                let arguments = arguments
                    .iter()
                    .map(|a| self.find(a))
                    .collect::<Option<SmallVec<[TypeId; 2]>>>()?;
                self.constructed.get(&(*definition, arguments)).copied()
            }
            TypeExpr::Array { element, rank } => {
                let element = self.find(element)?;
                self.arrays.get(&(element, *rank)).copied()
            }
        }
    }

    /// Intern `expr`, completing the base types of any new constructed types.
    pub fn intern(&mut self, expr: &TypeExpr) -> Option<TypeId> {
        let id = self.intern_at_depth(expr, 0);
        self.complete_pending();
        id
    }

    fn intern_at_depth(&mut self, expr: &TypeExpr, depth: usize) -> Option<TypeId> {
        if depth > MAX_EXPANSION_DEPTH {
            return None;
        }
        match expr {
            TypeExpr::Symbol(id) => Some(*id),
            TypeExpr::Constructed { definition, arguments } => {
                let arguments = arguments
                    .iter()
                    .map(|a| self.intern_at_depth(a, depth + 1))
                    .collect::<Option<SmallVec<[TypeId; 2]>>>()?;
                let key = (*definition, arguments);
                if let Some(id) = self.constructed.get(&key) {
                    return Some(*id);
                }
                let id = self.construct(key.0, &key.1);
                self.constructed.insert(key, id);
                Some(id)
            }
            TypeExpr::Array { element, rank } => {
                let element = self.intern_at_depth(element, depth + 1)?;
                if let Some(id) = self.arrays.get(&(element, *rank)) {
                    return Some(*id);
                }
                let id = self.array_of(element, *rank);
                self.arrays.insert((element, *rank), id);
                Some(id)
            }
        }
    }

    fn construct(&mut self, definition: TypeId, arguments: &[TypeId]) -> TypeId {
        let def = self.get(definition);
        let mut full_name = generic_stem(&def.full_name, def.is_generic()).to_string();
        full_name.push('<');
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                full_name.push_str(", ");
            }
            full_name.push_str(&self.get(*arg).full_name);
        }
        full_name.push('>');

        let id = self.next_id();
        let symbol = TypeSymbol {
            id,
            name: def.name.clone(),
            full_name,
            metadata_name: def.metadata_name.clone(),
            kind: def.kind,
            type_parameters: def.type_parameters.clone(),
            type_arguments: arguments.to_vec(),
            definition,
            base_type: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            attributes: def.attributes.clone(),
            assembly: def.assembly.clone(),
        };
        self.push(symbol);
        self.pending.push(id);
        id
    }

    fn array_of(&mut self, element: TypeId, rank: u8) -> TypeId {
        let suffix = format!("[{}]", ",".repeat(rank.saturating_sub(1) as usize));
        let elem = self.get(element);
        let id = self.next_id();
        let symbol = TypeSymbol {
            id,
            name: format!("{}{suffix}", elem.name),
            full_name: format!("{}{suffix}", elem.full_name),
            metadata_name: format!("{}{suffix}", elem.metadata_name),
            kind: TypeKind::Array,
            type_parameters: Vec::new(),
            type_arguments: vec![element],
            definition: id,
            base_type: self.lookup("System.Array"),
            interfaces: Vec::new(),
            members: Vec::new(),
            attributes: Vec::new(),
            assembly: elem.assembly.clone(),
        };
        self.push(symbol)
    }

    /// Bind the substituted bases of constructed types created so far.
    fn complete_pending(&mut self) {
        while let Some(id) = self.pending.pop() {
            let symbol = self.get(id);
            let definition = symbol.definition;
            let Some(bases) = self.bases.get(&definition).cloned() else {
                continue;
            };

            let parameters = self.type_parameters.get(&definition).cloned().unwrap_or_default();
            let map: FxHashMap<TypeId, TypeId> = parameters
                .into_iter()
                .zip(symbol.type_arguments.iter().copied())
                .collect();

            let base_type = bases
                .base_type
                .as_ref()
                .and_then(|b| self.intern_at_depth(&b.substitute(&map), 1));
            let interfaces = bases
                .interfaces
                .iter()
                .filter_map(|i| self.intern_at_depth(&i.substitute(&map), 1))
                .collect();

            let symbol = self.get_mut(id);
            symbol.base_type = base_type;
            symbol.interfaces = interfaces;
        }
    }
}

/// `global::Ns.List<T>` → `global::Ns.List`.
fn generic_stem(full_name: &str, generic: bool) -> &str {
    if !generic {
        return full_name;
    }
    match full_name.rfind('<') {
        Some(index) => &full_name[..index],
        None => full_name,
    }
}
