//! Small value types shared by syntax and symbols.

use std::fmt;

/// Index of a type symbol inside a semantic model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How an argument is passed to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefKind {
    #[default]
    None,
    In,
    Ref,
    Out,
}

impl RefKind {
    /// Keyword to write before the argument or parameter, with trailing space.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::In => "in ",
            Self::Ref => "ref ",
            Self::Out => "out ",
        }
    }

    /// Whether a parameter with this kind can receive a value (everything but `out`).
    pub fn accepts_value(&self) -> bool {
        matches!(self, Self::None | Self::In | Self::Ref)
    }
}

/// Classification of a type symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Array,
    TypeParameter,
    Error,
}

impl TypeKind {
    pub fn is_value_type(&self) -> bool {
        matches!(self, Self::Struct | Self::Enum)
    }

    pub fn is_reference_type(&self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Array)
    }
}

/// Declared accessibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accessibility {
    #[default]
    NotApplicable,
    Private,
    Protected,
    Internal,
    Public,
    ProtectedOrInternal,
    ProtectedAndInternal,
}

impl Accessibility {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::ProtectedOrInternal => "protected internal",
            Self::ProtectedAndInternal => "private protected",
            Self::NotApplicable => "",
        }
    }
}

/// The language's keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedType {
    Bool,
    Byte,
    SByte,
    Char,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Decimal,
    String,
    Object,
}

impl PredefinedType {
    pub const ALL: [PredefinedType; 15] = [
        Self::Bool,
        Self::Byte,
        Self::SByte,
        Self::Char,
        Self::Short,
        Self::UShort,
        Self::Int,
        Self::UInt,
        Self::Long,
        Self::ULong,
        Self::Float,
        Self::Double,
        Self::Decimal,
        Self::String,
        Self::Object,
    ];

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.keyword() == word)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::SByte => "sbyte",
            Self::Char => "char",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Object => "object",
        }
    }

    /// Metadata name of the underlying runtime type.
    pub fn metadata_name(&self) -> &'static str {
        match self {
            Self::Bool => "System.Boolean",
            Self::Byte => "System.Byte",
            Self::SByte => "System.SByte",
            Self::Char => "System.Char",
            Self::Short => "System.Int16",
            Self::UShort => "System.UInt16",
            Self::Int => "System.Int32",
            Self::UInt => "System.UInt32",
            Self::Long => "System.Int64",
            Self::ULong => "System.UInt64",
            Self::Float => "System.Single",
            Self::Double => "System.Double",
            Self::Decimal => "System.Decimal",
            Self::String => "System.String",
            Self::Object => "System.Object",
        }
    }

    pub fn from_metadata_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.metadata_name() == name)
    }
}

impl fmt::Display for PredefinedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_round_trip() {
        for ty in PredefinedType::ALL {
            assert_eq!(PredefinedType::from_keyword(ty.keyword()), Some(ty));
            assert_eq!(PredefinedType::from_metadata_name(ty.metadata_name()), Some(ty));
        }
        assert_eq!(PredefinedType::from_keyword("void"), None);
    }

    #[test]
    fn test_ref_kind_accepts_value() {
        assert!(RefKind::None.accepts_value());
        assert!(RefKind::In.accepts_value());
        assert!(RefKind::Ref.accepts_value());
        assert!(!RefKind::Out.accepts_value());
    }
}
