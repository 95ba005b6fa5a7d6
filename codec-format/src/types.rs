// Codec - codec-format
// Module: Type Model
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The closed type model consumed by the decoder.
//!
//! Struct, enum, contract and user-defined value types are identified by a
//! [`TypeId`] scoped to a compilation; their definitions live in the
//! [`TypeUniverse`](crate::universe::TypeUniverse).

use core::fmt;

use ethnum::U256;

/// Identity of a user-defined type: compilation id plus numeric id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId {
    pub compilation_id: String,
    pub id:             u64,
}

impl TypeId {
    pub fn new(compilation_id: impl Into<String>, id: u64) -> Self {
        Self {
            compilation_id: compilation_id.into(),
            id,
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.compilation_id, self.id)
    }
}

/// Data location qualifier carried by reference types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataLocation {
    Memory,
    Storage,
    Calldata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    Internal,
    Private,
    Public,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContractKind {
    Contract,
    Library,
    Interface,
}

/// Environment globals exposed as magic variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MagicVariable {
    Message,
    Transaction,
    Block,
}

/// A contract type; native contracts carry an id, foreign ones only a name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractType {
    pub id:        Option<TypeId>,
    pub type_name: String,
    pub kind:      ContractKind,
    pub payable:   bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructType {
    pub id:        TypeId,
    pub type_name: String,
    pub location:  Option<DataLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub id:        TypeId,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserDefinedValueType {
    pub id:        TypeId,
    pub type_name: String,
}

/// Array type; `length` is present for statically sized arrays
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    pub base:     Box<Type>,
    pub length:   Option<U256>,
    pub location: Option<DataLocation>,
}

impl ArrayType {
    pub fn is_dynamic(&self) -> bool {
        self.length.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingType {
    pub key:      Box<Type>,
    pub value:    Box<Type>,
    pub location: Option<DataLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleMember {
    pub name: Option<String>,
    pub ty:   Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionVisibility {
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub visibility: FunctionVisibility,
    pub mutability: Mutability,
    pub inputs:     Vec<Type>,
    pub outputs:    Vec<Type>,
}

/// Shape of a value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Uint { bits: u16 },
    Int { bits: u16 },
    Fixed { bits: u16, places: u8 },
    Ufixed { bits: u16, places: u8 },
    Address { payable: bool },
    Contract(ContractType),
    /// `bytesN`
    FixedBytes { length: u8 },
    /// Dynamically sized `bytes`
    Bytes { location: Option<DataLocation> },
    String { location: Option<DataLocation> },
    Array(ArrayType),
    Mapping(MappingType),
    Struct(StructType),
    Tuple(Vec<TupleMember>),
    Enum(EnumType),
    Function(FunctionType),
    UserDefinedValueType(UserDefinedValueType),
    Magic(MagicVariable),
}

impl Type {
    pub fn uint(bits: u16) -> Self {
        Self::Uint { bits }
    }

    pub fn int(bits: u16) -> Self {
        Self::Int { bits }
    }

    pub fn string(location: DataLocation) -> Self {
        Self::String {
            location: Some(location),
        }
    }

    pub fn bytes(location: DataLocation) -> Self {
        Self::Bytes {
            location: Some(location),
        }
    }

    pub fn dynamic_array(base: Type, location: DataLocation) -> Self {
        Self::Array(ArrayType {
            base:     Box::new(base),
            length:   None,
            location: Some(location),
        })
    }

    pub fn static_array(base: Type, length: u64, location: DataLocation) -> Self {
        Self::Array(ArrayType {
            base:     Box::new(base),
            length:   Some(U256::from(length)),
            location: Some(location),
        })
    }

    pub fn tuple(members: impl IntoIterator<Item = Type>) -> Self {
        Self::Tuple(
            members
                .into_iter()
                .map(|ty| TupleMember { name: None, ty })
                .collect(),
        )
    }

    /// Types whose values live behind a location qualifier
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Self::Bytes { .. } | Self::String { .. } | Self::Array(_) | Self::Mapping(_) | Self::Struct(_)
        )
    }

    pub fn location(&self) -> Option<DataLocation> {
        match self {
            Self::Bytes { location } | Self::String { location } => *location,
            Self::Array(array) => array.location,
            Self::Mapping(mapping) => mapping.location,
            Self::Struct(structure) => structure.location,
            _ => None,
        }
    }

    /// Copy of this type with its location qualifier replaced.
    ///
    /// Only reference types carry a location; other types are returned as is.
    /// The change is shallow: members pick up a location when decoded.
    #[must_use]
    pub fn with_location(&self, location: Option<DataLocation>) -> Self {
        match self {
            Self::Bytes { .. } => Self::Bytes { location },
            Self::String { .. } => Self::String { location },
            Self::Array(array) => Self::Array(ArrayType {
                location,
                ..array.clone()
            }),
            Self::Mapping(mapping) => Self::Mapping(MappingType {
                location,
                ..mapping.clone()
            }),
            Self::Struct(structure) => Self::Struct(StructType {
                location,
                ..structure.clone()
            }),
            other => other.clone(),
        }
    }

    /// Short name of the type class, used in logs
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Uint { .. } => "uint",
            Self::Int { .. } => "int",
            Self::Fixed { .. } => "fixed",
            Self::Ufixed { .. } => "ufixed",
            Self::Address { .. } => "address",
            Self::Contract(_) => "contract",
            Self::FixedBytes { .. } | Self::Bytes { .. } => "bytes",
            Self::String { .. } => "string",
            Self::Array(_) => "array",
            Self::Mapping(_) => "mapping",
            Self::Struct(_) => "struct",
            Self::Tuple(_) => "tuple",
            Self::Enum(_) => "enum",
            Self::Function(_) => "function",
            Self::UserDefinedValueType(_) => "userDefinedValueType",
            Self::Magic(_) => "magic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_location_is_shallow() {
        let nested = Type::dynamic_array(Type::string(DataLocation::Storage), DataLocation::Storage);
        let moved = nested.with_location(Some(DataLocation::Memory));
        let Type::Array(array) = moved else {
            panic!("expected array");
        };
        assert_eq!(array.location, Some(DataLocation::Memory));
        assert_eq!(array.base.location(), Some(DataLocation::Storage));
    }

    #[test]
    fn test_value_types_ignore_location() {
        assert_eq!(Type::uint(8).with_location(Some(DataLocation::Memory)), Type::uint(8));
        assert!(!Type::Bool.is_reference());
        assert!(Type::bytes(DataLocation::Calldata).is_reference());
        assert!(!Type::FixedBytes { length: 4 }.is_reference());
    }
}
