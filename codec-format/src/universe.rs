// Codec - codec-format
// Module: User-Defined Type Universe
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Definitions of user-defined types, keyed by [`TypeId`].

use std::collections::HashMap;

use crate::types::{ContractKind, Type, TypeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMember {
    pub name: String,
    pub ty:   Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDefinition {
    pub id:                TypeId,
    pub type_name:         String,
    pub defining_contract: Option<String>,
    pub members:           Vec<StructMember>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub id:                TypeId,
    pub type_name:         String,
    pub defining_contract: Option<String>,
    pub options:           Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDefinition {
    pub id:        TypeId,
    pub type_name: String,
    pub kind:      ContractKind,
    pub payable:   bool,
}

/// A user-defined value type and the elementary type it wraps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTypeDefinition {
    pub id:         TypeId,
    pub type_name:  String,
    pub underlying: Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDefinedType {
    Struct(StructDefinition),
    Enum(EnumDefinition),
    Contract(ContractDefinition),
    ValueType(ValueTypeDefinition),
}

impl UserDefinedType {
    pub fn id(&self) -> &TypeId {
        match self {
            Self::Struct(definition) => &definition.id,
            Self::Enum(definition) => &definition.id,
            Self::Contract(definition) => &definition.id,
            Self::ValueType(definition) => &definition.id,
        }
    }
}

/// All user-defined types known to a decoding session
#[derive(Debug, Clone, Default)]
pub struct TypeUniverse {
    types: HashMap<TypeId, UserDefinedType>,
}

impl TypeUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, returning the one it replaced.
    pub fn insert(&mut self, definition: UserDefinedType) -> Option<UserDefinedType> {
        self.types.insert(definition.id().clone(), definition)
    }

    pub fn get(&self, id: &TypeId) -> Option<&UserDefinedType> {
        self.types.get(id)
    }

    pub fn struct_definition(&self, id: &TypeId) -> Option<&StructDefinition> {
        match self.types.get(id)? {
            UserDefinedType::Struct(definition) => Some(definition),
            _ => None,
        }
    }

    pub fn enum_definition(&self, id: &TypeId) -> Option<&EnumDefinition> {
        match self.types.get(id)? {
            UserDefinedType::Enum(definition) => Some(definition),
            _ => None,
        }
    }

    pub fn contract_definition(&self, id: &TypeId) -> Option<&ContractDefinition> {
        match self.types.get(id)? {
            UserDefinedType::Contract(definition) => Some(definition),
            _ => None,
        }
    }

    pub fn value_type_definition(&self, id: &TypeId) -> Option<&ValueTypeDefinition> {
        match self.types.get(id)? {
            UserDefinedType::ValueType(definition) => Some(definition),
            _ => None,
        }
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructDefinition> {
        self.types.values().filter_map(|definition| match definition {
            UserDefinedType::Struct(definition) => Some(definition),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<UserDefinedType> for TypeUniverse {
    fn from_iter<I: IntoIterator<Item = UserDefinedType>>(iter: I) -> Self {
        let mut universe = Self::new();
        for definition in iter {
            universe.insert(definition);
        }
        universe
    }
}
