// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Fixtures shared by the decoder integration tests.

#![allow(dead_code)]

use codec_decoder::prelude::*;
use codec_format::{
    conversion::u256_word,
    types::{EnumType, StructType, TypeId},
    universe::{EnumDefinition, StructDefinition, StructMember, UserDefinedType},
};

pub fn word(value: u128) -> Word {
    u256_word(U256::new(value))
}

/// `bytes` left aligned in a zeroed word
pub fn left_aligned(bytes: &[u8]) -> Word {
    let mut word = [0u8; 32];
    word[..bytes.len()].copy_from_slice(bytes);
    word
}

pub fn address_word(address: Address) -> Word {
    address.to_word()
}

pub fn concat(words: &[Word]) -> Vec<u8> {
    words.concat()
}

pub fn type_id(id: u64) -> TypeId {
    TypeId::new("compilation", id)
}

pub fn struct_type(id: u64, name: &str, location: DataLocation) -> Type {
    Type::Struct(StructType {
        id:        type_id(id),
        type_name: name.to_string(),
        location:  Some(location),
    })
}

pub fn struct_definition(id: u64, name: &str, members: Vec<(&str, Type)>) -> UserDefinedType {
    UserDefinedType::Struct(StructDefinition {
        id:                type_id(id),
        type_name:         name.to_string(),
        defining_contract: None,
        members:           members
            .into_iter()
            .map(|(name, ty)| StructMember {
                name: name.to_string(),
                ty,
            })
            .collect(),
    })
}

pub fn enum_type(id: u64, name: &str) -> Type {
    Type::Enum(EnumType {
        id:        type_id(id),
        type_name: name.to_string(),
    })
}

pub fn enum_definition(id: u64, name: &str, options: &[&str]) -> UserDefinedType {
    UserDefinedType::Enum(EnumDefinition {
        id:                type_id(id),
        type_name:         name.to_string(),
        defining_contract: None,
        options:           options.iter().map(|option| option.to_string()).collect(),
    })
}

/// Info over `state` with `definitions` and their computed layouts
pub fn info_with_types(state: EvmState, definitions: Vec<UserDefinedType>) -> ExecutionInfo {
    let universe: TypeUniverse = definitions.into_iter().collect();
    let allocations = Allocations::compute(&universe).unwrap();
    ExecutionInfo::new(state).with_types(universe, allocations)
}

pub fn decode_local(info: &ExecutionInfo, ty: &Type, pointer: Pointer) -> Decoded {
    Decoder::new(info).decode_local(ty, pointer, DecodeOptions::default()).unwrap()
}

pub fn uint_value(decoded: &Decoded) -> U256 {
    match decoded.as_value() {
        Some(Value::Uint { value, .. }) => *value,
        other => panic!("expected uint, got {other:?}"),
    }
}

pub fn string_value(decoded: &Decoded) -> String {
    match decoded.as_value() {
        Some(Value::String(codec_format::values::StringValue::Valid(text))) => text.clone(),
        other => panic!("expected string, got {other:?}"),
    }
}

pub fn elements(decoded: &Decoded) -> &[Decoded] {
    match decoded.as_value() {
        Some(Value::Array { elements, .. }) => elements,
        other => panic!("expected array, got {other:?}"),
    }
}

pub fn members(decoded: &Decoded) -> Vec<(Option<String>, Decoded)> {
    match decoded.as_value() {
        Some(Value::Struct { members, .. }) | Some(Value::Tuple(members)) | Some(Value::Magic(members)) => members
            .iter()
            .map(|member| (member.name.clone(), member.value.clone()))
            .collect(),
        other => panic!("expected members, got {other:?}"),
    }
}
