// Codec - codec-format
// Module: Layout Sizing
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Static/dynamic sizing of ABI encodings and storage footprints.

use ethnum::U256;

use crate::{
    allocation::{AbiAllocations, StorageAllocations},
    conversion,
    errors::ErrorKind,
    limits::evm::{ADDRESS_SIZE, EXTERNAL_FUNCTION_SIZE, INTERNAL_FUNCTION_SIZE, WORD_SIZE},
    types::{FunctionVisibility, StructType, Type},
    universe::TypeUniverse,
};

/// Size of a type's ABI encoding.
///
/// For dynamic types `size` is the width of the head, one word holding
/// the offset to the tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbiSizeInfo {
    pub dynamic: bool,
    pub size:    usize,
}

impl AbiSizeInfo {
    const WORD: Self = Self {
        dynamic: false,
        size:    WORD_SIZE,
    };
    const DYNAMIC: Self = Self {
        dynamic: true,
        size:    WORD_SIZE,
    };

    const fn fixed(size: usize) -> Self {
        Self {
            dynamic: false,
            size,
        }
    }
}

/// Determines whether `ty` is dynamically encoded and its head size.
///
/// Structs are resolved through their ABI allocation; a missing allocation
/// yields `UserDefinedTypeNotFound`.
pub fn abi_size_info(ty: &Type, allocations: &AbiAllocations) -> Result<AbiSizeInfo, ErrorKind> {
    match ty {
        Type::Bool
        | Type::Uint { .. }
        | Type::Int { .. }
        | Type::Fixed { .. }
        | Type::Ufixed { .. }
        | Type::Address { .. }
        | Type::Contract(_)
        | Type::FixedBytes { .. }
        | Type::Enum(_)
        | Type::Function(_)
        | Type::UserDefinedValueType(_)
        | Type::Magic(_) => Ok(AbiSizeInfo::WORD),
        Type::Bytes { .. } | Type::String { .. } => Ok(AbiSizeInfo::DYNAMIC),
        // never ABI encoded
        Type::Mapping(_) => Ok(AbiSizeInfo::fixed(0)),
        Type::Array(array) => match array.length {
            None => Ok(AbiSizeInfo::DYNAMIC),
            Some(length) if length == U256::ZERO => Ok(AbiSizeInfo::fixed(0)),
            Some(length) => {
                let base = abi_size_info(&array.base, allocations)?;
                if base.dynamic {
                    return Ok(AbiSizeInfo::DYNAMIC);
                }
                conversion::to_usize(length)
                    .and_then(|count| count.checked_mul(base.size))
                    .map(AbiSizeInfo::fixed)
                    .ok_or(ErrorKind::OverlongArraysAndStrings {
                        length,
                        data_length: None,
                    })
            },
        },
        Type::Struct(structure) => {
            let allocation = allocations
                .get(&structure.id)
                .ok_or_else(|| ErrorKind::type_not_found(ty))?;
            Ok(if allocation.dynamic {
                AbiSizeInfo::DYNAMIC
            } else {
                AbiSizeInfo::fixed(allocation.length)
            })
        },
        Type::Tuple(members) => {
            let mut size = 0usize;
            for member in members {
                let info = abi_size_info(&member.ty, allocations)?;
                if info.dynamic {
                    return Ok(AbiSizeInfo::DYNAMIC);
                }
                size = size.checked_add(info.size).ok_or(ErrorKind::OverlongArraysAndStrings {
                    length:      conversion::from_usize(size),
                    data_length: None,
                })?;
            }
            Ok(AbiSizeInfo::fixed(size))
        },
    }
}

/// Storage footprint of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageLength {
    /// Packable into part of a slot
    Bytes(usize),
    /// Whole slots
    Words(U256),
}

/// Bytes used by an enum with `option_count` options.
pub fn enum_byte_width(option_count: usize) -> usize {
    let largest = option_count.saturating_sub(1);
    let bits = (usize::BITS - largest.leading_zeros()) as usize;
    bits.div_ceil(8).max(1)
}

/// Storage footprint of `ty`, resolving structs through `allocations`.
pub fn storage_size(
    ty: &Type,
    universe: &TypeUniverse,
    allocations: &StorageAllocations,
) -> Result<StorageLength, ErrorKind> {
    storage_size_with(ty, universe, &mut |structure: &StructType| {
        allocations
            .get(&structure.id)
            .map(|allocation| allocation.size)
            .ok_or_else(|| ErrorKind::type_not_found(&Type::Struct(structure.clone())))
    })
}

pub(crate) fn storage_size_with<E: From<ErrorKind>>(
    ty: &Type,
    universe: &TypeUniverse,
    struct_size: &mut dyn FnMut(&StructType) -> Result<StorageLength, E>,
) -> Result<StorageLength, E> {
    let one_word = StorageLength::Words(U256::ONE);
    let size = match ty {
        Type::Bool => StorageLength::Bytes(1),
        Type::Address { .. } | Type::Contract(_) => StorageLength::Bytes(ADDRESS_SIZE),
        Type::Uint { bits }
        | Type::Int { bits }
        | Type::Fixed { bits, .. }
        | Type::Ufixed { bits, .. } => StorageLength::Bytes(usize::from(*bits) / 8),
        Type::FixedBytes { length } => StorageLength::Bytes(usize::from(*length)),
        Type::Enum(enumeration) => {
            let definition = universe
                .enum_definition(&enumeration.id)
                .ok_or_else(|| ErrorKind::type_not_found(ty))?;
            StorageLength::Bytes(enum_byte_width(definition.options.len()))
        },
        Type::Function(function) => match function.visibility {
            FunctionVisibility::External => StorageLength::Bytes(EXTERNAL_FUNCTION_SIZE),
            FunctionVisibility::Internal => StorageLength::Bytes(INTERNAL_FUNCTION_SIZE),
        },
        Type::Bytes { .. } | Type::String { .. } | Type::Mapping(_) => one_word,
        Type::Array(array) => match array.length {
            None => one_word,
            Some(length) if length == U256::ZERO => StorageLength::Words(U256::ZERO),
            Some(length) => {
                let overlong = || ErrorKind::OverlongArraysAndStrings {
                    length,
                    data_length: None,
                };
                match storage_size_with(&array.base, universe, struct_size)? {
                    StorageLength::Bytes(bytes) => {
                        let per_word = conversion::from_usize((WORD_SIZE / bytes.max(1)).max(1));
                        let spill = if length % per_word == U256::ZERO {
                            U256::ZERO
                        } else {
                            U256::ONE
                        };
                        StorageLength::Words(length / per_word + spill)
                    },
                    StorageLength::Words(words) => {
                        StorageLength::Words(words.checked_mul(length).ok_or_else(overlong)?)
                    },
                }
            },
        },
        Type::Struct(structure) => return struct_size(structure),
        Type::UserDefinedValueType(value_type) => {
            let definition = universe
                .value_type_definition(&value_type.id)
                .ok_or_else(|| ErrorKind::type_not_found(ty))?;
            return storage_size_with(&definition.underlying, universe, struct_size);
        },
        // tuples never live in storage; one word per member
        Type::Tuple(members) => StorageLength::Words(conversion::from_usize(members.len())),
        Type::Magic(_) => StorageLength::Words(U256::ZERO),
    };
    Ok(size)
}
