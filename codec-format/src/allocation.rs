// Codec - codec-format
// Module: Allocation Tables
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Per-struct member layouts for the ABI, memory and storage regions.
//!
//! Hosts normally supply these tables; [`Allocations::compute`] derives them
//! from a type universe using the standard layout rules.

use std::collections::{HashMap, HashSet};

use codec_error::{codes, Error, Result};
use ethnum::U256;

use crate::{
    layout::{self, StorageLength},
    limits::evm::WORD_SIZE,
    pointer::{ByteRange, Slot, StoragePosition, StorageRange},
    types::{StructType, Type, TypeId},
    universe::{StructDefinition, TypeUniverse},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAllocation<P> {
    pub name:    String,
    pub ty:      Type,
    pub pointer: P,
}

/// ABI layout; member ranges are relative to the struct start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiAllocation {
    pub members: Vec<MemberAllocation<ByteRange>>,
    /// Head length in bytes
    pub length:  usize,
    pub dynamic: bool,
}

/// Memory layout; one word per member, mappings omitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryAllocation {
    pub members: Vec<MemberAllocation<ByteRange>>,
}

/// Storage layout; member slots are offsets from the struct's first slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAllocation {
    pub members: Vec<MemberAllocation<StorageRange>>,
    pub size:    StorageLength,
}

pub type AbiAllocations = HashMap<TypeId, AbiAllocation>;
pub type MemoryAllocations = HashMap<TypeId, MemoryAllocation>;
pub type StorageAllocations = HashMap<TypeId, StorageAllocation>;

#[derive(Debug, Clone, Default)]
pub struct Allocations {
    pub abi:     AbiAllocations,
    pub memory:  MemoryAllocations,
    pub storage: StorageAllocations,
}

impl Allocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays out every struct in `universe`.
    ///
    /// Structs that cannot be ABI encoded (self-referential through a static
    /// path, or containing unresolvable members) get no ABI entry. A struct
    /// that contains itself in storage is an error.
    pub fn compute(universe: &TypeUniverse) -> Result<Self> {
        let mut allocations = Self::default();
        for definition in universe.structs() {
            allocations
                .memory
                .insert(definition.id.clone(), allocate_memory(definition));
            allocate_abi(&definition.id, universe, &mut allocations.abi, &mut HashSet::new());
            allocate_storage(definition, universe, &mut allocations.storage, &mut HashSet::new())?;
        }
        Ok(allocations)
    }
}

fn allocate_memory(definition: &StructDefinition) -> MemoryAllocation {
    let members = definition
        .members
        .iter()
        .filter(|member| !matches!(member.ty, Type::Mapping(_)))
        .enumerate()
        .map(|(position, member)| MemberAllocation {
            name:    member.name.clone(),
            ty:      member.ty.clone(),
            pointer: ByteRange::new(position * WORD_SIZE, WORD_SIZE),
        })
        .collect();
    MemoryAllocation { members }
}

fn nested_structs<'a>(ty: &'a Type, found: &mut Vec<&'a StructType>) {
    match ty {
        Type::Struct(structure) => found.push(structure),
        Type::Array(array) => nested_structs(&array.base, found),
        Type::Tuple(members) => {
            for member in members {
                nested_structs(&member.ty, found);
            }
        },
        _ => {},
    }
}

fn allocate_abi(
    id: &TypeId,
    universe: &TypeUniverse,
    abi: &mut AbiAllocations,
    visiting: &mut HashSet<TypeId>,
) -> bool {
    if abi.contains_key(id) {
        return true;
    }
    let Some(definition) = universe.struct_definition(id) else {
        return false;
    };
    if !visiting.insert(id.clone()) {
        return false;
    }

    let mut dependencies = Vec::new();
    for member in &definition.members {
        nested_structs(&member.ty, &mut dependencies);
    }
    for dependency in dependencies {
        if !visiting.contains(&dependency.id) {
            allocate_abi(&dependency.id, universe, abi, visiting);
        }
    }

    let mut members = Vec::with_capacity(definition.members.len());
    let mut position = 0usize;
    let mut dynamic = false;
    for member in &definition.members {
        if matches!(member.ty, Type::Mapping(_)) {
            continue;
        }
        let Ok(info) = layout::abi_size_info(&member.ty, abi) else {
            visiting.remove(id);
            return false;
        };
        members.push(MemberAllocation {
            name:    member.name.clone(),
            ty:      member.ty.clone(),
            pointer: ByteRange::new(position, info.size),
        });
        let Some(next) = position.checked_add(info.size) else {
            visiting.remove(id);
            return false;
        };
        position = next;
        dynamic |= info.dynamic;
    }

    abi.insert(id.clone(), AbiAllocation {
        members,
        length: position,
        dynamic,
    });
    visiting.remove(id);
    true
}

fn allocate_storage(
    definition: &StructDefinition,
    universe: &TypeUniverse,
    storage: &mut StorageAllocations,
    visiting: &mut HashSet<TypeId>,
) -> Result<StorageLength> {
    if let Some(existing) = storage.get(&definition.id) {
        return Ok(existing.size);
    }
    if !visiting.insert(definition.id.clone()) {
        return Err(Error::allocation_error(
            codes::RECURSIVE_ALLOCATION,
            "Struct contains itself in storage",
        ));
    }

    let mut members = Vec::with_capacity(definition.members.len());
    // slot being filled and the bytes still free in it
    let mut offset = U256::ZERO;
    let mut free = WORD_SIZE;
    for member in &definition.members {
        let size = layout::storage_size_with(&member.ty, universe, &mut |structure: &StructType| {
            let nested = universe
                .struct_definition(&structure.id)
                .ok_or_else(|| Error::type_not_found("Struct member definition missing"))?;
            allocate_storage(nested, universe, storage, visiting)
        })?;

        let range = match size {
            StorageLength::Words(words) => {
                if free < WORD_SIZE {
                    offset = next_slot(offset)?;
                    free = WORD_SIZE;
                }
                let range = StorageRange::words(Slot::new(offset), words.max(U256::ONE));
                offset = offset.checked_add(words).ok_or_else(overflow)?;
                range
            },
            StorageLength::Bytes(bytes) => {
                if bytes > free {
                    offset = next_slot(offset)?;
                    free = WORD_SIZE;
                }
                let range = StorageRange {
                    from: StoragePosition {
                        slot:  Slot::new(offset),
                        index: free - bytes,
                    },
                    to:   StoragePosition {
                        slot:  Slot::new(offset),
                        index: free - 1,
                    },
                };
                free -= bytes;
                if free == 0 {
                    offset = next_slot(offset)?;
                    free = WORD_SIZE;
                }
                range
            },
        };
        members.push(MemberAllocation {
            name:    member.name.clone(),
            ty:      member.ty.clone(),
            pointer: range,
        });
    }

    let words = if free == WORD_SIZE {
        offset
    } else {
        next_slot(offset)?
    };
    let size = StorageLength::Words(words);
    storage.insert(definition.id.clone(), StorageAllocation { members, size });
    visiting.remove(&definition.id);
    Ok(size)
}

fn next_slot(offset: U256) -> Result<U256> {
    offset.checked_add(U256::ONE).ok_or_else(overflow)
}

fn overflow() -> Error {
    Error::allocation_error(codes::ALLOCATION_OVERFLOW, "Storage layout exceeds the slot space")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        types::{DataLocation, StructType},
        universe::{StructMember, UserDefinedType},
    };

    fn member(name: &str, ty: Type) -> StructMember {
        StructMember {
            name: name.into(),
            ty,
        }
    }

    fn universe_with(id: u64, members: Vec<StructMember>) -> TypeUniverse {
        [UserDefinedType::Struct(StructDefinition {
            id: TypeId::new("c", id),
            type_name: "S".into(),
            defining_contract: None,
            members,
        })]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_storage_packing() {
        let universe = universe_with(1, vec![
            member("a", Type::uint(128)),
            member("b", Type::uint(128)),
            member("c", Type::uint(256)),
            member("d", Type::Bool),
        ]);
        let allocations = Allocations::compute(&universe).unwrap();
        let layout = &allocations.storage[&TypeId::new("c", 1)];
        assert_eq!(layout.size, StorageLength::Words(U256::new(3)));

        let a = &layout.members[0].pointer;
        assert_eq!((a.from.index, a.to.index), (16, 31));
        assert_eq!(a.from.slot.offset, U256::ZERO);
        let b = &layout.members[1].pointer;
        assert_eq!((b.from.index, b.to.index), (0, 15));
        let c = &layout.members[2].pointer;
        assert_eq!(c.from.slot.offset, U256::ONE);
        let d = &layout.members[3].pointer;
        assert_eq!((d.from.slot.offset, d.from.index), (U256::new(2), 31));
    }

    #[test]
    fn test_abi_and_memory_layouts() {
        let universe = universe_with(2, vec![
            member("n", Type::uint(8)),
            member("s", Type::String { location: None }),
            member("m", Type::Mapping(crate::types::MappingType {
                key:      Box::new(Type::uint(256)),
                value:    Box::new(Type::Bool),
                location: Some(DataLocation::Storage),
            })),
        ]);
        let allocations = Allocations::compute(&universe).unwrap();
        let abi = &allocations.abi[&TypeId::new("c", 2)];
        assert!(abi.dynamic);
        assert_eq!(abi.length, 64);
        assert_eq!(abi.members[1].pointer, ByteRange::new(32, 32));
        assert_eq!(allocations.memory[&TypeId::new("c", 2)].members.len(), 2);
    }

    #[test]
    fn test_self_containing_struct_is_rejected() {
        let id = TypeId::new("c", 3);
        let universe = universe_with(3, vec![member(
            "inner",
            Type::Struct(StructType {
                id:        id.clone(),
                type_name: "S".into(),
                location:  None,
            }),
        )]);
        let error = Allocations::compute(&universe).unwrap_err();
        assert!(error.is_allocation_error());
    }

    #[test]
    fn test_struct_with_dynamic_array_of_itself() {
        let id = TypeId::new("c", 4);
        let universe = universe_with(4, vec![
            member("value", Type::uint(256)),
            member(
                "children",
                Type::dynamic_array(
                    Type::Struct(StructType {
                        id:        id.clone(),
                        type_name: "S".into(),
                        location:  None,
                    }),
                    DataLocation::Storage,
                ),
            ),
        ]);
        let allocations = Allocations::compute(&universe).unwrap();
        assert_eq!(allocations.storage[&id].size, StorageLength::Words(U256::new(2)));
        assert!(allocations.abi[&id].dynamic);
    }
}
