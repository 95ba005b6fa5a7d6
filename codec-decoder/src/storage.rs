// Codec - codec-decoder
// Module: Storage Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decoding of values in contract storage.
//!
//! Small values pack right to left within a slot. Dynamic arrays keep
//! their length in their own slot and their elements from
//! `keccak(slot)`. Strings and bytes of up to 31 bytes live in their slot
//! with `2 * length` in the last byte; longer ones store `2 * length + 1`
//! and keep the content from `keccak(slot)`. Mapping entries can only be
//! found for keys listed in the execution info.

use codec_error::{Error, ErrorCategory, codes};
use codec_format::{
    Decoded, ErrorKind, Pointer, Type, U256, Value,
    conversion::{self, to_u256},
    layout::{StorageLength, storage_size},
    limits::evm::WORD_SIZE,
    pointer::{Slot, StoragePosition, StorageRange},
    types::DataLocation,
    values::{MappingEntry, NamedDecoded},
};

use crate::{
    basic::{decode_basic, decode_basic_bytes},
    context::DecodeContext,
    error::{Caught, DecoderError, fail, layout_failure, missing_type},
    options::DecodeOptions,
    read::read,
    request::DecodeFuture,
};

const NOT_IN_STORAGE: Error = Error::new(
    ErrorCategory::Type,
    codes::TYPE_KIND_MISMATCH,
    "Type cannot live in storage",
);

/// Decodes `ty` stored at `range`.
pub(crate) fn decode_storage<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    range: StorageRange,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        if ty.is_reference() {
            decode_storage_reference(ctx, ty, range, options).await
        } else {
            decode_basic(ctx, ty, Pointer::Storage(range), options).await
        }
    })
}

/// Reads a slot number from `pointer` and decodes the object stored there.
pub(crate) fn decode_storage_reference_by_address<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    pointer: Pointer,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let raw = match read(ctx, &pointer).await.caught()? {
            Ok(raw) => raw,
            Err(error) => return fail(ty, error, &options),
        };
        let words = match size_of(ctx, ty) {
            Ok(StorageLength::Words(words)) => words,
            Ok(StorageLength::Bytes(_)) => return Err(DecoderError::Fatal(NOT_IN_STORAGE)),
            Err(error) => return layout_failure(ty, error, &options),
        };
        let range = StorageRange::words(Slot::new(to_u256(&raw)), words.max(U256::ONE));
        decode_storage_reference(ctx, ty, range, options).await
    })
}

fn decode_storage_reference<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    range: StorageRange,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        match ty {
            Type::Array(array) => {
                let length = match array.length {
                    Some(length) => length,
                    None => match read(ctx, &Pointer::Storage(range.clone())).await.caught()? {
                        Ok(word) => to_u256(&word),
                        Err(error) => return fail(ty, error, &options),
                    },
                };
                let overlong = ErrorKind::OverlongArraysAndStrings {
                    length,
                    data_length: None,
                };
                let Some(length) = ctx.bounded_length(length) else {
                    return fail(ty, overlong, &options);
                };
                let base_size = match size_of(ctx, &array.base) {
                    Ok(size) => size,
                    Err(error) => return layout_failure(ty, error, &options),
                };
                let Some(ranges) = element_ranges(&range.from.slot, array.length.is_none(), base_size, length) else {
                    return fail(ty, overlong, &options);
                };
                log::trace!("storage array of {length} elements sized {base_size:?}");

                let mut elements = Vec::with_capacity(ranges.len());
                for element in ranges {
                    elements.push(decode_storage(ctx, &array.base, element, options).await?);
                }
                Ok(Decoded::value(ty.clone(), Value::Array {
                    elements,
                    reference: None,
                }))
            },
            Type::Bytes { .. } | Type::String { .. } => {
                let data = match read(ctx, &Pointer::Storage(range.clone())).await.caught()? {
                    Ok(data) => data,
                    Err(error) => return fail(ty, error, &options),
                };
                let last = data.last().copied().unwrap_or_default();
                let (from, length) = if last % 2 == 0 {
                    let length = usize::from(last / 2);
                    if length >= WORD_SIZE {
                        // short form holds at most 31 bytes next to the length byte
                        return fail(ty, ErrorKind::OverlongArraysAndStrings {
                            length:      conversion::from_usize(length),
                            data_length: None,
                        }, &options);
                    }
                    let from = StoragePosition {
                        slot:  range.from.slot.clone(),
                        index: 0,
                    };
                    (from, length)
                } else {
                    let length = to_u256(&data).wrapping_sub(U256::ONE) / 2;
                    let Some(length) = ctx.bounded_length(length) else {
                        let error = ErrorKind::OverlongArraysAndStrings {
                            length,
                            data_length: None,
                        };
                        return fail(ty, error, &options);
                    };
                    let from = StoragePosition {
                        slot:  Slot::hashed(range.from.slot.clone()),
                        index: 0,
                    };
                    (from, length)
                };
                match StorageRange::with_length(from, length) {
                    Some(content) => decode_basic(ctx, ty, Pointer::Storage(content), options).await,
                    None => decode_basic_bytes(ctx, ty, Vec::new(), options).await,
                }
            },
            Type::Struct(structure) => {
                let Some(allocation) = ctx.info.allocations.storage.get(&structure.id) else {
                    return missing_type(ty, ErrorKind::type_not_found(ty), &options);
                };
                let mut members = Vec::with_capacity(allocation.members.len());
                for member in &allocation.members {
                    let member_ty = member.ty.with_location(Some(DataLocation::Storage));
                    let member_range = member.pointer.relative_to(&range.from.slot);
                    let value = decode_storage(ctx, &member_ty, member_range, options).await?;
                    members.push(NamedDecoded {
                        name: Some(member.name.clone()),
                        value,
                    });
                }
                Ok(Decoded::value(ty.clone(), Value::Struct {
                    members,
                    reference: None,
                }))
            },
            Type::Mapping(mapping) => {
                let value_size = match size_of(ctx, &mapping.value) {
                    Ok(size) => size,
                    Err(error) => return layout_failure(ty, error, &options),
                };
                let base = &range.from.slot;
                let base_address = base.address();
                let mut entries = Vec::new();
                for known in &ctx.info.mapping_keys {
                    let (Some(path), Some(key)) = (&known.path, &known.key) else {
                        continue;
                    };
                    if path.address() != base_address {
                        continue;
                    }
                    let entry = Slot::mapping_entry(base.clone(), key.clone());
                    let value_range = match value_size {
                        StorageLength::Words(words) => StorageRange::words(entry, words.max(U256::ONE)),
                        StorageLength::Bytes(bytes) => StorageRange {
                            from: StoragePosition {
                                slot:  entry.clone(),
                                index: WORD_SIZE.saturating_sub(bytes),
                            },
                            to:   StoragePosition {
                                slot:  entry,
                                index: WORD_SIZE - 1,
                            },
                        },
                    };
                    entries.push(MappingEntry {
                        key:   key.clone(),
                        value: decode_storage(ctx, &mapping.value, value_range, options).await?,
                    });
                }
                Ok(Decoded::value(ty.clone(), Value::Mapping(entries)))
            },
            _ => Err(DecoderError::Fatal(NOT_IN_STORAGE)),
        }
    })
}

fn size_of(ctx: &DecodeContext<'_>, ty: &Type) -> Result<StorageLength, ErrorKind> {
    storage_size(ty, &ctx.info.user_defined_types, &ctx.info.allocations.storage)
}

/// Ranges of the `length` elements of an array stored at `base`.
///
/// Elements of a dynamic array start at `keccak(base)`. Elements smaller
/// than a word fill each slot from its last byte; one that does not fit
/// starts the next slot. `None` when the slot arithmetic overflows.
fn element_ranges(base: &Slot, dynamic: bool, element: StorageLength, length: usize) -> Option<Vec<StorageRange>> {
    let slot_at = |offset: U256| {
        if dynamic {
            Slot::hashed(base.clone()).advanced(offset)
        } else {
            Slot::relative(base.clone(), offset)
        }
    };
    let mut ranges = Vec::with_capacity(length);
    match element {
        StorageLength::Words(words) => {
            let words = words.max(U256::ONE);
            for index in 0..length {
                let offset = words.checked_mul(conversion::from_usize(index))?;
                ranges.push(StorageRange::words(slot_at(offset), words));
            }
        },
        StorageLength::Bytes(size) => {
            let size = size.clamp(1, WORD_SIZE);
            let mut offset = U256::ZERO;
            let mut index = WORD_SIZE - size;
            for _ in 0..length {
                let slot = slot_at(offset);
                ranges.push(StorageRange {
                    from: StoragePosition {
                        slot:  slot.clone(),
                        index,
                    },
                    to:   StoragePosition {
                        slot,
                        index: index + size - 1,
                    },
                });
                if index >= size {
                    index -= size;
                } else {
                    offset = offset.checked_add(U256::ONE)?;
                    index = WORD_SIZE - size;
                }
            }
        },
    }
    Some(ranges)
}
