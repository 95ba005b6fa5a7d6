// Codec - codec-decoder
// Module: Memory Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decoding of values in memory.
//!
//! Every reference type in memory is a word holding the address of its
//! data. Arrays and structs hold one word per element or member, and may
//! point back at an enclosing object; such cycles are cut off with a
//! reference to the enclosing level.

use codec_error::{Error, ErrorCategory, codes};
use codec_format::{
    Decoded, ErrorKind, Pointer, Type, Value,
    conversion::{self, to_u256},
    limits::evm::WORD_SIZE,
    pointer::ByteRange,
    types::DataLocation,
    values::NamedDecoded,
};

use crate::{
    basic::decode_basic,
    context::DecodeContext,
    error::{Caught, DecoderError, fail, missing_type},
    options::DecodeOptions,
    read::read,
    request::DecodeFuture,
};

const NOT_IN_MEMORY: Error = Error::new(
    ErrorCategory::Type,
    codes::TYPE_KIND_MISMATCH,
    "Type cannot live in memory",
);

/// Decodes `ty` from the memory word(s) at `range`.
pub(crate) fn decode_memory<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    range: ByteRange,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    decode_memory_visited(ctx, ty, Pointer::memory(range.start, range.length), options, Vec::new())
}

fn decode_memory_visited<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    pointer: Pointer,
    options: DecodeOptions,
    visited: Vec<usize>,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        match ty {
            // mappings are skipped when structs are copied to memory
            Type::Mapping(_) => Ok(Decoded::value(ty.clone(), Value::Mapping(Vec::new()))),
            _ if ty.is_reference() => decode_memory_reference_by_address(ctx, ty, pointer, options, visited).await,
            _ => decode_basic(ctx, ty, pointer, options).await,
        }
    })
}

/// Reads a memory address from `pointer` and decodes the object there.
///
/// `visited` lists the addresses of the enclosing arrays and structs,
/// innermost first.
pub(crate) fn decode_memory_reference_by_address<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    pointer: Pointer,
    options: DecodeOptions,
    visited: Vec<usize>,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let raw = match read(ctx, &pointer).await.caught()? {
            Ok(raw) => raw,
            Err(error) => return fail(ty, error, &options),
        };
        let address = to_u256(&raw);
        let Some(object) = conversion::to_usize(address) else {
            return fail(ty, ErrorKind::OverlargePointers { pointer: address }, &options);
        };
        let overlarge = ErrorKind::OverlargePointers { pointer: address };

        match ty {
            Type::Bytes { .. } | Type::String { .. } => {
                let length = match read(ctx, &Pointer::memory(object, WORD_SIZE)).await.caught()? {
                    Ok(word) => to_u256(&word),
                    Err(error) => return fail(ty, error, &options),
                };
                let Some(content_length) = ctx.bounded_length(length) else {
                    let error = ErrorKind::OverlongArraysAndStrings {
                        length,
                        data_length: Some(ctx.info.state.memory.len()),
                    };
                    return fail(ty, error, &options);
                };
                let Some(content) = object.checked_add(WORD_SIZE) else {
                    return fail(ty, overlarge, &options);
                };
                decode_basic(ctx, ty, Pointer::memory(content, content_length), options).await
            },
            Type::Array(array) => {
                if let Some(levels) = cycle_reference(&visited, object) {
                    return Ok(Decoded::value(ty.clone(), Value::Array {
                        elements:  Vec::new(),
                        reference: Some(levels),
                    }));
                }
                let (length, start) = match array.length {
                    Some(length) => (length, object),
                    None => {
                        let length = match read(ctx, &Pointer::memory(object, WORD_SIZE)).await.caught()? {
                            Ok(word) => to_u256(&word),
                            Err(error) => return fail(ty, error, &options),
                        };
                        let Some(start) = object.checked_add(WORD_SIZE) else {
                            return fail(ty, overlarge, &options);
                        };
                        (length, start)
                    },
                };
                let memory_length = ctx.info.state.memory.len();
                let overlong = ErrorKind::OverlongArraysAndStrings {
                    length,
                    data_length: Some(memory_length),
                };
                let Some(length) = ctx.bounded_length(length) else {
                    return fail(ty, overlong, &options);
                };
                if array.length.is_none() && !words_fit(start, length, memory_length) {
                    log::debug!("memory array of {length} words at {start} overruns memory");
                    return fail(ty, overlong, &options);
                }

                let now_visited = entered(object, &visited);
                let mut elements = Vec::with_capacity(length.min(memory_length / WORD_SIZE));
                for index in 0..length {
                    let Some(element) = index.checked_mul(WORD_SIZE).and_then(|delta| start.checked_add(delta)) else {
                        return fail(ty, overlarge, &options);
                    };
                    let pointer = Pointer::memory(element, WORD_SIZE);
                    elements.push(decode_memory_visited(ctx, &array.base, pointer, options, now_visited.clone()).await?);
                }
                Ok(Decoded::value(ty.clone(), Value::Array {
                    elements,
                    reference: None,
                }))
            },
            Type::Struct(structure) => {
                if let Some(levels) = cycle_reference(&visited, object) {
                    return Ok(Decoded::value(ty.clone(), Value::Struct {
                        members:   Vec::new(),
                        reference: Some(levels),
                    }));
                }
                let Some(allocation) = ctx.info.allocations.memory.get(&structure.id) else {
                    return missing_type(ty, ErrorKind::type_not_found(ty), &options);
                };

                let now_visited = entered(object, &visited);
                let mut members = Vec::with_capacity(allocation.members.len());
                for member in &allocation.members {
                    let member_ty = member.ty.with_location(Some(DataLocation::Memory));
                    let Some(start) = object.checked_add(member.pointer.start) else {
                        return fail(ty, overlarge, &options);
                    };
                    let pointer = Pointer::memory(start, member.pointer.length);
                    let value = decode_memory_visited(ctx, &member_ty, pointer, options, now_visited.clone()).await?;
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
            _ => Err(DecoderError::Fatal(NOT_IN_MEMORY)),
        }
    })
}

/// Levels up to the enclosing object at `object`, if any.
/// Whether `length` words from `start` lie inside memory.
fn words_fit(start: usize, length: usize, memory_length: usize) -> bool {
    length
        .checked_mul(WORD_SIZE)
        .and_then(|words| start.checked_add(words))
        .is_some_and(|end| end <= memory_length)
}

fn cycle_reference(visited: &[usize], object: usize) -> Option<usize> {
    visited.iter().position(|address| *address == object).map(|index| index + 1)
}

fn entered(object: usize, visited: &[usize]) -> Vec<usize> {
    let mut now_visited = Vec::with_capacity(visited.len() + 1);
    now_visited.push(object);
    now_visited.extend_from_slice(visited);
    now_visited
}
