// Codec - codec-decoder
// Module: ABI Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decoding of ABI encoded calldata, event data and return data.
//!
//! Static values sit in place. Dynamic values leave a one-word offset in
//! the head, relative to the enclosing container's start
//! (`abi_pointer_base`), and live in the tail as length word plus content.

use codec_error::{Error, ErrorCategory, codes};
use codec_format::{
    Decoded, ErrorKind, Pointer, Type, U256, Value,
    conversion::{self, to_u256},
    layout::abi_size_info,
    limits::evm::WORD_SIZE,
    pointer::{ByteLocation, ByteRange},
    types::{DataLocation, StructType, TupleMember},
    values::NamedDecoded,
};

use crate::{
    basic::decode_basic,
    context::DecodeContext,
    error::{Caught, DecoderError, DecoderResult, fail, layout_failure, missing_type},
    options::DecodeOptions,
    read::read,
    request::DecodeFuture,
};

const NOT_ABI_CONTAINER: Error = Error::new(
    ErrorCategory::Type,
    codes::TYPE_KIND_MISMATCH,
    "Type cannot be decoded by position",
);

/// Decodes `ty` from the head slot at `range`.
pub(crate) fn decode_abi<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    location: ByteLocation,
    range: ByteRange,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let pointer = Pointer::Bytes { location, range };
        if !ty.is_reference() && !matches!(ty, Type::Tuple(_)) {
            return decode_basic(ctx, ty, pointer, options).await;
        }
        let size = match abi_size_info(ty, &ctx.info.allocations.abi) {
            Ok(size) => size,
            Err(error) => return layout_failure(ty, error, &options),
        };
        if size.dynamic {
            decode_abi_reference_by_address(ctx, ty, pointer, location, None, options).await
        } else {
            decode_abi_reference_static(ctx, ty, location, range.start, options).await
        }
    })
}

/// Follows the offset word at `pointer` and decodes what it points at.
///
/// `location` is the region the offset refers into; stack pointers refer
/// into calldata. `length_override` replaces the tail's length word when
/// the length is already known.
pub(crate) fn decode_abi_reference_by_address<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    pointer: Pointer,
    location: ByteLocation,
    length_override: Option<U256>,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let raw = match read(ctx, &pointer).await.caught()? {
            Ok(raw) => raw,
            Err(error) => return fail(ty, error, &options),
        };
        let offset = to_u256(&raw);
        let region_length = ctx.info.state.region(location).len();
        let overlarge = ErrorKind::OverlargePointers { pointer: offset };
        let Some(start) = conversion::to_usize(offset).and_then(|offset| offset.checked_add(options.abi_pointer_base))
        else {
            return fail(ty, overlarge, &options);
        };
        if options.strict_abi_mode && start > region_length {
            log::debug!("offset {offset} points past the {region_length} byte region");
            return Err(DecoderError::stop(overlarge));
        }

        let size = match abi_size_info(ty, &ctx.info.allocations.abi) {
            Ok(size) => size,
            Err(error) => return layout_failure(ty, error, &options),
        };
        if !size.dynamic {
            return decode_abi_reference_static(ctx, ty, location, start, options).await;
        }

        match ty {
            Type::Bytes { .. } | Type::String { .. } => {
                let length = match length_override {
                    Some(length) => length,
                    None => match read_length_word(ctx, location, start).await? {
                        Ok(length) => length,
                        Err(error) => return fail(ty, error, &options),
                    },
                };
                let length = match checked_length(ctx, length, region_length, &options)? {
                    Ok(length) => length,
                    Err(error) => return fail(ty, error, &options),
                };
                let Some(content) = start.checked_add(WORD_SIZE) else {
                    return fail(ty, overlarge, &options);
                };
                decode_basic(ctx, ty, Pointer::bytes(location, content, length), options).await
            },
            Type::Array(array) => {
                let (length, elements_start) = match array.length {
                    Some(length) => (length, start),
                    None => {
                        let length = match length_override {
                            Some(length) => length,
                            None => match read_length_word(ctx, location, start).await? {
                                Ok(length) => length,
                                Err(error) => return fail(ty, error, &options),
                            },
                        };
                        let Some(elements_start) = start.checked_add(WORD_SIZE) else {
                            return fail(ty, overlarge, &options);
                        };
                        (length, elements_start)
                    },
                };
                let length = match checked_length(ctx, length, region_length, &options)? {
                    Ok(length) => length,
                    Err(error) => return fail(ty, error, &options),
                };
                let base_size = match abi_size_info(&array.base, &ctx.info.allocations.abi) {
                    Ok(size) => size.size,
                    Err(error) => return layout_failure(ty, error, &options),
                };
                if array.length.is_none() && !heads_fit(elements_start, length, base_size, region_length) {
                    log::debug!("{length} element heads at {elements_start} overrun the {region_length} byte region");
                    return fail(ty, ErrorKind::OverlongArraysAndStrings {
                        length:      conversion::from_usize(length),
                        data_length: Some(region_length),
                    }, &options);
                }
                // offsets inside the elements are relative to the first element
                let element_options = options.with_abi_pointer_base(elements_start);
                let mut elements = Vec::new();
                for index in 0..length {
                    let Some(element_start) = index
                        .checked_mul(base_size)
                        .and_then(|delta| elements_start.checked_add(delta))
                    else {
                        return fail(ty, overlarge, &options);
                    };
                    let range = ByteRange::new(element_start, base_size);
                    elements.push(decode_abi(ctx, &array.base, location, range, element_options).await?);
                }
                Ok(Decoded::value(ty.clone(), Value::Array {
                    elements,
                    reference: None,
                }))
            },
            Type::Struct(structure) => decode_abi_struct_by_position(ctx, ty, structure, location, start, options).await,
            Type::Tuple(members) => decode_abi_tuple_by_position(ctx, ty, members, location, start, options).await,
            _ => Err(DecoderError::Fatal(NOT_ABI_CONTAINER)),
        }
    })
}

/// Decodes a statically sized container laid out in place at `start`.
pub(crate) fn decode_abi_reference_static<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    location: ByteLocation,
    start: usize,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        match ty {
            Type::Array(array) => {
                let Some(length) = array.length else {
                    return Err(DecoderError::Fatal(NOT_ABI_CONTAINER));
                };
                let overlong = ErrorKind::OverlongArraysAndStrings {
                    length,
                    data_length: None,
                };
                let Some(length) = ctx.bounded_length(length) else {
                    return fail(ty, overlong, &options);
                };
                let base_size = match abi_size_info(&array.base, &ctx.info.allocations.abi) {
                    Ok(size) => size.size,
                    Err(error) => return layout_failure(ty, error, &options),
                };
                let mut elements = Vec::with_capacity(length);
                for index in 0..length {
                    let Some(element_start) = index.checked_mul(base_size).and_then(|delta| start.checked_add(delta))
                    else {
                        return fail(ty, overlong, &options);
                    };
                    let range = ByteRange::new(element_start, base_size);
                    elements.push(decode_abi(ctx, &array.base, location, range, options).await?);
                }
                Ok(Decoded::value(ty.clone(), Value::Array {
                    elements,
                    reference: None,
                }))
            },
            Type::Struct(structure) => decode_abi_struct_by_position(ctx, ty, structure, location, start, options).await,
            Type::Tuple(members) => decode_abi_tuple_by_position(ctx, ty, members, location, start, options).await,
            // never encoded; nothing to read
            Type::Mapping(_) => Ok(Decoded::value(ty.clone(), Value::Mapping(Vec::new()))),
            _ => Err(DecoderError::Fatal(NOT_ABI_CONTAINER)),
        }
    })
}

/// Decodes the members of a struct or tuple whose head starts at `start`.
///
/// Top-level argument lists and event data use this with the whole list
/// as one tuple.
pub(crate) fn decode_abi_by_position<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    location: ByteLocation,
    start: usize,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    match ty {
        Type::Struct(structure) => decode_abi_struct_by_position(ctx, ty, structure, location, start, options),
        Type::Tuple(members) => decode_abi_tuple_by_position(ctx, ty, members, location, start, options),
        _ => Box::pin(async { Err::<Decoded, _>(DecoderError::Fatal(NOT_ABI_CONTAINER)) }),
    }
}

fn decode_abi_struct_by_position<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    structure: &'a StructType,
    location: ByteLocation,
    start: usize,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let Some(allocation) = ctx.info.allocations.abi.get(&structure.id) else {
            return missing_type(ty, ErrorKind::type_not_found(ty), &options);
        };
        let member_location = match location {
            ByteLocation::Calldata => Some(DataLocation::Calldata),
            ByteLocation::Memory => Some(DataLocation::Memory),
            ByteLocation::Eventdata | ByteLocation::Returndata => None,
        };
        let member_options = options.with_abi_pointer_base(start);
        let mut members = Vec::with_capacity(allocation.members.len());
        for member in &allocation.members {
            let member_ty = member.ty.with_location(member_location);
            let Some(member_start) = start.checked_add(member.pointer.start) else {
                return fail(ty, ErrorKind::OverlargePointers {
                    pointer: conversion::from_usize(start),
                }, &options);
            };
            let range = ByteRange::new(member_start, member.pointer.length);
            let value = decode_abi(ctx, &member_ty, location, range, member_options).await?;
            members.push(NamedDecoded {
                name: Some(member.name.clone()),
                value,
            });
        }
        Ok(Decoded::value(ty.clone(), Value::Struct {
            members,
            reference: None,
        }))
    })
}

fn decode_abi_tuple_by_position<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    members: &'a [TupleMember],
    location: ByteLocation,
    start: usize,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let member_options = options.with_abi_pointer_base(start);
        let mut position = start;
        let mut decoded = Vec::with_capacity(members.len());
        for member in members {
            let size = match abi_size_info(&member.ty, &ctx.info.allocations.abi) {
                Ok(size) => size.size,
                Err(error) => return layout_failure(ty, error, &options),
            };
            let value = decode_abi(ctx, &member.ty, location, ByteRange::new(position, size), member_options).await?;
            decoded.push(NamedDecoded {
                name: member.name.clone(),
                value,
            });
            let Some(next) = position.checked_add(size) else {
                return fail(ty, ErrorKind::OverlargePointers {
                    pointer: conversion::from_usize(position),
                }, &options);
            };
            position = next;
        }
        Ok(Decoded::value(ty.clone(), Value::Tuple(decoded)))
    })
}

async fn read_length_word(
    ctx: &DecodeContext<'_>,
    location: ByteLocation,
    start: usize,
) -> DecoderResult<Result<U256, ErrorKind>> {
    Ok(read(ctx, &Pointer::bytes(location, start, WORD_SIZE))
        .await
        .caught()?
        .map(|word| to_u256(&word)))
}

/// Whether `length` element heads of `size` bytes from `start` lie inside
/// the region.
fn heads_fit(start: usize, length: usize, size: usize, region_length: usize) -> bool {
    length
        .checked_mul(size)
        .and_then(|heads| start.checked_add(heads))
        .is_some_and(|end| end <= region_length)
}

/// Validates a length read from the data.
///
/// In strict mode a length larger than the whole region stops decoding
/// before anything is allocated for it.
fn checked_length(
    ctx: &DecodeContext<'_>,
    length: U256,
    region_length: usize,
    options: &DecodeOptions,
) -> DecoderResult<Result<usize, ErrorKind>> {
    let overlong = ErrorKind::OverlongArraysAndStrings {
        length,
        data_length: Some(region_length),
    };
    if options.strict_abi_mode && length > conversion::from_usize(region_length) {
        log::debug!("length {length} exceeds the {region_length} byte region");
        return Err(DecoderError::stop(overlong));
    }
    Ok(ctx.bounded_length(length).ok_or(overlong))
}
