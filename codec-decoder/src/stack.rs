// Codec - codec-decoder
// Module: Stack Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decoding of stack words.
//!
//! Reference types on the stack are pointers into memory, storage or
//! calldata. Calldata arrays, bytes and strings take two words, offset and
//! length. External function pointers take two words, address and
//! selector. Scalars are decoded with permissive padding, since the
//! compiler does not clean the upper bits of stack values.

use codec_format::{
    Address, Decoded, ErrorKind, Pointer, Type, Value,
    conversion::{self, pad_left, to_u256},
    limits::evm::{ADDRESS_SIZE, SELECTOR_SIZE, WORD_SIZE},
    pointer::{ByteLocation, StackPointer},
    types::{ArrayType, DataLocation, FunctionType, FunctionVisibility},
};

use crate::{
    abi::decode_abi_reference_by_address,
    basic::{check_padding_left, decode_basic, decode_external_function},
    context::DecodeContext,
    error::{Caught, fail},
    memory::decode_memory_reference_by_address,
    options::{DecodeOptions, PaddingMode},
    read::read,
    request::DecodeFuture,
    storage::decode_storage_reference_by_address,
};

/// Decodes `ty` from the stack words at `pointer`.
pub(crate) fn decode_stack<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    pointer: StackPointer,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let literal = match read(ctx, &Pointer::Stack(pointer)).await.caught()? {
            Ok(literal) => literal,
            Err(error) => return fail(ty, error, &options),
        };
        decode_literal(ctx, ty, literal, options).await
    })
}

/// Decodes `ty` from stack words already read.
pub(crate) fn decode_literal<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    literal: Vec<u8>,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        if ty.is_reference() {
            match ty.location() {
                Some(DataLocation::Memory) => {
                    let pointer = Pointer::StackLiteral(literal);
                    return decode_memory_reference_by_address(ctx, ty, pointer, options, Vec::new()).await;
                },
                Some(DataLocation::Storage) => {
                    let pointer = Pointer::StackLiteral(literal);
                    return decode_storage_reference_by_address(ctx, ty, pointer, options).await;
                },
                Some(DataLocation::Calldata) => return decode_calldata_reference(ctx, ty, literal, options).await,
                None => {},
            }
        }

        if let Type::Function(FunctionType {
            visibility: FunctionVisibility::External,
            ..
        }) = ty
        {
            let address_word = &literal[..WORD_SIZE.min(literal.len())];
            let selector_word = &literal[literal.len().saturating_sub(WORD_SIZE)..];
            if !check_padding_left(address_word, ADDRESS_SIZE) || !check_padding_left(selector_word, SELECTOR_SIZE) {
                let error = ErrorKind::FunctionExternalStackPadding {
                    raw_address:  address_word.to_vec(),
                    raw_selector: selector_word.to_vec(),
                };
                return fail(ty, error, &options);
            }
            let address_bytes = &address_word[address_word.len().saturating_sub(ADDRESS_SIZE)..];
            let address = Address::from_slice(&pad_left(address_bytes, ADDRESS_SIZE))?;
            let selector = &selector_word[selector_word.len().saturating_sub(SELECTOR_SIZE)..];
            let function = decode_external_function(ctx, address, selector).await?;
            return Ok(Decoded::value(ty.clone(), Value::ExternalFunction(function)));
        }

        let options = options.with_padding_mode(PaddingMode::Permissive);
        decode_basic(ctx, ty, Pointer::StackLiteral(literal), options).await
    })
}

/// Calldata pointers on the stack.
///
/// Dynamic arrays, bytes and strings point at their content, past the
/// length word; the length is the second stack word, or else the word
/// just before the content.
fn decode_calldata_reference<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    literal: Vec<u8>,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let options = options.with_abi_pointer_base(0);
        let lookup = match ty {
            Type::Bytes { .. } | Type::String { .. } => true,
            Type::Array(array) => array.is_dynamic(),
            _ => false,
        };
        if !lookup {
            let pointer = Pointer::StackLiteral(literal);
            return decode_abi_reference_by_address(ctx, ty, pointer, ByteLocation::Calldata, None, options).await;
        }

        let offset_word = literal[..WORD_SIZE.min(literal.len())].to_vec();
        let offset = to_u256(&offset_word);
        let overlarge = ErrorKind::OverlargePointers { pointer: offset };
        let Some(start) = conversion::to_usize(offset) else {
            return fail(ty, overlarge, &options);
        };
        let length = if literal.len() > WORD_SIZE {
            to_u256(&literal[WORD_SIZE..])
        } else {
            let Some(length_word) = start.checked_sub(WORD_SIZE) else {
                return fail(ty, overlarge, &options);
            };
            match read(ctx, &Pointer::calldata(length_word, WORD_SIZE)).await.caught()? {
                Ok(word) => to_u256(&word),
                Err(error) => return fail(ty, error, &options),
            }
        };

        match ty {
            Type::Array(array) => {
                // decoded as a static array of the known length at `start`
                let sized = Type::Array(ArrayType {
                    length: Some(length),
                    ..array.clone()
                });
                let pointer = Pointer::StackLiteral(offset_word);
                let decoded =
                    decode_abi_reference_by_address(ctx, &sized, pointer, ByteLocation::Calldata, None, options).await?;
                Ok(match decoded {
                    Decoded::Value(typed) => Decoded::value(ty.clone(), typed.value),
                    Decoded::Error(error) => Decoded::error(ty.clone(), error.error),
                })
            },
            _ => {
                let Some(length) = ctx.bounded_length(length) else {
                    let error = ErrorKind::OverlongArraysAndStrings {
                        length,
                        data_length: Some(ctx.info.state.calldata.len()),
                    };
                    return fail(ty, error, &options);
                };
                decode_basic(ctx, ty, Pointer::calldata(start, length), options).await
            },
        }
    })
}
