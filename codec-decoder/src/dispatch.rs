// Codec - codec-decoder
// Module: Dispatcher
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

use codec_format::{Decoded, Pointer, Type, pointer::ByteLocation};

use crate::{
    abi, constant, context::DecodeContext, memory, options::DecodeOptions, request::DecodeFuture, special, stack,
    storage, topic,
};

/// Routes a decode to the decoder for the pointer's location.
pub(crate) fn decode<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    pointer: Pointer,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    log::trace!("decoding {} from {:?}", ty.class_name(), pointer.location());
    match pointer {
        Pointer::Storage(range) => storage::decode_storage(ctx, ty, range, options),
        Pointer::Bytes {
            location: ByteLocation::Memory,
            range,
        } => memory::decode_memory(ctx, ty, range, options),
        Pointer::Bytes { location, range } => abi::decode_abi(ctx, ty, location, range, options),
        Pointer::Stack(stack_pointer) => stack::decode_stack(ctx, ty, stack_pointer, options),
        Pointer::StackLiteral(literal) => stack::decode_literal(ctx, ty, literal, options),
        Pointer::Definition(definition) => constant::decode_constant(ctx, ty, definition, options),
        Pointer::Special(variable) => special::decode_special(ctx, ty, variable, options),
        Pointer::EventTopic(index) => topic::decode_topic(ctx, ty, index, options),
    }
}
