// Codec - codec-decoder
// Module: Event Topic Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

use codec_format::{Decoded, ErrorKind, Pointer, Type};

use crate::{
    basic::decode_basic,
    context::DecodeContext,
    error::Caught,
    options::DecodeOptions,
    read::read,
    request::DecodeFuture,
};

/// Decodes an indexed event parameter.
///
/// Indexed reference types are stored as their hash, so they always come
/// back as an `IndexedReferenceType` error carrying the topic word, even
/// in strict mode.
pub(crate) fn decode_topic<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    index: usize,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let pointer = Pointer::EventTopic(index);
        if ty.is_reference() || matches!(ty, Type::Tuple(_)) {
            let raw = read(ctx, &pointer).await.caught()?.unwrap_or_default();
            let error = ErrorKind::IndexedReferenceType { ty: ty.clone(), raw };
            return Ok(Decoded::error(ty.clone(), error));
        }
        decode_basic(ctx, ty, pointer, options).await
    })
}
