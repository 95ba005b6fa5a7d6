// Codec - codec-decoder
// Module: Constant Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

use codec_format::{
    Decoded, Pointer, Type, Value,
    conversion::pad_right,
    pointer::ConstantDefinition,
};

use crate::{
    basic::decode_basic,
    context::DecodeContext,
    error::{Caught, fail},
    options::{DecodeOptions, PaddingMode},
    read::read,
    request::DecodeFuture,
};

/// Decodes a compile-time constant from its defining literal.
///
/// Numeric literals are words, so signed constants may come zero padded.
/// Fixed-size bytes take the literal without a padding check: the low
/// bytes of a numeric literal, or a byte literal right padded or cut to
/// the declared length.
pub(crate) fn decode_constant<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    definition: ConstantDefinition,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let from_literal = matches!(definition, ConstantDefinition::Bytes(_));
        let pointer = Pointer::Definition(definition);
        if let Type::FixedBytes { length } = ty {
            let raw = match read(ctx, &pointer).await.caught()? {
                Ok(raw) => raw,
                Err(error) => return fail(ty, error, &options),
            };
            let width = usize::from(*length);
            let bytes = if from_literal {
                pad_right(&raw, width)
            } else {
                raw[raw.len().saturating_sub(width)..].to_vec()
            };
            return Ok(Decoded::value(ty.clone(), Value::FixedBytes { bytes, raw }));
        }
        decode_basic(ctx, ty, pointer, options.with_padding_mode(PaddingMode::Zero)).await
    })
}
