// Codec - codec-decoder
// Module: Special Variable Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

use codec_error::{Error, ErrorCategory, codes};
use codec_format::{
    Decoded, Pointer, Type, Value,
    pointer::SpecialVariable,
    types::{DataLocation, MagicVariable},
    values::NamedDecoded,
};

use crate::{
    basic::decode_basic,
    context::DecodeContext,
    error::{DecoderError, DecoderResult},
    options::DecodeOptions,
    request::DecodeFuture,
};

const MAGIC_MISMATCH: Error = Error::new(
    ErrorCategory::Decoding,
    codes::POINTER_TYPE_MISMATCH,
    "Magic variable does not match its pointer",
);

/// Decodes an environment global.
///
/// `msg`, `tx` and `block` assemble their fields from calldata and the
/// other specials; everything else is a single special word.
pub(crate) fn decode_special<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    variable: SpecialVariable,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        match ty {
            Type::Magic(magic) => decode_magic(ctx, ty, *magic, variable, options).await,
            _ => decode_basic(ctx, ty, Pointer::Special(variable), options).await,
        }
    })
}

async fn decode_magic(
    ctx: &DecodeContext<'_>,
    ty: &Type,
    magic: MagicVariable,
    variable: SpecialVariable,
    options: DecodeOptions,
) -> DecoderResult<Decoded> {
    let uint = Type::uint(256);
    let fields = match (magic, variable) {
        (MagicVariable::Message, SpecialVariable::Msg) => {
            let calldata_length = ctx.info.state.calldata.len();
            vec![
                ("data", Type::bytes(DataLocation::Calldata), Pointer::calldata(0, calldata_length)),
                ("sig", Type::FixedBytes { length: 4 }, Pointer::calldata(0, 4)),
                ("sender", Type::Address { payable: false }, Pointer::Special(SpecialVariable::Sender)),
                ("value", uint.clone(), Pointer::Special(SpecialVariable::Value)),
            ]
        },
        (MagicVariable::Transaction, SpecialVariable::Tx) => vec![
            ("origin", Type::Address { payable: false }, Pointer::Special(SpecialVariable::Origin)),
            ("gasprice", uint.clone(), Pointer::Special(SpecialVariable::GasPrice)),
        ],
        (MagicVariable::Block, SpecialVariable::Block) => vec![
            ("coinbase", Type::Address { payable: true }, Pointer::Special(SpecialVariable::Coinbase)),
            ("basefee", uint.clone(), Pointer::Special(SpecialVariable::BaseFee)),
            ("chainid", uint.clone(), Pointer::Special(SpecialVariable::ChainId)),
            ("difficulty", uint.clone(), Pointer::Special(SpecialVariable::Difficulty)),
            ("gaslimit", uint.clone(), Pointer::Special(SpecialVariable::GasLimit)),
            ("number", uint.clone(), Pointer::Special(SpecialVariable::Number)),
            ("timestamp", uint, Pointer::Special(SpecialVariable::Timestamp)),
        ],
        _ => return Err(DecoderError::Fatal(MAGIC_MISMATCH)),
    };

    let mut members = Vec::with_capacity(fields.len());
    for (name, field_ty, pointer) in &fields {
        let value = decode_basic(ctx, field_ty, pointer.clone(), options).await?;
        members.push(NamedDecoded {
            name: Some((*name).to_string()),
            value,
        });
    }
    Ok(Decoded::value(ty.clone(), Value::Magic(members)))
}
