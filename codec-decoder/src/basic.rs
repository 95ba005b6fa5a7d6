// Codec - codec-decoder
// Module: Scalar Value Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decoding of elementary values from raw bytes.
//!
//! Each scalar occupies a fixed width inside its (usually one word) input.
//! The rest is padding, which must be clean in the way the type and the
//! [`PaddingMode`] dictate. Dynamic `bytes` and `string` values are taken
//! verbatim.

use codec_error::{Error, ErrorCategory, codes};
use codec_format::{
    Address, Decoded, ErrorKind, PaddingType, Pointer, Type, U256, Value,
    conversion::{self, pad_left, pad_right, to_i256, to_u256},
    info::InternalFunctionEntry,
    layout::enum_byte_width,
    limits::evm::{ADDRESS_SIZE, EXTERNAL_FUNCTION_SIZE, INTERNAL_FUNCTION_SIZE, PC_SIZE, SELECTOR_SIZE},
    types::{FunctionType, FunctionVisibility},
    values::{
        ContractValue, ExternalFunctionKind, ExternalFunctionValue, InternalFunctionKind, InternalFunctionValue,
        StringValue,
    },
};

use crate::{
    context::DecodeContext,
    error::{Caught, DecoderError, DecoderResult, fail, missing_type},
    options::{DecodeOptions, PaddingMode},
    read::read,
    request::DecodeFuture,
};

const NOT_ELEMENTARY: Error = Error::new(
    ErrorCategory::Type,
    codes::TYPE_KIND_MISMATCH,
    "Type is not an elementary type",
);

/// Reads `pointer` and decodes the bytes as the elementary type `ty`.
pub(crate) fn decode_basic<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    pointer: Pointer,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let bytes = match read(ctx, &pointer).await.caught()? {
            Ok(bytes) => bytes,
            Err(error) => return fail(ty, error, &options),
        };
        decode_basic_bytes(ctx, ty, bytes, options).await
    })
}

/// Decodes already-read bytes as the elementary type `ty`.
pub(crate) fn decode_basic_bytes<'a>(
    ctx: &'a DecodeContext<'a>,
    ty: &'a Type,
    bytes: Vec<u8>,
    options: DecodeOptions,
) -> DecodeFuture<'a, Decoded> {
    Box::pin(async move {
        let mode = options.padding_mode;
        let padding = padding_type(ty, mode);
        let value = match ty {
            Type::Bool => {
                if !check_padding(&bytes, ty, 1, mode) {
                    return fail(ty, ErrorKind::BoolPadding { raw: bytes, padding }, &options);
                }
                let numeric = to_u256(&remove_padding(&bytes, ty, 1, mode));
                if numeric == U256::ZERO {
                    Value::Bool(false)
                } else if numeric == U256::ONE {
                    Value::Bool(true)
                } else {
                    return fail(ty, ErrorKind::BoolOutOfRange { raw: numeric }, &options);
                }
            },
            Type::Uint { bits } => {
                let width = usize::from(*bits) / 8;
                if !check_padding(&bytes, ty, width, mode) {
                    return fail(ty, ErrorKind::UintPadding { raw: bytes, padding }, &options);
                }
                Value::Uint {
                    value: to_u256(&remove_padding(&bytes, ty, width, mode)),
                    raw:   to_u256(&bytes),
                }
            },
            Type::Int { bits } => {
                let width = usize::from(*bits) / 8;
                if !check_padding(&bytes, ty, width, mode) {
                    return fail(ty, ErrorKind::IntPadding { raw: bytes, padding }, &options);
                }
                Value::Int {
                    value: to_i256(&remove_padding(&bytes, ty, width, mode)),
                    raw:   to_i256(&bytes),
                }
            },
            Type::Address { .. } => {
                if !check_padding(&bytes, ty, ADDRESS_SIZE, mode) {
                    return fail(ty, ErrorKind::AddressPadding { raw: bytes, padding }, &options);
                }
                let address = address_from(&remove_padding(&bytes, ty, ADDRESS_SIZE, mode))?;
                Value::Address { address, raw: bytes }
            },
            Type::Contract(_) => {
                if !check_padding(&bytes, ty, ADDRESS_SIZE, mode) {
                    return fail(ty, ErrorKind::ContractPadding { raw: bytes, padding }, &options);
                }
                let address = address_from(&remove_padding(&bytes, ty, ADDRESS_SIZE, mode))?;
                Value::Contract(decode_contract(ctx, address).await?)
            },
            Type::FixedBytes { length } => {
                let width = usize::from(*length);
                if !check_padding(&bytes, ty, width, mode) {
                    return fail(ty, ErrorKind::BytesPadding { raw: bytes, padding }, &options);
                }
                Value::FixedBytes {
                    bytes: remove_padding(&bytes, ty, width, mode),
                    raw:   bytes,
                }
            },
            Type::Bytes { .. } => Value::Bytes(bytes),
            Type::String { .. } => Value::String(StringValue::from_bytes(bytes)),
            Type::Enum(enumeration) => {
                let raw = to_u256(&bytes);
                let Some(definition) = ctx.info.user_defined_types.enum_definition(&enumeration.id) else {
                    let error = ErrorKind::EnumNotFound {
                        ty: enumeration.clone(),
                        raw,
                    };
                    return missing_type(ty, error, &options);
                };
                let width = enum_byte_width(definition.options.len());
                if !check_padding(&bytes, ty, width, mode) {
                    let error = ErrorKind::EnumPadding {
                        ty: enumeration.clone(),
                        raw: bytes,
                        padding,
                    };
                    return fail(ty, error, &options);
                }
                let numeric = to_u256(&remove_padding(&bytes, ty, width, mode));
                match conversion::to_usize(numeric).and_then(|index| definition.options.get(index)) {
                    Some(name) => Value::Enum {
                        name: name.clone(),
                        numeric,
                    },
                    None => {
                        let error = ErrorKind::EnumOutOfRange {
                            ty:  enumeration.clone(),
                            raw: numeric,
                        };
                        return fail(ty, error, &options);
                    },
                }
            },
            Type::Fixed { .. } | Type::Ufixed { .. } => {
                return fail(ty, ErrorKind::FixedPointNotYetSupported { ty: ty.clone() }, &options);
            },
            Type::Function(function) => match function.visibility {
                FunctionVisibility::External => {
                    if !check_padding(&bytes, ty, EXTERNAL_FUNCTION_SIZE, mode) {
                        return fail(ty, ErrorKind::FunctionExternalNonStackPadding { raw: bytes }, &options);
                    }
                    let unpadded = pad_right(&remove_padding(&bytes, ty, EXTERNAL_FUNCTION_SIZE, mode), EXTERNAL_FUNCTION_SIZE);
                    let address = address_from(&unpadded[..ADDRESS_SIZE])?;
                    let function = decode_external_function(ctx, address, &unpadded[ADDRESS_SIZE..]).await?;
                    Value::ExternalFunction(function)
                },
                FunctionVisibility::Internal => {
                    if options.strict_abi_mode {
                        return Err(DecoderError::stop(ErrorKind::InternalFunctionInAbi));
                    }
                    if !check_padding(&bytes, ty, INTERNAL_FUNCTION_SIZE, mode) {
                        return fail(ty, ErrorKind::FunctionInternalPadding { raw: bytes }, &options);
                    }
                    let unpadded = pad_left(&remove_padding(&bytes, ty, INTERNAL_FUNCTION_SIZE, mode), INTERNAL_FUNCTION_SIZE);
                    let constructor_pc = pc_from(&unpadded[..PC_SIZE]);
                    let deployed_pc = pc_from(&unpadded[PC_SIZE..]);
                    return decode_internal_function(ctx, ty, deployed_pc, constructor_pc, &options);
                },
            },
            Type::UserDefinedValueType(value_type) => {
                let Some(definition) = ctx.info.user_defined_types.value_type_definition(&value_type.id) else {
                    return missing_type(ty, ErrorKind::type_not_found(ty), &options);
                };
                return match decode_basic_bytes(ctx, &definition.underlying, bytes, options).await? {
                    Decoded::Value(inner) => Ok(Decoded::value(ty.clone(), Value::UserDefined(Box::new(inner)))),
                    Decoded::Error(inner) => Ok(Decoded::error(ty.clone(), ErrorKind::WrappedError(Box::new(inner)))),
                };
            },
            Type::Array(_)
            | Type::Mapping(_)
            | Type::Struct(_)
            | Type::Tuple(_)
            | Type::Magic(_) => return Err(DecoderError::Fatal(NOT_ELEMENTARY)),
        };
        Ok(Decoded::value(ty.clone(), value))
    })
}

fn address_from(bytes: &[u8]) -> DecoderResult<Address> {
    Ok(Address::from_slice(&pad_left(bytes, ADDRESS_SIZE))?)
}

fn pc_from(bytes: &[u8]) -> u32 {
    let mut pc = [0u8; PC_SIZE];
    pc.copy_from_slice(&bytes[..PC_SIZE]);
    u32::from_be_bytes(pc)
}

fn default_padding(ty: &Type) -> PaddingType {
    match ty {
        Type::FixedBytes { .. } => PaddingType::Right,
        Type::Int { .. } | Type::Fixed { .. } => PaddingType::Signed,
        Type::Function(FunctionType {
            visibility: FunctionVisibility::External,
            ..
        }) => PaddingType::Right,
        _ => PaddingType::Left,
    }
}

/// Padding expected around `ty` under `mode`.
pub(crate) fn padding_type(ty: &Type, mode: PaddingMode) -> PaddingType {
    match mode {
        PaddingMode::Right => PaddingType::Right,
        PaddingMode::Default | PaddingMode::Permissive => default_padding(ty),
        PaddingMode::Zero => match default_padding(ty) {
            PaddingType::Signed => PaddingType::SignedOrLeft,
            other => other,
        },
    }
}

fn padding_relaxed(ty: &Type, mode: PaddingMode) -> bool {
    mode == PaddingMode::Permissive
        && matches!(
            ty,
            Type::Bool
                | Type::Uint { .. }
                | Type::Int { .. }
                | Type::Address { .. }
                | Type::Contract(_)
                | Type::FixedBytes { .. }
        )
}

/// Whether the padding around the `width` significant bytes is clean.
pub(crate) fn check_padding(bytes: &[u8], ty: &Type, width: usize, mode: PaddingMode) -> bool {
    if padding_relaxed(ty, mode) {
        return true;
    }
    match padding_type(ty, mode) {
        PaddingType::Left => check_padding_left(bytes, width),
        PaddingType::Right => check_padding_right(bytes, width),
        PaddingType::Signed => check_padding_signed(bytes, width),
        PaddingType::SignedOrLeft => check_padding_signed(bytes, width) || check_padding_left(bytes, width),
    }
}

/// The `width` significant bytes of `bytes`.
pub(crate) fn remove_padding(bytes: &[u8], ty: &Type, width: usize, mode: PaddingMode) -> Vec<u8> {
    match padding_type(ty, mode) {
        PaddingType::Right => bytes[..width.min(bytes.len())].to_vec(),
        PaddingType::Left | PaddingType::Signed | PaddingType::SignedOrLeft => {
            bytes[bytes.len().saturating_sub(width)..].to_vec()
        },
    }
}

pub(crate) fn check_padding_left(bytes: &[u8], width: usize) -> bool {
    let padding = bytes.len().saturating_sub(width);
    bytes[..padding].iter().all(|byte| *byte == 0)
}

fn check_padding_right(bytes: &[u8], width: usize) -> bool {
    bytes.iter().skip(width).all(|byte| *byte == 0)
}

fn check_padding_signed(bytes: &[u8], width: usize) -> bool {
    let padding = bytes.len().saturating_sub(width);
    let fill = match bytes.get(padding) {
        Some(first) if first & 0x80 != 0 => 0xff,
        _ => 0x00,
    };
    bytes[..padding].iter().all(|byte| *byte == fill)
}

/// Classifies the contract at `address` by the code deployed there.
pub(crate) async fn decode_contract(ctx: &DecodeContext<'_>, address: Address) -> DecoderResult<ContractValue> {
    let code = ctx.code(address).await?;
    Ok(match ctx.info.find_context(&code) {
        Some(context) => ContractValue::Known {
            address,
            class: context.contract_type(),
        },
        None => ContractValue::Unknown { address },
    })
}

/// Resolves an external function pointer through the target's interface.
pub(crate) async fn decode_external_function(
    ctx: &DecodeContext<'_>,
    address: Address,
    selector_bytes: &[u8],
) -> DecoderResult<ExternalFunctionValue> {
    let mut selector = [0u8; SELECTOR_SIZE];
    selector.copy_from_slice(&pad_right(selector_bytes, SELECTOR_SIZE)[..SELECTOR_SIZE]);

    let code = ctx.code(address).await?;
    let Some(context) = ctx.info.find_context(&code) else {
        return Ok(ExternalFunctionValue {
            contract: ContractValue::Unknown { address },
            selector,
            kind: ExternalFunctionKind::Unknown,
        });
    };
    let kind = match context.abi.get(&selector) {
        Some(entry) => ExternalFunctionKind::Known(entry.clone()),
        None => ExternalFunctionKind::Invalid,
    };
    Ok(ExternalFunctionValue {
        contract: ContractValue::Known {
            address,
            class: context.contract_type(),
        },
        selector,
        kind,
    })
}

/// Resolves an internal function pointer through the function table.
///
/// Deployed code stores the deployed program counter; constructor code
/// stores both, constructor first.
fn decode_internal_function(
    ctx: &DecodeContext<'_>,
    ty: &Type,
    deployed_pc: u32,
    constructor_pc: u32,
    options: &DecodeOptions,
) -> DecoderResult<Decoded> {
    let current = ctx.info.current_context.as_ref();
    let context = current.map(|context| context.contract_type());
    let value = |kind| {
        Decoded::value(
            ty.clone(),
            Value::InternalFunction(InternalFunctionValue {
                context: context.clone(),
                deployed_pc,
                constructor_pc,
                kind,
            }),
        )
    };

    let Some(table) = ctx.info.internal_functions_table.as_ref() else {
        return Ok(value(InternalFunctionKind::Unknown));
    };
    if deployed_pc == 0 && constructor_pc == 0 {
        return Ok(value(InternalFunctionKind::Exception));
    }
    if deployed_pc == 0 {
        let error = ErrorKind::MalformedInternalFunction {
            deployed_pc,
            constructor_pc,
        };
        return fail(ty, error, options);
    }
    let in_constructor = current.is_some_and(|context| context.is_constructor);
    if in_constructor && constructor_pc == 0 {
        return fail(ty, ErrorKind::DeployedFunctionInConstructor { deployed_pc }, options);
    }

    let pc = if in_constructor { constructor_pc } else { deployed_pc };
    match table.get(&pc) {
        None => {
            log::debug!("no internal function at pc {pc}");
            let error = ErrorKind::NoSuchInternalFunction {
                deployed_pc,
                constructor_pc,
            };
            fail(ty, error, options)
        },
        Some(InternalFunctionEntry::DesignatedInvalid) => Ok(value(InternalFunctionKind::Exception)),
        Some(InternalFunctionEntry::Function {
            name,
            defined_in,
            mutability,
            visibility,
        }) => Ok(value(InternalFunctionKind::Function {
            name:       name.clone(),
            defined_in: defined_in.clone(),
            mutability: *mutability,
            visibility: *visibility,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_padding() {
        let mut word = [0u8; 32];
        word[31] = 7;
        assert!(check_padding(&word, &Type::uint(8), 1, PaddingMode::Default));
        word[0] = 1;
        assert!(!check_padding(&word, &Type::uint(8), 1, PaddingMode::Default));
        assert!(check_padding(&word, &Type::uint(8), 1, PaddingMode::Permissive));
        assert_eq!(remove_padding(&word, &Type::uint(8), 1, PaddingMode::Permissive), vec![7]);
    }

    #[test]
    fn test_signed_padding() {
        let mut word = [0xffu8; 32];
        word[31] = 0x80;
        assert!(check_padding(&word, &Type::int(8), 1, PaddingMode::Default));
        word[31] = 0x7f;
        assert!(!check_padding(&word, &Type::int(8), 1, PaddingMode::Default));

        let mut zero_padded = [0u8; 32];
        zero_padded[31] = 0x80;
        assert!(!check_padding(&zero_padded, &Type::int(8), 1, PaddingMode::Default));
        assert!(check_padding(&zero_padded, &Type::int(8), 1, PaddingMode::Zero));
    }

    #[test]
    fn test_right_padding_for_fixed_bytes() {
        let ty = Type::FixedBytes { length: 2 };
        let mut word = [0u8; 32];
        word[0] = 0xab;
        word[1] = 0xcd;
        assert!(check_padding(&word, &ty, 2, PaddingMode::Default));
        assert_eq!(remove_padding(&word, &ty, 2, PaddingMode::Default), vec![0xab, 0xcd]);
        word[31] = 1;
        assert!(!check_padding(&word, &ty, 2, PaddingMode::Default));
    }

    #[test]
    fn test_enum_stays_strict_when_permissive() {
        let ty = Type::Enum(codec_format::types::EnumType {
            id:        codec_format::types::TypeId::new("c", 1),
            type_name: "Color".into(),
        });
        let mut word = [0u8; 32];
        word[0] = 1;
        assert!(!check_padding(&word, &ty, 1, PaddingMode::Permissive));
    }
}
