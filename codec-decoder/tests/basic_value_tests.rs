// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![allow(clippy::unwrap_used)]
//! Elementary value decoding: padding, ranges and lookups

mod common;

use codec_decoder::prelude::*;
use codec_format::{
    PaddingType,
    info::{InternalFunctionEntry, InternalFunctionTable},
    types::{
        ContractKind, ContractType, FunctionType, FunctionVisibility, Mutability, UserDefinedValueType, Visibility,
    },
    universe::{UserDefinedType, ValueTypeDefinition},
    values::{InternalFunctionKind, StringValue},
};
use common::*;

fn calldata_info(words: &[Word]) -> ExecutionInfo {
    ExecutionInfo::new(EvmState::new().with_calldata(concat(words)))
}

#[test]
fn test_bool_values_and_out_of_range() {
    let info = calldata_info(&[word(1), word(2)]);
    let decoded = decode_local(&info, &Type::Bool, Pointer::calldata(0, 32));
    assert_eq!(decoded.as_value(), Some(&Value::Bool(true)));

    let decoded = decode_local(&info, &Type::Bool, Pointer::calldata(32, 32));
    assert_eq!(decoded.as_error(), Some(&ErrorKind::BoolOutOfRange { raw: U256::new(2) }));

    let failure = Decoder::new(&info)
        .decode_local(&Type::Bool, Pointer::calldata(32, 32), DecodeOptions::strict())
        .unwrap_err();
    assert!(matches!(
        failure,
        DecodeFailure::Stop(StopDecoding {
            error: ErrorKind::BoolOutOfRange { .. },
            allow_retry: false,
        })
    ));
}

#[test]
fn test_uint_padding_is_checked_by_default() {
    let mut dirty = word(0x2a);
    dirty[0] = 0x01;
    let info = calldata_info(&[dirty]);

    let decoded = decode_local(&info, &Type::uint(8), Pointer::calldata(0, 32));
    assert_eq!(
        decoded.as_error(),
        Some(&ErrorKind::UintPadding {
            raw:     dirty.to_vec(),
            padding: PaddingType::Left,
        })
    );

    let permissive = DecodeOptions::default().with_padding_mode(PaddingMode::Permissive);
    let decoded = Decoder::new(&info)
        .decode_local(&Type::uint(8), Pointer::calldata(0, 32), permissive)
        .unwrap();
    assert_eq!(uint_value(&decoded), U256::new(0x2a));
}

#[test]
fn test_stack_scalars_ignore_dirty_padding() {
    let mut dirty = word(0x2a);
    dirty[3] = 0xee;
    let info = ExecutionInfo::new(EvmState::new().with_stack(vec![dirty]));
    let decoded = decode_local(&info, &Type::uint(8), Pointer::stack(0, 1));
    match decoded.as_value() {
        Some(Value::Uint { value, raw }) => {
            assert_eq!(*value, U256::new(0x2a));
            assert_eq!(*raw, U256::from_be_bytes(dirty));
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_negative_int() {
    let mut minus_two = [0xffu8; 32];
    minus_two[31] = 0xfe;
    let info = calldata_info(&[minus_two]);
    let decoded = decode_local(&info, &Type::int(8), Pointer::calldata(0, 32));
    assert_eq!(
        decoded.as_value(),
        Some(&Value::Int {
            value: I256::new(-2),
            raw:   I256::new(-2),
        })
    );

    // sign extension must match the value's sign bit
    let mut bad = [0xffu8; 32];
    bad[31] = 0x02;
    let info = calldata_info(&[bad]);
    let decoded = decode_local(&info, &Type::int(8), Pointer::calldata(0, 32));
    assert!(matches!(
        decoded.as_error(),
        Some(ErrorKind::IntPadding {
            padding: PaddingType::Signed,
            ..
        })
    ));
}

#[test]
fn test_address_and_fixed_bytes() {
    let address = Address([0x11; 20]);
    let info = calldata_info(&[address.to_word(), left_aligned(&[0xde, 0xad])]);

    let decoded = decode_local(&info, &Type::Address { payable: false }, Pointer::calldata(0, 32));
    match decoded.as_value() {
        Some(Value::Address { address: found, .. }) => assert_eq!(*found, address),
        other => panic!("unexpected {other:?}"),
    }

    let decoded = decode_local(&info, &Type::FixedBytes { length: 2 }, Pointer::calldata(32, 32));
    match decoded.as_value() {
        Some(Value::FixedBytes { bytes, .. }) => assert_eq!(bytes, &vec![0xde, 0xad]),
        other => panic!("unexpected {other:?}"),
    }

    let decoded = decode_local(&info, &Type::FixedBytes { length: 1 }, Pointer::calldata(32, 32));
    assert!(matches!(
        decoded.as_error(),
        Some(ErrorKind::BytesPadding {
            padding: PaddingType::Right,
            ..
        })
    ));
}

#[test]
fn test_enum_boundary() {
    let color = enum_type(7, "Color");
    let state = EvmState::new().with_calldata(concat(&[word(2), word(3)]));
    let info = info_with_types(state, vec![enum_definition(7, "Color", &["Red", "Green", "Blue"])]);

    let decoded = decode_local(&info, &color, Pointer::calldata(0, 32));
    assert_eq!(
        decoded.as_value(),
        Some(&Value::Enum {
            name:    "Blue".to_string(),
            numeric: U256::new(2),
        })
    );

    let decoded = decode_local(&info, &color, Pointer::calldata(32, 32));
    assert!(matches!(decoded.as_error(), Some(ErrorKind::EnumOutOfRange { raw, .. }) if *raw == U256::new(3)));
}

#[test]
fn test_unknown_enum_is_retryable() {
    let color = enum_type(8, "Missing");
    let info = calldata_info(&[word(0)]);

    let decoded = decode_local(&info, &color, Pointer::calldata(0, 32));
    assert!(matches!(decoded.as_error(), Some(ErrorKind::EnumNotFound { .. })));

    let options = DecodeOptions::default().with_allow_retry(true);
    let failure = Decoder::new(&info)
        .decode_local(&color, Pointer::calldata(0, 32), options)
        .unwrap_err();
    assert!(failure.is_retryable());
}

#[test]
fn test_fixed_point_is_unsupported() {
    let info = calldata_info(&[word(1)]);
    let ty = Type::Fixed { bits: 128, places: 18 };
    let decoded = decode_local(&info, &ty, Pointer::calldata(0, 32));
    assert!(matches!(decoded.as_error(), Some(ErrorKind::FixedPointNotYetSupported { .. })));
}

#[test]
fn test_malformed_string_keeps_bytes() {
    let mut memory = concat(&[word(0x20), word(2)]);
    memory.extend_from_slice(&left_aligned(&[0xff, 0xfe]));
    let info = ExecutionInfo::new(EvmState::new().with_memory(memory));

    let decoded = decode_local(&info, &Type::string(DataLocation::Memory), Pointer::memory(0, 32));
    let value = decoded.as_value().cloned();
    assert_eq!(value, Some(Value::String(StringValue::Malformed(vec![0xff, 0xfe]))));
    if let Some(Value::String(text)) = value {
        assert_eq!(text.malformed_hex().as_deref(), Some("0xfffe"));
    }
}

#[test]
fn test_user_defined_value_type_wraps_underlying() {
    let price = Type::UserDefinedValueType(UserDefinedValueType {
        id:        type_id(30),
        type_name: "Price".to_string(),
    });
    let definition = UserDefinedType::ValueType(ValueTypeDefinition {
        id:         type_id(30),
        type_name:  "Price".to_string(),
        underlying: Type::uint(8),
    });
    let mut dirty = word(1);
    dirty[0] = 1;
    let info = info_with_types(EvmState::new().with_calldata(concat(&[word(5), dirty])), vec![definition]);

    let decoded = decode_local(&info, &price, Pointer::calldata(0, 32));
    match decoded.as_value() {
        Some(Value::UserDefined(inner)) => {
            assert_eq!(inner.ty, Type::uint(8));
            assert_eq!(inner.value, Value::Uint {
                value: U256::new(5),
                raw:   U256::new(5),
            });
        },
        other => panic!("unexpected {other:?}"),
    }

    let decoded = decode_local(&info, &price, Pointer::calldata(32, 32));
    assert!(matches!(decoded.as_error(), Some(ErrorKind::WrappedError(inner)) if inner.error.is_padding_error()));
}

fn internal_function_type() -> Type {
    Type::Function(FunctionType {
        visibility: FunctionVisibility::Internal,
        mutability: Mutability::NonPayable,
        inputs:     Vec::new(),
        outputs:    Vec::new(),
    })
}

fn internal_pointer(constructor_pc: u32, deployed_pc: u32) -> Pointer {
    let mut word = [0u8; 32];
    word[24..28].copy_from_slice(&constructor_pc.to_be_bytes());
    word[28..].copy_from_slice(&deployed_pc.to_be_bytes());
    Pointer::literal(word)
}

fn internal_info() -> ExecutionInfo {
    let owner = ContractType {
        id:        None,
        type_name: "Vault".to_string(),
        kind:      ContractKind::Contract,
        payable:   false,
    };
    let mut table = InternalFunctionTable::new();
    table.insert(100, InternalFunctionEntry::Function {
        name:       "withdraw".to_string(),
        defined_in: owner,
        mutability: Some(Mutability::NonPayable),
        visibility: Some(Visibility::Internal),
    });
    table.insert(7, InternalFunctionEntry::DesignatedInvalid);
    ExecutionInfo::new(EvmState::new()).with_internal_functions(table)
}

fn internal_kind(decoded: &Decoded) -> InternalFunctionKind {
    match decoded.as_value() {
        Some(Value::InternalFunction(function)) => function.kind.clone(),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_internal_function_lookup() {
    let info = internal_info();
    let ty = internal_function_type();

    let decoded = decode_local(&info, &ty, internal_pointer(0, 100));
    assert!(matches!(internal_kind(&decoded), InternalFunctionKind::Function { name, .. } if name == "withdraw"));

    let decoded = decode_local(&info, &ty, internal_pointer(0, 0));
    assert_eq!(internal_kind(&decoded), InternalFunctionKind::Exception);

    let decoded = decode_local(&info, &ty, internal_pointer(0, 7));
    assert_eq!(internal_kind(&decoded), InternalFunctionKind::Exception);

    let decoded = decode_local(&info, &ty, internal_pointer(55, 0));
    assert!(matches!(decoded.as_error(), Some(ErrorKind::MalformedInternalFunction { .. })));

    let decoded = decode_local(&info, &ty, internal_pointer(0, 101));
    assert_eq!(
        decoded.as_error(),
        Some(&ErrorKind::NoSuchInternalFunction {
            deployed_pc:    101,
            constructor_pc: 0,
        })
    );
}

#[test]
fn test_internal_function_without_table() {
    let info = ExecutionInfo::new(EvmState::new());
    let decoded = decode_local(&info, &internal_function_type(), internal_pointer(0, 100));
    assert_eq!(internal_kind(&decoded), InternalFunctionKind::Unknown);
}

#[test]
fn test_internal_function_rejected_in_strict_mode() {
    let info = internal_info();
    let failure = Decoder::new(&info)
        .decode_local(&internal_function_type(), internal_pointer(0, 100), DecodeOptions::strict())
        .unwrap_err();
    assert_eq!(
        failure,
        DecodeFailure::Stop(StopDecoding {
            error:       ErrorKind::InternalFunctionInAbi,
            allow_retry: false,
        })
    );
}

#[test]
fn test_read_past_calldata_is_an_error_result() {
    let info = calldata_info(&[word(1)]);
    let decoded = decode_local(&info, &Type::uint(256), Pointer::calldata(32, 32));
    assert!(decoded.as_error().is_some_and(ErrorKind::is_read_error));

    let decoded = Decoder::new(&info)
        .with_config(DecoderConfig::strict())
        .decode_local(&Type::uint(256), Pointer::calldata(16, 32), DecodeOptions::default())
        .unwrap();
    assert!(decoded.is_error());

    // zero filled by default
    let decoded = decode_local(&info, &Type::uint(256), Pointer::calldata(16, 32));
    assert_eq!(uint_value(&decoded), U256::from_words(1, 0));
}
