// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![allow(clippy::unwrap_used)]
//! Memory objects and stack words

mod common;

use std::collections::BTreeMap;

use codec_decoder::prelude::*;
use codec_format::{
    context::{Context, FunctionAbiEntry},
    types::{FunctionType, FunctionVisibility, Mutability},
    values::ExternalFunctionKind,
};
use common::*;

/// Memory with the free memory area starting at 0x80
fn memory(objects: &[Word]) -> Vec<u8> {
    let mut memory = vec![0u8; 0x80];
    memory.extend(concat(objects));
    memory
}

#[test]
fn test_memory_array_through_stack_pointer() {
    let state = EvmState::new()
        .with_memory(memory(&[word(2), word(10), word(20)]))
        .with_stack(vec![word(0x80)]);
    let info = ExecutionInfo::new(state);
    let ty = Type::dynamic_array(Type::uint(256), DataLocation::Memory);
    let decoded = decode_local(&info, &ty, Pointer::stack(0, 1));

    let values: Vec<U256> = elements(&decoded).iter().map(uint_value).collect();
    assert_eq!(values, [U256::new(10), U256::new(20)]);
}

#[test]
fn test_memory_array_length_past_memory() {
    let state = EvmState::new()
        .with_memory(memory(&[word(1 << 22), word(10)]))
        .with_stack(vec![word(0x80)]);
    let info = ExecutionInfo::new(state);
    let ty = Type::dynamic_array(Type::uint(256), DataLocation::Memory);
    let decoded = decode_local(&info, &ty, Pointer::stack(0, 1));

    assert_eq!(
        decoded.as_error(),
        Some(&ErrorKind::OverlongArraysAndStrings {
            length:      U256::new(1 << 22),
            data_length: Some(0xc0),
        })
    );
}

#[test]
fn test_memory_string_inside_struct() {
    // struct at 0x80 with a pointer to the string at 0xc0
    let state = EvmState::new()
        .with_memory(memory(&[word(7), word(0xc0), word(5), left_aligned(b"hello")]))
        .with_stack(vec![word(0x80)]);
    let info = info_with_types(state, vec![struct_definition(1, "Entry", vec![
        ("id", Type::uint(256)),
        ("label", Type::string(DataLocation::Storage)),
    ])]);
    let ty = struct_type(1, "Entry", DataLocation::Memory);
    let decoded = decode_local(&info, &ty, Pointer::stack(0, 1));

    let fields = members(&decoded);
    assert_eq!(uint_value(&fields[0].1), U256::new(7));
    assert_eq!(string_value(&fields[1].1), "hello");
    assert_eq!(fields[1].1.ty(), &Type::string(DataLocation::Memory));
}

#[test]
fn test_self_referential_memory_array() {
    let state = EvmState::new()
        .with_memory(memory(&[word(1), word(0x80)]))
        .with_stack(vec![word(0x80)]);
    let info = ExecutionInfo::new(state);
    let inner = Type::dynamic_array(Type::uint(256), DataLocation::Memory);
    let ty = Type::dynamic_array(inner, DataLocation::Memory);
    let decoded = decode_local(&info, &ty, Pointer::stack(0, 1));

    let nested = elements(&decoded);
    assert_eq!(nested.len(), 1);
    assert_eq!(
        nested[0].as_value(),
        Some(&Value::Array {
            elements:  Vec::new(),
            reference: Some(1),
        })
    );
}

#[test]
fn test_calldata_array_from_two_stack_words() {
    let mut calldata = vec![0xde, 0xad, 0xbe, 0xef];
    calldata.extend(concat(&[word(1), word(2), word(3)]));
    let state = EvmState::new()
        .with_calldata(calldata)
        .with_stack(vec![word(4), word(3)]);
    let info = ExecutionInfo::new(state);
    let ty = Type::dynamic_array(Type::uint(256), DataLocation::Calldata);
    let decoded = decode_local(&info, &ty, Pointer::stack(0, 2));

    assert_eq!(decoded.ty(), &ty);
    let values: Vec<U256> = elements(&decoded).iter().map(uint_value).collect();
    assert_eq!(values, [U256::new(1), U256::new(2), U256::new(3)]);
}

#[test]
fn test_calldata_bytes_from_stack() {
    let mut calldata = vec![0xde, 0xad, 0xbe, 0xef];
    calldata.extend(concat(&[word(3), left_aligned(&[1, 2, 3])]));
    let state = EvmState::new()
        .with_calldata(calldata)
        .with_stack(vec![word(36), word(3), word(36)]);
    let info = ExecutionInfo::new(state);
    let ty = Type::bytes(DataLocation::Calldata);

    // offset and length
    let decoded = decode_local(&info, &ty, Pointer::stack(1, 2));
    assert_eq!(decoded.as_value(), Some(&Value::Bytes(vec![1, 2, 3])));
    // offset alone; the length word sits just before the content
    let decoded = decode_local(&info, &ty, Pointer::stack(0, 1));
    assert_eq!(decoded.as_value(), Some(&Value::Bytes(vec![1, 2, 3])));
}

#[test]
fn test_storage_array_through_stack_pointer() {
    let data = Slot::hashed(Slot::new(U256::new(2))).address();
    let state = EvmState::new()
        .with_stack(vec![word(2)])
        .with_storage_word(U256::new(2), word(2))
        .with_storage_word(data, word(100))
        .with_storage_word(data.wrapping_add(U256::ONE), word(200));
    let info = ExecutionInfo::new(state);
    let ty = Type::dynamic_array(Type::uint(256), DataLocation::Storage);
    let decoded = decode_local(&info, &ty, Pointer::stack(0, 1));

    let values: Vec<U256> = elements(&decoded).iter().map(uint_value).collect();
    assert_eq!(values, [U256::new(100), U256::new(200)]);
}

fn external_function_type() -> Type {
    Type::Function(FunctionType {
        visibility: FunctionVisibility::External,
        mutability: Mutability::View,
        inputs:     Vec::new(),
        outputs:    Vec::new(),
    })
}

#[test]
fn test_external_function_from_two_stack_words() {
    let target = Address([0x22; 20]);
    let selector = [0x70, 0xa0, 0x82, 0x31];
    let code = vec![0x60, 0x01, 0x00];
    let mut abi = BTreeMap::new();
    abi.insert(selector, FunctionAbiEntry {
        name:             "balanceOf".to_string(),
        inputs:           Vec::new(),
        outputs:          Vec::new(),
        state_mutability: Mutability::View,
    });
    let context = Context {
        binary: code.clone(),
        contract_name: Some("Vault".to_string()),
        abi,
        ..Context::default()
    };
    let state = EvmState::new().with_stack(vec![target.to_word(), word(0x70a0_8231)]);
    let info = ExecutionInfo::new(state).with_contexts(vec![context]);
    let ty = external_function_type();

    let mut session = Decoder::new(&info).decode(&ty, Pointer::stack(0, 2), DecodeOptions::default());
    assert_eq!(session.step().unwrap(), Step::Request(Request::Code { address: target }));
    match session.resume(Response::Code(code)).unwrap() {
        Step::Finished(Ok(decoded)) => match decoded.as_value() {
            Some(Value::ExternalFunction(function)) => {
                assert_eq!(function.contract.address(), target);
                assert_eq!(function.selector, selector);
                assert!(matches!(&function.kind, ExternalFunctionKind::Known(entry) if entry.name == "balanceOf"));
            },
            other => panic!("unexpected {other:?}"),
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_external_function_stack_padding() {
    let mut address = Address([0x22; 20]).to_word();
    address[0] = 0xff;
    let state = EvmState::new().with_stack(vec![address, word(0x70a0_8231)]);
    let info = ExecutionInfo::new(state);
    let decoded = decode_local(&info, &external_function_type(), Pointer::stack(0, 2));
    assert!(matches!(
        decoded.as_error(),
        Some(ErrorKind::FunctionExternalStackPadding { raw_address, .. }) if raw_address[0] == 0xff
    ));
}

#[test]
fn test_stack_read_out_of_range() {
    let info = ExecutionInfo::new(EvmState::new().with_stack(vec![word(1)]));
    let decoded = decode_local(&info, &Type::uint(256), Pointer::stack(1, 1));
    assert_eq!(decoded.as_error(), Some(&ErrorKind::ReadErrorStack { depth: 1, words: 1 }));

    let decoded = decode_local(&info, &Type::uint(256), Pointer::stack(0, 1));
    assert_eq!(uint_value(&decoded), U256::ONE);
}

#[test]
fn test_literal_pointer() {
    let info = ExecutionInfo::new(EvmState::new().with_memory(memory(&[word(2), left_aligned(b"ok")])));
    let decoded = decode_local(&info, &Type::string(DataLocation::Memory), Pointer::literal(word(0x80)));
    assert_eq!(string_value(&decoded), "ok");
}
