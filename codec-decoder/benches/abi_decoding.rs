// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![allow(clippy::unwrap_used)]

use codec_decoder::prelude::*;
use codec_format::{conversion::u256_word, pointer::StorageRange};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Calldata for `(uint256[] values, string label)` with `length` values
fn encoded_arguments(length: usize) -> Vec<u8> {
    let mut calldata = Vec::new();
    let tail = 0x40 + 0x20 * (length + 1);
    calldata.extend(u256_word(U256::new(0x40)));
    calldata.extend(u256_word(U256::new(tail as u128)));
    calldata.extend(u256_word(U256::new(length as u128)));
    for index in 0..length {
        calldata.extend(u256_word(U256::new(index as u128 * 3)));
    }
    calldata.extend(u256_word(U256::new(11)));
    let mut label = [0u8; 32];
    label[..11].copy_from_slice(b"bench label");
    calldata.extend(label);
    calldata
}

fn arguments() -> Vec<TupleMember> {
    vec![
        TupleMember {
            name: Some("values".to_string()),
            ty:   Type::dynamic_array(Type::uint(256), DataLocation::Calldata),
        },
        TupleMember {
            name: Some("label".to_string()),
            ty:   Type::string(DataLocation::Calldata),
        },
    ]
}

fn benchmark_calldata_arguments(c: &mut Criterion) {
    let mut group = c.benchmark_group("calldata_arguments");
    for length in [1usize, 16, 256] {
        let info = ExecutionInfo::new(EvmState::new().with_calldata(encoded_arguments(length)));
        group.bench_with_input(BenchmarkId::from_parameter(length), &info, |b, info| {
            b.iter(|| {
                let decoded = Decoder::new(info)
                    .decode_arguments(arguments(), ByteLocation::Calldata, 0, DecodeOptions::default())
                    .run(&mut NoExternalData)
                    .unwrap();
                black_box(decoded)
            });
        });
    }
    group.finish();
}

fn benchmark_strict_mode(c: &mut Criterion) {
    let info = ExecutionInfo::new(EvmState::new().with_calldata(encoded_arguments(64)));
    c.bench_function("calldata_arguments_strict", |b| {
        b.iter(|| {
            let decoded = Decoder::new(black_box(&info))
                .decode_arguments(arguments(), ByteLocation::Calldata, 0, DecodeOptions::strict())
                .run(&mut NoExternalData)
                .unwrap();
            black_box(decoded)
        });
    });
}

fn benchmark_storage_requests(c: &mut Criterion) {
    let info = ExecutionInfo::new(EvmState::new());
    let ty = Type::static_array(Type::uint(64), 64, DataLocation::Storage);
    let pointer = Pointer::Storage(StorageRange::words(Slot::new(U256::ZERO), U256::new(16)));
    c.bench_function("storage_requests", |b| {
        b.iter(|| {
            let decoded = Decoder::new(&info)
                .decode(&ty, pointer.clone(), DecodeOptions::default())
                .run(&mut |_: &Request| Response::Storage(Some(u256_word(U256::new(0x0101)))))
                .unwrap();
            black_box(decoded)
        });
    });
}

criterion_group!(benches, benchmark_calldata_arguments, benchmark_strict_mode, benchmark_storage_requests);
criterion_main!(benches);
