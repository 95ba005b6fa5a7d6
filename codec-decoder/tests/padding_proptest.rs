// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![allow(clippy::unwrap_used)]
//! Property tests for scalar padding rules

mod common;

use codec_decoder::prelude::*;
use codec_format::conversion::i256_word;
use common::*;
use proptest::prelude::*;

fn decode_word(ty: &Type, encoded: Word, options: DecodeOptions) -> Decoded {
    let info = ExecutionInfo::new(EvmState::new().with_calldata(encoded.to_vec()));
    Decoder::new(&info)
        .decode_local(ty, Pointer::calldata(0, 32), options)
        .unwrap()
}

proptest! {
    #[test]
    fn uint64_values_decode(value in any::<u64>()) {
        let decoded = decode_word(&Type::uint(64), word(u128::from(value)), DecodeOptions::default());
        prop_assert_eq!(uint_value(&decoded), U256::new(u128::from(value)));
    }

    #[test]
    fn int64_values_decode(value in any::<i64>()) {
        let decoded = decode_word(&Type::int(64), i256_word(I256::new(i128::from(value))), DecodeOptions::default());
        let decoded_value = match decoded.as_value() {
            Some(Value::Int { value, .. }) => Some(*value),
            _ => None,
        };
        prop_assert_eq!(decoded_value, Some(I256::new(i128::from(value))));
    }

    #[test]
    fn dirty_high_bytes_need_permissive_mode(value in any::<u64>(), dirt in 1u8..=255, position in 0usize..24) {
        let mut encoded = word(u128::from(value));
        encoded[position] = dirt;
        let ty = Type::uint(64);

        let strict_padding = decode_word(&ty, encoded, DecodeOptions::default());
        let is_padding_error = matches!(strict_padding.as_error(), Some(ErrorKind::UintPadding { .. }));
        prop_assert!(is_padding_error);

        let permissive = decode_word(&ty, encoded, DecodeOptions::default().with_padding_mode(PaddingMode::Permissive));
        prop_assert_eq!(uint_value(&permissive), U256::new(u128::from(value)));
    }

    #[test]
    fn bool_accepts_only_zero_and_one(value in 0u128..16) {
        let decoded = decode_word(&Type::Bool, word(value), DecodeOptions::default());
        match value {
            0 | 1 => prop_assert_eq!(decoded.as_value(), Some(&Value::Bool(value == 1))),
            _ => prop_assert!(decoded.is_error()),
        }
    }
}
