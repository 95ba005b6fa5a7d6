// Codec - codec-decoder
// Module: Region Reader
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Raw byte extraction for every pointer kind.
//!
//! Failures come back as [`DecoderError::Recoverable`] read errors; storage
//! reads may suspend on slots missing from the snapshot.

use codec_format::{
    ErrorKind, Pointer, U256, Word,
    conversion::{self, u256_word},
    limits::evm::WORD_SIZE,
    pointer::{ByteLocation, ByteRange, ConstantDefinition, StackPointer, StorageRange},
};

use crate::{
    config::ReadPolicy,
    context::DecodeContext,
    error::{DecoderError, DecoderResult},
};

/// Reads the bytes `pointer` designates.
pub(crate) async fn read(ctx: &DecodeContext<'_>, pointer: &Pointer) -> DecoderResult<Vec<u8>> {
    let state = &ctx.info.state;
    match pointer {
        Pointer::Bytes { location, range } => {
            read_bytes(state.region(*location), *location, *range, ctx.config.read_policy)
        },
        Pointer::Stack(stack) => read_stack(&state.stack, *stack),
        Pointer::StackLiteral(literal) => Ok(literal.clone()),
        Pointer::Definition(definition) => read_definition(definition),
        Pointer::Special(variable) => state
            .specials
            .get(variable)
            .map(|word| word.to_vec())
            .ok_or(DecoderError::Recoverable(ErrorKind::ReadErrorSpecial {
                variable: *variable,
            })),
        Pointer::EventTopic(index) => state
            .eventtopics
            .get(*index)
            .map(|word| word.to_vec())
            .ok_or(DecoderError::Recoverable(ErrorKind::ReadErrorTopic { index: *index })),
        Pointer::Storage(range) => read_storage(ctx, range).await,
    }
}

/// Copies `range` out of `region`.
///
/// Zero-length windows always succeed. A window starting at or past the
/// end fails; one that only overhangs the end is zero filled unless the
/// policy is strict.
pub(crate) fn read_bytes(
    region: &[u8],
    location: ByteLocation,
    range: ByteRange,
    policy: ReadPolicy,
) -> DecoderResult<Vec<u8>> {
    if range.length == 0 {
        return Ok(Vec::new());
    }
    let error = || {
        DecoderError::Recoverable(ErrorKind::ReadErrorBytes {
            location: location.location(),
            start:    range.start,
            length:   range.length,
        })
    };
    let end = range.start.checked_add(range.length).ok_or_else(error)?;
    if range.start >= region.len() {
        return Err(error());
    }
    if end <= region.len() {
        return Ok(region[range.start..end].to_vec());
    }
    match policy {
        ReadPolicy::Strict => Err(error()),
        ReadPolicy::ZeroFillTail => {
            let mut bytes = region[range.start..].to_vec();
            bytes.resize(range.length, 0);
            Ok(bytes)
        },
    }
}

/// Concatenates `words` stack words whose topmost is `depth` below the top.
pub(crate) fn read_stack(stack: &[Word], pointer: StackPointer) -> DecoderResult<Vec<u8>> {
    if pointer.words == 0 {
        return Ok(Vec::new());
    }
    let error = DecoderError::Recoverable(ErrorKind::ReadErrorStack {
        depth: pointer.depth,
        words: pointer.words,
    });
    let Some(top) = pointer.depth.checked_add(1).and_then(|above| stack.len().checked_sub(above)) else {
        return Err(error);
    };
    let Some(start) = (top + 1).checked_sub(pointer.words) else {
        return Err(error);
    };
    Ok(stack[start..=top].concat())
}

fn read_definition(definition: &ConstantDefinition) -> DecoderResult<Vec<u8>> {
    match definition {
        ConstantDefinition::Number(value) => Ok(u256_word(*value).to_vec()),
        ConstantDefinition::NegativeNumber(magnitude) => Ok(u256_word(U256::ZERO.wrapping_sub(*magnitude)).to_vec()),
        ConstantDefinition::Bool(value) => Ok(u256_word(if *value { U256::ONE } else { U256::ZERO }).to_vec()),
        ConstantDefinition::Bytes(bytes) => Ok(bytes.clone()),
        ConstantDefinition::Expression(text) => Err(DecoderError::Recoverable(ErrorKind::UnsupportedConstant {
            definition: text.clone(),
        })),
    }
}

/// Reads the bytes of `range` slot by slot, suspending on unknown slots.
async fn read_storage(ctx: &DecodeContext<'_>, range: &StorageRange) -> DecoderResult<Vec<u8>> {
    let from = &range.from;
    let to = &range.to;
    let words = to.slot.offset.wrapping_sub(from.slot.offset).wrapping_add(U256::ONE);
    let error = || {
        DecoderError::Recoverable(ErrorKind::ReadErrorStorage {
            slot: from.slot.address(),
            words,
        })
    };
    let count = conversion::to_usize(words)
        .filter(|count| to.slot.offset >= from.slot.offset && *count <= ctx.config.limits.max_storage_words)
        .ok_or_else(error)?;
    let end = (count - 1) * WORD_SIZE + to.index + 1;
    if from.index >= WORD_SIZE || to.index >= WORD_SIZE || from.index >= end {
        return Err(error());
    }

    let mut data = Vec::with_capacity(count * WORD_SIZE);
    for word in 0..count {
        let address = from.slot.advanced(conversion::from_usize(word)).address();
        match ctx.storage_word(address).await? {
            Some(bytes) => data.extend_from_slice(&bytes),
            None => {
                return Err(DecoderError::Recoverable(ErrorKind::StorageNotSupplied { slot: address }));
            },
        }
    }
    Ok(data[from.index..end].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(byte: u8) -> Word {
        [byte; WORD_SIZE]
    }

    #[test]
    fn test_read_bytes_zero_fill() {
        let region = [1u8, 2, 3, 4];
        let bytes = read_bytes(&region, ByteLocation::Memory, ByteRange::new(2, 4), ReadPolicy::ZeroFillTail).unwrap();
        assert_eq!(bytes, vec![3, 4, 0, 0]);
        assert!(read_bytes(&region, ByteLocation::Memory, ByteRange::new(2, 4), ReadPolicy::Strict).is_err());
    }

    #[test]
    fn test_read_bytes_start_past_end() {
        let region = [0u8; 32];
        let result = read_bytes(&region, ByteLocation::Calldata, ByteRange::new(32, 1), ReadPolicy::ZeroFillTail);
        assert!(matches!(
            result,
            Err(DecoderError::Recoverable(ErrorKind::ReadErrorBytes { start: 32, length: 1, .. }))
        ));
        assert!(read_bytes(&region, ByteLocation::Calldata, ByteRange::new(1000, 0), ReadPolicy::Strict)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_read_stack_depth_from_top() {
        let stack = vec![word(1), word(2), word(3)];
        assert_eq!(read_stack(&stack, StackPointer { depth: 0, words: 1 }).unwrap(), word(3).to_vec());
        let two = read_stack(&stack, StackPointer { depth: 1, words: 2 }).unwrap();
        assert_eq!(&two[..WORD_SIZE], &word(1));
        assert_eq!(&two[WORD_SIZE..], &word(2));
        assert!(read_stack(&stack, StackPointer { depth: 3, words: 1 }).is_err());
        assert!(read_stack(&stack, StackPointer { depth: 1, words: 3 }).is_err());
    }

    #[test]
    fn test_read_definition_negative() {
        let bytes = read_definition(&ConstantDefinition::NegativeNumber(U256::ONE)).unwrap();
        assert_eq!(bytes, vec![0xff; WORD_SIZE]);
        assert!(read_definition(&ConstantDefinition::Expression("1 + x".into())).is_err());
    }
}
