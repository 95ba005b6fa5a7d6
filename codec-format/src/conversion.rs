// Codec - codec-format
// Module: Word Conversions
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Conversions between raw big-endian bytes, 256-bit numbers and addresses.

use core::fmt;

use codec_error::{Error, Result};
use ethnum::{I256, U256};

use crate::limits::evm::{ADDRESS_SIZE, WORD_SIZE};

/// A 32-byte machine word
pub type Word = [u8; WORD_SIZE];

/// A 4-byte function selector
pub type Selector = [u8; 4];

/// A 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    /// Builds an address from exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; ADDRESS_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::invalid_length("Address must be exactly 20 bytes"))?;
        Ok(Self(array))
    }

    /// Takes the low 20 bytes of a word.
    pub fn from_word(word: &Word) -> Self {
        let mut array = [0u8; ADDRESS_SIZE];
        array.copy_from_slice(&word[WORD_SIZE - ADDRESS_SIZE..]);
        Self(array)
    }

    pub fn to_word(&self) -> Word {
        let mut word = [0u8; WORD_SIZE];
        word[WORD_SIZE - ADDRESS_SIZE..].copy_from_slice(&self.0);
        word
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

/// Interprets up to 32 big-endian bytes as an unsigned number.
///
/// Longer inputs keep only their trailing 32 bytes.
pub fn to_u256(bytes: &[u8]) -> U256 {
    U256::from_be_bytes(left_aligned_word(bytes, 0))
}

/// Interprets big-endian bytes as a two's complement number of the same
/// width, sign-extending to 256 bits.
pub fn to_i256(bytes: &[u8]) -> I256 {
    let fill = match bytes.first() {
        Some(first) if first & 0x80 != 0 => 0xff,
        _ => 0x00,
    };
    I256::from_be_bytes(left_aligned_word(bytes, fill))
}

fn left_aligned_word(bytes: &[u8], fill: u8) -> Word {
    let mut word = [fill; WORD_SIZE];
    let tail = &bytes[bytes.len().saturating_sub(WORD_SIZE)..];
    word[WORD_SIZE - tail.len()..].copy_from_slice(tail);
    word
}

/// Converts to `usize` when the value fits.
pub fn to_usize(value: U256) -> Option<usize> {
    let (high, low) = value.into_words();
    if high != 0 {
        return None;
    }
    usize::try_from(low).ok()
}

/// Converts a `usize` into a 256-bit number.
pub fn from_usize(value: usize) -> U256 {
    // usize is at most 128 bits on every supported target
    U256::new(value as u128)
}

/// Encodes an unsigned number as a full word.
pub fn u256_word(value: U256) -> Word {
    value.to_be_bytes()
}

/// Encodes a signed number as a sign-extended full word.
pub fn i256_word(value: I256) -> Word {
    value.to_be_bytes()
}

/// Left-pads `bytes` with zeros to `length`; longer input keeps its tail.
pub fn pad_left(bytes: &[u8], length: usize) -> Vec<u8> {
    let tail = &bytes[bytes.len().saturating_sub(length)..];
    let mut padded = vec![0u8; length - tail.len()];
    padded.extend_from_slice(tail);
    padded
}

/// Right-pads `bytes` with zeros to `length`; longer input keeps its head.
pub fn pad_right(bytes: &[u8], length: usize) -> Vec<u8> {
    let mut padded = bytes[..bytes.len().min(length)].to_vec();
    padded.resize(length, 0);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_extension() {
        assert_eq!(to_i256(&[0xff]), I256::new(-1));
        assert_eq!(to_i256(&[0x00, 0x80]), I256::new(128));
        assert_eq!(to_i256(&[0x80, 0x00]), I256::new(-32768));
        assert_eq!(to_i256(&[]), I256::ZERO);
    }

    #[test]
    fn test_usize_bounds() {
        assert_eq!(to_usize(U256::new(42)), Some(42));
        assert_eq!(to_usize(U256::MAX), None);
    }

    #[test]
    fn test_padding_helpers() {
        assert_eq!(pad_left(&[1, 2], 4), vec![0, 0, 1, 2]);
        assert_eq!(pad_right(&[1, 2], 4), vec![1, 2, 0, 0]);
        assert_eq!(pad_left(&[1, 2, 3], 2), vec![2, 3]);
    }

    #[test]
    fn test_address_word() {
        let address = Address([0x11; ADDRESS_SIZE]);
        let word = address.to_word();
        assert!(word[..12].iter().all(|b| *b == 0));
        assert_eq!(Address::from_word(&word), address);
        assert!(Address::from_slice(&[0u8; 19]).is_err());
    }
}
