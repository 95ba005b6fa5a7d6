// Codec - codec-format
// Module: Pointers
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Location-tagged pointers and storage slot addressing.
//!
//! A [`Pointer`] is consumed by exactly one read. Storage pointers address
//! [`Slot`]s, which may be derived from other slots by hashing (dynamic
//! array data, long strings) or by hashing together with a mapping key.

use core::fmt;

use ethnum::{I256, U256};
use keccak_hash::keccak;

use crate::{
    conversion::{self, Address, Word},
    limits::evm::WORD_SIZE,
};

/// Region tag of a pointer, used in read errors and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Storage,
    Memory,
    Calldata,
    Eventdata,
    Returndata,
    Stack,
    StackLiteral,
    Definition,
    Special,
    EventTopic,
}

/// Byte-addressed regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteLocation {
    Memory,
    Calldata,
    Eventdata,
    Returndata,
}

impl ByteLocation {
    pub fn location(self) -> Location {
        match self {
            Self::Memory => Location::Memory,
            Self::Calldata => Location::Calldata,
            Self::Eventdata => Location::Eventdata,
            Self::Returndata => Location::Returndata,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub start:  usize,
    pub length: usize,
}

impl ByteRange {
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }
}

/// Words on the execution stack.
///
/// `depth` is the distance from the top of the stack to the topmost word of
/// the value (0 means the value ends at the top); `words` is how many words
/// the value occupies going down from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackPointer {
    pub depth: usize,
    pub words: usize,
}

/// A mapping key in the form used to derive an entry's slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MappingKey {
    Uint(U256),
    Int(I256),
    Bool(bool),
    Address(Address),
    /// `bytesN`, stored left-aligned
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
}

impl MappingKey {
    /// Preimage bytes hashed together with the mapping's slot.
    ///
    /// Value types occupy one full word, dynamic keys contribute their raw
    /// bytes unpadded.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Uint(value) => conversion::u256_word(*value).to_vec(),
            Self::Int(value) => conversion::i256_word(*value).to_vec(),
            Self::Bool(value) => conversion::u256_word(if *value { U256::ONE } else { U256::ZERO }).to_vec(),
            Self::Address(address) => address.to_word().to_vec(),
            Self::FixedBytes(bytes) => conversion::pad_right(bytes, WORD_SIZE),
            Self::Bytes(bytes) => bytes.clone(),
            Self::String(text) => text.as_bytes().to_vec(),
        }
    }
}

/// A storage slot, possibly derived from another slot.
///
/// The address is `keccak(key . path) + offset` when a key is present,
/// `keccak(path) + offset` when `hash_path` is set, `path + offset` for a
/// plain path, and `offset` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Slot {
    pub path:      Option<Box<Slot>>,
    pub offset:    U256,
    pub key:       Option<MappingKey>,
    pub hash_path: bool,
}

impl Slot {
    pub fn new(offset: U256) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Slot at `offset` from `path`.
    pub fn relative(path: Slot, offset: U256) -> Self {
        Self {
            path: Some(Box::new(path)),
            offset,
            ..Self::default()
        }
    }

    /// Data area of a dynamic array or long string stored at `path`.
    pub fn hashed(path: Slot) -> Self {
        Self {
            path: Some(Box::new(path)),
            hash_path: true,
            ..Self::default()
        }
    }

    /// Value slot of the mapping entry `key` for the mapping at `path`.
    pub fn mapping_entry(path: Slot, key: MappingKey) -> Self {
        Self {
            path: Some(Box::new(path)),
            key: Some(key),
            ..Self::default()
        }
    }

    /// Same derivation with the offset moved by `delta` words.
    #[must_use]
    pub fn advanced(&self, delta: U256) -> Self {
        Self {
            offset: self.offset.wrapping_add(delta),
            ..self.clone()
        }
    }

    pub fn address(&self) -> U256 {
        let base = match (&self.path, &self.key) {
            (Some(path), Some(key)) => {
                let mut preimage = key.encode();
                preimage.extend_from_slice(&path.address().to_be_bytes());
                hash_to_u256(&preimage)
            },
            (Some(path), None) if self.hash_path => hash_to_u256(&path.address().to_be_bytes()),
            (Some(path), None) => path.address(),
            (None, _) => U256::ZERO,
        };
        base.wrapping_add(self.offset)
    }
}

fn hash_to_u256(preimage: &[u8]) -> U256 {
    U256::from_be_bytes(keccak(preimage).to_fixed_bytes())
}

/// A byte position inside a storage slot (0 is the most significant byte)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePosition {
    pub slot:  Slot,
    pub index: usize,
}

/// Inclusive byte span across one or more consecutive slots
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageRange {
    pub from: StoragePosition,
    pub to:   StoragePosition,
}

impl StorageRange {
    /// `words` whole slots starting at `slot`; `words` must be nonzero.
    pub fn words(slot: Slot, words: U256) -> Self {
        let last = slot.advanced(words.wrapping_sub(U256::ONE));
        Self {
            from: StoragePosition { slot, index: 0 },
            to:   StoragePosition {
                slot:  last,
                index: WORD_SIZE - 1,
            },
        }
    }

    /// `length` bytes starting at `from`, or `None` when `length` is zero.
    pub fn with_length(from: StoragePosition, length: usize) -> Option<Self> {
        if length == 0 {
            return None;
        }
        let last = from.index.checked_add(length)?.checked_sub(1)?;
        let to = StoragePosition {
            slot:  from.slot.advanced(conversion::from_usize(last / WORD_SIZE)),
            index: last % WORD_SIZE,
        };
        Some(Self { from, to })
    }

    /// The same range with both ends re-based onto `base`.
    #[must_use]
    pub fn relative_to(&self, base: &Slot) -> Self {
        Self {
            from: StoragePosition {
                slot:  Slot::relative(base.clone(), self.from.slot.offset),
                index: self.from.index,
            },
            to:   StoragePosition {
                slot:  Slot::relative(base.clone(), self.to.slot.offset),
                index: self.to.index,
            },
        }
    }
}

/// Literal from a compiled constant's defining expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstantDefinition {
    Number(U256),
    /// Negative literal given by its magnitude
    NegativeNumber(U256),
    Bool(bool),
    /// String or hex literal bytes, left-aligned
    Bytes(Vec<u8>),
    /// An expression that is not a plain literal
    Expression(String),
}

/// Named environment globals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialVariable {
    Msg,
    Tx,
    Block,
    This,
    Sender,
    Value,
    Origin,
    GasPrice,
    Coinbase,
    BaseFee,
    ChainId,
    Difficulty,
    GasLimit,
    Number,
    Timestamp,
}

impl fmt::Display for SpecialVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Msg => "msg",
            Self::Tx => "tx",
            Self::Block => "block",
            Self::This => "this",
            Self::Sender => "sender",
            Self::Value => "value",
            Self::Origin => "origin",
            Self::GasPrice => "gasprice",
            Self::Coinbase => "coinbase",
            Self::BaseFee => "basefee",
            Self::ChainId => "chainid",
            Self::Difficulty => "difficulty",
            Self::GasLimit => "gaslimit",
            Self::Number => "number",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Where a value's bytes come from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pointer {
    Storage(StorageRange),
    Bytes {
        location: ByteLocation,
        range:    ByteRange,
    },
    Stack(StackPointer),
    StackLiteral(Vec<u8>),
    Definition(ConstantDefinition),
    Special(SpecialVariable),
    EventTopic(usize),
}

impl Pointer {
    pub fn bytes(location: ByteLocation, start: usize, length: usize) -> Self {
        Self::Bytes {
            location,
            range: ByteRange::new(start, length),
        }
    }

    pub fn memory(start: usize, length: usize) -> Self {
        Self::bytes(ByteLocation::Memory, start, length)
    }

    pub fn calldata(start: usize, length: usize) -> Self {
        Self::bytes(ByteLocation::Calldata, start, length)
    }

    pub fn eventdata(start: usize, length: usize) -> Self {
        Self::bytes(ByteLocation::Eventdata, start, length)
    }

    pub fn returndata(start: usize, length: usize) -> Self {
        Self::bytes(ByteLocation::Returndata, start, length)
    }

    pub fn stack(depth: usize, words: usize) -> Self {
        Self::Stack(StackPointer { depth, words })
    }

    pub fn literal(word: Word) -> Self {
        Self::StackLiteral(word.to_vec())
    }

    pub fn location(&self) -> Location {
        match self {
            Self::Storage(_) => Location::Storage,
            Self::Bytes { location, .. } => location.location(),
            Self::Stack(_) => Location::Stack,
            Self::StackLiteral(_) => Location::StackLiteral,
            Self::Definition(_) => Location::Definition,
            Self::Special(_) => Location::Special,
            Self::EventTopic(_) => Location::EventTopic,
        }
    }
}
