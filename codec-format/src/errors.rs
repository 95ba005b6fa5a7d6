// Codec - codec-format
// Module: Decoding Error Kinds
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Problems found in decoded data.
//!
//! An [`ErrorKind`] is a value: it ends up inside an
//! [`ErrorResult`](crate::values::ErrorResult) for the failing subtree, or
//! inside a stop signal when decoding strictly.

use core::fmt;

use codec_error::{codes, Error, ErrorCategory};
use ethnum::U256;

use crate::{
    pointer::{Location, SpecialVariable},
    types::{EnumType, Type},
    values::ErrorResult,
};

/// How the insignificant bytes of a word are expected to look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaddingType {
    /// Zeros before the value
    Left,
    /// Zeros after the value
    Right,
    /// Copies of the sign bit before the value
    Signed,
    /// Either sign extension or zeros
    SignedOrLeft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // Reads
    ReadErrorBytes {
        location: Location,
        start:    usize,
        length:   usize,
    },
    ReadErrorStack {
        depth: usize,
        words: usize,
    },
    ReadErrorStorage {
        slot:  U256,
        words: U256,
    },
    ReadErrorTopic {
        index: usize,
    },
    ReadErrorSpecial {
        variable: SpecialVariable,
    },
    StorageNotSupplied {
        slot: U256,
    },

    // Padding
    BoolPadding {
        raw:     Vec<u8>,
        padding: PaddingType,
    },
    UintPadding {
        raw:     Vec<u8>,
        padding: PaddingType,
    },
    IntPadding {
        raw:     Vec<u8>,
        padding: PaddingType,
    },
    AddressPadding {
        raw:     Vec<u8>,
        padding: PaddingType,
    },
    ContractPadding {
        raw:     Vec<u8>,
        padding: PaddingType,
    },
    BytesPadding {
        raw:     Vec<u8>,
        padding: PaddingType,
    },
    EnumPadding {
        ty:      EnumType,
        raw:     Vec<u8>,
        padding: PaddingType,
    },
    FunctionExternalNonStackPadding {
        raw: Vec<u8>,
    },
    FunctionExternalStackPadding {
        raw_address:  Vec<u8>,
        raw_selector: Vec<u8>,
    },
    FunctionInternalPadding {
        raw: Vec<u8>,
    },

    // Out of range discriminants
    BoolOutOfRange {
        raw: U256,
    },
    EnumOutOfRange {
        ty:  EnumType,
        raw: U256,
    },
    EnumNotFound {
        ty:  EnumType,
        raw: U256,
    },

    // Unsupported
    FixedPointNotYetSupported {
        ty: Type,
    },
    UnsupportedConstant {
        definition: String,
    },

    // Missing type information
    UserDefinedTypeNotFound {
        ty: Box<Type>,
    },

    IndexedReferenceType {
        ty:  Type,
        raw: Vec<u8>,
    },

    // Internal functions
    InternalFunctionInAbi,
    NoSuchInternalFunction {
        deployed_pc:    u32,
        constructor_pc: u32,
    },
    DeployedFunctionInConstructor {
        deployed_pc: u32,
    },
    MalformedInternalFunction {
        deployed_pc:    u32,
        constructor_pc: u32,
    },

    // Untrusted lengths and pointers
    OverlongArraysAndStrings {
        length:      U256,
        data_length: Option<usize>,
    },
    OverlargePointers {
        pointer: U256,
    },

    /// The underlying value of a user-defined value type failed
    WrappedError(Box<ErrorResult>),
}

impl ErrorKind {
    pub fn type_not_found(ty: &Type) -> Self {
        Self::UserDefinedTypeNotFound {
            ty: Box::new(ty.clone()),
        }
    }

    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            Self::ReadErrorBytes { .. }
                | Self::ReadErrorStack { .. }
                | Self::ReadErrorStorage { .. }
                | Self::ReadErrorTopic { .. }
                | Self::ReadErrorSpecial { .. }
                | Self::StorageNotSupplied { .. }
        )
    }

    pub fn is_padding_error(&self) -> bool {
        matches!(
            self,
            Self::BoolPadding { .. }
                | Self::UintPadding { .. }
                | Self::IntPadding { .. }
                | Self::AddressPadding { .. }
                | Self::ContractPadding { .. }
                | Self::BytesPadding { .. }
                | Self::EnumPadding { .. }
                | Self::FunctionExternalNonStackPadding { .. }
                | Self::FunctionExternalStackPadding { .. }
                | Self::FunctionInternalPadding { .. }
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadErrorBytes {
                location,
                start,
                length,
            } => write!(f, "cannot read {length} bytes at {start} from {location:?}"),
            Self::ReadErrorStack { depth, words } => {
                write!(f, "cannot read {words} stack words at depth {depth}")
            },
            Self::ReadErrorStorage { slot, words } => {
                write!(f, "cannot read {words} storage words from slot {slot}")
            },
            Self::ReadErrorTopic { index } => write!(f, "no event topic {index}"),
            Self::ReadErrorSpecial { variable } => write!(f, "no value for {variable}"),
            Self::StorageNotSupplied { slot } => write!(f, "storage slot {slot} not supplied"),
            Self::BoolPadding { raw, .. }
            | Self::UintPadding { raw, .. }
            | Self::IntPadding { raw, .. }
            | Self::AddressPadding { raw, .. }
            | Self::ContractPadding { raw, .. }
            | Self::BytesPadding { raw, .. }
            | Self::EnumPadding { raw, .. }
            | Self::FunctionExternalNonStackPadding { raw }
            | Self::FunctionInternalPadding { raw } => {
                write!(f, "padding error in 0x{}", hex::encode(raw))
            },
            Self::FunctionExternalStackPadding {
                raw_address,
                raw_selector,
            } => write!(
                f,
                "padding error in external function 0x{} / 0x{}",
                hex::encode(raw_address),
                hex::encode(raw_selector)
            ),
            Self::BoolOutOfRange { raw } => write!(f, "invalid boolean {raw}"),
            Self::EnumOutOfRange { ty, raw } => {
                write!(f, "invalid value {raw} for enum {}", ty.type_name)
            },
            Self::EnumNotFound { ty, .. } => write!(f, "enum {} not defined", ty.type_name),
            Self::FixedPointNotYetSupported { .. } => f.write_str("fixed-point decoding not supported"),
            Self::UnsupportedConstant { definition } => {
                write!(f, "unsupported constant expression {definition}")
            },
            Self::UserDefinedTypeNotFound { ty } => {
                write!(f, "definition of {} not found", ty.class_name())
            },
            Self::IndexedReferenceType { raw, .. } => {
                write!(f, "indexed reference type hash 0x{}", hex::encode(raw))
            },
            Self::InternalFunctionInAbi => f.write_str("internal function in ABI data"),
            Self::NoSuchInternalFunction { deployed_pc, .. } => {
                write!(f, "no internal function at pc {deployed_pc}")
            },
            Self::DeployedFunctionInConstructor { deployed_pc } => {
                write!(f, "deployed-only function at pc {deployed_pc} used in constructor")
            },
            Self::MalformedInternalFunction {
                deployed_pc,
                constructor_pc,
            } => write!(
                f,
                "malformed internal function (deployed {deployed_pc}, constructor {constructor_pc})"
            ),
            Self::OverlongArraysAndStrings {
                length,
                data_length,
            } => match data_length {
                Some(available) => write!(f, "length {length} exceeds available {available}"),
                None => write!(f, "length {length} too large"),
            },
            Self::OverlargePointers { pointer } => write!(f, "pointer {pointer} too large"),
            Self::WrappedError(inner) => write!(f, "underlying value: {}", inner.error),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::UserDefinedTypeNotFound { .. } | ErrorKind::EnumNotFound { .. } => {
                Error::type_not_found("User-defined type missing from the universe")
            },
            ErrorKind::OverlongArraysAndStrings { .. } => Error::allocation_error(
                codes::ALLOCATION_OVERFLOW,
                "Layout does not fit the address space",
            ),
            _ => Error::new(
                ErrorCategory::Decoding,
                codes::POINTER_TYPE_MISMATCH,
                "Value cannot be laid out",
            ),
        }
    }
}
