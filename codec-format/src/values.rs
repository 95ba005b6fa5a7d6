// Codec - codec-format
// Module: Decoded Values
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decoded results.
//!
//! Every node of a decoded tree is either a [`TypedValue`] or an
//! [`ErrorResult`] scoped to that node; siblings of a failed node are
//! unaffected. Values own their bytes and never borrow from the state.

use ethnum::{I256, U256};

use crate::{
    context::FunctionAbiEntry,
    conversion::{Address, Selector},
    errors::ErrorKind,
    pointer::MappingKey,
    types::{ContractType, Mutability, Type, Visibility},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    pub ty:    Type,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResult {
    pub ty:    Type,
    pub error: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Value(TypedValue),
    Error(ErrorResult),
}

impl Decoded {
    pub fn value(ty: Type, value: Value) -> Self {
        Self::Value(TypedValue { ty, value })
    }

    pub fn error(ty: Type, error: ErrorKind) -> Self {
        Self::Error(ErrorResult { ty, error })
    }

    pub fn ty(&self) -> &Type {
        match self {
            Self::Value(value) => &value.ty,
            Self::Error(error) => &error.ty,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(&value.value),
            Self::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorKind> {
        match self {
            Self::Value(_) => None,
            Self::Error(error) => Some(&error.error),
        }
    }
}

/// A possibly named member of a struct, tuple or magic record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedDecoded {
    pub name:  Option<String>,
    pub value: Decoded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub key:   MappingKey,
    pub value: Decoded,
}

/// Strings that fail UTF-8 validation keep their bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringValue {
    Valid(String),
    Malformed(Vec<u8>),
}

impl StringValue {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::Valid(text),
            Err(error) => Self::Malformed(error.into_bytes()),
        }
    }

    /// Hex rendering of malformed strings, `None` for valid ones.
    pub fn malformed_hex(&self) -> Option<String> {
        match self {
            Self::Valid(_) => None,
            Self::Malformed(bytes) => Some(format!("0x{}", hex::encode(bytes))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractValue {
    Known {
        address: Address,
        class:   ContractType,
    },
    Unknown {
        address: Address,
    },
}

impl ContractValue {
    pub fn address(&self) -> Address {
        match self {
            Self::Known { address, .. } | Self::Unknown { address } => *address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalFunctionKind {
    Known(FunctionAbiEntry),
    /// Contract is known but has no function with this selector
    Invalid,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFunctionValue {
    pub contract: ContractValue,
    pub selector: Selector,
    pub kind:     ExternalFunctionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalFunctionKind {
    Function {
        name:       String,
        defined_in: ContractType,
        mutability: Option<Mutability>,
        visibility: Option<Visibility>,
    },
    Exception,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalFunctionValue {
    pub context:        Option<ContractType>,
    pub deployed_pc:    u32,
    pub constructor_pc: u32,
    pub kind:           InternalFunctionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    /// `value` is truncated to the declared width, `raw` is the whole input
    Uint {
        value: U256,
        raw:   U256,
    },
    Int {
        value: I256,
        raw:   I256,
    },
    Address {
        address: Address,
        raw:     Vec<u8>,
    },
    Contract(ContractValue),
    FixedBytes {
        bytes: Vec<u8>,
        raw:   Vec<u8>,
    },
    Bytes(Vec<u8>),
    String(StringValue),
    Enum {
        name:    String,
        numeric: U256,
    },
    /// `reference` counts the levels up to an enclosing value at the same
    /// memory address, when decoding stopped at a cycle
    Array {
        elements:  Vec<Decoded>,
        reference: Option<usize>,
    },
    Struct {
        members:   Vec<NamedDecoded>,
        reference: Option<usize>,
    },
    Tuple(Vec<NamedDecoded>),
    Mapping(Vec<MappingEntry>),
    ExternalFunction(ExternalFunctionValue),
    InternalFunction(InternalFunctionValue),
    Magic(Vec<NamedDecoded>),
    UserDefined(Box<TypedValue>),
}
