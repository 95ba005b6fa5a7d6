// Codec - codec-decoder
// Module: Prelude
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Common imports for hosts driving the decoder.

pub use codec_error::{Error, ErrorCategory, Result};
pub use codec_format::{
    Address, Decoded, ErrorKind, ExecutionInfo, I256, Pointer, Type, U256, Value, Word,
    allocation::Allocations,
    pointer::{ByteLocation, ConstantDefinition, MappingKey, Slot, SpecialVariable},
    state::EvmState,
    types::{DataLocation, TupleMember},
    universe::TypeUniverse,
};

pub use crate::{
    Decoder,
    config::{DecodeLimits, DecoderConfig, ReadPolicy},
    error::{DecodeFailure, StopDecoding},
    options::{DecodeOptions, PaddingMode},
    request::{Request, Response},
    session::{Decoding, NoExternalData, RequestFulfiller, Step},
};
