// Codec - codec-error
// Module: Error Codes
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Error codes for the decoder workspace

// Decoding contract error codes (1000-1999)
/// Pointer kind cannot be decoded with the requested type
pub const POINTER_TYPE_MISMATCH: u16 = 1000;
/// Pointer was expected to carry literal bytes
pub const LITERAL_POINTER_EXPECTED: u16 = 1001;
/// Mapping key value cannot be used to address storage
pub const INVALID_MAPPING_KEY: u16 = 1002;

// Type universe error codes (2000-2999)
/// User-defined type missing from the universe
pub const TYPE_NOT_FOUND: u16 = 2000;
/// Identifier resolves to a different kind of definition
pub const TYPE_KIND_MISMATCH: u16 = 2001;

// Allocation error codes (3000-3999)
/// Struct contains itself without indirection
pub const RECURSIVE_ALLOCATION: u16 = 3000;
/// Allocation table missing for a struct
pub const ALLOCATION_NOT_FOUND: u16 = 3001;
/// Computed layout does not fit the address space
pub const ALLOCATION_OVERFLOW: u16 = 3002;

// Session error codes (4000-4999)
/// Resume called while no request is outstanding
pub const NO_PENDING_REQUEST: u16 = 4000;
/// Response kind does not answer the outstanding request
pub const RESPONSE_MISMATCH: u16 = 4001;
/// Session stepped after it already finished
pub const SESSION_FINISHED: u16 = 4002;
/// Decode suspended without posting a request
pub const SESSION_STALLED: u16 = 4003;

// Parameter error codes (5000-5999)
/// Invalid argument supplied by the caller
pub const INVALID_ARGUMENT: u16 = 5000;
/// Byte length does not match the expected width
pub const INVALID_LENGTH: u16 = 5001;
