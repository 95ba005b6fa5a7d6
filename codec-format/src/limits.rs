// Codec - codec-format
// Module: Layout Constants and Decoding Limits
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Layout constants and default limits for decoding

/// Machine layout constants
pub mod evm {
    /// Size of a stack, memory or storage word in bytes
    pub const WORD_SIZE: usize = 32;

    /// Size of an address in bytes
    pub const ADDRESS_SIZE: usize = 20;

    /// Size of a function selector in bytes
    pub const SELECTOR_SIZE: usize = 4;

    /// Size of a program counter inside an internal function pointer
    pub const PC_SIZE: usize = 4;

    /// Size of an external function reference (address + selector)
    pub const EXTERNAL_FUNCTION_SIZE: usize = ADDRESS_SIZE + SELECTOR_SIZE;

    /// Size of an internal function reference (two program counters)
    pub const INTERNAL_FUNCTION_SIZE: usize = 2 * PC_SIZE;
}

/// Default limits applied while decoding untrusted data
pub mod decoding {
    /// Largest dynamic length (bytes or elements) accepted before reporting
    /// an overlong value (16 MiB)
    pub const DEFAULT_MAX_DYNAMIC_LENGTH: usize = 16 * 1024 * 1024;

    /// Largest number of storage words read for a single value
    pub const DEFAULT_MAX_STORAGE_WORDS: usize = 64 * 1024;
}
