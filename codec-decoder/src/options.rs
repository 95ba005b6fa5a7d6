// Codec - codec-decoder
// Module: Decode Options
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Per-call decoding options.

/// How padding around a scalar is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// The type's natural padding must be clean
    #[default]
    Default,
    /// Padding of plain scalars is ignored and the value truncated
    Permissive,
    /// Signed values may also be zero padded
    Zero,
    /// Every value is right padded
    Right,
}

/// Options threaded through one decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Stop on the first data problem instead of recording it
    pub strict_abi_mode:  bool,
    /// Missing type information stops decoding with a retry hint
    pub allow_retry:      bool,
    pub padding_mode:     PaddingMode,
    /// Offsets read from ABI heads are relative to this position
    pub abi_pointer_base: usize,
}

impl DecodeOptions {
    pub const fn new() -> Self {
        Self {
            strict_abi_mode:  false,
            allow_retry:      false,
            padding_mode:     PaddingMode::Default,
            abi_pointer_base: 0,
        }
    }

    /// Options for validating untrusted ABI data
    pub const fn strict() -> Self {
        Self {
            strict_abi_mode: true,
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn with_allow_retry(mut self, allow_retry: bool) -> Self {
        self.allow_retry = allow_retry;
        self
    }

    #[must_use]
    pub const fn with_padding_mode(mut self, padding_mode: PaddingMode) -> Self {
        self.padding_mode = padding_mode;
        self
    }

    #[must_use]
    pub const fn with_abi_pointer_base(mut self, base: usize) -> Self {
        self.abi_pointer_base = base;
        self
    }
}
