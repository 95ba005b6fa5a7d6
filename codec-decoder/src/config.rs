// Codec - codec-decoder
// Module: Decoder Configuration
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Session-wide configuration for reads and resource limits.

use codec_format::limits::decoding::{DEFAULT_MAX_DYNAMIC_LENGTH, DEFAULT_MAX_STORAGE_WORDS};

/// What a byte read does when its window runs past the end of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Missing tail bytes read as zero
    #[default]
    ZeroFillTail,
    /// Any window not fully inside the region fails
    Strict,
}

/// Bounds on lengths taken from untrusted data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Longest array, string or bytes value that will be decoded
    pub max_dynamic_length: usize,
    /// Most storage slots fetched for a single read
    pub max_storage_words:  usize,
}

impl DecodeLimits {
    pub const fn new() -> Self {
        Self {
            max_dynamic_length: DEFAULT_MAX_DYNAMIC_LENGTH,
            max_storage_words:  DEFAULT_MAX_STORAGE_WORDS,
        }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    pub read_policy: ReadPolicy,
    pub limits:      DecodeLimits,
}

impl DecoderConfig {
    pub const fn new() -> Self {
        Self {
            read_policy: ReadPolicy::ZeroFillTail,
            limits:      DecodeLimits::new(),
        }
    }

    /// Reads must stay inside their region
    pub const fn strict() -> Self {
        Self {
            read_policy: ReadPolicy::Strict,
            limits:      DecodeLimits::new(),
        }
    }

    #[must_use]
    pub const fn with_read_policy(mut self, read_policy: ReadPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    #[must_use]
    pub const fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }
}
