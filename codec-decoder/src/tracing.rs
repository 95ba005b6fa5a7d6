// Codec - codec-decoder
// Module: Decode Tracing
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Span helpers for following decoding sessions with `tracing`.

#![cfg(feature = "tracing")]

pub use tracing::{Level, Span, debug_span, trace_span};

/// Spans for decoding sessions
#[derive(Debug, Clone)]
pub struct DecodeTrace;

impl DecodeTrace {
    /// Span for starting a decode
    #[inline]
    pub fn started(type_class: &str, location: &str) -> Span {
        debug_span!("decode_start", type_class = %type_class, location = %location)
    }

    /// Span for advancing a session up to its next request
    #[inline]
    pub fn step(type_class: &str, requests: usize) -> Span {
        trace_span!("decode_step", type_class = %type_class, requests = %requests)
    }
}
