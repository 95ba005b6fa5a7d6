// Codec - codec-decoder
// Module: Typed Value Decoder
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Decoder for typed values in EVM execution state
//!
//! Given a [`Type`], a [`Pointer`] saying where its bytes live, and a
//! read-only [`ExecutionInfo`] snapshot, the decoder produces a
//! [`Decoded`] tree. Malformed data becomes error results scoped to the
//! node it affects, unless strict mode asks for decoding to stop.
//!
//! Decoding may need data the snapshot does not have: the code deployed at
//! an address, or a storage slot. A decode is therefore a [`Decoding`]
//! session that suspends with a [`Request`] and continues once the host
//! supplies the [`Response`].
//!
//! ```ignore
//! let decoder = Decoder::new(&info);
//! let mut session = decoder.decode(&ty, Pointer::calldata(4, 32), DecodeOptions::default());
//! let decoded = session.run(&mut |request: &Request| host.answer(request))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `tracing`: span helpers around sessions and steps

use std::rc::Rc;

pub use codec_format::{Decoded, ExecutionInfo, Pointer, Type, Value};

pub mod config;
pub mod error;
pub mod options;
pub mod prelude;
pub mod request;
pub mod session;
#[cfg(feature = "tracing")]
pub mod tracing;

mod abi;
mod basic;
mod constant;
mod context;
mod dispatch;
mod memory;
mod read;
mod special;
mod stack;
mod storage;
mod topic;

use codec_format::{pointer::ByteLocation, types::TupleMember};
pub use config::{DecodeLimits, DecoderConfig, ReadPolicy};
use context::DecodeContext;
pub use error::{DecodeFailure, StopDecoding};
pub use options::{DecodeOptions, PaddingMode};
pub use request::{Request, Response};
use request::{DecodeFuture, RequestChannel};
pub use session::{Decoding, NoExternalData, RequestFulfiller, Step};

/// Starts decoding sessions against one execution snapshot
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    info:   &'a ExecutionInfo,
    config: DecoderConfig,
}

impl<'a> Decoder<'a> {
    pub fn new(info: &'a ExecutionInfo) -> Self {
        Self {
            info,
            config: DecoderConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Starts decoding `ty` at `pointer`.
    pub fn decode(&self, ty: &Type, pointer: Pointer, options: DecodeOptions) -> Decoding<'a> {
        #[cfg(feature = "tracing")]
        let _span = crate::tracing::DecodeTrace::started(ty.class_name(), &format!("{:?}", pointer.location())).entered();
        log::debug!("decode {} at {:?} (strict: {})", ty.class_name(), pointer.location(), options.strict_abi_mode);

        let channel = Rc::new(RequestChannel::default());
        let ctx = DecodeContext::new(self.info, self.config, Rc::clone(&channel));
        let root = ty.clone();
        let future: DecodeFuture<'a, Decoded> =
            Box::pin(async move { dispatch::decode(&ctx, &root, pointer, options).await });
        Decoding::new(ty.clone(), channel, future)
    }

    /// Starts decoding an ABI encoded parameter list whose head begins at
    /// `start`, such as function arguments after the selector or the
    /// non-indexed fields of an event.
    pub fn decode_arguments(
        &self,
        members: Vec<TupleMember>,
        location: ByteLocation,
        start: usize,
        options: DecodeOptions,
    ) -> Decoding<'a> {
        log::debug!("decode {} arguments at {location:?}+{start}", members.len());
        let ty = Type::Tuple(members);
        let channel = Rc::new(RequestChannel::default());
        let ctx = DecodeContext::new(self.info, self.config, Rc::clone(&channel));
        let root = ty.clone();
        let future: DecodeFuture<'a, Decoded> =
            Box::pin(async move { abi::decode_abi_by_position(&ctx, &root, location, start, options).await });
        Decoding::new(ty, channel, future)
    }

    /// Decodes without external data: code lookups find nothing and storage
    /// outside the snapshot is unavailable.
    pub fn decode_local(
        &self,
        ty: &Type,
        pointer: Pointer,
        options: DecodeOptions,
    ) -> core::result::Result<Decoded, DecodeFailure> {
        self.decode(ty, pointer, options).run(&mut NoExternalData)
    }
}
