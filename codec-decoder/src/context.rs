// Codec - codec-decoder
// Module: Decode Context
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

use std::rc::Rc;

use codec_error::Error;
use codec_format::{Address, ExecutionInfo, U256, Word, conversion};

use crate::{
    config::DecoderConfig,
    error::{DecoderError, DecoderResult},
    request::{Fetch, Request, RequestChannel, Response},
};

/// Everything a decoder reads from, plus the channel for suspending.
pub(crate) struct DecodeContext<'a> {
    pub info:   &'a ExecutionInfo,
    pub config: DecoderConfig,
    channel:    Rc<RequestChannel>,
}

impl<'a> DecodeContext<'a> {
    pub(crate) fn new(info: &'a ExecutionInfo, config: DecoderConfig, channel: Rc<RequestChannel>) -> Self {
        Self {
            info,
            config,
            channel,
        }
    }

    /// `length` as a native length, if within the configured limit.
    pub(crate) fn bounded_length(&self, length: U256) -> Option<usize> {
        conversion::to_usize(length).filter(|length| *length <= self.config.limits.max_dynamic_length)
    }

    /// Bytecode at `address`, always asked of the driver.
    pub(crate) async fn code(&self, address: Address) -> DecoderResult<Vec<u8>> {
        log::debug!("suspending for code at {address}");
        match Fetch::new(&self.channel, Request::Code { address }).await {
            Response::Code(code) => Ok(code),
            Response::Storage(_) => Err(DecoderError::Fatal(Error::RESPONSE_MISMATCH)),
        }
    }

    /// Storage word at `slot`, from the snapshot or else from the driver.
    pub(crate) async fn storage_word(&self, slot: U256) -> DecoderResult<Option<Word>> {
        if let Some(word) = self.info.state.storage.get(&slot) {
            return Ok(Some(*word));
        }
        log::debug!("suspending for storage slot {slot:#x}");
        match Fetch::new(&self.channel, Request::Storage { slot }).await {
            Response::Storage(word) => Ok(word),
            Response::Code(_) => Err(DecoderError::Fatal(Error::RESPONSE_MISMATCH)),
        }
    }
}
