// Codec - codec-decoder
// Module: External Data Requests
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Requests a decode suspends on, and the single-slot channel carrying
//! them between the decoding future and its driver.

use core::{
    cell::Cell,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use codec_format::{Address, U256, Word};

use crate::error::DecoderResult;

/// Boxed decoder future, so decoders can recurse
pub(crate) type DecodeFuture<'a, T> = Pin<Box<dyn Future<Output = DecoderResult<T>> + 'a>>;

/// External data a decode needs before it can continue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Deployed bytecode at an address
    Code { address: Address },
    /// A storage word missing from the snapshot
    Storage { slot: U256 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Bytecode; empty when the address has none
    Code(Vec<u8>),
    /// The word, or `None` when the host cannot supply it
    Storage(Option<Word>),
}

impl Response {
    /// Whether this response has the shape `request` asks for.
    pub fn answers(&self, request: &Request) -> bool {
        matches!(
            (request, self),
            (Request::Code { .. }, Response::Code(_)) | (Request::Storage { .. }, Response::Storage(_))
        )
    }
}

/// Holds at most one outstanding request and its response
#[derive(Default)]
pub(crate) struct RequestChannel {
    request:  Cell<Option<Request>>,
    response: Cell<Option<Response>>,
}

impl RequestChannel {
    pub(crate) fn take_request(&self) -> Option<Request> {
        self.request.take()
    }

    pub(crate) fn respond(&self, response: Response) {
        self.response.set(Some(response));
    }
}

/// Resolves once the driver has answered `request`.
///
/// The first poll posts the request and yields; the driver then supplies a
/// response and polls again.
pub(crate) struct Fetch<'a> {
    channel: &'a RequestChannel,
    request: Option<Request>,
}

impl<'a> Fetch<'a> {
    pub(crate) fn new(channel: &'a RequestChannel, request: Request) -> Self {
        Self {
            channel,
            request: Some(request),
        }
    }
}

impl Future for Fetch<'_> {
    type Output = Response;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(request) = this.request.take() {
            this.channel.request.set(Some(request));
            return Poll::Pending;
        }
        match this.channel.response.take() {
            Some(response) => Poll::Ready(response),
            None => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use core::task::Waker;

    use super::*;

    #[test]
    fn test_fetch_posts_then_resolves() {
        let channel = RequestChannel::default();
        let request = Request::Storage { slot: U256::ONE };
        let mut fetch = Fetch::new(&channel, request.clone());
        let mut cx = Context::from_waker(Waker::noop());

        assert!(Pin::new(&mut fetch).poll(&mut cx).is_pending());
        assert_eq!(channel.take_request(), Some(request));
        assert!(Pin::new(&mut fetch).poll(&mut cx).is_pending());

        channel.respond(Response::Storage(None));
        assert_eq!(Pin::new(&mut fetch).poll(&mut cx), Poll::Ready(Response::Storage(None)));
    }

    #[test]
    fn test_response_shape() {
        let code = Request::Code {
            address: Address([0; 20]),
        };
        assert!(Response::Code(Vec::new()).answers(&code));
        assert!(!Response::Storage(None).answers(&code));
    }
}
