// Codec - codec-decoder
// Module: Decoding Session
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Driving a decode to completion.
//!
//! A [`Decoding`] is a suspended decode. Each [`Decoding::step`] runs it
//! until it either needs external data, returned as [`Step::Request`], or
//! finishes. The host answers with [`Decoding::resume`]. Nothing is cached
//! across requests; a driver that wants caching keeps its own.

use core::task::{Context, Poll, Waker};
use std::rc::Rc;

use codec_error::{Error, Result};
use codec_format::{Decoded, Type};

use crate::{
    error::{DecodeFailure, finish},
    request::{DecodeFuture, Request, RequestChannel, Response},
};

/// Outcome of advancing a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The decode is suspended until this request is answered
    Request(Request),
    Finished(core::result::Result<Decoded, DecodeFailure>),
}

/// Answers requests on behalf of a driver loop
pub trait RequestFulfiller {
    fn fulfill(&mut self, request: &Request) -> Response;
}

impl<F: FnMut(&Request) -> Response> RequestFulfiller for F {
    fn fulfill(&mut self, request: &Request) -> Response {
        self(request)
    }
}

/// Fulfiller for hosts without chain access: no code anywhere and no
/// storage beyond the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternalData;

impl RequestFulfiller for NoExternalData {
    fn fulfill(&mut self, request: &Request) -> Response {
        match request {
            Request::Code { .. } => Response::Code(Vec::new()),
            Request::Storage { .. } => Response::Storage(None),
        }
    }
}

/// A suspended decode
pub struct Decoding<'a> {
    ty:       Type,
    future:   Option<DecodeFuture<'a, Decoded>>,
    channel:  Rc<RequestChannel>,
    awaiting: Option<Request>,
    requests: usize,
}

impl<'a> Decoding<'a> {
    pub(crate) fn new(ty: Type, channel: Rc<RequestChannel>, future: DecodeFuture<'a, Decoded>) -> Self {
        Self {
            ty,
            future: Some(future),
            channel,
            awaiting: None,
            requests: 0,
        }
    }

    /// Runs until the next request or the end.
    ///
    /// While a request is outstanding the same request is returned again.
    pub fn step(&mut self) -> Result<Step> {
        if let Some(request) = &self.awaiting {
            return Ok(Step::Request(request.clone()));
        }
        let Some(future) = self.future.as_mut() else {
            return Err(Error::SESSION_FINISHED);
        };

        #[cfg(feature = "tracing")]
        let _span = crate::tracing::DecodeTrace::step(self.ty.class_name(), self.requests).entered();

        let mut cx = Context::from_waker(Waker::noop());
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(result) => {
                self.future = None;
                log::debug!("{} decode finished after {} request(s)", self.ty.class_name(), self.requests);
                Ok(Step::Finished(finish(&self.ty, result)))
            },
            Poll::Pending => match self.channel.take_request() {
                Some(request) => {
                    self.requests += 1;
                    log::trace!("decode suspended on {request:?}");
                    self.awaiting = Some(request.clone());
                    Ok(Step::Request(request))
                },
                None => {
                    self.future = None;
                    Err(Error::SESSION_STALLED)
                },
            },
        }
    }

    /// Answers the outstanding request and runs on.
    ///
    /// A response of the wrong kind is rejected and the request stays
    /// outstanding.
    pub fn resume(&mut self, response: Response) -> Result<Step> {
        let Some(request) = self.awaiting.as_ref() else {
            return Err(if self.future.is_some() {
                Error::NO_PENDING_REQUEST
            } else {
                Error::SESSION_FINISHED
            });
        };
        if !response.answers(request) {
            log::warn!("response {response:?} does not answer {request:?}");
            return Err(Error::RESPONSE_MISMATCH);
        }
        self.awaiting = None;
        self.channel.respond(response);
        self.step()
    }

    /// Drives the decode to the end, answering requests with `fulfiller`.
    pub fn run<F: RequestFulfiller + ?Sized>(
        mut self,
        fulfiller: &mut F,
    ) -> core::result::Result<Decoded, DecodeFailure> {
        let mut step = self.step().map_err(DecodeFailure::Fatal)?;
        loop {
            match step {
                Step::Finished(result) => return result,
                Step::Request(request) => {
                    let response = fulfiller.fulfill(&request);
                    step = self.resume(response).map_err(DecodeFailure::Fatal)?;
                },
            }
        }
    }

    /// Requests issued so far
    pub fn request_count(&self) -> usize {
        self.requests
    }

    pub fn is_finished(&self) -> bool {
        self.future.is_none()
    }

    /// Type of the value being decoded
    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

impl core::fmt::Debug for Decoding<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Decoding")
            .field("ty", &self.ty)
            .field("awaiting", &self.awaiting)
            .field("requests", &self.requests)
            .field("finished", &self.future.is_none())
            .finish()
    }
}
