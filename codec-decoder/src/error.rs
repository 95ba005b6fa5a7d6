// Codec - codec-decoder
// Module: Decoder Errors
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Error propagation inside the decoder.
//!
//! Data problems travel as [`DecoderError::Recoverable`] until the nearest
//! structural decoder turns them into an error result, or into a
//! [`StopDecoding`] signal when decoding strictly.

use core::fmt;

use codec_error::Error;
use codec_format::{Decoded, ErrorKind, Type};

use crate::options::DecodeOptions;

/// Signal that aborts the whole decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopDecoding {
    pub error:       ErrorKind,
    /// Set when more type information might let a second attempt succeed
    pub allow_retry: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderError {
    Recoverable(ErrorKind),
    Stop(StopDecoding),
    Fatal(Error),
}

impl DecoderError {
    pub fn stop(error: ErrorKind) -> Self {
        Self::Stop(StopDecoding {
            error,
            allow_retry: false,
        })
    }

    pub fn retryable(error: ErrorKind) -> Self {
        Self::Stop(StopDecoding {
            error,
            allow_retry: true,
        })
    }
}

impl From<Error> for DecoderError {
    fn from(error: Error) -> Self {
        Self::Fatal(error)
    }
}

pub type DecoderResult<T> = core::result::Result<T, DecoderError>;

/// Why a decode produced no result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    Stop(StopDecoding),
    Fatal(Error),
}

impl DecodeFailure {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Stop(StopDecoding { allow_retry: true, .. }))
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop(stop) if stop.allow_retry => write!(f, "decoding stopped (retryable): {}", stop.error),
            Self::Stop(stop) => write!(f, "decoding stopped: {}", stop.error),
            Self::Fatal(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for DecodeFailure {}

/// Turns a finished root decode into the public result.
pub(crate) fn finish(ty: &Type, result: DecoderResult<Decoded>) -> Result<Decoded, DecodeFailure> {
    match result {
        Ok(decoded) => Ok(decoded),
        Err(DecoderError::Recoverable(error)) => Ok(Decoded::error(ty.clone(), error)),
        Err(DecoderError::Stop(stop)) => Err(DecodeFailure::Stop(stop)),
        Err(DecoderError::Fatal(error)) => Err(DecodeFailure::Fatal(error)),
    }
}

/// Separates recoverable data errors from signals that must keep unwinding.
pub(crate) trait Caught<T> {
    fn caught(self) -> DecoderResult<Result<T, ErrorKind>>;
}

impl<T> Caught<T> for DecoderResult<T> {
    fn caught(self) -> DecoderResult<Result<T, ErrorKind>> {
        match self {
            Ok(value) => Ok(Ok(value)),
            Err(DecoderError::Recoverable(error)) => Ok(Err(error)),
            Err(other) => Err(other),
        }
    }
}

/// Records `error` for this subtree, or stops when decoding strictly.
pub(crate) fn fail(ty: &Type, error: ErrorKind, options: &DecodeOptions) -> DecoderResult<Decoded> {
    if options.strict_abi_mode {
        log::debug!("strict mode: stopping on {} error: {error}", ty.class_name());
        return Err(DecoderError::stop(error));
    }
    Ok(Decoded::error(ty.clone(), error))
}

/// Missing type information: a retryable stop when strict or when the
/// caller asked for retries, otherwise an error result.
pub(crate) fn missing_type(ty: &Type, error: ErrorKind, options: &DecodeOptions) -> DecoderResult<Decoded> {
    if options.strict_abi_mode || options.allow_retry {
        log::debug!("type information missing for {}, signalling retry", ty.class_name());
        return Err(DecoderError::retryable(error));
    }
    Ok(Decoded::error(ty.clone(), error))
}

/// Sizing failures: missing types are retryable, anything else is data.
pub(crate) fn layout_failure(ty: &Type, error: ErrorKind, options: &DecodeOptions) -> DecoderResult<Decoded> {
    match error {
        ErrorKind::UserDefinedTypeNotFound { .. } => missing_type(ty, error, options),
        other => fail(ty, other, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_respects_strict_mode() {
        let error = ErrorKind::BoolOutOfRange {
            raw: codec_format::U256::new(2),
        };
        let relaxed = fail(&Type::Bool, error.clone(), &DecodeOptions::default()).unwrap();
        assert!(relaxed.is_error());
        let strict = fail(&Type::Bool, error, &DecodeOptions::strict());
        assert!(matches!(strict, Err(DecoderError::Stop(StopDecoding { allow_retry: false, .. }))));
    }

    #[test]
    fn test_missing_type_retry_flag() {
        let error = ErrorKind::type_not_found(&Type::Bool);
        let retry = missing_type(&Type::Bool, error.clone(), &DecodeOptions::default().with_allow_retry(true));
        assert!(matches!(retry, Err(DecoderError::Stop(StopDecoding { allow_retry: true, .. }))));
        assert!(missing_type(&Type::Bool, error, &DecodeOptions::default()).unwrap().is_error());
    }

    #[test]
    fn test_finish_converts_recoverable() {
        let error = ErrorKind::ReadErrorTopic { index: 4 };
        let decoded = finish(&Type::Bool, Err(DecoderError::Recoverable(error.clone()))).unwrap();
        assert_eq!(decoded.as_error(), Some(&error));
        let failure = finish(&Type::Bool, Err(DecoderError::retryable(error))).unwrap_err();
        assert!(failure.is_retryable());
    }
}
