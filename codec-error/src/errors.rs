// Codec - codec-error
// Module: Error Types
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

/// Error types for caller-contract violations
///
/// Problems found in the decoded data itself are never reported through
/// this type; they are carried as values by the decoder. `Error` covers the
/// remaining cases: malformed requests, missing definitions while building
/// tables, and misuse of a decoding session.
use core::fmt;

use crate::codes;

/// `Error` categories for decoder operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCategory {
    /// Pointer and type combinations the decoder cannot route
    Decoding     = 1,
    /// Type universe lookups
    Type         = 2,
    /// Allocation table construction
    Allocation   = 3,
    /// Suspension protocol misuse
    Session      = 4,
    /// Invalid arguments
    Parameter    = 5,
    /// Operations that are not supported
    NotSupported = 6,
}

/// Base trait for all error types
pub trait ErrorSource: fmt::Debug + Send + Sync {
    /// Get the error code
    fn code(&self) -> u16;

    /// Get the error message
    fn message(&self) -> &'static str;

    /// Get the error category
    fn category(&self) -> ErrorCategory;
}

/// Decoder `Error` type
///
/// Categorized error with a numeric code and a static message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Error {
    /// `Error` category
    pub category: ErrorCategory,
    /// `Error` code
    pub code:     u16,
    /// `Error` message
    pub message:  &'static str,
}

impl Error {
    /// Resume called with no outstanding request
    pub const NO_PENDING_REQUEST: Self = Self::new(
        ErrorCategory::Session,
        codes::NO_PENDING_REQUEST,
        "No request is pending on this decoding session",
    );
    /// Response does not answer the outstanding request
    pub const RESPONSE_MISMATCH: Self = Self::new(
        ErrorCategory::Session,
        codes::RESPONSE_MISMATCH,
        "Response kind does not match the pending request",
    );
    /// Session already produced its result
    pub const SESSION_FINISHED: Self = Self::new(
        ErrorCategory::Session,
        codes::SESSION_FINISHED,
        "Decoding session has already finished",
    );
    /// Decode suspended without posting a request
    pub const SESSION_STALLED: Self = Self::new(
        ErrorCategory::Session,
        codes::SESSION_STALLED,
        "Decoding suspended without a request",
    );

    /// Create a new error.
    #[must_use]
    pub const fn new(category: ErrorCategory, code: u16, message: &'static str) -> Self {
        Self {
            category,
            code,
            message,
        }
    }

    /// Create a decoding contract error
    #[must_use]
    pub const fn decoding_error(message: &'static str) -> Self {
        Self::new(ErrorCategory::Decoding, codes::POINTER_TYPE_MISMATCH, message)
    }

    /// Create a type lookup error
    #[must_use]
    pub const fn type_not_found(message: &'static str) -> Self {
        Self::new(ErrorCategory::Type, codes::TYPE_NOT_FOUND, message)
    }

    /// Create an allocation error
    #[must_use]
    pub const fn allocation_error(code: u16, message: &'static str) -> Self {
        Self::new(ErrorCategory::Allocation, code, message)
    }

    /// Create an invalid argument error
    #[must_use]
    pub const fn invalid_argument(message: &'static str) -> Self {
        Self::new(ErrorCategory::Parameter, codes::INVALID_ARGUMENT, message)
    }

    /// Create an invalid length error
    #[must_use]
    pub const fn invalid_length(message: &'static str) -> Self {
        Self::new(ErrorCategory::Parameter, codes::INVALID_LENGTH, message)
    }

    /// Check if this is a decoding contract error
    #[must_use]
    pub fn is_decoding_error(&self) -> bool {
        self.category == ErrorCategory::Decoding
    }

    /// Check if this is a type lookup error
    #[must_use]
    pub fn is_type_error(&self) -> bool {
        self.category == ErrorCategory::Type
    }

    /// Check if this is an allocation error
    #[must_use]
    pub fn is_allocation_error(&self) -> bool {
        self.category == ErrorCategory::Allocation
    }

    /// Check if this is a session error
    #[must_use]
    pub fn is_session_error(&self) -> bool {
        self.category == ErrorCategory::Session
    }

    /// Check if this is a parameter error
    #[must_use]
    pub fn is_parameter_error(&self) -> bool {
        self.category == ErrorCategory::Parameter
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}][E{:04X}] {}",
            self.category, self.code, self.message
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl ErrorSource for Error {
    fn code(&self) -> u16 {
        self.code
    }

    fn message(&self) -> &'static str {
        self.message
    }

    fn category(&self) -> ErrorCategory {
        self.category
    }
}
