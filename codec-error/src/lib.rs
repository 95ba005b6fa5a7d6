// Codec - codec-error
// Module: Error Handling
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Error handling for the typed value decoder
//!
//! Decoded data that turns out to be malformed is reported as part of the
//! decoded result, not through this crate. The errors here describe contract
//! violations by the caller: an unroutable pointer, a missing definition
//! while computing allocations, or a decoding session driven out of order.
//!
//! # Error Categories
//!
//! ## Decoding Errors (1000-1999)
//! - Pointer/type mismatches
//! - Unusable mapping keys
//!
//! ## Type Errors (2000-2999)
//! - Missing or mismatched user-defined types
//!
//! ## Allocation Errors (3000-3999)
//! - Recursive or overflowing layouts
//!
//! ## Session Errors (4000-4999)
//! - Resuming without a pending request
//! - Mismatched responses
//!
//! # Usage
//!
//! ```
//! use codec_error::{codes, Error, ErrorCategory};
//!
//! let error = Error::new(
//!     ErrorCategory::Parameter,
//!     codes::INVALID_LENGTH,
//!     "Address must be 20 bytes",
//! );
//! assert!(error.is_parameter_error());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Error codes
pub mod codes;
/// Error and error handling types
pub mod errors;

pub use errors::{Error, ErrorCategory, ErrorSource};

/// A specialized `Result` type for decoder operations.
pub type Result<T> = core::result::Result<T, Error>;
