// Codec - codec-format
// Module: Typed Value Data Model
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Data model for the typed value decoder
//!
//! This crate defines what the decoder consumes and produces:
//!
//! - [`types`]: the closed [`Type`](types::Type) union and type identities
//! - [`universe`]: user-defined struct, enum, contract and value types
//! - [`pointer`]: location-tagged pointers and storage slot derivation
//! - [`state`], [`context`], [`info`]: the read-only execution bundle
//! - [`allocation`], [`layout`]: member layouts and ABI/storage sizing
//! - [`values`], [`errors`]: decoded results and their error kinds

pub mod allocation;
pub mod context;
pub mod conversion;
pub mod errors;
pub mod info;
pub mod layout;
pub mod limits;
pub mod pointer;
pub mod state;
pub mod types;
pub mod universe;
pub mod values;

pub use conversion::{Address, Selector, Word};
pub use errors::{ErrorKind, PaddingType};
pub use info::ExecutionInfo;
pub use pointer::Pointer;
pub use types::Type;
pub use values::{Decoded, Value};

/// Re-exported so hosts can build numbers without a direct dependency
pub use ethnum::{I256, U256};
