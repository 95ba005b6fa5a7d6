// Codec - codec-format
// Module: Execution Info
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The read-only bundle a decoding session works against.

use std::collections::BTreeMap;

use crate::{
    allocation::Allocations,
    context::{self, Context},
    pointer::Slot,
    state::EvmState,
    types::{ContractType, Mutability, Visibility},
    universe::TypeUniverse,
};

/// Entry of the internal function table, keyed by program counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalFunctionEntry {
    Function {
        name:       String,
        defined_in: ContractType,
        mutability: Option<Mutability>,
        visibility: Option<Visibility>,
    },
    /// The compiler's designated invalid function
    DesignatedInvalid,
}

pub type InternalFunctionTable = BTreeMap<u32, InternalFunctionEntry>;

/// State, contexts, type universe and layouts for one decoding session.
///
/// Never mutated while decoding, so one bundle may back several sessions.
#[derive(Debug, Clone, Default)]
pub struct ExecutionInfo {
    pub state:                    EvmState,
    pub contexts:                 Vec<Context>,
    pub current_context:          Option<Context>,
    pub user_defined_types:       TypeUniverse,
    pub allocations:              Allocations,
    pub internal_functions_table: Option<InternalFunctionTable>,
    /// Slots of mapping entries known to exist
    pub mapping_keys:             Vec<Slot>,
}

impl ExecutionInfo {
    pub fn new(state: EvmState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_types(mut self, universe: TypeUniverse, allocations: Allocations) -> Self {
        self.user_defined_types = universe;
        self.allocations = allocations;
        self
    }

    #[must_use]
    pub fn with_contexts(mut self, contexts: Vec<Context>) -> Self {
        self.contexts = contexts;
        self
    }

    #[must_use]
    pub fn with_current_context(mut self, context: Context) -> Self {
        self.current_context = Some(context);
        self
    }

    #[must_use]
    pub fn with_internal_functions(mut self, table: InternalFunctionTable) -> Self {
        self.internal_functions_table = Some(table);
        self
    }

    #[must_use]
    pub fn with_mapping_keys(mut self, slots: Vec<Slot>) -> Self {
        self.mapping_keys = slots;
        self
    }

    pub fn find_context(&self, code: &[u8]) -> Option<&Context> {
        context::find_deployed_context(&self.contexts, code)
    }
}
