// Codec - codec-format
// Module: Deployed Code Contexts
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Bytecode fingerprints used to recognise contracts from their code.

use std::{collections::BTreeMap, ops::Range};

use crate::{
    conversion::Selector,
    types::{ContractKind, ContractType, Mutability, TypeId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiParameter {
    pub name:      String,
    pub type_name: String,
}

/// A function entry from a contract interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionAbiEntry {
    pub name:             String,
    pub inputs:           Vec<AbiParameter>,
    pub outputs:          Vec<AbiParameter>,
    pub state_mutability: Mutability,
}

/// Code fingerprint of one contract, deployed or constructor form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    pub context_hash:   String,
    pub binary:         Vec<u8>,
    /// Byte ranges of `binary` filled in at link time, ignored when matching
    pub link_wildcards: Vec<Range<usize>>,
    pub is_constructor: bool,
    pub contract_name:  Option<String>,
    pub contract_id:    Option<TypeId>,
    pub contract_kind:  Option<ContractKind>,
    pub payable:        bool,
    pub abi:            BTreeMap<Selector, FunctionAbiEntry>,
}

impl Context {
    /// Whether `code` was produced from this context.
    ///
    /// Deployed code must match in full; constructor code may carry
    /// trailing constructor arguments.
    pub fn matches(&self, code: &[u8]) -> bool {
        if code.is_empty() || self.binary.is_empty() {
            return false;
        }
        let length_ok = if self.is_constructor {
            code.len() >= self.binary.len()
        } else {
            code.len() == self.binary.len()
        };
        length_ok
            && self
                .binary
                .iter()
                .zip(code)
                .enumerate()
                .all(|(index, (expected, actual))| {
                    expected == actual || self.is_wildcard(index)
                })
    }

    fn is_wildcard(&self, index: usize) -> bool {
        self.link_wildcards.iter().any(|range| range.contains(&index))
    }

    /// The contract type this context represents
    pub fn contract_type(&self) -> ContractType {
        ContractType {
            id:        self.contract_id.clone(),
            type_name: self.contract_name.clone().unwrap_or_default(),
            kind:      self.contract_kind.unwrap_or(ContractKind::Contract),
            payable:   self.payable,
        }
    }
}

/// First deployed-code context matching `code`.
pub fn find_deployed_context<'a>(contexts: &'a [Context], code: &[u8]) -> Option<&'a Context> {
    contexts
        .iter()
        .find(|context| !context.is_constructor && context.matches(code))
}
