// Codec - codec-format
// Module: Region State Snapshot
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use ethnum::U256;

use crate::{
    conversion::Word,
    pointer::{ByteLocation, SpecialVariable},
};

/// Raw bytes of every addressable region at one point of execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvmState {
    /// Stack words, bottom first
    pub stack:       Vec<Word>,
    pub memory:      Vec<u8>,
    pub calldata:    Vec<u8>,
    pub eventdata:   Vec<u8>,
    pub returndata:  Vec<u8>,
    pub eventtopics: Vec<Word>,
    /// Known storage words by slot address; missing slots are requested
    pub storage:     BTreeMap<U256, Word>,
    pub specials:    BTreeMap<SpecialVariable, Word>,
}

impl EvmState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, location: ByteLocation) -> &[u8] {
        match location {
            ByteLocation::Memory => &self.memory,
            ByteLocation::Calldata => &self.calldata,
            ByteLocation::Eventdata => &self.eventdata,
            ByteLocation::Returndata => &self.returndata,
        }
    }

    #[must_use]
    pub fn with_calldata(mut self, calldata: Vec<u8>) -> Self {
        self.calldata = calldata;
        self
    }

    #[must_use]
    pub fn with_memory(mut self, memory: Vec<u8>) -> Self {
        self.memory = memory;
        self
    }

    #[must_use]
    pub fn with_eventdata(mut self, eventdata: Vec<u8>) -> Self {
        self.eventdata = eventdata;
        self
    }

    #[must_use]
    pub fn with_returndata(mut self, returndata: Vec<u8>) -> Self {
        self.returndata = returndata;
        self
    }

    #[must_use]
    pub fn with_eventtopics(mut self, topics: Vec<Word>) -> Self {
        self.eventtopics = topics;
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: Vec<Word>) -> Self {
        self.stack = stack;
        self
    }

    #[must_use]
    pub fn with_storage_word(mut self, slot: U256, word: Word) -> Self {
        self.storage.insert(slot, word);
        self
    }

    #[must_use]
    pub fn with_special(mut self, variable: SpecialVariable, word: Word) -> Self {
        self.specials.insert(variable, word);
        self
    }
}
